use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::KeyboardMode;

pub const SEQUENTIAL_DIGITS: [u8; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 0];

/// Digit orderings available to the custom keypad.
///
/// The shuffled order is drawn once when the source is created and never changes afterwards,
/// so the keypad layout stays put under the user's finger.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DigitSource {
    shuffled: [u8; 10],
}

impl Default for DigitSource {
    fn default() -> Self {
        Self::from_rng(&mut rand::thread_rng())
    }
}

impl DigitSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(&mut StdRng::seed_from_u64(seed))
    }

    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut shuffled = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        shuffled.shuffle(rng);
        Self { shuffled }
    }

    pub fn sequential(&self) -> &[u8; 10] {
        &SEQUENTIAL_DIGITS
    }

    pub fn shuffled(&self) -> &[u8; 10] {
        &self.shuffled
    }

    pub fn digits_for(&self, mode: KeyboardMode) -> &[u8; 10] {
        match mode {
            KeyboardMode::CustomShuffled => self.shuffled(),
            _ => self.sequential(),
        }
    }

    pub fn layout_for(&self, mode: KeyboardMode) -> KeypadLayout {
        KeypadLayout::from_digits(self.digits_for(mode))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum KeypadKey {
    Digit(u8),
    Delete,
    ToggleSecure,
}

impl KeypadKey {
    pub fn label(self) -> Option<char> {
        match self {
            KeypadKey::Digit(digit) => char::from_digit(u32::from(digit), 10),
            KeypadKey::Delete | KeypadKey::ToggleSecure => None,
        }
    }
}

/// Four rows of three keys: a 3x3 digit grid, then delete, the tenth digit and the eye key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KeypadLayout {
    rows: [[KeypadKey; 3]; 4],
}

impl KeypadLayout {
    pub fn from_digits(digits: &[u8; 10]) -> Self {
        let digit = |index: usize| KeypadKey::Digit(digits[index]);
        Self {
            rows: [
                [digit(0), digit(1), digit(2)],
                [digit(3), digit(4), digit(5)],
                [digit(6), digit(7), digit(8)],
                [KeypadKey::Delete, digit(9), KeypadKey::ToggleSecure],
            ],
        }
    }

    pub fn rows(&self) -> &[[KeypadKey; 3]; 4] {
        &self.rows
    }

    pub fn keys(&self) -> impl Iterator<Item = KeypadKey> + '_ {
        self.rows.iter().flatten().copied()
    }

    pub fn digits(&self) -> Vec<u8> {
        self.keys()
            .filter_map(|key| match key {
                KeypadKey::Digit(digit) => Some(digit),
                _ => None,
            })
            .collect()
    }
}
