use std::fmt::{Display, Formatter};
use std::time::Duration;

use crate::style::PinStyle;

pub const DEFAULT_AUTO_FOCUS_DELAY: Duration = Duration::from_millis(500);

/// Visual decoration drawn around each digit position.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum SlotStyle {
    /// No per-slot decoration, the code renders as one line of text.
    None,
    #[default]
    Underline,
    Box,
    Circle,
}

impl SlotStyle {
    pub fn has_slots(self) -> bool {
        !matches!(self, SlotStyle::None)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum KeyboardMode {
    #[default]
    NativeNumberPad,
    NativeDefault,
    CustomSequential,
    CustomShuffled,
}

impl KeyboardMode {
    pub fn is_custom(self) -> bool {
        matches!(
            self,
            KeyboardMode::CustomSequential | KeyboardMode::CustomShuffled
        )
    }

    /// Whether a typed character is accepted by this mode's input surface.
    pub fn accepts(self, ch: char) -> bool {
        match self {
            KeyboardMode::NativeDefault => !ch.is_control(),
            _ => ch.is_ascii_digit(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum MaskGlyph {
    #[default]
    Dot,
    Star,
}

impl MaskGlyph {
    pub const fn as_str(self) -> &'static str {
        match self {
            MaskGlyph::Dot => "●",
            MaskGlyph::Star => "⭑",
        }
    }
}

impl Display for MaskGlyph {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ConfigError {
    ZeroDigitCount,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ZeroDigitCount => f.write_str("digit count must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Frozen widget configuration, produced by [`crate::components::OtpPinBuilder`].
#[derive(Clone, Debug, PartialEq)]
pub struct PinConfig {
    pub slot_style: SlotStyle,
    pub digit_count: usize,
    pub keyboard_mode: KeyboardMode,
    pub secure_entry: bool,
    pub mask_glyph: MaskGlyph,
    pub style: PinStyle,
    pub auto_focus_delay: Duration,
}

impl PinConfig {
    pub fn new(slot_style: SlotStyle, digit_count: usize) -> Self {
        Self {
            slot_style,
            digit_count,
            keyboard_mode: KeyboardMode::default(),
            secure_entry: false,
            mask_glyph: MaskGlyph::default(),
            style: PinStyle::default(),
            auto_focus_delay: DEFAULT_AUTO_FOCUS_DELAY,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.digit_count == 0 {
            return Err(ConfigError::ZeroDigitCount);
        }
        Ok(())
    }

    /// Coerces invalid values into the nearest valid ones, reporting what was changed.
    pub(crate) fn normalized(mut self) -> (Self, Option<ConfigError>) {
        match self.validate() {
            Ok(()) => (self, None),
            Err(error) => {
                self.digit_count = 1;
                (self, Some(error))
            }
        }
    }
}
