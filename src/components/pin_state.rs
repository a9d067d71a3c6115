use crate::config::{MaskGlyph, PinConfig};

use super::digit_source::DigitSource;

/// Mutable code buffer plus the runtime masking settings.
///
/// `secure_active` and `mask_glyph` are seeded from the configuration and then owned here, so
/// the keypad's eye key can flip visibility without touching the frozen config.
#[derive(Clone, Debug)]
pub struct PinState {
    buffer: String,
    digit_count: usize,
    secure_active: bool,
    mask_glyph: MaskGlyph,
    digits: DigitSource,
}

impl PinState {
    pub fn new(digit_count: usize, secure_active: bool, mask_glyph: MaskGlyph) -> Self {
        Self::with_digits(digit_count, secure_active, mask_glyph, DigitSource::new())
    }

    pub fn with_digits(
        digit_count: usize,
        secure_active: bool,
        mask_glyph: MaskGlyph,
        digits: DigitSource,
    ) -> Self {
        Self {
            buffer: String::new(),
            digit_count: digit_count.max(1),
            secure_active,
            mask_glyph,
            digits,
        }
    }

    pub fn from_config(config: &PinConfig, digits: DigitSource) -> Self {
        Self::with_digits(
            config.digit_count,
            config.secure_entry,
            config.mask_glyph,
            digits,
        )
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn digit_count(&self) -> usize {
        self.digit_count
    }

    pub fn is_complete(&self) -> bool {
        self.len() == self.digit_count
    }

    pub fn secure_active(&self) -> bool {
        self.secure_active
    }

    pub fn mask_glyph(&self) -> MaskGlyph {
        self.mask_glyph
    }

    pub fn digits(&self) -> &DigitSource {
        &self.digits
    }

    /// Appends `ch` and keeps only the first `digit_count` characters.
    pub fn append(&mut self, ch: char) -> bool {
        let previous_len = self.buffer.len();
        self.buffer.push(ch);
        self.clamp(self.digit_count);
        self.buffer.len() != previous_len
    }

    pub fn append_str(&mut self, text: &str) -> bool {
        let previous_len = self.buffer.len();
        self.buffer.push_str(text);
        self.clamp(self.digit_count);
        self.buffer.len() != previous_len
    }

    pub fn delete_last(&mut self) -> bool {
        self.buffer.pop().is_some()
    }

    pub fn clear(&mut self) -> bool {
        if self.buffer.is_empty() {
            return false;
        }
        self.buffer.clear();
        true
    }

    pub fn toggle_secure(&mut self) -> bool {
        self.secure_active = !self.secure_active;
        self.secure_active
    }

    /// Replaces the buffer from outside the keypad path, e.g. a host binding.
    pub fn set_buffer(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        let previous = std::mem::replace(&mut self.buffer, value);
        self.clamp(self.digit_count);
        self.buffer != previous
    }

    /// Truncates to the first `limit` characters. Returns whether anything was cut.
    pub fn clamp(&mut self, limit: usize) -> bool {
        let Some((byte_index, _)) = self.buffer.char_indices().nth(limit) else {
            return false;
        };
        self.buffer.truncate(byte_index);
        true
    }

    pub fn glyph_at(&self, index: usize) -> String {
        let Some(ch) = self.buffer.chars().nth(index) else {
            return String::new();
        };
        if self.secure_active {
            self.mask_glyph.as_str().to_string()
        } else {
            ch.to_string()
        }
    }

    pub fn masked_string(&self, value: &str) -> String {
        self.mask_glyph.as_str().repeat(value.chars().count())
    }

    /// Text for the slot-less presentation.
    pub fn display_text(&self) -> String {
        if self.secure_active {
            self.masked_string(&self.buffer)
        } else {
            self.buffer.clone()
        }
    }
}
