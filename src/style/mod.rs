use gpui::{FontWeight, Hsla, SharedString};

/// Presentation attributes of the slot row and the keypad.
///
/// These values pass straight through to rendering. Nothing in the state core reads them.
#[derive(Clone, Debug, PartialEq)]
pub struct PinStyle {
    pub text_color: Hsla,
    pub text_size: f32,
    pub font_family: Option<SharedString>,
    pub font_weight: FontWeight,
    pub stroke_width: f32,
    pub stroke_height: f32,
    pub line_width: f32,
    pub line_color: Hsla,
    pub keypad: KeypadStyle,
}

impl Default for PinStyle {
    fn default() -> Self {
        Self {
            text_color: gpui::black(),
            text_size: 15.0,
            font_family: None,
            font_weight: FontWeight::NORMAL,
            stroke_width: 45.0,
            stroke_height: 45.0,
            line_width: 1.0,
            line_color: gpui::black(),
            keypad: KeypadStyle::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeypadStyle {
    pub background: Hsla,
    pub key_font_color: Hsla,
    pub key_stroke_color: Hsla,
    pub key_height: f32,
}

impl Default for KeypadStyle {
    fn default() -> Self {
        Self {
            background: gpui::white(),
            key_font_color: gpui::black(),
            key_stroke_color: gpui::black(),
            key_height: 65.0,
        }
    }
}
