pub mod components;
pub mod config;
pub mod icon;
pub mod id;
pub mod prelude;
pub mod style;

pub use components::{Keypad, OtpPinBuilder, OtpPinInput, OtpPinView, PinSnapshot};
pub use config::{ConfigError, KeyboardMode, MaskGlyph, PinConfig, SlotStyle};
pub use style::{KeypadStyle, PinStyle};
