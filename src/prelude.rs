pub use crate::components::{
    ActiveSurface, FocusPhase, HiddenTextEntry, Keypad, KeypadKey, OtpPinBuilder, OtpPinInput,
    OtpPinView, SharedTextEntry, SubscriptionId, TextEntryPrimitive,
};
pub use crate::config::{KeyboardMode, MaskGlyph, SlotStyle};
pub use crate::style::{KeypadStyle, PinStyle};
