pub mod change_notifier;
pub mod digit_source;
pub mod focus_state;
pub mod input_surface;
mod keypad;
mod otp_pin;
pub mod pin_actions;
pub mod pin_state;
mod pin_view;
mod utils;

#[cfg(test)]
mod test_state_logic;

pub use change_notifier::{ChangeHandler, ChangeNotifier, SubscriptionId};
pub use digit_source::{DigitSource, KeypadKey, KeypadLayout, SEQUENTIAL_DIGITS};
pub use focus_state::{ActiveSurface, FocusCoordinator, FocusPhase, FocusTicket};
pub use input_surface::{
    HiddenTextEntry, KeypadSurface, SharedTextEntry, SurfaceAttachError, SurfaceBinding,
    SurfaceSync, TextEntryPrimitive,
};
pub use keypad::Keypad;
pub use otp_pin::OtpPinInput;
pub use pin_actions::{DeleteBackward, PIN_KEY_CONTEXT, PasteClipboard, ensure_pin_keybindings};
pub use pin_state::PinState;
pub use pin_view::{OtpPinBuilder, OtpPinView, PinSnapshot, WeakOtpPinView};
