use std::cell::RefCell;
use std::future::Future;
use std::rc::{Rc, Weak};
use std::time::Duration;

use futures_timer::Delay;
use gpui::{FocusHandle, FontWeight, Hsla, SharedString};

use crate::config::{ConfigError, KeyboardMode, MaskGlyph, PinConfig, SlotStyle};

use super::change_notifier::{ChangeHandler, ChangeNotifier, SubscriptionId};
use super::digit_source::{DigitSource, KeypadKey, KeypadLayout};
use super::focus_state::{ActiveSurface, FocusCoordinator, FocusPhase, FocusTicket, HandleSlot};
use super::input_surface::{
    HiddenTextEntry, KeypadSurface, SharedTextEntry, SurfaceBinding, SurfaceSync,
};
use super::pin_state::PinState;

/// Accumulates configuration for an [`OtpPinView`].
pub struct OtpPinBuilder {
    config: PinConfig,
    on_change: Option<ChangeHandler>,
    digits: Option<DigitSource>,
    text_entry: Option<SharedTextEntry>,
}

impl OtpPinBuilder {
    pub fn new(slot_style: SlotStyle, digit_count: usize) -> Self {
        Self {
            config: PinConfig::new(slot_style, digit_count),
            on_change: None,
            digits: None,
            text_entry: None,
        }
    }

    pub fn keyboard_mode(mut self, value: KeyboardMode) -> Self {
        self.config.keyboard_mode = value;
        self
    }

    pub fn on_change(mut self, handler: impl Fn(SharedString) + 'static) -> Self {
        self.on_change = Some(Rc::new(handler));
        self
    }

    pub fn secure_entry(mut self, value: bool) -> Self {
        self.config.secure_entry = value;
        self
    }

    pub fn mask_glyph(mut self, value: MaskGlyph) -> Self {
        self.config.mask_glyph = value;
        self
    }

    pub fn text_color(mut self, value: impl Into<Hsla>) -> Self {
        self.config.style.text_color = value.into();
        self
    }

    pub fn text_size(mut self, value: f32) -> Self {
        self.config.style.text_size = value.max(1.0);
        self
    }

    pub fn font_family(mut self, value: impl Into<SharedString>) -> Self {
        self.config.style.font_family = Some(value.into());
        self
    }

    pub fn font_weight(mut self, value: FontWeight) -> Self {
        self.config.style.font_weight = value;
        self
    }

    pub fn stroke_width(mut self, value: f32) -> Self {
        self.config.style.stroke_width = value.max(0.0);
        self
    }

    pub fn stroke_height(mut self, value: f32) -> Self {
        self.config.style.stroke_height = value.max(0.0);
        self
    }

    pub fn line_width(mut self, value: f32) -> Self {
        self.config.style.line_width = value.max(0.0);
        self
    }

    pub fn line_color(mut self, value: impl Into<Hsla>) -> Self {
        self.config.style.line_color = value.into();
        self
    }

    pub fn keypad_background(mut self, value: impl Into<Hsla>) -> Self {
        self.config.style.keypad.background = value.into();
        self
    }

    pub fn key_font_color(mut self, value: impl Into<Hsla>) -> Self {
        self.config.style.keypad.key_font_color = value.into();
        self
    }

    pub fn key_stroke_color(mut self, value: impl Into<Hsla>) -> Self {
        self.config.style.keypad.key_stroke_color = value.into();
        self
    }

    /// Draws the shuffled keypad order from a fixed seed instead of the thread RNG.
    pub fn shuffle_seed(mut self, seed: u64) -> Self {
        self.digits = Some(DigitSource::with_seed(seed));
        self
    }

    /// Registers the primitive whose input surface the custom keypad replaces.
    ///
    /// The view keeps only a weak reference. Without a registration the view owns a
    /// [`HiddenTextEntry`].
    pub fn text_entry(mut self, primitive: &SharedTextEntry) -> Self {
        self.text_entry = Some(primitive.clone());
        self
    }

    #[doc(hidden)]
    pub fn auto_focus_delay(mut self, value: Duration) -> Self {
        self.config.auto_focus_delay = value;
        self
    }

    pub fn try_build(self) -> Result<OtpPinView, ConfigError> {
        self.config.validate()?;
        Ok(self.finish(std::convert::identity))
    }

    pub fn build(self) -> OtpPinView {
        self.finish(|config| {
            let (config, error) = config.normalized();
            if let Some(error) = error {
                tracing::warn!(
                    %error,
                    digit_count = config.digit_count,
                    "clamped pin configuration"
                );
            }
            config
        })
    }

    fn finish(self, normalize: impl FnOnce(PinConfig) -> PinConfig) -> OtpPinView {
        let config = normalize(self.config);
        let digits = self.digits.unwrap_or_default();
        let surface = match self.text_entry.as_ref() {
            Some(primitive) => SurfaceBinding::external(primitive),
            None => SurfaceBinding::owned(),
        };
        let notifier = ChangeNotifier::new();
        if let Some(handler) = self.on_change {
            notifier.subscribe_rc(handler);
        }

        OtpPinView {
            inner: Rc::new(RefCell::new(PinInner {
                pin: PinState::from_config(&config, digits),
                focus: FocusCoordinator::new(),
                window_focus: HandleSlot::default(),
            })),
            config: Rc::new(config),
            notifier: Rc::new(notifier),
            surface: Rc::new(surface),
        }
    }
}

struct PinInner {
    pin: PinState,
    focus: FocusCoordinator,
    window_focus: HandleSlot<FocusHandle>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PinSnapshot {
    pub code: SharedString,
    pub secure_active: bool,
    pub mask_glyph: MaskGlyph,
    pub phase: FocusPhase,
    pub surface: ActiveSurface,
}

impl PinSnapshot {
    pub fn is_focused(&self) -> bool {
        matches!(self.phase, FocusPhase::Mounted { focused: true })
    }

    /// Position of the text caret: the first empty slot while focused, none once complete.
    pub fn caret_index(&self, digit_count: usize) -> Option<usize> {
        let len = self.code.chars().count();
        (self.is_focused() && len < digit_count).then_some(len)
    }
}

/// Shared handle to one pin widget's state.
///
/// Clones refer to the same widget. Buffer changes are delivered to subscribers after every
/// internal borrow is released, so handlers may call back into the view.
#[derive(Clone)]
pub struct OtpPinView {
    config: Rc<PinConfig>,
    inner: Rc<RefCell<PinInner>>,
    notifier: Rc<ChangeNotifier>,
    surface: Rc<SurfaceBinding>,
}

#[derive(Clone)]
pub struct WeakOtpPinView {
    config: Weak<PinConfig>,
    inner: Weak<RefCell<PinInner>>,
    notifier: Weak<ChangeNotifier>,
    surface: Weak<SurfaceBinding>,
}

impl WeakOtpPinView {
    pub fn upgrade(&self) -> Option<OtpPinView> {
        Some(OtpPinView {
            config: self.config.upgrade()?,
            inner: self.inner.upgrade()?,
            notifier: self.notifier.upgrade()?,
            surface: self.surface.upgrade()?,
        })
    }
}

impl OtpPinView {
    pub fn builder(slot_style: SlotStyle, digit_count: usize) -> OtpPinBuilder {
        OtpPinBuilder::new(slot_style, digit_count)
    }

    pub fn config(&self) -> &PinConfig {
        &self.config
    }

    pub fn downgrade(&self) -> WeakOtpPinView {
        WeakOtpPinView {
            config: Rc::downgrade(&self.config),
            inner: Rc::downgrade(&self.inner),
            notifier: Rc::downgrade(&self.notifier),
            surface: Rc::downgrade(&self.surface),
        }
    }

    pub fn subscribe(&self, handler: impl Fn(SharedString) + 'static) -> SubscriptionId {
        self.notifier.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn snapshot(&self) -> PinSnapshot {
        let inner = self.inner.borrow();
        PinSnapshot {
            code: inner.pin.buffer().to_string().into(),
            secure_active: inner.pin.secure_active(),
            mask_glyph: inner.pin.mask_glyph(),
            phase: inner.focus.phase(),
            surface: inner.focus.active_surface(),
        }
    }

    pub fn code(&self) -> SharedString {
        self.inner.borrow().pin.buffer().to_string().into()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().pin.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().pin.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.inner.borrow().pin.is_complete()
    }

    pub fn secure_active(&self) -> bool {
        self.inner.borrow().pin.secure_active()
    }

    pub fn glyph_at(&self, index: usize) -> String {
        self.inner.borrow().pin.glyph_at(index)
    }

    pub fn masked_string(&self, value: &str) -> String {
        self.inner.borrow().pin.masked_string(value)
    }

    pub fn display_text(&self) -> String {
        self.inner.borrow().pin.display_text()
    }

    pub fn shuffled_digits(&self) -> [u8; 10] {
        *self.inner.borrow().pin.digits().shuffled()
    }

    pub fn keypad_layout(&self) -> KeypadLayout {
        self.inner
            .borrow()
            .pin
            .digits()
            .layout_for(self.config.keyboard_mode)
    }

    /// The keypad surface currently installed on the registered primitive, if any.
    pub fn keypad_surface(&self) -> Option<KeypadSurface> {
        self.surface.current()
    }

    pub fn hidden_entry(&self) -> Option<Rc<RefCell<HiddenTextEntry>>> {
        self.surface.hidden_entry()
    }

    pub fn append(&self, ch: char) -> bool {
        self.mutate(|pin| pin.append(ch))
    }

    pub fn append_str(&self, text: &str) -> bool {
        self.mutate(|pin| pin.append_str(text))
    }

    pub fn delete_last(&self) -> bool {
        self.mutate(PinState::delete_last)
    }

    pub fn clear(&self) -> bool {
        self.mutate(PinState::clear)
    }

    /// Programmatic write, truncated to the digit count before subscribers see it.
    pub fn set_code(&self, value: impl Into<String>) -> bool {
        let value = value.into();
        self.mutate(move |pin| pin.set_buffer(value))
    }

    pub fn clamp(&self) -> bool {
        let limit = self.config.digit_count;
        self.mutate(move |pin| pin.clamp(limit))
    }

    /// Character typed on the native surface. Ignored unless that surface has focus.
    pub fn input_char(&self, ch: char) -> bool {
        if self.active_surface() != ActiveSurface::Native
            || !self.config.keyboard_mode.accepts(ch)
        {
            return false;
        }
        self.append(ch)
    }

    /// Pasted text on the native surface. Rejected characters are dropped.
    pub fn paste(&self, text: &str) -> bool {
        if self.active_surface() != ActiveSurface::Native {
            return false;
        }
        let mode = self.config.keyboard_mode;
        let accepted = text
            .chars()
            .filter(|ch| mode.accepts(*ch))
            .collect::<String>();
        if accepted.is_empty() {
            return false;
        }
        self.append_str(&accepted)
    }

    pub fn toggle_secure(&self) -> bool {
        let secure_active = self.inner.borrow_mut().pin.toggle_secure();
        if self.surface.current().is_some() {
            self.sync_keypad();
        }
        secure_active
    }

    pub fn press_key(&self, key: KeypadKey) -> bool {
        match key {
            KeypadKey::Digit(_) => key.label().is_some_and(|ch| self.append(ch)),
            KeypadKey::Delete => self.delete_last(),
            KeypadKey::ToggleSecure => {
                self.toggle_secure();
                true
            }
        }
    }

    pub fn phase(&self) -> FocusPhase {
        self.inner.borrow().focus.phase()
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.borrow().focus.is_mounted()
    }

    pub fn is_focused(&self) -> bool {
        self.inner.borrow().focus.is_focused()
    }

    pub fn active_surface(&self) -> ActiveSurface {
        self.inner.borrow().focus.active_surface()
    }

    pub fn mount(&self) -> Option<FocusTicket> {
        let ticket = self.inner.borrow_mut().focus.mount();
        if let Some(ticket) = ticket {
            tracing::debug!(generation = ticket.generation(), "pin view mounted");
        }
        ticket
    }

    pub fn unmount(&self) {
        self.inner.borrow_mut().focus.unmount();
        tracing::debug!("pin view unmounted");
    }

    /// Completes a deferred auto-focus. Stale tickets are ignored.
    pub fn focus_timer_elapsed(&self, ticket: FocusTicket) -> bool {
        if !self.inner.borrow_mut().focus.redeem(ticket) {
            tracing::debug!(generation = ticket.generation(), "ignored stale focus ticket");
            return false;
        }
        self.acquire_focus()
    }

    /// Waits for the configured delay, then redeems `ticket` if the view still exists.
    pub fn auto_focus(&self, ticket: FocusTicket) -> impl Future<Output = bool> + 'static {
        let weak = self.downgrade();
        let delay = self.config.auto_focus_delay;
        async move {
            Delay::new(delay).await;
            match weak.upgrade() {
                Some(view) => view.focus_timer_elapsed(ticket),
                None => false,
            }
        }
    }

    pub fn acquire_focus(&self) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let surface = self.resolve_surface();
        let changed = self.inner.borrow_mut().focus.acquire(surface);
        if changed {
            tracing::debug!(?surface, "pin view focused");
        }
        changed
    }

    pub fn release_focus(&self) -> bool {
        let released = self.inner.borrow_mut().focus.release();
        if released {
            tracing::debug!("pin view released focus");
        }
        released
    }

    pub fn tap_display(&self) -> bool {
        let len = self.len();
        let digit_count = self.config.digit_count;
        if !self.inner.borrow().focus.tap_refocuses(len, digit_count) {
            return false;
        }
        let surface = self.resolve_surface();
        let changed = self
            .inner
            .borrow_mut()
            .focus
            .tap_display(len, digit_count, surface);
        if changed {
            tracing::debug!(?surface, "pin view focused by tap");
        }
        changed
    }

    /// Window focus handle used when the host supplies none. Stable for the view's lifetime.
    pub fn window_focus_handle(&self, cx: &gpui::App) -> FocusHandle {
        self.inner
            .borrow_mut()
            .window_focus
            .resolve(|| cx.focus_handle())
    }

    fn resolve_surface(&self) -> ActiveSurface {
        if !self.config.keyboard_mode.is_custom() {
            return ActiveSurface::Native;
        }
        if self.sync_keypad() {
            ActiveSurface::Custom
        } else {
            ActiveSurface::Native
        }
    }

    fn keypad_content(&self) -> KeypadSurface {
        KeypadSurface::new(
            self.keypad_layout(),
            self.config.style.keypad,
            self.secure_active(),
        )
    }

    fn sync_keypad(&self) -> bool {
        match self.surface.sync(self.keypad_content()) {
            Ok(SurfaceSync::Attached) => {
                tracing::debug!("attached custom keypad surface");
                true
            }
            Ok(SurfaceSync::Updated) => true,
            Err(error) => {
                tracing::warn!(%error, "custom keypad unavailable, using native input");
                false
            }
        }
    }

    fn mutate(&self, edit: impl FnOnce(&mut PinState) -> bool) -> bool {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            if edit(&mut inner.pin) {
                let len = inner.pin.len();
                let secure = inner.pin.secure_active();
                if inner
                    .focus
                    .after_buffer_change(len, self.config.digit_count, secure)
                {
                    tracing::debug!("secure code complete, released focus");
                }
                Some(SharedString::from(inner.pin.buffer().to_string()))
            } else {
                None
            }
        };

        match changed {
            Some(value) => {
                self.notifier.emit(value);
                true
            }
            None => false,
        }
    }
}
