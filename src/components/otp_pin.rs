use std::time::Duration;

use gpui::{
    Animation, AnimationExt, AnyElement, FocusHandle, InteractiveElement, IntoElement,
    ParentElement, RenderOnce, SharedString, StatefulInteractiveElement, Styled, Window, div, px,
};

use crate::config::{PinConfig, SlotStyle};
use crate::id::ComponentId;

use super::focus_state::ActiveSurface;
use super::keypad::Keypad;
use super::pin_actions::{DeleteBackward, PIN_KEY_CONTEXT, PasteClipboard, ensure_pin_keybindings};
use super::pin_view::{OtpPinView, PinSnapshot};
use super::utils::{caret_height, quantized_stroke_px};

const CARET_BLINK_TOGGLE_MS: u64 = 680;
const CARET_BLINK_CYCLE_MS: u64 = CARET_BLINK_TOGGLE_MS * 2;
const SLOT_GAP_PX: f32 = 10.0;
const PLAIN_RADIUS_PX: f32 = 10.0;
const BOX_RADIUS_PX: f32 = 5.0;

/// Row of pin slots bound to an [`OtpPinView`].
///
/// The first render mounts the view and schedules its deferred focus. The custom keypad is
/// drawn under the row while it is the active input surface.
#[derive(IntoElement)]
pub struct OtpPinInput {
    id: ComponentId,
    view: OtpPinView,
    disabled: bool,
    focus_handle: Option<FocusHandle>,
    style: gpui::StyleRefinement,
}

impl OtpPinInput {
    #[track_caller]
    pub fn new(view: OtpPinView) -> Self {
        Self {
            id: ComponentId::auto("otp-pin"),
            view,
            disabled: false,
            focus_handle: None,
            style: gpui::StyleRefinement::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<ComponentId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn disabled(mut self, value: bool) -> Self {
        self.disabled = value;
        self
    }

    /// Window focus handle that follows the view's logical focus. Without one the element
    /// tracks a handle owned by its view.
    pub fn focus_handle(mut self, focus_handle: FocusHandle) -> Self {
        self.focus_handle = Some(focus_handle);
        self
    }

    fn resolved_focus_handle(&self, cx: &gpui::App) -> FocusHandle {
        match self.focus_handle.as_ref() {
            Some(focus_handle) => focus_handle.clone(),
            None => self.view.window_focus_handle(cx),
        }
    }

    fn schedule_auto_focus(
        &self,
        focus_handle: FocusHandle,
        window: &Window,
        cx: &mut gpui::App,
    ) {
        let Some(ticket) = self.view.mount() else {
            return;
        };
        let weak = self.view.downgrade();
        let delay = self.view.config().auto_focus_delay;
        let window_handle = window.window_handle();
        cx.spawn(async move |cx| {
            cx.background_executor().timer(delay).await;
            let _ = window_handle.update(cx, |_, window, cx| {
                let Some(view) = weak.upgrade() else {
                    return;
                };
                if view.focus_timer_elapsed(ticket) {
                    window.focus(&focus_handle, cx);
                    window.refresh();
                }
            });
        })
        .detach();
    }

    fn render_glyph(config: &PinConfig, glyph: String) -> AnyElement {
        let mut text = div()
            .text_color(config.style.text_color)
            .text_size(px(config.style.text_size))
            .font_weight(config.style.font_weight);
        if let Some(family) = config.style.font_family.clone() {
            text = text.font_family(family);
        }
        text.child(SharedString::from(glyph)).into_any_element()
    }

    fn render_caret(&self, config: &PinConfig, index: usize, window: &Window) -> AnyElement {
        div()
            .id(self.id.slot_index("caret", index))
            .w(quantized_stroke_px(window, 1.5))
            .h(px(caret_height(config.style.text_size)))
            .bg(config.style.text_color)
            .rounded_sm()
            .with_animation(
                self.id.slot_index("caret-blink", index),
                Animation::new(Duration::from_millis(CARET_BLINK_CYCLE_MS))
                    .repeat()
                    .with_easing(gpui::linear),
                |this, delta| {
                    let visible = ((delta * 2.0).fract()) < 0.5;
                    this.opacity(if visible { 1.0 } else { 0.0 })
                },
            )
            .into_any_element()
    }

    fn render_slot(
        &self,
        config: &PinConfig,
        snapshot: &PinSnapshot,
        index: usize,
        window: &Window,
    ) -> AnyElement {
        let style = &config.style;
        let glyph = self.view.glyph_at(index);
        let show_caret =
            !self.disabled && snapshot.caret_index(config.digit_count) == Some(index);
        let content = if show_caret {
            self.render_caret(config, index, window)
        } else {
            Self::render_glyph(config, glyph)
        };
        let stroke = quantized_stroke_px(window, style.line_width);

        let cell = div()
            .w(px(style.stroke_width))
            .h(px(style.stroke_height))
            .flex()
            .items_center()
            .justify_center()
            .child(content);

        match config.slot_style {
            SlotStyle::Circle => cell
                .rounded_full()
                .border(stroke)
                .border_color(style.line_color)
                .into_any_element(),
            SlotStyle::Box => cell
                .rounded(px(BOX_RADIUS_PX))
                .border(stroke)
                .border_color(style.line_color)
                .into_any_element(),
            SlotStyle::Underline => div()
                .flex()
                .flex_col()
                .items_center()
                .child(cell)
                .child(
                    div()
                        .w(px(style.stroke_width))
                        .h(stroke)
                        .bg(style.line_color),
                )
                .into_any_element(),
            SlotStyle::None => cell.into_any_element(),
        }
    }

    fn render_plain(
        &self,
        config: &PinConfig,
        snapshot: &PinSnapshot,
        window: &Window,
    ) -> AnyElement {
        let style = &config.style;
        let show_caret = !self.disabled && snapshot.caret_index(config.digit_count).is_some();
        let mut field = div()
            .min_w(px(style.stroke_width))
            .h(px(style.stroke_height))
            .px_2()
            .flex()
            .items_center()
            .justify_center()
            .rounded(px(PLAIN_RADIUS_PX))
            .border(px(style.line_width.max(0.0)))
            .border_color(style.line_color)
            .gap_0p5()
            .child(Self::render_glyph(config, self.view.display_text()));
        if show_caret {
            field = field.child(self.render_caret(config, 0, window));
        }
        field.into_any_element()
    }
}

impl RenderOnce for OtpPinInput {
    fn render(self, window: &mut Window, cx: &mut gpui::App) -> impl IntoElement {
        ensure_pin_keybindings(cx);
        let focus_handle = self.resolved_focus_handle(cx);
        if !self.disabled {
            self.schedule_auto_focus(focus_handle.clone(), window, cx);
        }

        let config = self.view.config().clone();
        let snapshot = self.view.snapshot();

        let mut display = div()
            .id(self.id.slot("display"))
            .flex()
            .flex_row()
            .items_center()
            .gap(px(SLOT_GAP_PX))
            .cursor_text();
        if config.slot_style.has_slots() {
            for index in 0..config.digit_count {
                display = display.child(self.render_slot(&config, &snapshot, index, window));
            }
        } else {
            display = display.child(self.render_plain(&config, &snapshot, window));
        }

        if !self.disabled {
            let view = self.view.clone();
            let focus_handle = focus_handle.clone();
            display = display.on_click(move |_, window, cx| {
                if view.tap_display() || view.is_focused() {
                    window.focus(&focus_handle, cx);
                }
                window.refresh();
            });
        }

        let mut root = div()
            .id(self.id.clone())
            .key_context(PIN_KEY_CONTEXT)
            .flex()
            .flex_col()
            .items_center()
            .gap_4()
            .track_focus(&focus_handle)
            .child(display);
        gpui::Refineable::refine(gpui::Styled::style(&mut root), &self.style);

        if self.disabled {
            return root.opacity(0.55).into_any_element();
        }

        let view_for_delete = self.view.clone();
        let view_for_paste = self.view.clone();
        let view_for_keys = self.view.clone();
        root = root
            .on_action(move |_: &DeleteBackward, window, _cx| {
                if view_for_delete.active_surface() == ActiveSurface::Native
                    && view_for_delete.delete_last()
                {
                    window.refresh();
                }
            })
            .on_action(move |_: &PasteClipboard, window, cx| {
                let Some(item) = cx.read_from_clipboard() else {
                    return;
                };
                let Some(pasted) = item.text() else {
                    return;
                };
                if view_for_paste.paste(&pasted) {
                    window.refresh();
                }
            })
            .on_key_down(move |event, window, cx| {
                let modifiers = &event.keystroke.modifiers;
                if modifiers.control || modifiers.platform || modifiers.function || modifiers.alt
                {
                    return;
                }
                let Some(ch) = event
                    .keystroke
                    .key_char
                    .as_ref()
                    .and_then(|value| value.chars().next())
                else {
                    return;
                };
                if view_for_keys.input_char(ch) {
                    window.refresh();
                    cx.stop_propagation();
                }
            });

        if snapshot.surface == ActiveSurface::Custom {
            root = root.child(Keypad::new(self.view.clone()).with_id(self.id.slot("keypad")));
        }

        root.into_any_element()
    }
}

impl gpui::Styled for OtpPinInput {
    fn style(&mut self) -> &mut gpui::StyleRefinement {
        &mut self.style
    }
}
