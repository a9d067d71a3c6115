use gpui::{
    AnyElement, InteractiveElement, IntoElement, ParentElement, RenderOnce, SharedString,
    StatefulInteractiveElement, Styled, Window, div, px, svg,
};

use crate::icon::KeypadIcon;
use crate::id::ComponentId;

use super::digit_source::KeypadKey;
use super::input_surface::KeypadSurface;
use super::pin_view::OtpPinView;
use super::utils::quantized_stroke_px;

const ICON_SIZE: f32 = 24.0;

/// On-screen keypad rendered from the surface installed on the view's text-entry primitive.
///
/// Renders nothing until the surface has been attached.
#[derive(IntoElement)]
pub struct Keypad {
    id: ComponentId,
    view: OtpPinView,
    style: gpui::StyleRefinement,
}

impl Keypad {
    #[track_caller]
    pub fn new(view: OtpPinView) -> Self {
        Self {
            id: ComponentId::auto("otp-keypad"),
            view,
            style: gpui::StyleRefinement::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<ComponentId>) -> Self {
        self.id = id.into();
        self
    }

    fn key_label(key: KeypadKey, surface: &KeypadSurface) -> AnyElement {
        let color = surface.style.key_font_color;
        let icon = match key {
            KeypadKey::Digit(_) => {
                let label = key.label().map(String::from).unwrap_or_default();
                return div()
                    .text_color(color)
                    .child(SharedString::from(label))
                    .into_any_element();
            }
            KeypadKey::Delete => KeypadIcon::Backspace,
            KeypadKey::ToggleSecure => KeypadIcon::visibility(surface.secure_active),
        };

        match icon.path() {
            Some(path) => svg()
                .external_path(path.to_string_lossy().to_string())
                .w(px(ICON_SIZE))
                .h(px(ICON_SIZE))
                .text_color(color)
                .into_any_element(),
            None => div()
                .text_color(color)
                .child(icon.fallback())
                .into_any_element(),
        }
    }

    fn render_key(
        &self,
        index: usize,
        key: KeypadKey,
        surface: &KeypadSurface,
        window: &Window,
    ) -> AnyElement {
        let view = self.view.clone();
        div()
            .id(self.id.slot_index("key", index))
            .flex_1()
            .h(px(surface.style.key_height))
            .flex()
            .items_center()
            .justify_center()
            .bg(surface.style.background)
            .border(quantized_stroke_px(window, 1.0))
            .border_color(surface.style.key_stroke_color)
            .cursor_pointer()
            .child(Self::key_label(key, surface))
            .on_click(move |_, window, _cx| {
                view.press_key(key);
                window.refresh();
            })
            .into_any_element()
    }
}

impl RenderOnce for Keypad {
    fn render(self, window: &mut Window, _cx: &mut gpui::App) -> impl IntoElement {
        let Some(surface) = self.view.keypad_surface() else {
            return div().into_any_element();
        };

        let mut root = div()
            .id(self.id.clone())
            .w_full()
            .flex()
            .flex_col()
            .bg(surface.style.background);
        gpui::Refineable::refine(gpui::Styled::style(&mut root), &self.style);

        for (row_index, row) in surface.layout.rows().iter().enumerate() {
            let mut line = div().w_full().flex().flex_row();
            for (column, key) in row.iter().enumerate() {
                line = line.child(self.render_key(row_index * 3 + column, *key, &surface, window));
            }
            root = root.child(line);
        }
        root.into_any_element()
    }
}

impl gpui::Styled for Keypad {
    fn style(&mut self) -> &mut gpui::StyleRefinement {
        &mut self.style
    }
}
