use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gpui::SharedString;

use super::{
    ActiveSurface, FocusPhase, HiddenTextEntry, KeypadKey, OtpPinView, SharedTextEntry,
    TextEntryPrimitive,
};
use crate::config::{KeyboardMode, MaskGlyph, SlotStyle};

type Events = Rc<RefCell<Vec<String>>>;

fn recorder() -> (Events, impl Fn(SharedString) + 'static) {
    let events: Events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    (events, move |value: SharedString| {
        sink.borrow_mut().push(value.to_string())
    })
}

fn focused(view: &OtpPinView) {
    let ticket = view.mount().expect("first mount issues a ticket");
    assert!(view.focus_timer_elapsed(ticket));
    assert!(view.is_focused());
}

#[test]
fn full_buffer_appends_are_silent() {
    let (events, on_change) = recorder();
    let view = OtpPinView::builder(SlotStyle::Underline, 4)
        .keyboard_mode(KeyboardMode::CustomSequential)
        .on_change(on_change)
        .build();

    for call in 0..7 {
        let changed = view.append('1');
        assert_eq!(changed, call < 4);
    }

    assert_eq!(view.code().to_string(), "1111");
    assert_eq!(*events.borrow(), vec!["1", "11", "111", "1111"]);
}

#[test]
fn secure_completion_releases_focus_and_reports_plain_value() {
    let (events, on_change) = recorder();
    let view = OtpPinView::builder(SlotStyle::Box, 5)
        .secure_entry(true)
        .mask_glyph(MaskGlyph::Star)
        .on_change(on_change)
        .build();
    focused(&view);

    for (index, ch) in "1234".chars().enumerate() {
        view.append(ch);
        assert!(view.is_focused(), "still focused after digit {index}");
    }
    view.append('5');

    assert!(!view.is_focused());
    assert_eq!(view.active_surface(), ActiveSurface::None);
    assert_eq!(view.phase(), FocusPhase::Mounted { focused: false });
    for index in 0..5 {
        assert_eq!(view.glyph_at(index), "⭑");
    }
    assert_eq!(view.glyph_at(5), "");
    assert_eq!(
        *events.borrow(),
        vec!["1", "12", "123", "1234", "12345"]
    );
}

#[test]
fn plain_completion_keeps_focus_and_tap_refocuses() {
    let view = OtpPinView::builder(SlotStyle::Circle, 5).build();
    focused(&view);
    view.append_str("12345");

    assert!(view.is_complete());
    assert!(view.is_focused());
    assert_eq!(view.glyph_at(2), "3");

    assert!(view.release_focus());
    assert!(view.tap_display());
    assert!(view.is_focused());
    assert_eq!(view.active_surface(), ActiveSurface::Native);
}

#[test]
fn tap_on_incomplete_display_changes_nothing() {
    let view = OtpPinView::builder(SlotStyle::Underline, 4).build();
    assert!(view.mount().is_some());
    view.append_str("12");

    assert!(!view.tap_display());
    assert!(!view.is_focused());
}

#[test]
fn tap_refocuses_completed_secure_code() {
    let view = OtpPinView::builder(SlotStyle::Underline, 4)
        .secure_entry(true)
        .build();
    focused(&view);
    view.append_str("9876");
    assert!(!view.is_focused());

    assert!(view.tap_display());
    assert!(view.is_focused());
}

#[test]
fn shuffled_order_is_fixed_per_instance() {
    let first = OtpPinView::builder(SlotStyle::Underline, 4)
        .keyboard_mode(KeyboardMode::CustomShuffled)
        .shuffle_seed(17)
        .build();
    let second = OtpPinView::builder(SlotStyle::Underline, 4)
        .keyboard_mode(KeyboardMode::CustomShuffled)
        .shuffle_seed(90_210)
        .build();

    assert_ne!(first.shuffled_digits(), second.shuffled_digits());
    for view in [&first, &second] {
        let order = view.shuffled_digits();
        assert_eq!(view.shuffled_digits(), order);
        assert_eq!(view.keypad_layout().digits(), order.to_vec());

        let mut sorted = order;
        sorted.sort_unstable();
        assert_eq!(sorted, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }
}

#[test]
fn sequential_keypad_ignores_the_permutation() {
    let view = OtpPinView::builder(SlotStyle::Underline, 4)
        .keyboard_mode(KeyboardMode::CustomSequential)
        .shuffle_seed(3)
        .build();
    assert_eq!(
        view.keypad_layout().digits(),
        vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 0]
    );
    assert_eq!(view.keypad_layout().rows()[3][0], KeypadKey::Delete);
    assert_eq!(view.keypad_layout().rows()[3][2], KeypadKey::ToggleSecure);
}

#[test]
fn delete_on_empty_buffer_is_a_no_op() {
    let (events, on_change) = recorder();
    let view = OtpPinView::builder(SlotStyle::None, 6)
        .on_change(on_change)
        .build();
    view.set_code("123");

    assert!(view.delete_last());
    assert_eq!(view.code().to_string(), "12");
    view.clear();
    assert!(!view.delete_last());
    assert_eq!(view.code().to_string(), "");
    assert!(!view.clear());

    assert_eq!(*events.borrow(), vec!["123", "12", ""]);
}

#[test]
fn programmatic_write_is_clamped_before_notification() {
    let (events, on_change) = recorder();
    let view = OtpPinView::builder(SlotStyle::Underline, 4)
        .on_change(on_change)
        .build();

    assert!(view.set_code("123456"));
    assert_eq!(view.code().to_string(), "1234");
    assert!(!view.set_code("1234"));
    assert!(!view.clamp());

    assert_eq!(*events.borrow(), vec!["1234"]);
}

#[test]
fn slotless_display_masks_whole_buffer() {
    let view = OtpPinView::builder(SlotStyle::None, 4)
        .secure_entry(true)
        .build();
    view.append_str("42");
    assert_eq!(view.display_text(), "●●");
    assert_eq!(view.masked_string("abc"), "●●●");

    view.toggle_secure();
    assert_eq!(view.display_text(), "42");
}

#[test]
fn unsubscribed_handlers_stop_receiving() {
    let view = OtpPinView::builder(SlotStyle::Underline, 4).build();
    let (events, handler) = recorder();
    let id = view.subscribe(handler);

    view.append('1');
    assert!(view.unsubscribe(id));
    view.append('2');

    assert_eq!(*events.borrow(), vec!["1"]);
    assert!(!view.unsubscribe(id));
}

#[test]
fn handler_edits_are_delivered_after_current_value() {
    let view = OtpPinView::builder(SlotStyle::Underline, 4).build();
    let events: Events = Rc::new(RefCell::new(Vec::new()));

    let weak = view.downgrade();
    let sink = events.clone();
    view.subscribe(move |value| {
        sink.borrow_mut().push(format!("a:{value}"));
        if &*value == "1"
            && let Some(view) = weak.upgrade()
        {
            view.append('2');
        }
    });
    let sink = events.clone();
    view.subscribe(move |value| sink.borrow_mut().push(format!("b:{value}")));

    view.append('1');

    assert_eq!(*events.borrow(), vec!["a:1", "b:1", "a:12", "b:12"]);
    assert_eq!(view.code().to_string(), "12");
}

#[test]
fn custom_keypad_attaches_once_and_updates_in_place() {
    let view = OtpPinView::builder(SlotStyle::Underline, 4)
        .keyboard_mode(KeyboardMode::CustomShuffled)
        .shuffle_seed(5)
        .build();
    assert!(view.keypad_surface().is_none());
    focused(&view);
    assert_eq!(view.active_surface(), ActiveSurface::Custom);

    let entry = view.hidden_entry().expect("view owns its hidden entry");
    assert_eq!(entry.borrow().install_count(), 1);

    view.toggle_secure();
    view.toggle_secure();
    assert!(view.release_focus());
    assert!(view.acquire_focus());

    assert_eq!(entry.borrow().install_count(), 1);
    let surface = view.keypad_surface().expect("surface installed");
    assert_eq!(surface.revision(), 3);
    assert_eq!(surface.layout, view.keypad_layout());
}

#[test]
fn keypad_presses_edit_without_touching_focus() {
    let (events, on_change) = recorder();
    let view = OtpPinView::builder(SlotStyle::Underline, 4)
        .keyboard_mode(KeyboardMode::CustomSequential)
        .on_change(on_change)
        .build();
    focused(&view);
    let layout = view.keypad_layout();

    assert!(view.press_key(layout.rows()[0][0]));
    assert!(view.press_key(layout.rows()[3][1]));
    assert_eq!(view.code().to_string(), "10");

    assert!(view.press_key(KeypadKey::Delete));
    assert_eq!(view.code().to_string(), "1");

    assert!(view.press_key(KeypadKey::ToggleSecure));
    assert!(view.secure_active());
    assert!(view.keypad_surface().is_some_and(|surface| surface.secure_active));
    assert!(view.is_focused());
    assert_eq!(view.active_surface(), ActiveSurface::Custom);

    assert_eq!(*events.borrow(), vec!["1", "10", "1"]);
}

#[test]
fn physical_keys_are_ignored_on_custom_surface() {
    let view = OtpPinView::builder(SlotStyle::Underline, 4)
        .keyboard_mode(KeyboardMode::CustomSequential)
        .build();
    focused(&view);

    assert!(!view.input_char('1'));
    assert!(!view.paste("1234"));
    assert!(view.is_empty());
}

#[test]
fn native_modes_filter_typed_characters() {
    let pad = OtpPinView::builder(SlotStyle::Underline, 4).build();
    assert!(!pad.input_char('1'), "unfocused view ignores keys");
    focused(&pad);
    assert!(!pad.input_char('a'));
    assert!(pad.input_char('7'));
    assert!(pad.paste("1-2x3 4"));
    assert_eq!(pad.code().to_string(), "7123");

    let text = OtpPinView::builder(SlotStyle::Underline, 4)
        .keyboard_mode(KeyboardMode::NativeDefault)
        .build();
    focused(&text);
    assert!(text.input_char('a'));
    assert!(!text.input_char('\n'));
    assert_eq!(text.code().to_string(), "a");
}

#[test]
fn registered_primitive_receives_the_keypad() {
    let primitive: SharedTextEntry = Rc::new(RefCell::new(HiddenTextEntry::new()));
    let view = OtpPinView::builder(SlotStyle::Underline, 4)
        .keyboard_mode(KeyboardMode::CustomSequential)
        .text_entry(&primitive)
        .build();
    assert!(view.hidden_entry().is_none());

    focused(&view);
    assert_eq!(view.active_surface(), ActiveSurface::Custom);
    assert!(primitive.borrow().input_surface().is_some());
}

#[test]
fn dropped_primitive_degrades_to_native_input() {
    let primitive: SharedTextEntry = Rc::new(RefCell::new(HiddenTextEntry::new()));
    let view = OtpPinView::builder(SlotStyle::Underline, 4)
        .keyboard_mode(KeyboardMode::CustomShuffled)
        .text_entry(&primitive)
        .build();
    drop(primitive);

    focused(&view);
    assert_eq!(view.active_surface(), ActiveSurface::Native);
    assert!(view.keypad_surface().is_none());
    assert!(view.toggle_secure());
}

#[test]
fn stale_focus_ticket_is_ignored_after_remount() {
    let view = OtpPinView::builder(SlotStyle::Underline, 4).build();
    let stale = view.mount().expect("mounted");
    view.unmount();
    assert!(!view.focus_timer_elapsed(stale));
    assert_eq!(view.phase(), FocusPhase::Unmounted);

    let live = view.mount().expect("remounted");
    assert_ne!(stale, live);
    assert!(!view.focus_timer_elapsed(stale));
    assert!(view.focus_timer_elapsed(live));
    assert!(view.is_focused());

    assert!(view.release_focus());
    assert!(!view.focus_timer_elapsed(live), "tickets are single use");
    assert!(!view.is_focused());
}

#[test]
fn unmount_drops_focus_and_blocks_acquire() {
    let view = OtpPinView::builder(SlotStyle::Underline, 4).build();
    focused(&view);
    view.unmount();

    assert!(!view.is_mounted());
    assert_eq!(view.active_surface(), ActiveSurface::None);
    assert!(!view.acquire_focus());
}

#[test]
fn deferred_focus_runs_after_delay() {
    let view = OtpPinView::builder(SlotStyle::Underline, 4)
        .auto_focus_delay(Duration::from_millis(5))
        .build();
    let ticket = view.mount().expect("mounted");
    assert!(!view.is_focused());

    assert!(futures::executor::block_on(view.auto_focus(ticket)));
    assert!(view.is_focused());
}

#[test]
fn deferred_focus_is_skipped_for_dropped_view() {
    let view = OtpPinView::builder(SlotStyle::Underline, 4)
        .auto_focus_delay(Duration::from_millis(5))
        .build();
    let ticket = view.mount().expect("mounted");
    let pending = view.auto_focus(ticket);
    drop(view);

    assert!(!futures::executor::block_on(pending));
}

#[test]
fn deferred_focus_is_skipped_after_unmount() {
    let view = OtpPinView::builder(SlotStyle::Underline, 4)
        .auto_focus_delay(Duration::from_millis(5))
        .build();
    let ticket = view.mount().expect("mounted");
    let pending = view.auto_focus(ticket);
    view.unmount();

    assert!(!futures::executor::block_on(pending));
    assert!(!view.is_focused());
}

#[test]
fn zero_digit_count_is_rejected_or_clamped() {
    assert!(OtpPinView::builder(SlotStyle::Underline, 0).try_build().is_err());

    let view = OtpPinView::builder(SlotStyle::Underline, 0).build();
    assert_eq!(view.config().digit_count, 1);
    view.append_str("98");
    assert_eq!(view.code().to_string(), "9");
}

#[test]
fn tap_before_mount_is_ignored() {
    let view = OtpPinView::builder(SlotStyle::Underline, 4).build();
    view.set_code("1234");

    assert!(!view.tap_display());
    assert_eq!(view.phase(), FocusPhase::Unmounted);
}

#[test]
fn tap_on_custom_mode_restores_the_keypad_surface() {
    let view = OtpPinView::builder(SlotStyle::Box, 4)
        .keyboard_mode(KeyboardMode::CustomSequential)
        .secure_entry(true)
        .build();
    focused(&view);
    for key in [1, 2, 3, 4] {
        view.press_key(KeypadKey::Digit(key));
    }
    assert_eq!(view.active_surface(), ActiveSurface::None);

    assert!(view.tap_display());
    assert_eq!(view.active_surface(), ActiveSurface::Custom);
}

#[test]
fn incomplete_tap_leaves_the_keypad_untouched() {
    let view = OtpPinView::builder(SlotStyle::Box, 4)
        .keyboard_mode(KeyboardMode::CustomSequential)
        .build();
    focused(&view);
    view.append('1');
    let revision = view.keypad_surface().map(|surface| surface.revision());

    assert!(!view.tap_display());
    assert_eq!(
        view.keypad_surface().map(|surface| surface.revision()),
        revision
    );
}

#[test]
fn caret_follows_the_first_empty_slot_while_focused() {
    let view = OtpPinView::builder(SlotStyle::None, 3).build();
    assert_eq!(view.snapshot().caret_index(3), None);

    focused(&view);
    assert_eq!(view.snapshot().caret_index(3), Some(0));
    view.append_str("12");
    assert_eq!(view.snapshot().caret_index(3), Some(2));
    view.append('3');
    assert_eq!(view.snapshot().caret_index(3), None);
}
