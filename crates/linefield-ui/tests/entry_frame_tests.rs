//! Frame tests: the primitive list the widget hands to the renderer —
//! paint order, border states, placeholder, selection geometry, and caret
//! blinking.

use std::rc::Rc;

use linefield_testing::{ManualScheduler, RecordingClipboard};
use web_time::Duration;

use linefield_ui::draw::{Color, DrawPrimitive};
use linefield_ui::entry::{Entry, EntryConfig, EntryContext, EntryPalette, TEXT_PADDING_X};
use linefield_ui::focus::FocusCoordinator;
use linefield_ui::key_event::KeyEvent;
use linefield_ui::metrics::MonospaceMetrics;
use linefield_ui::BLINK_INTERVAL_MS;

fn test_context() -> (EntryContext, Rc<ManualScheduler>) {
    let scheduler = ManualScheduler::new();
    let ctx = EntryContext {
        coordinator: FocusCoordinator::new(),
        metrics: Rc::new(MonospaceMetrics::default()),
        scheduler: scheduler.clone(),
        clipboard: Rc::new(RecordingClipboard::new()),
    };
    (ctx, scheduler)
}

fn border_of(frame: &[DrawPrimitive]) -> Color {
    match frame.first() {
        Some(DrawPrimitive::RoundedRect {
            outline: Some(color),
            ..
        }) => *color,
        other => panic!("expected background first, got {other:?}"),
    }
}

fn text_runs(frame: &[DrawPrimitive]) -> Vec<(String, Color)> {
    frame
        .iter()
        .filter_map(|p| match p {
            DrawPrimitive::Text { text, color, .. } => Some((text.clone(), *color)),
            _ => None,
        })
        .collect()
}

fn plain_rects(frame: &[DrawPrimitive]) -> Vec<&DrawPrimitive> {
    frame
        .iter()
        .filter(|p| matches!(p, DrawPrimitive::Rect { .. }))
        .collect()
}

#[test]
fn background_comes_first_and_caret_last() {
    let (ctx, _) = test_context();
    let entry = Entry::new(EntryConfig::default(), &ctx).unwrap();
    entry.set_text("hello world");
    entry.focus_gained();
    entry.pointer_down(TEXT_PADDING_X);
    entry.pointer_moved(TEXT_PADDING_X + 40.0);
    entry.pointer_released();

    let frame = entry.frame();
    assert!(matches!(frame[0], DrawPrimitive::RoundedRect { .. }));

    // Selection lies below the text, the caret above it.
    let selection_pos = frame
        .iter()
        .position(|p| matches!(p, DrawPrimitive::Rect { .. }))
        .unwrap();
    let text_pos = frame
        .iter()
        .position(|p| matches!(p, DrawPrimitive::Text { .. }))
        .unwrap();
    assert!(selection_pos < text_pos);
    assert!(matches!(frame.last(), Some(DrawPrimitive::Rect { .. })));
    assert_eq!(frame.len(), 4);
}

#[test]
fn empty_field_shows_placeholder_in_placeholder_color() {
    let (ctx, _) = test_context();
    let config = EntryConfig {
        placeholder: "search...".to_owned(),
        ..EntryConfig::default()
    };
    let entry = Entry::new(config, &ctx).unwrap();

    let runs = text_runs(&entry.frame());
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].0, "search...");
    assert_eq!(runs[0].1, EntryPalette::default().placeholder);

    entry.set_text("query");
    let runs = text_runs(&entry.frame());
    assert_eq!(runs[0].0, "query");
    assert_eq!(runs[0].1, EntryPalette::default().text);
}

#[test]
fn border_tracks_focus_state() {
    let (ctx, _) = test_context();
    let palette = EntryPalette::default();
    let entry = Entry::new(EntryConfig::default(), &ctx).unwrap();

    assert_eq!(border_of(&entry.frame()), palette.border_normal);
    entry.focus_gained();
    assert_eq!(border_of(&entry.frame()), palette.border_focus);
    entry.focus_lost();
    assert_eq!(border_of(&entry.frame()), palette.border_normal);
}

#[test]
fn border_warns_when_the_buffer_is_full() {
    let (ctx, _) = test_context();
    let palette = EntryPalette::default();
    let config = EntryConfig {
        max_length: Some(3),
        ..EntryConfig::default()
    };
    let entry = Entry::new(config, &ctx).unwrap();
    entry.focus_gained();
    for c in ["a", "b"] {
        entry.key(&KeyEvent::character(c));
    }
    assert_eq!(border_of(&entry.frame()), palette.border_focus);

    entry.key(&KeyEvent::character("c"));
    assert_eq!(border_of(&entry.frame()), palette.border_limit);

    entry.key(&KeyEvent::key(linefield_ui::key_event::KeyCode::Backspace));
    assert_eq!(border_of(&entry.frame()), palette.border_focus);
}

#[test]
fn caret_blinks_with_the_scheduler() {
    let (ctx, scheduler) = test_context();
    let entry = Entry::new(EntryConfig::default(), &ctx).unwrap();
    entry.set_text("hi");
    entry.focus_gained();

    assert_eq!(plain_rects(&entry.frame()).len(), 1, "caret visible on focus");
    scheduler.advance(Duration::from_millis(BLINK_INTERVAL_MS));
    assert_eq!(plain_rects(&entry.frame()).len(), 0, "caret hidden after a tick");
    scheduler.advance(Duration::from_millis(BLINK_INTERVAL_MS));
    assert_eq!(plain_rects(&entry.frame()).len(), 1, "caret back after a second tick");
}

#[test]
fn keystroke_resets_blink_phase_to_visible() {
    let (ctx, scheduler) = test_context();
    let entry = Entry::new(EntryConfig::default(), &ctx).unwrap();
    entry.focus_gained();
    scheduler.advance(Duration::from_millis(BLINK_INTERVAL_MS));
    assert_eq!(plain_rects(&entry.frame()).len(), 0);

    entry.key(&KeyEvent::character("a"));
    assert_eq!(plain_rects(&entry.frame()).len(), 1, "typing shows the caret");
}

#[test]
fn unfocused_entry_never_draws_a_caret() {
    let (ctx, _) = test_context();
    let entry = Entry::new(EntryConfig::default(), &ctx).unwrap();
    entry.set_text("hi");
    assert_eq!(plain_rects(&entry.frame()).len(), 0);
}

#[test]
fn selection_rect_spans_the_selected_glyphs() {
    let (ctx, _) = test_context();
    let entry = Entry::new(EntryConfig::default(), &ctx).unwrap();
    entry.set_text("hello");
    entry.focus_gained();
    entry.pointer_down(TEXT_PADDING_X + 8.0);
    entry.pointer_moved(TEXT_PADDING_X + 24.0);
    entry.pointer_released();
    assert_eq!(entry.selected_text(), "el");

    let frame = entry.frame();
    let selection = frame
        .iter()
        .find_map(|p| match p {
            DrawPrimitive::Rect { rect, color }
                if *color == EntryPalette::default().selection =>
            {
                Some(*rect)
            }
            _ => None,
        })
        .expect("selection rect present");

    // Monospace 8 px: chars 1..3, drawn past the left padding.
    assert_eq!(selection.x, TEXT_PADDING_X + 8.0);
    assert_eq!(selection.width, 16.0);
    // Line height 20 with the 3 px inset.
    assert_eq!(selection.height, 17.0);
}

#[test]
fn caret_rect_sits_at_the_caret_boundary() {
    let (ctx, _) = test_context();
    let entry = Entry::new(EntryConfig::default(), &ctx).unwrap();
    entry.set_text("hello");
    entry.focus_gained();
    entry.pointer_down(TEXT_PADDING_X + 16.0);
    entry.pointer_released();

    let frame = entry.frame();
    let caret = frame
        .iter()
        .rev()
        .find_map(|p| match p {
            DrawPrimitive::Rect { rect, color } if *color == EntryPalette::default().caret => {
                Some(*rect)
            }
            _ => None,
        })
        .expect("caret rect present");
    assert_eq!(caret.x, TEXT_PADDING_X + 16.0);
    assert_eq!(caret.width, 2.0);
}
