//! The single-line entry widget.
//!
//! `Entry` wires the editing model to everything event-shaped: pointer
//! clicks and drags, keystrokes, clipboard traffic, focus transfer, caret
//! blinking, and the horizontal scroll window. It does not paint —
//! [`Entry::frame`] emits z-ordered [`DrawPrimitive`]s for the host's
//! renderer.
//!
//! All collaborators arrive through an [`EntryContext`]: the focus
//! coordinator of the owning window, the font engine's [`GlyphMetrics`],
//! the event loop's [`Scheduler`], and a [`Clipboard`]. Everything runs on
//! the single UI thread.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::debug;
use web_time::{Duration, Instant};

use linefield_foundation::text::{EntryBuffer, InvalidMaxLength};

use crate::blink::{BlinkTimer, Scheduler, BLINK_INTERVAL_MS};
use crate::clipboard::Clipboard;
use crate::draw::{Color, DrawPrimitive, Rect};
use crate::focus::{FocusCoordinator, FocusTarget};
use crate::hit::caret_index_for_x;
use crate::key_event::{KeyCode, KeyEvent};
use crate::metrics::GlyphMetrics;
use crate::scroll::ScrollState;
use crate::word::{next_word_end, prev_word_start, word_at};

/// Default field width in pixels.
pub const DEFAULT_WIDTH: f32 = 240.0;
/// Default field height in pixels.
pub const DEFAULT_HEIGHT: f32 = 36.0;
/// Default corner radius.
pub const DEFAULT_RADIUS: f32 = 8.0;
/// Horizontal padding between the border and the text, both sides.
pub const TEXT_PADDING_X: f32 = 12.0;
/// Caret bar width.
pub const CARET_WIDTH: f32 = 2.0;
/// Default caret bar height.
pub const DEFAULT_CARET_HEIGHT: f32 = 18.0;
/// Smallest caret bar height after a resize.
pub const MIN_CARET_HEIGHT: f32 = 14.0;
/// The selection highlight is this much shorter than the line.
const SELECTION_HEIGHT_INSET: f32 = 3.0;
/// Caret height is derived from the line height minus this, on resize.
const CARET_HEIGHT_INSET: f32 = 4.0;
/// Default character limit.
pub const DEFAULT_MAX_LENGTH: usize = 1000;
/// Window for double/triple click detection, in milliseconds.
const MULTI_CLICK_MS: u64 = 500;
/// Pointer slop for double/triple click detection, in pixels.
const MULTI_CLICK_SLOP: f32 = 5.0;

/// Color set for every part of the field.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryPalette {
    /// Field background.
    pub background: Color,
    /// Border while unfocused.
    pub border_normal: Color,
    /// Border while focused.
    pub border_focus: Color,
    /// Border while focused and the buffer is full.
    pub border_limit: Color,
    /// Content text.
    pub text: Color,
    /// Placeholder text.
    pub placeholder: Color,
    /// Caret bar.
    pub caret: Color,
    /// Selection highlight.
    pub selection: Color,
}

impl Default for EntryPalette {
    fn default() -> Self {
        Self {
            background: Color::rgb8(0x2d, 0x2d, 0x2d),
            border_normal: Color::rgb8(0x44, 0x44, 0x44),
            border_focus: Color::rgb8(0x4e, 0xc9, 0xb0),
            border_limit: Color::rgb8(0xff, 0x4d, 0x4d),
            text: Color::rgb8(0xe0, 0xe0, 0xe0),
            placeholder: Color::rgb8(0x88, 0x88, 0x88),
            caret: Color::rgb8(0x6b, 0xd8, 0xc9),
            selection: Color::rgb8(0x34, 0x8b, 0x81),
        }
    }
}

/// Whether the field tracks host resize events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sizing {
    /// Keep the configured size; resize events are ignored.
    #[default]
    Fixed,
    /// Follow the host: [`Entry::set_size`] takes effect.
    Resizable,
}

/// Construction-time configuration for an [`Entry`].
#[derive(Debug, Clone, PartialEq)]
pub struct EntryConfig {
    /// Field width in pixels.
    pub width: f32,
    /// Field height in pixels.
    pub height: f32,
    /// Corner radius of the rounded background.
    pub corner_radius: f32,
    /// Placeholder shown while the field is empty.
    pub placeholder: String,
    /// Font family name, passed through to the renderer.
    pub font_family: String,
    /// Font size in points, passed through to the renderer.
    pub font_size: f32,
    /// Fixed or host-driven sizing.
    pub sizing: Sizing,
    /// Character limit, or `None` for unbounded. Values below 1 fail
    /// construction.
    pub max_length: Option<usize>,
    /// Caret blink interval.
    pub blink_interval: Duration,
    /// Colors.
    pub palette: EntryPalette,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            corner_radius: DEFAULT_RADIUS,
            placeholder: String::new(),
            font_family: "sans-serif".to_owned(),
            font_size: 12.0,
            sizing: Sizing::Fixed,
            max_length: Some(DEFAULT_MAX_LENGTH),
            blink_interval: Duration::from_millis(BLINK_INTERVAL_MS),
            palette: EntryPalette::default(),
        }
    }
}

/// Collaborators injected into every entry of one window.
///
/// Cloning shares the same coordinator, metrics, scheduler, and clipboard.
#[derive(Clone)]
pub struct EntryContext {
    /// Focus state shared by the window's entries.
    pub coordinator: FocusCoordinator,
    /// Font engine measurement.
    pub metrics: Rc<dyn GlyphMetrics>,
    /// Event loop timer service.
    pub scheduler: Rc<dyn Scheduler>,
    /// Platform clipboard.
    pub clipboard: Rc<dyn Clipboard>,
}

struct EntryState {
    buffer: EntryBuffer,
    scroll: ScrollState,
    config: EntryConfig,
    width: f32,
    height: f32,
    caret_height: f32,
    focused: bool,
    destroyed: bool,
    dragging: bool,
    last_click: Option<(Instant, f32)>,
    click_count: u8,
}

impl EntryState {
    fn viewport_width(&self) -> f32 {
        self.width - 2.0 * TEXT_PADDING_X
    }
}

struct EntryCore {
    self_weak: Weak<EntryCore>,
    state: RefCell<EntryState>,
    blink: BlinkTimer,
    coordinator: FocusCoordinator,
    metrics: Rc<dyn GlyphMetrics>,
    clipboard: Rc<dyn Clipboard>,
}

impl EntryCore {
    fn as_target(&self) -> Rc<dyn FocusTarget> {
        self.self_weak
            .upgrade()
            .expect("entry core accessed during construction")
    }

    fn caret_x(&self, state: &EntryState) -> f32 {
        let caret = state.buffer.caret();
        self.metrics.text_width(&state.buffer.get()[..caret])
    }

    /// Recomputes the scroll window around the caret.
    fn follow_caret(&self, state: &mut EntryState) {
        let caret_x = self.caret_x(state);
        let text_width = self.metrics.text_width(state.buffer.get());
        let viewport = state.viewport_width();
        state
            .scroll
            .follow_caret(caret_x, CARET_WIDTH, text_width, viewport);
    }

    /// Restarts the blink phase after a caret move, but only while this
    /// entry is the one blinking.
    fn caret_moved(&self, state: &EntryState) {
        if state.focused {
            self.blink.start();
        }
    }

    /// Runs a buffer edit while keeping the caret visually fixed: the text
    /// is shifted by however much the caret's prefix width changed, so
    /// mid-string edits scroll the text instead of the caret. Disabled for
    /// the first keystroke after focus-in (caret 0, no scroll) and while a
    /// selection is being replaced.
    fn edit_keeping_caret_fixed(
        &self,
        state: &mut EntryState,
        edit: impl FnOnce(&mut EntryBuffer),
    ) {
        let keep = !(state.buffer.caret() == 0 && state.scroll.offset() == 0.0)
            && !state.buffer.has_selection();
        let before_x = self.caret_x(state);
        edit(&mut state.buffer);
        if keep {
            let delta = self.caret_x(state) - before_x;
            let text_width = self.metrics.text_width(state.buffer.get());
            state
                .scroll
                .shift(-delta, text_width, state.viewport_width());
        }
        self.follow_caret(state);
    }

    fn insert_over_selection(&self, state: &mut EntryState, text: &str) {
        self.edit_keeping_caret_fixed(state, |buffer| {
            buffer.delete_selection();
            let caret = buffer.caret();
            buffer.insert(caret, text);
        });
    }

    fn gain_focus(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.destroyed {
                return;
            }
            state.focused = true;
        }
        self.coordinator.focus_gained(&self.as_target());
        self.blink.start();
    }
}

impl FocusTarget for EntryCore {
    fn blur(&self) {
        let mut state = self.state.borrow_mut();
        if state.destroyed {
            return;
        }
        state.focused = false;
        state.dragging = false;
        state.buffer.clear_selection();
        self.blink.stop();
    }

    fn focus(&self) {
        self.gain_focus();
    }
}

/// A custom-drawn single-line text entry.
///
/// Cloning the handle shares the same widget. See the module docs for the
/// event model; the full public surface is `text`/`set_text`, `insert`,
/// `delete`, `selected_text`, the event entry points, and [`frame`](Self::frame).
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use linefield_ui::{
///     Entry, EntryConfig, EntryContext, FocusCoordinator, MonospaceMetrics,
///     NullClipboard,
/// };
/// use linefield_testing::ManualScheduler;
///
/// let ctx = EntryContext {
///     coordinator: FocusCoordinator::new(),
///     metrics: Rc::new(MonospaceMetrics::default()),
///     scheduler: ManualScheduler::new(),
///     clipboard: Rc::new(NullClipboard),
/// };
/// let entry = Entry::new(EntryConfig::default(), &ctx).unwrap();
/// entry.set_text("hello");
/// assert_eq!(entry.text(), "hello");
/// ```
#[derive(Clone)]
pub struct Entry {
    core: Rc<EntryCore>,
}

impl Entry {
    /// Builds an entry and registers it with the context's focus
    /// coordinator. Fails if `config.max_length` is below 1.
    pub fn new(config: EntryConfig, ctx: &EntryContext) -> Result<Self, InvalidMaxLength> {
        let buffer = EntryBuffer::new(config.max_length)?;
        let blink = BlinkTimer::with_interval(ctx.scheduler.clone(), config.blink_interval);
        let state = EntryState {
            buffer,
            scroll: ScrollState::default(),
            width: config.width,
            height: config.height,
            caret_height: DEFAULT_CARET_HEIGHT,
            config,
            focused: false,
            destroyed: false,
            dragging: false,
            last_click: None,
            click_count: 0,
        };
        let core = Rc::new_cyclic(|self_weak| EntryCore {
            self_weak: self_weak.clone(),
            state: RefCell::new(state),
            blink,
            coordinator: ctx.coordinator.clone(),
            metrics: ctx.metrics.clone(),
            clipboard: ctx.clipboard.clone(),
        });
        ctx.coordinator.register(&(core.clone() as Rc<dyn FocusTarget>));
        Ok(Self { core })
    }

    // ========== Content API ==========

    /// Returns the content.
    pub fn text(&self) -> String {
        self.core.state.borrow().buffer.get().to_owned()
    }

    /// Replaces the content wholesale (truncated to the limit), puts the
    /// caret at the end, and rescrolls from zero.
    pub fn set_text(&self, text: &str) {
        let core = &self.core;
        let mut state = core.state.borrow_mut();
        if state.destroyed {
            return;
        }
        state.buffer.set(text);
        state.scroll.reset();
        core.follow_caret(&mut state);
        core.caret_moved(&state);
    }

    /// Inserts text at a byte index (clamped; truncated to the limit).
    pub fn insert(&self, index: usize, text: &str) {
        let core = &self.core;
        let mut state = core.state.borrow_mut();
        if state.destroyed {
            return;
        }
        state.buffer.insert(index, text);
        core.follow_caret(&mut state);
        core.caret_moved(&state);
    }

    /// Deletes a byte range, or the single character after `first` when
    /// `last` is `None`. An active selection is deleted instead of the
    /// range.
    pub fn delete(&self, first: usize, last: Option<usize>) {
        let core = &self.core;
        let mut state = core.state.borrow_mut();
        if state.destroyed {
            return;
        }
        state.buffer.delete(first, last);
        core.follow_caret(&mut state);
        core.caret_moved(&state);
    }

    /// Returns the selected text, or `""`.
    pub fn selected_text(&self) -> String {
        self.core.state.borrow().buffer.selected_text().to_owned()
    }

    /// Returns the caret byte offset.
    pub fn caret(&self) -> usize {
        self.core.state.borrow().buffer.caret()
    }

    /// Returns the current scroll offset (`<= 0`).
    pub fn scroll_offset(&self) -> f32 {
        self.core.state.borrow().scroll.offset()
    }

    /// Returns true while this entry owns the blinking caret.
    pub fn is_focused(&self) -> bool {
        self.core.state.borrow().focused
    }

    // ========== Pointer events ==========

    /// Pointer press at widget-local `x`. Takes focus, places the caret on
    /// the nearest boundary, and arms drag selection. A second click
    /// within the multi-click window selects the word under the pointer, a
    /// third selects everything.
    pub fn pointer_down(&self, x: f32) {
        let core = &self.core;
        if core.state.borrow().destroyed {
            return;
        }
        core.gain_focus();

        let mut state = core.state.borrow_mut();
        let now = Instant::now();
        let repeat = state.last_click.is_some_and(|(at, last_x)| {
            now.duration_since(at).as_millis() as u64 <= MULTI_CLICK_MS
                && (x - last_x).abs() <= MULTI_CLICK_SLOP
        });
        state.click_count = if repeat {
            (state.click_count + 1).min(3)
        } else {
            1
        };
        state.last_click = Some((now, x));

        let index = self.index_at(&state, x);
        match state.click_count {
            2 => {
                let (start, end) = word_at(state.buffer.get(), index);
                state.buffer.select(start, end);
                state.dragging = false;
            }
            3 => {
                state.buffer.select_all();
                state.dragging = false;
                state.click_count = 0;
            }
            _ => {
                state.buffer.clear_selection();
                state.buffer.set_caret(index);
                state.buffer.begin_selection();
                state.dragging = true;
            }
        }
        core.follow_caret(&mut state);
        core.caret_moved(&state);
    }

    /// Pointer drag to widget-local `x`: extends the selection from the
    /// press anchor.
    pub fn pointer_moved(&self, x: f32) {
        let core = &self.core;
        let mut state = core.state.borrow_mut();
        if state.destroyed || !state.dragging {
            return;
        }
        let index = self.index_at(&state, x);
        if index != state.buffer.caret() {
            state.buffer.set_caret(index);
            core.follow_caret(&mut state);
            core.caret_moved(&state);
        }
    }

    /// Pointer release: ends the drag; a selection that never grew
    /// collapses back to a bare caret.
    pub fn pointer_released(&self) {
        let mut state = self.core.state.borrow_mut();
        if state.destroyed {
            return;
        }
        state.dragging = false;
        if !state.buffer.has_selection() {
            state.buffer.clear_selection();
        }
    }

    // ========== Keyboard ==========

    /// Handles a keystroke. Returns true when consumed.
    pub fn key(&self, event: &KeyEvent) -> bool {
        let core = &self.core;
        let mut state = core.state.borrow_mut();
        if state.destroyed || !state.focused {
            return false;
        }

        let shift = event.modifiers.shift;
        let command = event.modifiers.command_or_ctrl();

        match event.key_code {
            KeyCode::Backspace => {
                core.edit_keeping_caret_fixed(&mut state, |buffer| {
                    buffer.delete_before_caret();
                });
            }
            KeyCode::Delete => {
                core.edit_keeping_caret_fixed(&mut state, |buffer| {
                    buffer.delete_after_caret();
                });
            }
            KeyCode::ArrowLeft => {
                if command && !shift {
                    let target = prev_word_start(state.buffer.get(), state.buffer.caret());
                    state.buffer.clear_selection();
                    state.buffer.set_caret(target);
                } else {
                    state.buffer.caret_left(shift);
                }
                core.follow_caret(&mut state);
            }
            KeyCode::ArrowRight => {
                if command && !shift {
                    let target = next_word_end(state.buffer.get(), state.buffer.caret());
                    state.buffer.clear_selection();
                    state.buffer.set_caret(target);
                } else {
                    state.buffer.caret_right(shift);
                }
                core.follow_caret(&mut state);
            }
            KeyCode::Home => {
                state.buffer.caret_home(shift);
                core.follow_caret(&mut state);
            }
            KeyCode::End => {
                state.buffer.caret_end(shift);
                core.follow_caret(&mut state);
            }
            KeyCode::A if command => {
                state.buffer.select_all();
                core.follow_caret(&mut state);
            }
            KeyCode::C if command => {
                drop(state);
                self.copy();
                return true;
            }
            KeyCode::X if command => {
                drop(state);
                self.cut();
                return true;
            }
            KeyCode::V if command => {
                drop(state);
                self.paste();
                return true;
            }
            _ if event.has_text() && !command => {
                core.insert_over_selection(&mut state, &event.text);
            }
            _ => return false,
        }

        core.caret_moved(&state);
        true
    }

    // ========== Clipboard ==========

    /// Copies the selection to the clipboard. No selection, no effect.
    pub fn copy(&self) {
        let core = &self.core;
        let state = core.state.borrow();
        if state.destroyed {
            return;
        }
        let selected = state.buffer.selected_text();
        if !selected.is_empty() {
            core.clipboard.set_text(selected);
        }
    }

    /// Copies the selection to the clipboard and deletes it.
    pub fn cut(&self) {
        let core = &self.core;
        let mut state = core.state.borrow_mut();
        if state.destroyed {
            return;
        }
        let selected = state.buffer.selected_text();
        if selected.is_empty() {
            return;
        }
        core.clipboard.set_text(selected);
        state.buffer.delete_selection();
        core.follow_caret(&mut state);
        core.caret_moved(&state);
    }

    /// Pastes clipboard text over the selection (or at the caret).
    /// Newlines become spaces, carriage returns are dropped, and whatever
    /// exceeds the limit is cut off. An unavailable or empty clipboard is
    /// a silent no-op.
    pub fn paste(&self) {
        let core = &self.core;
        let mut state = core.state.borrow_mut();
        if state.destroyed || !state.focused {
            return;
        }
        let Some(raw) = core.clipboard.get_text() else {
            return;
        };
        let sanitized: String = raw
            .chars()
            .filter(|&c| c != '\r')
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        if sanitized.is_empty() {
            return;
        }
        core.insert_over_selection(&mut state, &sanitized);
        core.caret_moved(&state);
    }

    // ========== Focus ==========

    /// Host notification that this entry received toolkit focus.
    pub fn focus_gained(&self) {
        self.core.gain_focus();
    }

    /// Host notification that this entry lost toolkit focus. The caret
    /// parks at the start, the scroll rewinds, and the selection drops.
    pub fn focus_lost(&self) {
        let core = &self.core;
        {
            let mut state = core.state.borrow_mut();
            if state.destroyed {
                return;
            }
            state.focused = false;
            state.dragging = false;
            state.buffer.set_caret(0);
            state.buffer.clear_selection();
            state.scroll.reset();
        }
        core.blink.stop();
        core.coordinator.focus_lost(&core.as_target());
    }

    /// Routes a window-global Tab press; see
    /// [`FocusCoordinator::handle_tab`].
    pub fn handle_tab(&self) -> crate::focus::TabFlow {
        self.core.coordinator.handle_tab()
    }

    // ========== Geometry ==========

    /// Host resize notification. Ignored in [`Sizing::Fixed`]. Otherwise
    /// the text right-aligns when overflowing, the caret jumps to the end,
    /// and the caret bar is re-derived from the line height.
    pub fn set_size(&self, width: f32, height: f32) {
        let core = &self.core;
        let mut state = core.state.borrow_mut();
        if state.destroyed || state.config.sizing == Sizing::Fixed {
            return;
        }
        state.width = width;
        state.height = height;
        state.caret_height =
            (core.metrics.line_height() - CARET_HEIGHT_INSET).max(MIN_CARET_HEIGHT);

        let text_width = core.metrics.text_width(state.buffer.get());
        let viewport = state.viewport_width();
        state.scroll.reset();
        state.scroll.shift(viewport - text_width, text_width, viewport);

        state.buffer.caret_end(false);
        core.follow_caret(&mut state);
        core.caret_moved(&state);
    }

    /// Tears the widget down: cancels the blink task, drops coordinator
    /// references, and turns every later event into a no-op.
    pub fn close(&self) {
        let core = &self.core;
        {
            let mut state = core.state.borrow_mut();
            if state.destroyed {
                return;
            }
            state.destroyed = true;
            state.focused = false;
        }
        core.blink.stop();
        core.coordinator.deregister(&core.as_target());
        debug!("entry closed");
    }

    // ========== Rendering ==========

    /// Emits this frame's primitives in paint order: background and
    /// border, selection highlight, text (or placeholder), caret.
    pub fn frame(&self) -> Vec<DrawPrimitive> {
        let core = &self.core;
        let state = core.state.borrow();
        if state.destroyed {
            return Vec::new();
        }

        let mut primitives = Vec::new();
        let palette = &state.config.palette;
        let line_height = core.metrics.line_height();
        let text_y = (state.height - line_height) / 2.0;
        let offset = state.scroll.offset();

        let border = if state.focused {
            if state.buffer.at_capacity() {
                palette.border_limit
            } else {
                palette.border_focus
            }
        } else {
            palette.border_normal
        };
        primitives.push(DrawPrimitive::RoundedRect {
            rect: Rect {
                x: 0.0,
                y: 0.0,
                width: state.width,
                height: state.height,
            },
            radius: state.config.corner_radius.min(state.height / 2.0),
            fill: Some(palette.background),
            outline: Some(border),
        });

        if let Some((start, end)) = state.buffer.selected_range() {
            let text = state.buffer.get();
            let start_x = TEXT_PADDING_X + core.metrics.text_width(&text[..start]) + offset;
            let end_x = TEXT_PADDING_X + core.metrics.text_width(&text[..end]) + offset;
            let height = line_height - SELECTION_HEIGHT_INSET;
            primitives.push(DrawPrimitive::Rect {
                rect: Rect {
                    x: start_x,
                    y: text_y + (line_height - height) / 2.0,
                    width: end_x - start_x,
                    height,
                },
                color: palette.selection,
            });
        }

        let (shown, color) = if state.buffer.is_empty() {
            (state.config.placeholder.as_str(), palette.placeholder)
        } else {
            (state.buffer.get(), palette.text)
        };
        if !shown.is_empty() {
            primitives.push(DrawPrimitive::Text {
                x: TEXT_PADDING_X + offset,
                y: text_y,
                text: shown.to_owned(),
                color,
            });
        }

        if state.focused && core.blink.is_visible() {
            let caret_x = TEXT_PADDING_X + core.caret_x(&state) + offset;
            let caret_y = text_y + ((line_height - state.caret_height) / 2.0).max(0.0);
            primitives.push(DrawPrimitive::Rect {
                rect: Rect {
                    x: caret_x,
                    y: caret_y,
                    width: CARET_WIDTH,
                    height: state.caret_height,
                },
                color: palette.caret,
            });
        }

        primitives
    }

    fn index_at(&self, state: &EntryState, x: f32) -> usize {
        let text_x = x - (TEXT_PADDING_X + state.scroll.offset());
        caret_index_for_x(self.core.metrics.as_ref(), state.buffer.get(), text_x)
    }
}

impl Drop for Entry {
    fn drop(&mut self) {
        // The last handle going away must leave no coordinator reference
        // behind; earlier clones are harmless no-ops via the weak refs.
        if Rc::strong_count(&self.core) == 1 {
            let mut state = self.core.state.borrow_mut();
            state.destroyed = true;
            drop(state);
            self.core.blink.stop();
            self.core.coordinator.deregister(&self.core.as_target());
        }
    }
}
