//! Custom-drawn single-line text entry widgets.
//!
//! Linefield implements the interactive half of a canvas-drawn entry
//! field: caret and selection handling, click-to-caret hit testing,
//! horizontal scroll-to-caret, per-window focus coordination with a single
//! blinking caret, and clipboard editing — everything between raw input
//! events and the draw primitives handed back to the host's renderer.
//!
//! The host supplies its platform pieces through [`EntryContext`]: a
//! [`GlyphMetrics`] from its font engine, a [`Scheduler`] from its event
//! loop, a [`Clipboard`], and one [`FocusCoordinator`] per window. Each
//! [`Entry`] then consumes pointer/key/focus events and produces a
//! [`DrawPrimitive`] list per frame.
//!
//! Everything is single-threaded and cooperative: handlers and scheduled
//! callbacks run interleaved on the UI thread, never concurrently.

pub mod blink;
pub mod clipboard;
pub mod draw;
pub mod entry;
pub mod focus;
pub mod hit;
pub mod key_event;
pub mod metrics;
pub mod scroll;
pub mod word;

pub use blink::{BlinkTimer, Scheduler, TaskToken, BLINK_INTERVAL_MS};
#[cfg(feature = "system-clipboard")]
pub use clipboard::SystemClipboard;
pub use clipboard::{Clipboard, NullClipboard};
pub use draw::{Color, DrawPrimitive, Rect};
pub use entry::{Entry, EntryConfig, EntryContext, EntryPalette, Sizing};
pub use focus::{FocusCoordinator, FocusTarget, TabFlow};
pub use hit::caret_index_for_x;
pub use key_event::{KeyCode, KeyEvent, Modifiers};
pub use metrics::{GlyphMetrics, MonospaceMetrics};
pub use scroll::ScrollState;
