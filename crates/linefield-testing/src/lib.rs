//! Deterministic test doubles for Linefield widgets.
//!
//! Entry widgets lean on three host services that are awkward in tests:
//! a font engine, an event-loop timer, and a clipboard. This crate
//! provides drop-in doubles for all three:
//!
//! - [`VarWidthMetrics`] - proportional-font measurement from a fixed
//!   width table, for exercising hit-testing beyond the monospace case
//! - [`ManualScheduler`] - a timer service driven by explicit
//!   [`advance`](ManualScheduler::advance) calls instead of wall time
//! - [`RecordingClipboard`] - an in-memory clipboard that remembers what
//!   was written

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use linefield_ui::blink::{Scheduler, TaskToken};
use linefield_ui::clipboard::Clipboard;
use linefield_ui::metrics::GlyphMetrics;
use web_time::Duration;

/// Glyph measurer with per-character widths from a table.
///
/// Widths are strictly positive, so prefix widths grow strictly and the
/// caret hit-test contract holds.
#[derive(Debug, Clone)]
pub struct VarWidthMetrics {
    default_width: f32,
    line_height: f32,
    widths: HashMap<char, f32>,
}

impl VarWidthMetrics {
    /// Creates a measurer where every character is `default_width` wide.
    pub fn new(default_width: f32) -> Self {
        Self {
            default_width,
            line_height: 20.0,
            widths: HashMap::new(),
        }
    }

    /// A rough proportional face: narrow i/l/j, wide m/w/M/W, extra-wide
    /// CJK, 7 px for everything else.
    pub fn proportional() -> Self {
        let mut metrics = Self::new(7.0);
        for c in ['i', 'l', 'j', '.', ',', '\''] {
            metrics = metrics.with_width(c, 3.0);
        }
        for c in ['m', 'w', 'M', 'W'] {
            metrics = metrics.with_width(c, 12.0);
        }
        for c in ['日', '本', '語'] {
            metrics = metrics.with_width(c, 14.0);
        }
        metrics
    }

    /// Overrides the width of one character.
    pub fn with_width(mut self, c: char, width: f32) -> Self {
        self.widths.insert(c, width);
        self
    }
}

impl GlyphMetrics for VarWidthMetrics {
    fn text_width(&self, text: &str) -> f32 {
        text.chars()
            .map(|c| self.widths.get(&c).copied().unwrap_or(self.default_width))
            .sum()
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }
}

struct PendingTask {
    token: TaskToken,
    fire_at: Duration,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct SchedulerInner {
    now: Duration,
    next_token: u64,
    tasks: Vec<PendingTask>,
}

/// Timer service driven by explicit time steps.
///
/// Scheduled callbacks fire during [`advance`](Self::advance), in deadline
/// order, each seeing the virtual clock at its own deadline — callbacks
/// that reschedule themselves (the caret blink does) keep firing within
/// the same `advance` call, just as they would on a live event loop.
#[derive(Default)]
pub struct ManualScheduler {
    inner: RefCell<SchedulerInner>,
}

impl ManualScheduler {
    /// Creates a scheduler at virtual time zero.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Returns the current virtual time.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Returns how many callbacks are waiting.
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().tasks.len()
    }

    /// Moves the clock forward, firing every callback that comes due.
    pub fn advance(&self, by: Duration) {
        let target = self.inner.borrow().now + by;
        loop {
            let due = {
                let mut inner = self.inner.borrow_mut();
                let next = inner
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, task)| task.fire_at <= target)
                    .min_by_key(|(_, task)| task.fire_at)
                    .map(|(index, _)| index);
                match next {
                    Some(index) => {
                        let task = inner.tasks.remove(index);
                        inner.now = task.fire_at;
                        Some(task.callback)
                    }
                    None => {
                        inner.now = target;
                        None
                    }
                }
            };
            match due {
                // Run outside the borrow; the callback may schedule again.
                Some(callback) => callback(),
                None => break,
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TaskToken {
        let mut inner = self.inner.borrow_mut();
        inner.next_token += 1;
        let token = TaskToken(inner.next_token);
        let fire_at = inner.now + delay;
        inner.tasks.push(PendingTask {
            token,
            fire_at,
            callback,
        });
        token
    }

    fn cancel(&self, token: TaskToken) {
        self.inner
            .borrow_mut()
            .tasks
            .retain(|task| task.token != token);
    }
}

/// In-memory clipboard that remembers the last write.
#[derive(Default)]
pub struct RecordingClipboard {
    content: RefCell<Option<String>>,
}

impl RecordingClipboard {
    /// Creates an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clipboard pre-loaded with text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            content: RefCell::new(Some(text.into())),
        }
    }

    /// Returns the stored text without the trait's empty-filtering.
    pub fn stored(&self) -> Option<String> {
        self.content.borrow().clone()
    }
}

impl Clipboard for RecordingClipboard {
    fn get_text(&self) -> Option<String> {
        self.content
            .borrow()
            .clone()
            .filter(|text| !text.is_empty())
    }

    fn set_text(&self, text: &str) {
        *self.content.borrow_mut() = Some(text.to_owned());
    }
}
