//! Caret blink driven by a cooperative scheduler.
//!
//! The blink is an owned, explicitly cancellable scheduled task rather
//! than a self-rescheduling closure holding the widget alive: the
//! scheduled callback keeps only a weak reference to the timer state, so a
//! tick that fires after teardown is a no-op and dropping the timer
//! deterministically cancels whatever is pending.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use web_time::Duration;

/// Caret blink interval in milliseconds.
pub const BLINK_INTERVAL_MS: u64 = 450;

/// Handle to a scheduled callback, for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskToken(pub u64);

/// Cooperative one-shot timer service provided by the host event loop.
///
/// Everything runs on the single UI thread: callbacks never execute
/// concurrently with event handlers, only between them. Cancelling a token
/// that already fired (or was never issued) must be harmless.
pub trait Scheduler {
    /// Schedules `callback` to run once after `delay`.
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TaskToken;

    /// Cancels a pending callback.
    fn cancel(&self, token: TaskToken);
}

struct BlinkShared {
    scheduler: Rc<dyn Scheduler>,
    interval: Cell<Duration>,
    visible: Cell<bool>,
    blinking: Cell<bool>,
    pending: Cell<Option<TaskToken>>,
}

impl BlinkShared {
    fn cancel_pending(&self) {
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel(token);
        }
    }
}

fn schedule_tick(shared: &Rc<BlinkShared>) {
    let weak: Weak<BlinkShared> = Rc::downgrade(shared);
    let token = shared.scheduler.schedule(
        shared.interval.get(),
        Box::new(move || {
            // The widget owning this timer may be gone by the time the
            // tick fires; upgrading fails and the tick dies quietly.
            let Some(shared) = weak.upgrade() else {
                return;
            };
            if !shared.blinking.get() {
                return;
            }
            shared.visible.set(!shared.visible.get());
            schedule_tick(&shared);
        }),
    );
    shared.pending.set(Some(token));
}

/// Blinking caret phase for one entry.
///
/// While active, visibility toggles every [`BLINK_INTERVAL_MS`].
/// [`start`](Self::start) resets the phase to visible — it is called both
/// on focus gain and on every caret move, so a moving caret never appears
/// to vanish mid-transition. [`stop`](Self::stop) cancels the pending tick
/// and forces the caret hidden.
pub struct BlinkTimer {
    shared: Rc<BlinkShared>,
}

impl BlinkTimer {
    /// Creates a stopped timer with the default interval.
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self::with_interval(scheduler, Duration::from_millis(BLINK_INTERVAL_MS))
    }

    /// Creates a stopped timer with a custom interval.
    pub fn with_interval(scheduler: Rc<dyn Scheduler>, interval: Duration) -> Self {
        Self {
            shared: Rc::new(BlinkShared {
                scheduler,
                interval: Cell::new(interval),
                visible: Cell::new(false),
                blinking: Cell::new(false),
                pending: Cell::new(None),
            }),
        }
    }

    /// Starts (or restarts) blinking: phase reset to visible, next toggle
    /// one full interval away.
    pub fn start(&self) {
        self.shared.cancel_pending();
        self.shared.blinking.set(true);
        self.shared.visible.set(true);
        schedule_tick(&self.shared);
    }

    /// Stops blinking and hides the caret.
    pub fn stop(&self) {
        self.shared.cancel_pending();
        self.shared.blinking.set(false);
        self.shared.visible.set(false);
    }

    /// Returns true while the blink loop is running.
    pub fn is_blinking(&self) -> bool {
        self.shared.blinking.get()
    }

    /// Returns whether the caret should currently be drawn.
    pub fn is_visible(&self) -> bool {
        self.shared.visible.get()
    }

    /// Returns the configured toggle interval.
    pub fn interval(&self) -> Duration {
        self.shared.interval.get()
    }
}

impl Drop for BlinkTimer {
    fn drop(&mut self) {
        self.shared.cancel_pending();
    }
}
