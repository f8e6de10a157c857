//! Focus coordination across the entry widgets of one window.
//!
//! A [`FocusCoordinator`] tracks which entry currently owns the blinking
//! caret, ensuring only one entry is active at a time: when a new entry
//! gains focus, the previously active one is forcibly blurred first. It
//! also remembers the first-registered entry as the fallback target for
//! the window-global Tab key.
//!
//! The coordinator is an explicit, cloneable handle owned by the window or
//! root context — not process-global state — so independent widget groups
//! can each run their own. It holds only weak references; entries
//! deregister on teardown, and stale references are pruned on access.

use log::debug;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// What the coordinator may do to a registered entry.
///
/// Implemented by the entry's shared core; the coordinator never holds a
/// strong reference to it.
pub trait FocusTarget {
    /// Forced loss of focus: stop blinking, hide the caret, clear the
    /// selection. Called on the old active entry when another one gains
    /// focus.
    fn blur(&self);

    /// Receive focus redirected by the coordinator (global Tab fallback).
    fn focus(&self);
}

/// What should happen to a window-global Tab key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabFlow {
    /// An entry already has focus; let default traversal proceed.
    Traverse,
    /// Focus was redirected to the first entry; consume the event.
    Consumed,
}

#[derive(Default)]
struct CoordinatorInner {
    /// The entry currently owning the blinking caret.
    active: Option<Weak<dyn FocusTarget>>,
    /// The first-registered entry, the global Tab fallback.
    first: Option<Weak<dyn FocusTarget>>,
}

/// Shared focus state for one group of entry widgets.
///
/// Cloning the handle shares the same underlying state. All access happens
/// on the single UI thread.
#[derive(Clone, Default)]
pub struct FocusCoordinator {
    inner: Rc<RefCell<CoordinatorInner>>,
}

impl FocusCoordinator {
    /// Creates an empty coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a newly constructed entry. The first registration becomes
    /// the global Tab fallback target.
    pub fn register(&self, target: &Rc<dyn FocusTarget>) {
        let mut inner = self.inner.borrow_mut();
        let first_alive = inner
            .first
            .as_ref()
            .is_some_and(|weak| weak.upgrade().is_some());
        if !first_alive {
            inner.first = Some(Rc::downgrade(target));
        }
    }

    /// Removes every reference to `target`. Must be called synchronously
    /// on entry teardown.
    pub fn deregister(&self, target: &Rc<dyn FocusTarget>) {
        let mut inner = self.inner.borrow_mut();
        let weak = Rc::downgrade(target);
        if inner
            .active
            .as_ref()
            .is_some_and(|active| Weak::ptr_eq(active, &weak))
        {
            inner.active = None;
        }
        if inner
            .first
            .as_ref()
            .is_some_and(|first| Weak::ptr_eq(first, &weak))
        {
            inner.first = None;
        }
    }

    /// Installs `target` as the active entry.
    ///
    /// If a different entry is currently active it is blurred first, so at
    /// most one caret blinks at any time.
    pub fn focus_gained(&self, target: &Rc<dyn FocusTarget>) {
        let weak = Rc::downgrade(target);
        let previous = {
            let mut inner = self.inner.borrow_mut();
            let previous = inner.active.take().filter(|p| !Weak::ptr_eq(p, &weak));
            inner.active = Some(weak);
            previous
        };
        // Blur outside the borrow; the old entry may call back in.
        if let Some(old) = previous.and_then(|p| p.upgrade()) {
            debug!("focus transferred between entries; blurring previous");
            old.blur();
        }
    }

    /// Clears the active slot if `target` holds it.
    pub fn focus_lost(&self, target: &Rc<dyn FocusTarget>) {
        let mut inner = self.inner.borrow_mut();
        let weak = Rc::downgrade(target);
        if inner
            .active
            .as_ref()
            .is_some_and(|active| Weak::ptr_eq(active, &weak))
        {
            inner.active = None;
        }
    }

    /// Returns true if `target` is the active entry.
    pub fn is_active(&self, target: &Rc<dyn FocusTarget>) -> bool {
        let weak = Rc::downgrade(target);
        self.inner
            .borrow()
            .active
            .as_ref()
            .is_some_and(|active| Weak::ptr_eq(active, &weak))
    }

    /// Returns true if any live entry is active. Stale references are
    /// pruned.
    pub fn has_active(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        match &inner.active {
            Some(weak) if weak.upgrade().is_some() => true,
            Some(_) => {
                inner.active = None;
                false
            }
            None => false,
        }
    }

    /// Routes a window-global Tab key press.
    ///
    /// With an entry focused, default traversal proceeds. With none
    /// focused, focus is forced onto the first-registered entry and the
    /// event is consumed, keeping Tab from escaping to an unrelated
    /// control.
    pub fn handle_tab(&self) -> TabFlow {
        if self.has_active() {
            return TabFlow::Traverse;
        }
        let first = self
            .inner
            .borrow()
            .first
            .as_ref()
            .and_then(|weak| weak.upgrade());
        match first {
            Some(first) => {
                first.focus();
                TabFlow::Consumed
            }
            None => TabFlow::Traverse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Probe {
        blurred: Cell<u32>,
        focused: Cell<u32>,
    }

    impl FocusTarget for Probe {
        fn blur(&self) {
            self.blurred.set(self.blurred.get() + 1);
        }
        fn focus(&self) {
            self.focused.set(self.focused.get() + 1);
        }
    }

    fn probe() -> Rc<Probe> {
        Rc::new(Probe::default())
    }

    #[test]
    fn second_focus_blurs_first() {
        let coordinator = FocusCoordinator::new();
        let a = probe();
        let b = probe();
        let a_dyn: Rc<dyn FocusTarget> = a.clone();
        let b_dyn: Rc<dyn FocusTarget> = b.clone();

        coordinator.focus_gained(&a_dyn);
        assert!(coordinator.is_active(&a_dyn));

        coordinator.focus_gained(&b_dyn);
        assert_eq!(a.blurred.get(), 1);
        assert!(coordinator.is_active(&b_dyn));
        assert!(!coordinator.is_active(&a_dyn));
    }

    #[test]
    fn refocusing_the_active_entry_does_not_blur_it() {
        let coordinator = FocusCoordinator::new();
        let a = probe();
        let a_dyn: Rc<dyn FocusTarget> = a.clone();

        coordinator.focus_gained(&a_dyn);
        coordinator.focus_gained(&a_dyn);
        assert_eq!(a.blurred.get(), 0);
        assert!(coordinator.is_active(&a_dyn));
    }

    #[test]
    fn at_most_one_active_after_any_sequence() {
        let coordinator = FocusCoordinator::new();
        let targets: Vec<Rc<dyn FocusTarget>> =
            (0..4).map(|_| probe() as Rc<dyn FocusTarget>).collect();

        for i in [0usize, 2, 1, 3, 1, 0, 0, 3] {
            coordinator.focus_gained(&targets[i]);
            let active: usize = targets
                .iter()
                .filter(|t| coordinator.is_active(t))
                .count();
            assert_eq!(active, 1);
        }
    }

    #[test]
    fn tab_traverses_when_an_entry_is_focused() {
        let coordinator = FocusCoordinator::new();
        let a: Rc<dyn FocusTarget> = probe();
        coordinator.register(&a);
        coordinator.focus_gained(&a);
        assert_eq!(coordinator.handle_tab(), TabFlow::Traverse);
    }

    #[test]
    fn tab_redirects_to_first_entry_when_none_focused() {
        let coordinator = FocusCoordinator::new();
        let first = probe();
        let second = probe();
        let first_dyn: Rc<dyn FocusTarget> = first.clone();
        let second_dyn: Rc<dyn FocusTarget> = second.clone();
        coordinator.register(&first_dyn);
        coordinator.register(&second_dyn);

        assert_eq!(coordinator.handle_tab(), TabFlow::Consumed);
        assert_eq!(first.focused.get(), 1);
        assert_eq!(second.focused.get(), 0);
    }

    #[test]
    fn tab_traverses_when_no_entry_exists() {
        let coordinator = FocusCoordinator::new();
        assert_eq!(coordinator.handle_tab(), TabFlow::Traverse);
    }

    #[test]
    fn deregister_clears_both_slots() {
        let coordinator = FocusCoordinator::new();
        let a: Rc<dyn FocusTarget> = probe();
        coordinator.register(&a);
        coordinator.focus_gained(&a);
        coordinator.deregister(&a);
        assert!(!coordinator.has_active());
        assert_eq!(coordinator.handle_tab(), TabFlow::Traverse);
    }

    #[test]
    fn dropped_entry_is_pruned_from_active() {
        let coordinator = FocusCoordinator::new();
        {
            let a: Rc<dyn FocusTarget> = probe();
            coordinator.focus_gained(&a);
            assert!(coordinator.has_active());
        }
        assert!(!coordinator.has_active());
    }

    #[test]
    fn first_slot_moves_on_when_first_entry_died() {
        let coordinator = FocusCoordinator::new();
        {
            let a: Rc<dyn FocusTarget> = probe();
            coordinator.register(&a);
        }
        let b = probe();
        let b_dyn: Rc<dyn FocusTarget> = b.clone();
        coordinator.register(&b_dyn);
        assert_eq!(coordinator.handle_tab(), TabFlow::Consumed);
        assert_eq!(b.focused.get(), 1);
    }
}
