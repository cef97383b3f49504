//! Focus-first ordering and the debounced focus reset policy

use tokio::time::Instant;

use crate::manager::FocusManager;
use crate::types::FocusableId;

impl FocusManager {
    /// Eligible entries in ascending id order
    pub fn eligible(&self) -> Vec<FocusableId> {
        self.registry.eligible_ids()
    }

    /// Whether `id` is live and neither restricted nor limited
    pub fn is_valid(&self, id: FocusableId) -> bool {
        self.registry.lookup(id).is_some_and(|e| e.is_eligible())
    }

    /// Entry that native focus last landed on, if still registered
    pub fn focused(&self) -> Option<FocusableId> {
        let focused = *self.focused.lock();
        focused.filter(|id| self.registry.contains(*id))
    }

    /// Focus the eligible entry with the smallest id.
    ///
    /// Returns the chosen entry, or `None` when nothing is eligible.
    pub fn focus_first(&mut self) -> Option<FocusableId> {
        let first = self.registry.eligible_ids().into_iter().next()?;
        tracing::debug!(id = %first, "Focusing first eligible element");
        self.focus(first);
        Some(first)
    }

    /// Best-effort focus of a single entry.
    ///
    /// Removed or unknown ids are a silent no-op. Once the adapter accepts the
    /// request, the previously focused entry is blurred. Returns whether the
    /// adapter accepted the request.
    pub fn focus(&mut self, id: FocusableId) -> bool {
        let previous = self.focused().filter(|p| *p != id);
        let Some(adapter) = self
            .registry
            .lookup_mut(id)
            .filter(|e| !e.removed)
            .and_then(|e| e.adapter_mut())
        else {
            return false;
        };

        match adapter.focus() {
            Ok(()) => {
                *self.focused.lock() = Some(id);
                if let Some(previous) = previous {
                    self.blur(previous);
                }
                true
            }
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Focusable element could not take focus");
                false
            }
        }
    }

    /// Best-effort blur of a single entry
    pub fn blur(&mut self, id: FocusableId) -> bool {
        let Some(adapter) = self
            .registry
            .lookup_mut(id)
            .filter(|e| !e.removed)
            .and_then(|e| e.adapter_mut())
        else {
            return false;
        };

        match adapter.blur() {
            Ok(()) => {
                let mut focused = self.focused.lock();
                if *focused == Some(id) {
                    *focused = None;
                }
                true
            }
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Focusable element could not blur");
                false
            }
        }
    }

    /// Cancel any pending reset and, when asked to and the user is navigating
    /// with the keyboard, schedule one.
    ///
    /// The delay lets the surrounding view finish mounting and any manual focus
    /// call land first. When the reset fires, focus moves to the first
    /// eligible element only if the focused entry is no longer valid.
    pub fn reset_focus(&mut self, move_to_first_if_keyboard_nav: bool) {
        self.reset_timer.cancel();
        if move_to_first_if_keyboard_nav && self.keyboard.is_navigating_with_keyboard() {
            self.reset_timer.schedule();
        }
    }

    pub fn is_reset_pending(&self) -> bool {
        self.reset_timer.is_pending()
    }

    /// Deadline of the next deferred action, for the host loop to sleep on
    pub fn next_deadline(&self) -> Option<Instant> {
        self.reset_timer.deadline()
    }

    /// Cancel the pending reset; returns whether one was pending
    pub fn cancel_deferred(&mut self) -> bool {
        self.reset_timer.cancel()
    }

    /// Run deferred actions that are due now
    pub fn process_deferred(&mut self) -> bool {
        self.process_deferred_at(Instant::now())
    }

    /// Run deferred actions due at `now`. Returns whether the reset fired.
    pub fn process_deferred_at(&mut self, now: Instant) -> bool {
        if !self.reset_timer.fire_if_due(now) {
            return false;
        }

        let focused_is_valid = self.focused().is_some_and(|id| self.is_valid(id));
        if !focused_is_valid {
            self.focus_first();
        }
        self.compact();
        true
    }

    /// Drop retained removed entries; returns how many were dropped
    pub fn compact(&mut self) -> usize {
        let dropped = self.registry.compact();
        if dropped > 0 {
            tracing::debug!(dropped, "Registry compacted");
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{FocusSink, FocusableAdapter};
    use crate::error::AdapterError;
    use crate::keyboard::KeyboardNavigationEvent;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    struct Target {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
        sink: Option<FocusSink>,
    }

    impl FocusableAdapter for Target {
        fn focus(&mut self) -> Result<(), AdapterError> {
            self.log.borrow_mut().push(self.name);
            if let Some(sink) = &self.sink {
                sink.notify_focused();
            }
            Ok(())
        }

        fn attach_focus_sink(&mut self, sink: FocusSink) -> Result<(), AdapterError> {
            self.sink = Some(sink);
            Ok(())
        }
    }

    struct Unfocusable;
    impl FocusableAdapter for Unfocusable {}

    fn target(name: &'static str, log: &Rc<RefCell<Vec<&'static str>>>) -> Target {
        Target {
            name,
            log: Rc::clone(log),
            sink: None,
        }
    }

    #[test]
    fn test_focus_first_picks_smallest_eligible_id() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut mgr = FocusManager::new(KeyboardNavigationEvent::new());
        let limited = mgr.create_scope(None).unwrap();
        mgr.register(target("a", &log), Some(limited));
        let b = mgr.register(target("b", &log), None);
        mgr.register(target("c", &log), None);
        mgr.limit_focus_within_accessible(limited).unwrap();

        assert_eq!(mgr.focus_first(), Some(b));
        assert_eq!(*log.borrow(), vec!["b"]);
        assert_eq!(mgr.focused(), Some(b));
    }

    #[test]
    fn test_focus_first_on_empty_set_is_noop() {
        let mut mgr = FocusManager::new(KeyboardNavigationEvent::new());
        assert_eq!(mgr.focus_first(), None);
    }

    #[test]
    fn test_focus_after_unregister_is_silent() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut mgr = FocusManager::new(KeyboardNavigationEvent::new());
        let a = mgr.register(target("a", &log), None);
        mgr.unregister(a);

        assert!(!mgr.focus(a));
        assert!(!mgr.blur(a));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_missing_focus_capability_degrades() {
        let mut mgr = FocusManager::new(KeyboardNavigationEvent::new());
        let id = mgr.register(Unfocusable, None);

        assert!(!mgr.focus(id));
        assert_eq!(mgr.focus_first(), Some(id));
        assert_eq!(mgr.focused(), None);
    }

    #[test]
    fn test_reset_without_keyboard_navigation_schedules_nothing() {
        let mut mgr = FocusManager::new(KeyboardNavigationEvent::new());
        mgr.reset_focus(true);
        assert!(!mgr.is_reset_pending());
    }

    #[test]
    fn test_reset_fires_after_delay() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let keyboard = KeyboardNavigationEvent::new();
        keyboard.fire(true);
        let mut mgr = FocusManager::new(keyboard);
        mgr.register(target("a", &log), None);

        mgr.reset_focus(true);
        let deadline = mgr.next_deadline().unwrap();

        assert!(!mgr.process_deferred_at(deadline - Duration::from_millis(1)));
        assert!(mgr.process_deferred_at(deadline));
        assert_eq!(*log.borrow(), vec!["a"]);
    }

    #[test]
    fn test_reset_keeps_valid_focus() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let keyboard = KeyboardNavigationEvent::new();
        keyboard.fire(true);
        let mut mgr = FocusManager::new(keyboard);
        mgr.register(target("a", &log), None);
        let b = mgr.register(target("b", &log), None);
        mgr.focus(b);

        mgr.reset_focus(true);
        let deadline = mgr.next_deadline().unwrap();
        assert!(mgr.process_deferred_at(deadline));
        assert_eq!(*log.borrow(), vec!["b"]);
    }

    #[test]
    fn test_tombstone_kept_until_pending_reset_fires() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let keyboard = KeyboardNavigationEvent::new();
        keyboard.fire(true);
        let mut mgr = FocusManager::new(keyboard);
        let a = mgr.register(target("a", &log), None);
        mgr.register(target("b", &log), None);

        mgr.reset_focus(true);
        mgr.unregister(a);
        assert!(mgr.lookup(a).is_some_and(|e| e.removed));

        let deadline = mgr.next_deadline().unwrap();
        assert!(mgr.process_deferred_at(deadline));
        assert!(mgr.lookup(a).is_none());
        assert_eq!(mgr.compact(), 0);

        let c = mgr.register(target("c", &log), None);
        assert!(c > a);
    }

    #[test]
    fn test_unregister_without_pending_reset_leaves_no_tombstones() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut mgr = FocusManager::new(KeyboardNavigationEvent::new());
        let page = mgr.register(target("page", &log), None);

        for _ in 0..1_000 {
            let dialog = mgr.create_scope(None).unwrap();
            let ok = mgr.register(target("ok", &log), Some(dialog));
            mgr.restrict_focus_within(dialog, false).unwrap();
            mgr.remove_focus_restriction(dialog).unwrap();
            mgr.unregister(ok);
            mgr.release_scope(dialog).unwrap();

            assert!(mgr.lookup(ok).is_none());
        }

        assert!(!mgr.is_reset_pending());
        assert_eq!(mgr.compact(), 0);
        assert_eq!(mgr.registry().live_ids(), vec![page]);
    }

    struct Flag(Rc<std::cell::Cell<bool>>);

    impl FocusableAdapter for Flag {
        fn focus(&mut self) -> Result<(), AdapterError> {
            self.0.set(true);
            Ok(())
        }

        fn blur(&mut self) -> Result<(), AdapterError> {
            self.0.set(false);
            Ok(())
        }
    }

    #[test]
    fn test_moving_focus_blurs_previous_entry() {
        let mut mgr = FocusManager::new(KeyboardNavigationEvent::new());
        let a_focused = Rc::new(std::cell::Cell::new(false));
        let b_focused = Rc::new(std::cell::Cell::new(false));
        let a = mgr.register(Flag(Rc::clone(&a_focused)), None);
        let b = mgr.register(Flag(Rc::clone(&b_focused)), None);

        assert!(mgr.focus(a));
        assert!(mgr.focus(b));
        assert!(!a_focused.get());
        assert!(b_focused.get());
        assert_eq!(mgr.focused(), Some(b));

        // refocusing the same entry keeps it focused
        assert!(mgr.focus(b));
        assert!(b_focused.get());
    }

    #[test]
    fn test_focus_first_blurs_restricted_entry() {
        let mut mgr = FocusManager::new(KeyboardNavigationEvent::new());
        let page_focused = Rc::new(std::cell::Cell::new(false));
        let ok_focused = Rc::new(std::cell::Cell::new(false));
        let page = mgr.register(Flag(Rc::clone(&page_focused)), None);
        let dialog = mgr.create_scope(None).unwrap();
        let ok = mgr.register(Flag(Rc::clone(&ok_focused)), Some(dialog));
        mgr.focus(page);
        mgr.restrict_focus_within(dialog, true).unwrap();

        assert_eq!(mgr.focus_first(), Some(ok));
        assert!(!page_focused.get());
        assert!(ok_focused.get());
    }
}
