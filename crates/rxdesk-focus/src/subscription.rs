//! Publish/subscribe handles for focus state notifications

use std::fmt;

/// Handle returned by every subscribe call, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

/// Callbacks notified when an entry's override transitions to or from `None`.
///
/// Owned by the entry, so every subscription ends when the entry is dropped.
#[derive(Default)]
pub struct StateSubscribers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Box<dyn FnMut(bool)>)>,
}

impl StateSubscribers {
    /// Create an empty subscriber list
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a callback receiving the "now overridden" flag
    pub fn subscribe(&mut self, callback: impl FnMut(bool) + 'static) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback; returns false if it was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(sub, _)| *sub != id);
        self.callbacks.len() != before
    }

    /// Notify every callback in subscription order
    pub fn notify(&mut self, overridden: bool) {
        for (_, callback) in self.callbacks.iter_mut() {
            callback(overridden);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn clear(&mut self) {
        self.callbacks.clear();
    }
}

impl fmt::Debug for StateSubscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateSubscribers")
            .field("count", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_notify_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut subs = StateSubscribers::new();

        let first = Rc::clone(&log);
        subs.subscribe(move |v| first.borrow_mut().push(("first", v)));
        let second = Rc::clone(&log);
        subs.subscribe(move |v| second.borrow_mut().push(("second", v)));

        subs.notify(true);
        assert_eq!(*log.borrow(), vec![("first", true), ("second", true)]);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut subs = StateSubscribers::new();
        let c = Rc::clone(&count);
        let id = subs.subscribe(move |_| *c.borrow_mut() += 1);

        assert!(subs.unsubscribe(id));
        assert!(!subs.unsubscribe(id));
        subs.notify(false);
        assert_eq!(*count.borrow(), 0);
        assert!(subs.is_empty());
    }
}
