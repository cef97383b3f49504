//! Keyboard navigation mode detection
//!
//! [`KeyboardNavigationEvent`] is the process-wide "is the user navigating
//! with the keyboard" flag. [`KeyboardNavigationDetector`] turns normalized
//! input signals observed in the capture phase into fires of that event.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::subscription::SubscriptionId;

type NavigationCallback = Arc<dyn Fn(bool) + Send + Sync>;

static GLOBAL_EVENT: Lazy<KeyboardNavigationEvent> = Lazy::new(KeyboardNavigationEvent::new);

#[derive(Default)]
struct EventState {
    navigating: bool,
    next_id: u64,
    subscribers: Vec<(SubscriptionId, NavigationCallback)>,
}

/// Shared keyboard navigation flag with change notifications.
///
/// Clones share state. Use [`KeyboardNavigationEvent::global`] for the process
/// wide instance, or [`KeyboardNavigationEvent::new`] for an isolated one.
#[derive(Clone, Default)]
pub struct KeyboardNavigationEvent {
    state: Arc<Mutex<EventState>>,
}

impl KeyboardNavigationEvent {
    /// Create an isolated event, initially not navigating
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide instance
    pub fn global() -> &'static KeyboardNavigationEvent {
        &GLOBAL_EVENT
    }

    pub fn is_navigating_with_keyboard(&self) -> bool {
        self.state.lock().navigating
    }

    /// Subscribe to value changes
    pub fn subscribe(&self, callback: impl Fn(bool) + Send + Sync + 'static) -> SubscriptionId {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = SubscriptionId(state.next_id);
        state.subscribers.push((id, Arc::new(callback)));
        id
    }

    /// Returns false if the subscription was not active
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.state.lock();
        let before = state.subscribers.len();
        state.subscribers.retain(|(sub, _)| *sub != id);
        state.subscribers.len() != before
    }

    /// Set the flag; subscribers run synchronously in subscription order, and
    /// only when the value changes. Returns whether it changed.
    pub fn fire(&self, navigating: bool) -> bool {
        let callbacks: Vec<NavigationCallback> = {
            let mut state = self.state.lock();
            if state.navigating == navigating {
                return false;
            }
            state.navigating = navigating;
            state.subscribers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };

        tracing::debug!(navigating, "Keyboard navigation mode changed");
        // Lock released: callbacks may subscribe or read the flag
        for callback in callbacks {
            callback(navigating);
        }
        true
    }
}

impl fmt::Debug for KeyboardNavigationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("KeyboardNavigationEvent")
            .field("navigating", &state.navigating)
            .field("subscribers", &state.subscribers.len())
            .finish()
    }
}

/// Input signal already normalized by the host's input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationInput {
    /// Tab-style navigation key
    TabKey,
    EscapeKey,
    PointerDown,
    /// Touch start. Reserved for hosts with touch input: the terminal layer
    /// reports every mouse press as `PointerDown` and never produces it.
    TouchStart,
    /// Any other key
    OtherKey,
}

/// Capture-phase observer that drives a [`KeyboardNavigationEvent`]
#[derive(Debug, Clone)]
pub struct KeyboardNavigationDetector {
    event: KeyboardNavigationEvent,
    escape_ends_navigation: bool,
}

impl KeyboardNavigationDetector {
    pub fn new(event: KeyboardNavigationEvent) -> Self {
        Self {
            event,
            escape_ends_navigation: true,
        }
    }

    /// Whether Esc switches keyboard navigation mode off
    pub fn with_escape_ends_navigation(mut self, enabled: bool) -> Self {
        self.escape_ends_navigation = enabled;
        self
    }

    pub fn event(&self) -> &KeyboardNavigationEvent {
        &self.event
    }

    /// Observe a signal before any element handler sees it.
    ///
    /// Returns whether the navigation mode changed.
    pub fn observe(&self, input: NavigationInput) -> bool {
        match input {
            NavigationInput::TabKey => self.event.fire(true),
            NavigationInput::EscapeKey if self.escape_ends_navigation => self.event.fire(false),
            NavigationInput::PointerDown | NavigationInput::TouchStart => self.event.fire(false),
            NavigationInput::EscapeKey | NavigationInput::OtherKey => false,
        }
    }
}
