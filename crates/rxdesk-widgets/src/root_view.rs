//! Root view: owner of the root focus manager
//!
//! Observes every event in the capture phase before components see it, so
//! keyboard navigation mode always reflects the latest input, then performs
//! the host toolkit's own tab traversal.

use rxdesk_focus::{
    FocusConfig, FocusManager, FocusableId, KeyboardNavigationDetector, KeyboardNavigationEvent,
};

use crate::event::UiEvent;

/// Result of dispatching an event through the root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Focus moved to the given element
    FocusMoved(FocusableId),
    /// The event is left to the focused component
    Forward,
}

#[derive(Debug)]
pub struct RootView {
    focus_manager: FocusManager,
    detector: KeyboardNavigationDetector,
}

impl RootView {
    /// Root tracking the process-wide keyboard navigation event
    pub fn new(config: FocusConfig) -> Self {
        Self::with_keyboard(config, KeyboardNavigationEvent::global().clone())
    }

    pub fn with_keyboard(config: FocusConfig, keyboard: KeyboardNavigationEvent) -> Self {
        let detector = KeyboardNavigationDetector::new(keyboard.clone())
            .with_escape_ends_navigation(config.escape_ends_keyboard_navigation);
        Self {
            focus_manager: FocusManager::with_config(config, keyboard),
            detector,
        }
    }

    pub fn focus_manager(&self) -> &FocusManager {
        &self.focus_manager
    }

    pub fn focus_manager_mut(&mut self) -> &mut FocusManager {
        &mut self.focus_manager
    }

    pub fn is_navigating_with_keyboard(&self) -> bool {
        self.detector.event().is_navigating_with_keyboard()
    }

    pub fn handle_event(&mut self, event: &UiEvent) -> EventOutcome {
        if let Some(input) = event.navigation_input() {
            self.detector.observe(input);
        }

        match event {
            UiEvent::KeyDown(kbd) if kbd.is_tab() => match self.move_focus(!kbd.shift) {
                Some(id) => EventOutcome::FocusMoved(id),
                None => EventOutcome::Forward,
            },
            _ => EventOutcome::Forward,
        }
    }

    /// Tab stops in traversal order: positive tab indices ascending, then
    /// index zero in registration order
    pub fn tab_order(&self) -> Vec<FocusableId> {
        let mut stops: Vec<(i32, FocusableId)> = self
            .focus_manager
            .eligible()
            .into_iter()
            .filter_map(|id| {
                let index = self.focus_manager.lookup(id)?.adapter()?.tab_index()?;
                (index >= 0).then_some((index, id))
            })
            .collect();
        stops.sort_by_key(|(index, id)| (*index == 0, *index, *id));
        stops.into_iter().map(|(_, id)| id).collect()
    }

    /// Move focus to the next (or previous) tab stop, wrapping around
    pub fn move_focus(&mut self, forward: bool) -> Option<FocusableId> {
        let order = self.tab_order();
        if order.is_empty() {
            return None;
        }

        let current = self
            .focus_manager
            .focused()
            .and_then(|id| order.iter().position(|o| *o == id));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => order.len() - 1,
            (Some(i), true) => (i + 1) % order.len(),
            (Some(0), false) => order.len() - 1,
            (Some(i), false) => i - 1,
        };

        let target = order[next];
        self.focus_manager.focus(target).then_some(target)
    }

    /// Focus the first eligible element unless a valid element already holds
    /// focus. Hosts call this after tearing down a focus trap when no reset
    /// was scheduled.
    pub fn restore_focus(&mut self) -> Option<FocusableId> {
        match self.focus_manager.focused() {
            Some(id) if self.focus_manager.is_valid(id) => Some(id),
            _ => self.focus_manager.focus_first(),
        }
    }

    /// Run deferred focus work that is due
    pub fn process_deferred(&mut self) -> bool {
        self.focus_manager.process_deferred()
    }

    pub fn shutdown(&mut self) {
        self.focus_manager.shutdown();
    }
}
