//! Native focus state of a terminal widget
//!
//! [`NativeFocusState`] plays the role of the host toolkit's own focus
//! properties (tab stop, accessibility visibility, focus). Components and
//! their [`NativeFocusable`] adapter share it through a [`NativeHandle`].

use std::sync::Arc;

use parking_lot::Mutex;
use rxdesk_focus::{
    AdapterError, DeferredAction, FocusSink, FocusableAdapter, ImportantForAccessibility,
    OverrideType, TabStopRevertPolicy,
};
use tokio::time::Instant;

/// Name of the deferred action restoring a temporarily forced tab stop
pub const TAB_STOP_REVERT_ACTION: &str = "tab-stop-revert";

/// Component family an adapter belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Button,
    Link,
    TextInput,
    View,
}

/// Host-side focus properties of one widget
#[derive(Debug)]
pub struct NativeFocusState {
    /// Tab stop requested by the component's props
    pub base_tab_stop: bool,
    /// Effective tab stop after overrides and quirk handling
    pub is_tab_stop: bool,
    pub tab_index: Option<i32>,
    pub base_accessibility: ImportantForAccessibility,
    pub accessibility: ImportantForAccessibility,
    pub override_type: OverrideType,
    pub has_focus: bool,
    sink: Option<FocusSink>,
    revert: DeferredAction,
}

/// Shared handle to a widget's native focus state
pub type NativeHandle = Arc<Mutex<NativeFocusState>>;

impl NativeFocusState {
    pub fn new(tab_stop: bool, tab_index: Option<i32>, policy: TabStopRevertPolicy) -> Self {
        Self {
            base_tab_stop: tab_stop,
            is_tab_stop: tab_stop,
            tab_index,
            base_accessibility: ImportantForAccessibility::Auto,
            accessibility: ImportantForAccessibility::Auto,
            override_type: OverrideType::None,
            has_focus: false,
            sink: None,
            revert: DeferredAction::new(TAB_STOP_REVERT_ACTION, policy.delay()),
        }
    }

    pub fn into_handle(self) -> NativeHandle {
        Arc::new(Mutex::new(self))
    }

    /// Forward updated props, keeping any active override
    pub fn set_props(&mut self, tab_stop: bool, tab_index: Option<i32>) {
        self.base_tab_stop = tab_stop;
        self.tab_index = tab_index;
        self.recompute();
    }

    pub fn set_base_accessibility(&mut self, value: ImportantForAccessibility) {
        self.base_accessibility = value;
        self.recompute();
    }

    /// Translate a focus override into tab stop and accessibility visibility
    pub fn apply_override(&mut self, override_type: OverrideType) {
        self.override_type = override_type;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.revert.cancel();
        self.is_tab_stop = self.base_tab_stop && self.override_type == OverrideType::None;
        self.accessibility = match self.override_type {
            OverrideType::None | OverrideType::Accessible => self.base_accessibility,
            OverrideType::Limited => ImportantForAccessibility::NoHideDescendants,
        };
    }

    /// Whether assistive technology can reach this widget
    pub fn is_accessible(&self) -> bool {
        !matches!(
            self.accessibility,
            ImportantForAccessibility::No | ImportantForAccessibility::NoHideDescendants
        )
    }

    /// Take native focus.
    ///
    /// A widget that is not a tab stop is refused unless the revert policy is
    /// enabled, in which case it becomes a tab stop until the revert fires.
    pub fn focus(&mut self, policy: &TabStopRevertPolicy) -> Result<(), AdapterError> {
        if !self.is_tab_stop {
            if !policy.enabled {
                return Err(AdapterError::Refused("widget is not a tab stop".to_string()));
            }
            self.is_tab_stop = true;
            self.revert.set_delay(policy.delay());
            self.revert.schedule();
        }
        self.has_focus = true;
        if let Some(sink) = &self.sink {
            sink.notify_focused();
        }
        Ok(())
    }

    pub fn blur(&mut self) {
        self.has_focus = false;
        if let Some(sink) = &self.sink {
            sink.notify_blurred();
        }
    }

    pub fn is_revert_pending(&self) -> bool {
        self.revert.is_pending()
    }

    /// Restore a forced tab stop once its revert is due
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.revert.fire_if_due(now) {
            return false;
        }
        self.is_tab_stop = self.base_tab_stop && self.override_type == OverrideType::None;
        true
    }
}

/// Element adapter backed by a [`NativeHandle`]
#[derive(Debug, Clone)]
pub struct NativeFocusable {
    kind: WidgetKind,
    native: NativeHandle,
    policy: TabStopRevertPolicy,
}

impl NativeFocusable {
    pub fn new(kind: WidgetKind, native: NativeHandle, policy: TabStopRevertPolicy) -> Self {
        Self {
            kind,
            native,
            policy,
        }
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }
}

impl FocusableAdapter for NativeFocusable {
    fn focus(&mut self) -> Result<(), AdapterError> {
        self.native.lock().focus(&self.policy)
    }

    fn blur(&mut self) -> Result<(), AdapterError> {
        self.native.lock().blur();
        Ok(())
    }

    fn tab_index(&self) -> Option<i32> {
        let native = self.native.lock();
        if native.base_tab_stop {
            Some(native.tab_index.unwrap_or(0))
        } else {
            None
        }
    }

    fn important_for_accessibility(&self) -> Option<ImportantForAccessibility> {
        Some(self.native.lock().accessibility)
    }

    fn set_override(&mut self, override_type: OverrideType) -> Result<(), AdapterError> {
        self.native.lock().apply_override(override_type);
        Ok(())
    }

    fn attach_focus_sink(&mut self, sink: FocusSink) -> Result<(), AdapterError> {
        self.native.lock().sink = Some(sink);
        Ok(())
    }

    fn detach_focus_sink(&mut self) {
        let mut native = self.native.lock();
        native.sink = None;
        native.has_focus = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn policy(enabled: bool) -> TabStopRevertPolicy {
        TabStopRevertPolicy {
            enabled,
            delay_ms: 100,
        }
    }

    #[test]
    fn test_override_translation() {
        let mut state = NativeFocusState::new(true, Some(0), policy(true));

        state.apply_override(OverrideType::Accessible);
        assert!(!state.is_tab_stop);
        assert!(state.is_accessible());

        state.apply_override(OverrideType::Limited);
        assert!(!state.is_tab_stop);
        assert_eq!(state.accessibility, ImportantForAccessibility::NoHideDescendants);

        state.apply_override(OverrideType::None);
        assert!(state.is_tab_stop);
        assert_eq!(state.accessibility, ImportantForAccessibility::Auto);
    }

    #[test]
    fn test_props_keep_active_override() {
        let mut state = NativeFocusState::new(false, None, policy(true));
        state.apply_override(OverrideType::Limited);
        state.set_props(true, Some(0));
        assert!(!state.is_tab_stop);
    }

    #[test]
    fn test_non_tab_stop_refused_without_policy() {
        let mut state = NativeFocusState::new(false, None, policy(false));
        assert!(matches!(
            state.focus(&policy(false)),
            Err(AdapterError::Refused(_))
        ));
        assert!(!state.has_focus);
    }

    #[test]
    fn test_forced_tab_stop_reverts() {
        let mut state = NativeFocusState::new(false, None, policy(true));
        let start = Instant::now();

        state.focus(&policy(true)).unwrap();
        assert!(state.is_tab_stop);
        assert!(state.has_focus);
        assert!(state.is_revert_pending());

        assert!(!state.tick(start));
        assert!(state.tick(start + Duration::from_millis(200)));
        assert!(!state.is_tab_stop);
        assert!(state.has_focus);
    }

    #[test]
    fn test_adapter_reports_tab_index() {
        let native = NativeFocusState::new(true, None, policy(true)).into_handle();
        let adapter = NativeFocusable::new(WidgetKind::Button, native.clone(), policy(true));
        assert_eq!(adapter.tab_index(), Some(0));

        native.lock().set_props(false, Some(-1));
        assert_eq!(adapter.tab_index(), None);
        assert_eq!(adapter.kind(), WidgetKind::Button);
    }
}
