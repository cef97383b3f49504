//! Focusable terminal components
//!
//! Each component forwards its props to a [`NativeHandle`] and registers a
//! [`NativeFocusable`] adapter with the focus manager while mounted.

pub mod button;
pub mod link;
pub mod text_input;
pub mod view;

pub use button::{Button, ButtonProps};
pub use link::{Link, LinkProps};
pub use text_input::{TextInput, TextInputProps};
pub use view::{ScrollView, View, ViewProps};

use ratatui::style::{Modifier, Style};
use rxdesk_focus::{FocusManager, FocusableId, ScopeId, TabStopRevertPolicy};
use tokio::time::Instant;

use crate::native::{NativeFocusState, NativeFocusable, NativeHandle, WidgetKind};

/// Mount state shared by every focusable component
#[derive(Debug)]
pub struct FocusHandle {
    kind: WidgetKind,
    native: NativeHandle,
    policy: TabStopRevertPolicy,
    id: Option<FocusableId>,
}

impl FocusHandle {
    pub fn new(kind: WidgetKind, tab_stop: bool, tab_index: Option<i32>) -> Self {
        let policy = TabStopRevertPolicy::default();
        Self {
            kind,
            native: NativeFocusState::new(tab_stop, tab_index, policy).into_handle(),
            policy,
            id: None,
        }
    }

    pub fn with_policy(mut self, policy: TabStopRevertPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn native(&self) -> &NativeHandle {
        &self.native
    }

    pub fn id(&self) -> Option<FocusableId> {
        self.id
    }

    pub fn is_mounted(&self) -> bool {
        self.id.is_some()
    }

    /// Register with the focus manager; mounting twice keeps the first id
    pub fn mount(&mut self, manager: &mut FocusManager, scope: Option<ScopeId>) -> FocusableId {
        if let Some(id) = self.id {
            return id;
        }
        let adapter = NativeFocusable::new(self.kind, self.native.clone(), self.policy);
        let id = manager.register(adapter, scope);
        self.id = Some(id);
        id
    }

    pub fn unmount(&mut self, manager: &mut FocusManager) {
        if let Some(id) = self.id.take() {
            manager.unregister(id);
        }
    }

    pub fn set_props(&self, tab_stop: bool, tab_index: Option<i32>) {
        self.native.lock().set_props(tab_stop, tab_index);
    }

    pub fn has_focus(&self) -> bool {
        self.native.lock().has_focus
    }

    pub fn is_tab_stop(&self) -> bool {
        self.native.lock().is_tab_stop
    }

    /// Run the tab-stop revert if due
    pub fn tick(&self, now: Instant) -> bool {
        self.native.lock().tick(now)
    }

    pub(crate) fn style(&self, disabled: bool) -> Style {
        let native = self.native.lock();
        let mut style = Style::default();
        if native.has_focus {
            style = style.add_modifier(Modifier::REVERSED);
        }
        if disabled || !native.is_accessible() {
            style = style.add_modifier(Modifier::DIM);
        }
        style
    }
}
