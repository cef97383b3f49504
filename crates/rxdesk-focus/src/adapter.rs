//! Element adapter capability contract
//!
//! Every focusable widget type implements [`FocusableAdapter`] directly. All
//! methods have defaults returning [`AdapterError::Unsupported`], so an element
//! that only implements part of the contract still registers; the focus core
//! logs the missing capability and degrades the operation to a no-op.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::AdapterError;
use crate::types::{FocusableId, ImportantForAccessibility, OverrideType};

/// Capabilities the focus core consumes from a focusable element
pub trait FocusableAdapter {
    /// Move native focus to the element
    fn focus(&mut self) -> Result<(), AdapterError> {
        Err(AdapterError::Unsupported("focus"))
    }

    /// Remove native focus from the element
    fn blur(&mut self) -> Result<(), AdapterError> {
        Err(AdapterError::Unsupported("blur"))
    }

    /// Effective tab-order hint, consulted by the host widget layer only
    fn tab_index(&self) -> Option<i32> {
        None
    }

    /// Accessibility visibility hint
    fn important_for_accessibility(&self) -> Option<ImportantForAccessibility> {
        None
    }

    /// Apply a focus-eligibility override to the native widget
    fn set_override(&mut self, _override_type: OverrideType) -> Result<(), AdapterError> {
        Err(AdapterError::Unsupported("set_override"))
    }

    /// Keep the sink and invoke it whenever native focus lands on the element
    fn attach_focus_sink(&mut self, _sink: FocusSink) -> Result<(), AdapterError> {
        Err(AdapterError::Unsupported("attach_focus_sink"))
    }

    /// Drop the sink handed over by `attach_focus_sink`
    fn detach_focus_sink(&mut self) {}
}

/// Callback handle an adapter invokes when native focus lands on its element.
///
/// The sink records the element as the currently focused entry of its focus
/// manager. It stops working once the entry is unregistered.
#[derive(Debug, Clone)]
pub struct FocusSink {
    id: FocusableId,
    focused: Arc<Mutex<Option<FocusableId>>>,
    attached: Arc<AtomicBool>,
}

impl FocusSink {
    pub(crate) fn new(id: FocusableId, focused: Arc<Mutex<Option<FocusableId>>>) -> Self {
        Self {
            id,
            focused,
            attached: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Entry this sink reports for
    pub fn id(&self) -> FocusableId {
        self.id
    }

    /// Whether the entry is still registered
    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    /// Report that native focus landed on the element
    pub fn notify_focused(&self) {
        if !self.is_attached() {
            tracing::error!(id = %self.id, "Focus sink invoked after the entry was unregistered");
            return;
        }
        *self.focused.lock() = Some(self.id);
    }

    /// Report that native focus left the element
    pub fn notify_blurred(&self) {
        if !self.is_attached() {
            return;
        }
        let mut focused = self.focused.lock();
        if *focused == Some(self.id) {
            *focused = None;
        }
    }

    pub(crate) fn detach(&self) {
        self.attached.store(false, Ordering::Release);
    }
}
