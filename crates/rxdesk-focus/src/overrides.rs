//! Override calculation
//!
//! `Limited` dominates `Accessible`; multiple limiting sources only stack as
//! reference counts.

use crate::registry::FocusableEntry;
use crate::types::OverrideType;

/// Override an entry should currently carry
pub fn compute_override(entry: &FocusableEntry) -> OverrideType {
    if entry.restricted || entry.limited_count > 0 {
        OverrideType::Limited
    } else if entry.limited_accessible_count > 0 {
        OverrideType::Accessible
    } else {
        OverrideType::None
    }
}

/// Recompute an entry's override and, if it changed, push it to the adapter
/// and notify state subscribers. Returns whether the override changed.
///
/// Call only after every counter/flag mutation of the triggering operation is
/// done.
pub(crate) fn refresh(entry: &mut FocusableEntry) -> bool {
    if entry.removed {
        return false;
    }

    let next = compute_override(entry);
    let previous = entry.current_override;
    if next == previous {
        return false;
    }

    let id = entry.id;
    if let Some(adapter) = entry.adapter_mut() {
        if let Err(e) = adapter.set_override(next) {
            tracing::warn!(id = %id, error = %e, "Adapter could not apply focus override");
        }
    }
    entry.current_override = next;
    tracing::debug!(id = %id, from = ?previous, to = ?next, "Focus override changed");

    if previous.is_overridden() != next.is_overridden() {
        entry.subscribers.notify(next.is_overridden());
    }
    true
}
