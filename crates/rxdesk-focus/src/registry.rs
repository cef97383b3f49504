//! Registry of every focusable element mounted under one root
//!
//! Entries are keyed by [`FocusableId`] and stored in a `BTreeMap`, so every
//! iteration is in ascending id order regardless of how mounts interleave.

use std::collections::BTreeMap;
use std::fmt;

use crate::adapter::{FocusSink, FocusableAdapter};
use crate::subscription::StateSubscribers;
use crate::types::{FocusableId, OverrideType, ScopeId};

/// One mounted focusable element
pub struct FocusableEntry {
    pub id: FocusableId,
    /// Scope the entry currently belongs to
    pub owner_scope: ScopeId,
    /// Set by unregistration; the entry is retained until the next compaction
    pub removed: bool,
    /// An active restriction excludes this entry
    pub restricted: bool,
    pub limited_count: u32,
    pub limited_accessible_count: u32,
    /// Last override pushed to the adapter
    pub current_override: OverrideType,
    pub(crate) subscribers: StateSubscribers,
    pub(crate) adapter: Option<Box<dyn FocusableAdapter>>,
    pub(crate) sink: Option<FocusSink>,
}

impl FocusableEntry {
    fn new(id: FocusableId, owner_scope: ScopeId, adapter: Box<dyn FocusableAdapter>) -> Self {
        Self {
            id,
            owner_scope,
            removed: false,
            restricted: false,
            limited_count: 0,
            limited_accessible_count: 0,
            current_override: OverrideType::None,
            subscribers: StateSubscribers::new(),
            adapter: Some(adapter),
            sink: None,
        }
    }

    /// Either limitation counter is non-zero
    pub fn is_limited(&self) -> bool {
        self.limited_count > 0 || self.limited_accessible_count > 0
    }

    /// Candidate for focus-first and valid as the focused entry
    pub fn is_eligible(&self) -> bool {
        !self.removed && !self.restricted && !self.is_limited()
    }

    /// Adapter of a live entry
    pub fn adapter(&self) -> Option<&dyn FocusableAdapter> {
        self.adapter.as_deref()
    }

    pub(crate) fn adapter_mut(&mut self) -> Option<&mut (dyn FocusableAdapter + 'static)> {
        self.adapter.as_deref_mut()
    }
}

impl fmt::Debug for FocusableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusableEntry")
            .field("id", &self.id)
            .field("owner_scope", &self.owner_scope)
            .field("removed", &self.removed)
            .field("restricted", &self.restricted)
            .field("limited_count", &self.limited_count)
            .field("limited_accessible_count", &self.limited_accessible_count)
            .field("current_override", &self.current_override)
            .field("subscribers", &self.subscribers)
            .finish()
    }
}

/// Table of focusable entries keyed by strictly increasing ids
#[derive(Debug, Default)]
pub struct FocusRegistry {
    last_id: u64,
    entries: BTreeMap<FocusableId, FocusableEntry>,
}

impl FocusRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry owned by `scope` and return its new id
    pub fn insert(&mut self, scope: ScopeId, adapter: Box<dyn FocusableAdapter>) -> FocusableId {
        self.last_id += 1;
        let id = FocusableId(self.last_id);
        self.entries.insert(id, FocusableEntry::new(id, scope, adapter));
        id
    }

    /// Mark an entry removed and drop its adapter.
    ///
    /// Returns false if the id is unknown or already removed.
    pub fn remove(&mut self, id: FocusableId) -> bool {
        let Some(entry) = self.entries.get_mut(&id) else {
            return false;
        };
        if entry.removed {
            return false;
        }

        entry.removed = true;
        if let Some(sink) = entry.sink.take() {
            sink.detach();
        }
        if let Some(mut adapter) = entry.adapter.take() {
            adapter.detach_focus_sink();
        }
        entry.subscribers.clear();
        true
    }

    /// Look up an entry, including removed entries not yet compacted
    pub fn lookup(&self, id: FocusableId) -> Option<&FocusableEntry> {
        self.entries.get(&id)
    }

    pub(crate) fn lookup_mut(&mut self, id: FocusableId) -> Option<&mut FocusableEntry> {
        self.entries.get_mut(&id)
    }

    /// Whether the id refers to a registered, not removed entry
    pub fn contains(&self, id: FocusableId) -> bool {
        self.entries.get(&id).is_some_and(|e| !e.removed)
    }

    /// Entries that are not removed, in ascending id order
    pub fn live(&self) -> impl Iterator<Item = &FocusableEntry> {
        self.entries.values().filter(|e| !e.removed)
    }

    /// Ids of live entries, ascending
    pub fn live_ids(&self) -> Vec<FocusableId> {
        self.live().map(|e| e.id).collect()
    }

    /// Ids eligible for focus-first, ascending
    pub fn eligible_ids(&self) -> Vec<FocusableId> {
        self.entries
            .values()
            .filter(|e| e.is_eligible())
            .map(|e| e.id)
            .collect()
    }

    /// Drop retained removed entries; ids stay retired
    pub fn compact(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| !e.removed);
        before - self.entries.len()
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.live().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
