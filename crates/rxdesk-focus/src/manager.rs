//! Focus manager: one instance per UI root
//!
//! Owns the registry and scope tree of a root. All mutation happens
//! synchronously on the caller's thread: an operation first updates every
//! flag and counter it touches, then recomputes overrides, and only then
//! notifies subscribers, so no callback observes a half-updated tree.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::adapter::{FocusSink, FocusableAdapter};
use crate::config::FocusConfig;
use crate::deferred::DeferredAction;
use crate::error::{FocusError, FocusResult};
use crate::keyboard::KeyboardNavigationEvent;
use crate::overrides;
use crate::registry::{FocusRegistry, FocusableEntry};
use crate::scope::ScopeTree;
use crate::subscription::SubscriptionId;
use crate::types::{FocusableId, LimitFocusType, OverrideType, ScopeId};

/// Name of the debounced focus reset action
pub const RESET_FOCUS_ACTION: &str = "reset-focus";

/// Coordinates focusable elements and focus scopes under one root
#[derive(Debug)]
pub struct FocusManager {
    pub(crate) registry: FocusRegistry,
    pub(crate) scopes: ScopeTree,
    pub(crate) focused: Arc<Mutex<Option<FocusableId>>>,
    pub(crate) keyboard: KeyboardNavigationEvent,
    pub(crate) reset_timer: DeferredAction,
    config: FocusConfig,
}

impl FocusManager {
    /// Create a manager tracking the given keyboard navigation event
    pub fn new(keyboard: KeyboardNavigationEvent) -> Self {
        Self::with_config(FocusConfig::default(), keyboard)
    }

    pub fn with_config(config: FocusConfig, keyboard: KeyboardNavigationEvent) -> Self {
        Self {
            registry: FocusRegistry::new(),
            scopes: ScopeTree::new(),
            focused: Arc::new(Mutex::new(None)),
            keyboard,
            reset_timer: DeferredAction::new(RESET_FOCUS_ACTION, config.reset_focus_delay()),
            config,
        }
    }

    /// Create a manager configured from the TOML file at `path`
    pub fn from_config_file(path: &Path, keyboard: KeyboardNavigationEvent) -> FocusResult<Self> {
        let config = FocusConfig::load(path)?;
        Ok(Self::with_config(config, keyboard))
    }

    pub fn config(&self) -> &FocusConfig {
        &self.config
    }

    pub fn keyboard(&self) -> &KeyboardNavigationEvent {
        &self.keyboard
    }

    pub fn registry(&self) -> &FocusRegistry {
        &self.registry
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    pub fn root_scope(&self) -> ScopeId {
        self.scopes.root()
    }

    /// Register a focusable element under `scope` (the root scope if `None`).
    ///
    /// Never fails: an unknown scope is reported and the root used instead.
    /// The new entry immediately inherits every active restriction and
    /// limitation of its scope chain.
    pub fn register<A>(&mut self, adapter: A, scope: Option<ScopeId>) -> FocusableId
    where
        A: FocusableAdapter + 'static,
    {
        let root = self.scopes.root();
        let scope = match scope {
            Some(s) if self.scopes.contains(s) => s,
            Some(s) => {
                tracing::warn!(scope = %s, "Registering focusable under unknown scope, using root");
                root
            }
            None => root,
        };

        let id = self.registry.insert(scope, Box::new(adapter));
        self.scopes.attach_member(scope, id);
        let (limited, limited_accessible) = self.scopes.inherited_limits(scope);
        let restricted = self.scopes.is_restricted(id);
        let sink = FocusSink::new(id, Arc::clone(&self.focused));

        if let Some(entry) = self.registry.lookup_mut(id) {
            entry.limited_count = limited;
            entry.limited_accessible_count = limited_accessible;
            entry.restricted = restricted;
            if let Some(adapter) = entry.adapter_mut() {
                if let Err(e) = adapter.attach_focus_sink(sink.clone()) {
                    tracing::warn!(id = %id, error = %e, "Focusable element has no focus sink support");
                }
            }
            entry.sink = Some(sink);
            overrides::refresh(entry);
        }

        tracing::debug!(id = %id, scope = %scope, restricted, limited, limited_accessible, "Focusable registered");
        id
    }

    /// Unregister an element; its id stays retired.
    ///
    /// The removed entry is kept only while a focus reset is pending and is
    /// compacted when that reset fires. With no reset pending it is dropped
    /// right away. Returns false for unknown or already removed ids.
    pub fn unregister(&mut self, id: FocusableId) -> bool {
        if !self.registry.remove(id) {
            return false;
        }
        self.scopes.detach_member(id);

        {
            let mut focused = self.focused.lock();
            if *focused == Some(id) {
                *focused = None;
            }
        }
        tracing::debug!(id = %id, "Focusable unregistered");

        if !self.reset_timer.is_pending() {
            self.compact();
        }
        true
    }

    pub fn lookup(&self, id: FocusableId) -> Option<&FocusableEntry> {
        self.registry.lookup(id)
    }

    /// Current override of a live entry
    pub fn override_of(&self, id: FocusableId) -> Option<OverrideType> {
        self.registry
            .lookup(id)
            .filter(|e| !e.removed)
            .map(|e| e.current_override)
    }

    /// Subscribe to an entry's "now overridden" transitions.
    ///
    /// Returns `None` for unknown or removed ids.
    pub fn subscribe_state(
        &mut self,
        id: FocusableId,
        callback: impl FnMut(bool) + 'static,
    ) -> Option<SubscriptionId> {
        let entry = self.registry.lookup_mut(id).filter(|e| !e.removed)?;
        Some(entry.subscribers.subscribe(callback))
    }

    pub fn unsubscribe_state(&mut self, id: FocusableId, subscription: SubscriptionId) -> bool {
        self.registry
            .lookup_mut(id)
            .is_some_and(|e| e.subscribers.unsubscribe(subscription))
    }

    /// Create a scope beneath `parent` (the root scope if `None`)
    pub fn create_scope(&mut self, parent: Option<ScopeId>) -> FocusResult<ScopeId> {
        let parent = parent.unwrap_or_else(|| self.scopes.root());
        let scope = self.scopes.create(parent)?;
        tracing::debug!(scope = %scope, parent = %parent, "Focus scope created");
        Ok(scope)
    }

    /// Trap focus within `scope`.
    ///
    /// A second activation without an intervening removal is a no-op. Unless
    /// `no_focus_reset` is set, requests a focus reset afterwards.
    pub fn restrict_focus_within(&mut self, scope: ScopeId, no_focus_reset: bool) -> FocusResult<()> {
        let node = self.scopes.get_mut(scope)?;
        if node.is_restricted {
            tracing::debug!(scope = %scope, "Focus already restricted");
            return Ok(());
        }
        node.is_restricted = true;
        self.scopes.push_restriction(scope);
        tracing::debug!(scope = %scope, "Focus restricted");

        self.apply_restrictions();
        if !no_focus_reset {
            self.reset_focus(true);
        }
        Ok(())
    }

    /// Lift this scope's restriction; a previously activated restricting scope
    /// that is still active takes effect again.
    pub fn remove_focus_restriction(&mut self, scope: ScopeId) -> FocusResult<()> {
        let node = self.scopes.get_mut(scope)?;
        if !node.is_restricted {
            return Ok(());
        }
        node.is_restricted = false;
        self.scopes.remove_restriction(scope);
        tracing::debug!(scope = %scope, owner = ?self.scopes.restriction_owner(), "Focus restriction removed");

        self.apply_restrictions();
        self.reset_focus(true);
        Ok(())
    }

    /// Limit focus for every entry beneath `scope`.
    ///
    /// Ignored while the scope already applies a limitation, so each
    /// activation increments the counters exactly once.
    pub fn limit_focus_within(&mut self, scope: ScopeId, kind: LimitFocusType) -> FocusResult<()> {
        let node = self.scopes.get_mut(scope)?;
        if kind == LimitFocusType::Unlimited {
            return Ok(());
        }
        if node.limit != LimitFocusType::Unlimited {
            tracing::debug!(scope = %scope, current = ?node.limit, "Focus already limited");
            return Ok(());
        }
        node.limit = kind;
        let members: Vec<FocusableId> = node.members.iter().copied().collect();

        for id in &members {
            if let Some(entry) = self.registry.lookup_mut(*id) {
                match kind {
                    LimitFocusType::Limited => entry.limited_count += 1,
                    LimitFocusType::Accessible => entry.limited_accessible_count += 1,
                    LimitFocusType::Unlimited => {}
                }
            }
        }
        tracing::debug!(scope = %scope, kind = ?kind, members = members.len(), "Focus limited");
        self.refresh_overrides(&members);
        Ok(())
    }

    pub fn limit_focus_within_accessible(&mut self, scope: ScopeId) -> FocusResult<()> {
        self.limit_focus_within(scope, LimitFocusType::Accessible)
    }

    /// Undo this scope's limitation
    pub fn remove_focus_limitation(&mut self, scope: ScopeId) -> FocusResult<()> {
        let node = self.scopes.get_mut(scope)?;
        let kind = node.limit;
        if kind == LimitFocusType::Unlimited {
            return Ok(());
        }
        node.limit = LimitFocusType::Unlimited;
        let members: Vec<FocusableId> = node.members.iter().copied().collect();

        for id in &members {
            let Some(entry) = self.registry.lookup_mut(*id) else {
                continue;
            };
            let counter = match kind {
                LimitFocusType::Limited => &mut entry.limited_count,
                LimitFocusType::Accessible => &mut entry.limited_accessible_count,
                LimitFocusType::Unlimited => continue,
            };
            match counter.checked_sub(1) {
                Some(value) => *counter = value,
                None => tracing::error!(id = %id, scope = %scope, "Limitation counter underflow"),
            }
        }
        tracing::debug!(scope = %scope, kind = ?kind, "Focus limitation removed");
        self.refresh_overrides(&members);
        Ok(())
    }

    /// Tear a scope down, undoing everything it contributed.
    ///
    /// Child scopes and directly owned entries move to the parent scope, so
    /// scopes may be released in any order.
    pub fn release_scope(&mut self, scope: ScopeId) -> FocusResult<()> {
        if scope == self.scopes.root() {
            return Err(FocusError::RootScope);
        }
        self.remove_focus_limitation(scope)?;
        self.remove_focus_restriction(scope)?;

        let parent = self.scopes.remove(scope)?;
        for id in self.registry.live_ids() {
            if let Some(entry) = self.registry.lookup_mut(id) {
                if entry.owner_scope == scope {
                    entry.owner_scope = parent;
                }
            }
        }
        tracing::debug!(scope = %scope, parent = %parent, "Focus scope released");
        Ok(())
    }

    /// Root teardown: unregister every entry, release every scope and cancel
    /// the pending focus reset.
    pub fn shutdown(&mut self) {
        for id in self.registry.live_ids() {
            self.unregister(id);
        }
        for scope in self.scopes.non_root_scopes() {
            if let Err(e) = self.release_scope(scope) {
                tracing::warn!(scope = %scope, error = %e, "Scope release failed during shutdown");
            }
        }
        self.reset_timer.cancel();
        self.compact();
        tracing::debug!("Focus manager shut down");
    }

    /// Recompute `restricted` for every live entry from the effective owner
    fn apply_restrictions(&mut self) {
        let changed: Vec<(FocusableId, bool)> = self
            .registry
            .live()
            .map(|e| (e.id, e.restricted, self.scopes.is_restricted(e.id)))
            .filter(|(_, current, next)| current != next)
            .map(|(id, _, next)| (id, next))
            .collect();

        for (id, restricted) in &changed {
            if let Some(entry) = self.registry.lookup_mut(*id) {
                entry.restricted = *restricted;
            }
        }
        let ids: Vec<FocusableId> = changed.into_iter().map(|(id, _)| id).collect();
        self.refresh_overrides(&ids);
    }

    fn refresh_overrides(&mut self, ids: &[FocusableId]) {
        for id in ids {
            if let Some(entry) = self.registry.lookup_mut(*id) {
                overrides::refresh(entry);
            }
        }
    }
}

impl Default for FocusManager {
    fn default() -> Self {
        Self::new(KeyboardNavigationEvent::global().clone())
    }
}
