//! Focus management core for RxDesk
//!
//! This crate tracks every focusable element mounted under a UI root and
//! decides which of them may receive keyboard focus:
//! - Focus registry keyed by strictly increasing identifiers
//! - Nested focus scopes that restrict (trap) or limit (deprioritize) focus
//! - Per-element override calculation pushed through the adapter contract
//! - Process-wide keyboard navigation mode detection
//! - Focus-first ordering and the debounced focus reset policy
//!
//! The crate has no rendering dependency. Host toolkits implement
//! [`FocusableAdapter`] for their widgets and drive [`FocusManager`] from their
//! own event loop.

pub mod adapter;
pub mod config;
pub mod coordinator;
pub mod deferred;
pub mod error;
pub mod keyboard;
pub mod manager;
pub mod overrides;
pub mod registry;
pub mod scope;
pub mod subscription;
pub mod types;

// Re-export public types
pub use adapter::{FocusSink, FocusableAdapter};
pub use config::{FocusConfig, TabStopRevertPolicy};
pub use deferred::DeferredAction;
pub use error::{AdapterError, ConfigError, FocusError, FocusResult};
pub use keyboard::{KeyboardNavigationDetector, KeyboardNavigationEvent, NavigationInput};
pub use manager::FocusManager;
pub use overrides::compute_override;
pub use registry::{FocusRegistry, FocusableEntry};
pub use scope::{ScopeNode, ScopeTree};
pub use subscription::{StateSubscribers, SubscriptionId};
pub use types::{FocusableId, ImportantForAccessibility, LimitFocusType, OverrideType, ScopeId};
