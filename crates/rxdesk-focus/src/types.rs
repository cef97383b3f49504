//! Identifier and enum types shared across the focus core

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a registered focusable element.
///
/// Assigned at registration, strictly increasing and never reused. Ordering by
/// id approximates mount order and is the tie-break for focus-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FocusableId(pub(crate) u64);

impl FocusableId {
    /// Raw numeric value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FocusableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "focusable#{}", self.0)
    }
}

/// Identifier of a focus scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeId(pub(crate) u64);

impl ScopeId {
    /// Raw numeric value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

/// Focus-eligibility override pushed to a native element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OverrideType {
    /// Element keeps its own focusability
    #[default]
    None,
    /// Not a tab stop, but still reachable by assistive technology
    Accessible,
    /// Not a tab stop and hidden from assistive technology
    Limited,
}

impl OverrideType {
    /// Whether any override is in effect
    pub fn is_overridden(self) -> bool {
        self != OverrideType::None
    }
}

/// Kind of limitation a scope applies to its subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LimitFocusType {
    #[default]
    Unlimited,
    Limited,
    Accessible,
}

/// Accessibility visibility hint reported by an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ImportantForAccessibility {
    #[default]
    Auto,
    Yes,
    No,
    NoHideDescendants,
}
