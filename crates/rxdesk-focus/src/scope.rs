//! Focus scope tree
//!
//! One [`ScopeNode`] exists per restriction or limitation boundary. Nodes point
//! at their parent only; the UI container that created a scope owns its
//! lifetime and releases it on unmount. Membership is transitive: an entry
//! registered in a scope is a member of that scope and of every ancestor.

use std::collections::{BTreeSet, HashMap};

use crate::error::{FocusError, FocusResult};
use crate::types::{FocusableId, LimitFocusType, ScopeId};

/// A restriction/limitation boundary
#[derive(Debug, Clone, Default)]
pub struct ScopeNode {
    pub parent: Option<ScopeId>,
    /// Traps focus to this scope's subtree while set
    pub is_restricted: bool,
    /// Limitation this scope currently applies to its members
    pub limit: LimitFocusType,
    /// Entries registered directly or transitively beneath this scope
    pub members: BTreeSet<FocusableId>,
}

impl ScopeNode {
    pub fn is_limited(&self) -> bool {
        self.limit == LimitFocusType::Limited
    }

    pub fn is_limited_accessible(&self) -> bool {
        self.limit == LimitFocusType::Accessible
    }
}

/// Arena of scopes forming a parent-linked tree
#[derive(Debug)]
pub struct ScopeTree {
    last_id: u64,
    root: ScopeId,
    nodes: HashMap<ScopeId, ScopeNode>,
    /// Restricting scopes in activation order; the last one is in effect
    restriction_stack: Vec<ScopeId>,
}

impl ScopeTree {
    /// Create a tree holding only the root scope
    pub fn new() -> Self {
        let root = ScopeId(1);
        let mut nodes = HashMap::new();
        nodes.insert(root, ScopeNode::default());
        Self {
            last_id: 1,
            root,
            nodes,
            restriction_stack: Vec::new(),
        }
    }

    pub fn root(&self) -> ScopeId {
        self.root
    }

    /// Add a child scope under `parent`
    pub fn create(&mut self, parent: ScopeId) -> FocusResult<ScopeId> {
        if !self.nodes.contains_key(&parent) {
            return Err(FocusError::UnknownScope(parent));
        }
        self.last_id += 1;
        let id = ScopeId(self.last_id);
        self.nodes.insert(
            id,
            ScopeNode {
                parent: Some(parent),
                ..ScopeNode::default()
            },
        );
        Ok(id)
    }

    pub fn get(&self, scope: ScopeId) -> Option<&ScopeNode> {
        self.nodes.get(&scope)
    }

    pub(crate) fn get_mut(&mut self, scope: ScopeId) -> FocusResult<&mut ScopeNode> {
        self.nodes
            .get_mut(&scope)
            .ok_or(FocusError::UnknownScope(scope))
    }

    pub fn contains(&self, scope: ScopeId) -> bool {
        self.nodes.contains_key(&scope)
    }

    /// `scope` followed by each ancestor up to the root
    pub fn chain(&self, scope: ScopeId) -> Vec<ScopeId> {
        let mut chain = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            let Some(node) = self.nodes.get(&id) else {
                break;
            };
            chain.push(id);
            current = node.parent;
        }
        chain
    }

    /// Whether `scope` is `ancestor` or lies beneath it
    pub fn is_within(&self, scope: ScopeId, ancestor: ScopeId) -> bool {
        self.chain(scope).contains(&ancestor)
    }

    /// Record `id` as a member of `scope` and all its ancestors
    pub(crate) fn attach_member(&mut self, scope: ScopeId, id: FocusableId) {
        for sid in self.chain(scope) {
            if let Some(node) = self.nodes.get_mut(&sid) {
                node.members.insert(id);
            }
        }
    }

    /// Remove `id` from every scope
    pub(crate) fn detach_member(&mut self, id: FocusableId) {
        for node in self.nodes.values_mut() {
            node.members.remove(&id);
        }
    }

    /// Whether `id` is registered beneath `scope`
    pub fn is_member(&self, scope: ScopeId, id: FocusableId) -> bool {
        self.nodes
            .get(&scope)
            .is_some_and(|node| node.members.contains(&id))
    }

    pub fn members(&self, scope: ScopeId) -> Vec<FocusableId> {
        self.nodes
            .get(&scope)
            .map(|node| node.members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Sum of limitations applied by `scope` and its ancestors, as
    /// `(limited, limited_accessible)` counts
    pub fn inherited_limits(&self, scope: ScopeId) -> (u32, u32) {
        self.chain(scope)
            .into_iter()
            .filter_map(|sid| self.nodes.get(&sid))
            .fold((0, 0), |(limited, accessible), node| match node.limit {
                LimitFocusType::Limited => (limited + 1, accessible),
                LimitFocusType::Accessible => (limited, accessible + 1),
                LimitFocusType::Unlimited => (limited, accessible),
            })
    }

    /// Scope whose restriction is currently in effect
    pub fn restriction_owner(&self) -> Option<ScopeId> {
        self.restriction_stack.last().copied()
    }

    /// Whether an entry falls outside the effective restriction
    pub fn is_restricted(&self, id: FocusableId) -> bool {
        self.restriction_owner()
            .is_some_and(|owner| !self.is_member(owner, id))
    }

    pub(crate) fn push_restriction(&mut self, scope: ScopeId) {
        self.restriction_stack.retain(|s| *s != scope);
        self.restriction_stack.push(scope);
    }

    pub(crate) fn remove_restriction(&mut self, scope: ScopeId) {
        self.restriction_stack.retain(|s| *s != scope);
    }

    /// Drop a scope from the arena.
    ///
    /// Children are re-parented to the released scope's parent, so releasing
    /// scopes in any order keeps the tree connected. The node's members stay
    /// members of the ancestors. Returns the new owner for entries the scope
    /// owned directly.
    pub(crate) fn remove(&mut self, scope: ScopeId) -> FocusResult<ScopeId> {
        if scope == self.root {
            return Err(FocusError::RootScope);
        }
        let node = self
            .nodes
            .remove(&scope)
            .ok_or(FocusError::UnknownScope(scope))?;
        let parent = node.parent.unwrap_or(self.root);

        for child in self.nodes.values_mut() {
            if child.parent == Some(scope) {
                child.parent = Some(parent);
            }
        }
        self.restriction_stack.retain(|s| *s != scope);
        Ok(parent)
    }

    /// Every scope except the root, children before parents
    pub fn non_root_scopes(&self) -> Vec<ScopeId> {
        let mut scopes: Vec<ScopeId> = self
            .nodes
            .keys()
            .copied()
            .filter(|s| *s != self.root)
            .collect();
        scopes.sort_by_key(|s| std::cmp::Reverse(self.chain(*s).len()));
        scopes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_is_transitive() {
        let mut tree = ScopeTree::new();
        let a = tree.create(tree.root()).unwrap();
        let b = tree.create(a).unwrap();

        tree.attach_member(b, FocusableId(7));

        assert!(tree.is_member(b, FocusableId(7)));
        assert!(tree.is_member(a, FocusableId(7)));
        assert!(tree.is_member(tree.root(), FocusableId(7)));

        tree.detach_member(FocusableId(7));
        assert!(tree.members(tree.root()).is_empty());
    }

    #[test]
    fn test_create_under_unknown_parent() {
        let mut tree = ScopeTree::new();
        assert!(matches!(
            tree.create(ScopeId(99)),
            Err(FocusError::UnknownScope(ScopeId(99)))
        ));
    }

    #[test]
    fn test_restriction_stack_hands_back_to_previous_owner() {
        let mut tree = ScopeTree::new();
        let a = tree.create(tree.root()).unwrap();
        let b = tree.create(tree.root()).unwrap();

        tree.push_restriction(a);
        tree.push_restriction(b);
        assert_eq!(tree.restriction_owner(), Some(b));

        tree.remove_restriction(b);
        assert_eq!(tree.restriction_owner(), Some(a));
    }

    #[test]
    fn test_remove_reparents_children() {
        let mut tree = ScopeTree::new();
        let a = tree.create(tree.root()).unwrap();
        let b = tree.create(a).unwrap();

        assert_eq!(tree.remove(a).unwrap(), tree.root());
        assert_eq!(tree.get(b).unwrap().parent, Some(tree.root()));
        assert_eq!(tree.chain(b), vec![b, tree.root()]);
        assert!(matches!(tree.remove(a), Err(FocusError::UnknownScope(_))));
        assert!(matches!(tree.remove(tree.root()), Err(FocusError::RootScope)));
    }

    #[test]
    fn test_inherited_limits() {
        let mut tree = ScopeTree::new();
        let a = tree.create(tree.root()).unwrap();
        let b = tree.create(a).unwrap();
        tree.get_mut(a).unwrap().limit = LimitFocusType::Limited;
        tree.get_mut(b).unwrap().limit = LimitFocusType::Accessible;

        assert_eq!(tree.inherited_limits(b), (1, 1));
        assert_eq!(tree.inherited_limits(a), (1, 0));
        assert_eq!(tree.inherited_limits(tree.root()), (0, 0));
    }
}
