//! Configuration tree nodes
//!
//! Provides [`ConfigNode`], a shared handle to one node of a mutable
//! configuration tree.
//!
//! # Ownership
//! - A node owns its children; the parent link is a weak back-reference
//! - A node has at most one parent, adding it elsewhere moves it
//! - Handles are cheap to clone and compare by identity
//!
//! # Locking
//! Every node carries its own locks. Structural operations take them one at
//! a time and never nest two node locks, so there is no lock ordering to
//! respect across the tree.
//!
//! Changes of parentage additionally hold one structure lock for the whole
//! cycle check and link, so two concurrent moves cannot each pass the check
//! and close a cycle between them. Reads and attribute writes never take it.

use crate::error::StructuralError;
use crate::order::ChildrenOrder;
use crate::qname::QName;
use confmodel_property::SharedResolver;
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

/// Handle to a configuration tree node
///
/// Equality and hashing are by identity: two handles are equal when they
/// refer to the same node, regardless of content.
#[derive(Clone)]
pub struct ConfigNode {
    inner: Arc<NodeInner>,
}

/// Non-owning handle to a configuration node
#[derive(Debug, Clone, Default)]
pub struct WeakConfigNode {
    inner: Weak<NodeInner>,
}

struct NodeInner {
    name: QName,
    state: RwLock<NodeState>,
    parent: RwLock<Weak<NodeInner>>,
    /// Installed effective resolver
    resolver: RwLock<Option<SharedResolver>>,
    /// Resolver over this node's own declarations, created once
    scope: OnceCell<SharedResolver>,
}

/// Held across every change of parentage
static STRUCTURE: Mutex<()> = parking_lot::const_mutex(());

#[derive(Default)]
struct NodeState {
    attributes: IndexMap<String, String>,
    children: Vec<ConfigNode>,
    text: Option<String>,
}

#[derive(Clone, Copy)]
enum Placement<'a> {
    At(usize),
    Ordered(&'a ChildrenOrder),
    Append,
}

impl ConfigNode {
    /// Create detached node
    #[must_use]
    pub fn new(name: QName) -> Self {
        Self {
            inner: Arc::new(NodeInner {
                name,
                state: RwLock::new(NodeState::default()),
                parent: RwLock::new(Weak::new()),
                resolver: RwLock::new(None),
                scope: OnceCell::new(),
            }),
        }
    }

    /// With attribute (builder style)
    #[must_use]
    pub fn with_attribute(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// With text content (builder style)
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// With appended child (builder style)
    ///
    /// # Errors
    /// Same as [`add_child`](Self::add_child)
    pub fn with_child(self, child: &ConfigNode) -> Result<Self, StructuralError> {
        self.add_child(child, None)?;
        Ok(self)
    }

    /// Qualified name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &QName {
        &self.inner.name
    }

    /// Check if both handles refer to the same node
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Non-owning handle to this node
    #[inline]
    #[must_use]
    pub fn downgrade(&self) -> WeakConfigNode {
        WeakConfigNode {
            inner: Arc::downgrade(&self.inner),
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Parent node, `None` for a root or a detached node
    #[must_use]
    pub fn parent(&self) -> Option<ConfigNode> {
        self.inner.parent.read().upgrade().map(|inner| Self { inner })
    }

    /// Ancestors from parent up to root
    pub fn ancestors(&self) -> impl Iterator<Item = ConfigNode> {
        std::iter::successors(self.parent(), ConfigNode::parent)
    }

    /// Topmost ancestor, or this node if it has no parent
    #[must_use]
    pub fn root(&self) -> ConfigNode {
        self.ancestors().last().unwrap_or_else(|| self.clone())
    }

    /// Check if this node is a strict ancestor of `other`
    #[must_use]
    pub fn is_ancestor_of(&self, other: &ConfigNode) -> bool {
        other.ancestors().any(|a| a.ptr_eq(self))
    }

    /// Snapshot of all children in document order
    #[must_use]
    pub fn children(&self) -> Vec<ConfigNode> {
        self.inner.state.read().children.clone()
    }

    /// Snapshot of children named `name`, in document order
    #[must_use]
    pub fn children_named(&self, name: &QName) -> Vec<ConfigNode> {
        self.inner
            .state
            .read()
            .children
            .iter()
            .filter(|c| c.name() == name)
            .cloned()
            .collect()
    }

    /// First child named `name`
    #[must_use]
    pub fn first_child(&self, name: &QName) -> Option<ConfigNode> {
        self.find_child(|c| c.name() == name)
    }

    /// First child matching `predicate`
    ///
    /// The predicate runs while this node is read-locked; it may inspect the
    /// child but must not mutate this node.
    #[must_use]
    pub fn find_child(&self, predicate: impl Fn(&ConfigNode) -> bool) -> Option<ConfigNode> {
        self.inner
            .state
            .read()
            .children
            .iter()
            .find(|c| predicate(c))
            .cloned()
    }

    /// Number of direct children
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.inner.state.read().children.len()
    }

    /// Position of `child` among direct children
    #[must_use]
    pub fn index_of(&self, child: &ConfigNode) -> Option<usize> {
        self.inner
            .state
            .read()
            .children
            .iter()
            .position(|c| c.ptr_eq(child))
    }

    // ------------------------------------------------------------------
    // Attributes and text
    // ------------------------------------------------------------------

    /// Raw attribute value
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.inner.state.read().attributes.get(name).cloned()
    }

    /// Set attribute, returning the previous value
    ///
    /// Existing attributes keep their position, new ones are appended.
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.inner
            .state
            .write()
            .attributes
            .insert(name.into(), value.into())
    }

    /// Remove attribute, preserving the order of the others
    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        self.inner.state.write().attributes.shift_remove(name)
    }

    /// Snapshot of all attributes in stored order
    #[must_use]
    pub fn attributes(&self) -> IndexMap<String, String> {
        self.inner.state.read().attributes.clone()
    }

    /// Raw text content
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.inner.state.read().text.clone()
    }

    /// Set text content, returning the previous value
    pub fn set_text(&self, text: impl Into<String>) -> Option<String> {
        self.inner.state.write().text.replace(text.into())
    }

    /// Remove text content
    pub fn clear_text(&self) -> Option<String> {
        self.inner.state.write().text.take()
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Add `child` at `position`, or append when `None`
    ///
    /// A child that already has a parent is detached from it first.
    ///
    /// # Errors
    /// - `StructuralError::SelfInsertion` if `child` is this node
    /// - `StructuralError::Cycle` if `child` is an ancestor of this node
    /// - `StructuralError::PositionOutOfRange` if `position` is past the end
    pub fn add_child(&self, child: &ConfigNode, position: Option<usize>) -> Result<usize, StructuralError> {
        let placement = position.map_or(Placement::Append, Placement::At);
        let _structure = STRUCTURE.lock();
        self.link(child, placement)
    }

    /// Add `child` at its canonical position under `order`
    ///
    /// Returns the index the child was inserted at.
    ///
    /// # Errors
    /// Same as [`add_child`](Self::add_child), except position errors
    pub fn add_child_ordered(&self, child: &ConfigNode, order: &ChildrenOrder) -> Result<usize, StructuralError> {
        let _structure = STRUCTURE.lock();
        self.link(child, Placement::Ordered(order))
    }

    /// Replace all children named like `child` with `child`
    ///
    /// Returns the children that were removed.
    ///
    /// # Errors
    /// Same as [`add_child_ordered`](Self::add_child_ordered); nothing is
    /// removed when the insertion is rejected.
    pub fn set_child(&self, child: &ConfigNode, order: &ChildrenOrder) -> Result<Vec<ConfigNode>, StructuralError> {
        let _structure = STRUCTURE.lock();
        self.check_insertable(child)?;
        let removed: Vec<ConfigNode> = self
            .children_named(child.name())
            .into_iter()
            .filter(|existing| !existing.ptr_eq(child) && self.release(existing))
            .collect();
        self.link(child, Placement::Ordered(order))?;
        Ok(removed)
    }

    /// Remove `child` from this node
    ///
    /// The child becomes a detached root and loses its installed resolver.
    /// Returns `false` if `child` is not a direct child of this node.
    pub fn remove_child(&self, child: &ConfigNode) -> bool {
        let _structure = STRUCTURE.lock();
        self.release(child)
    }

    /// Remove this node from its parent
    ///
    /// Returns `false` if the node had no parent.
    pub fn detach(&self) -> bool {
        self.parent().is_some_and(|parent| parent.remove_child(self))
    }

    fn check_insertable(&self, child: &ConfigNode) -> Result<(), StructuralError> {
        if self.ptr_eq(child) {
            tracing::warn!("Rejected insertion of '{}' under itself", child.name());
            return Err(StructuralError::SelfInsertion(child.name().clone()));
        }
        if child.is_ancestor_of(self) {
            tracing::warn!(
                "Rejected insertion of '{}' under its descendant '{}'",
                child.name(),
                self.name()
            );
            return Err(StructuralError::cycle(self.name(), child.name()));
        }
        Ok(())
    }

    /// Caller holds `STRUCTURE`
    fn release(&self, child: &ConfigNode) -> bool {
        if !self.unlink(child) {
            return false;
        }
        *child.inner.parent.write() = Weak::new();
        child.inner.resolver.write().take();
        tracing::trace!("Detached '{}' from '{}'", child.name(), self.name());
        true
    }

    /// Caller holds `STRUCTURE`
    fn link(&self, child: &ConfigNode, placement: Placement<'_>) -> Result<usize, StructuralError> {
        self.check_insertable(child)?;
        let previous = child.parent();

        if let Placement::At(position) = placement {
            let moving_within = previous.as_ref().is_some_and(|p| p.ptr_eq(self));
            let len = self.child_count() - usize::from(moving_within);
            if position > len {
                return Err(StructuralError::PositionOutOfRange { position, len });
            }
        }

        if let Some(previous) = &previous {
            previous.unlink(child);
            child.inner.resolver.write().take();
        }

        let index = {
            let mut state = self.inner.state.write();
            let index = match placement {
                Placement::At(position) => position.min(state.children.len()),
                Placement::Ordered(order) => order.insertion_index(&state.children, child.name()),
                Placement::Append => state.children.len(),
            };
            state.children.insert(index, child.clone());
            index
        };
        *child.inner.parent.write() = Arc::downgrade(&self.inner);

        tracing::trace!("Attached '{}' under '{}' at {}", child.name(), self.name(), index);
        Ok(index)
    }

    fn unlink(&self, child: &ConfigNode) -> bool {
        let mut state = self.inner.state.write();
        let before = state.children.len();
        state.children.retain(|c| !c.ptr_eq(child));
        before != state.children.len()
    }

    /// Append a child known to be fresh (no parent, not an ancestor)
    pub(crate) fn adopt(&self, child: ConfigNode) {
        *child.inner.parent.write() = Arc::downgrade(&self.inner);
        self.inner.state.write().children.push(child);
    }

    // ------------------------------------------------------------------
    // Property resolution
    // ------------------------------------------------------------------

    /// Resolver installed on this node
    #[must_use]
    pub fn property_resolver(&self) -> Option<SharedResolver> {
        self.inner.resolver.read().clone()
    }

    /// Install resolver, returning the previous one
    pub fn set_property_resolver(&self, resolver: SharedResolver) -> Option<SharedResolver> {
        self.inner.resolver.write().replace(resolver)
    }

    /// Remove installed resolver
    pub fn clear_property_resolver(&self) -> Option<SharedResolver> {
        self.inner.resolver.write().take()
    }

    /// Resolver of this node or of its nearest ancestor that has one
    #[must_use]
    pub fn effective_resolver(&self) -> Option<SharedResolver> {
        std::iter::once(self.clone())
            .chain(self.ancestors())
            .find_map(|node| node.property_resolver())
    }

    /// Resolver over this node's own declarations
    ///
    /// Created by `init` on first use and cached for the node's lifetime, so
    /// every caller gets the identical instance.
    pub fn scope_resolver<F>(&self, init: F) -> SharedResolver
    where
        F: FnOnce(WeakConfigNode) -> SharedResolver,
    {
        Arc::clone(self.inner.scope.get_or_init(|| init(self.downgrade())))
    }
}

impl PartialEq for ConfigNode {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ConfigNode {}

impl Hash for ConfigNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

impl Debug for ConfigNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("ConfigNode")
            .field("name", &self.inner.name)
            .field("attributes", &state.attributes)
            .field("text", &state.text)
            .field("children", &state.children)
            .finish()
    }
}

impl WeakConfigNode {
    /// Upgrade to a strong handle if the node is still alive
    #[inline]
    #[must_use]
    pub fn upgrade(&self) -> Option<ConfigNode> {
        self.inner.upgrade().map(|inner| ConfigNode { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confmodel_property::{MapResolver, PropertyResolver};

    fn node(local: &str) -> ConfigNode {
        ConfigNode::new(QName::unqualified(local))
    }

    #[test]
    fn add_child_sets_parent() {
        let parent = node("parent");
        let child = node("child");
        parent.add_child(&child, None).unwrap();

        assert_eq!(child.parent(), Some(parent.clone()));
        assert_eq!(parent.children_named(child.name()), vec![child]);
    }

    #[test]
    fn add_child_at_position() {
        let parent = node("p");
        let a = node("a");
        let b = node("b");
        let c = node("c");
        parent.add_child(&a, None).unwrap();
        parent.add_child(&c, None).unwrap();
        assert_eq!(parent.add_child(&b, Some(1)).unwrap(), 1);

        let names: Vec<_> = parent.children().iter().map(|n| n.name().local_name().to_string()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn add_child_position_out_of_range() {
        let parent = node("p");
        let result = parent.add_child(&node("a"), Some(1));
        assert!(matches!(result, Err(StructuralError::PositionOutOfRange { position: 1, len: 0 })));
        assert_eq!(parent.child_count(), 0);
    }

    #[test]
    fn reparenting_moves() {
        let old = node("old");
        let new = node("new");
        let child = node("child");
        old.add_child(&child, None).unwrap();
        new.add_child(&child, None).unwrap();

        assert_eq!(old.child_count(), 0);
        assert_eq!(new.child_count(), 1);
        assert_eq!(child.parent(), Some(new));
    }

    #[test]
    fn moving_within_same_parent() {
        let parent = node("p");
        let a = node("a");
        let b = node("b");
        parent.add_child(&a, None).unwrap();
        parent.add_child(&b, None).unwrap();
        parent.add_child(&a, Some(1)).unwrap();

        assert_eq!(parent.children(), vec![b, a]);
    }

    #[test]
    fn self_insertion_rejected() {
        let n = node("n");
        assert!(matches!(n.add_child(&n, None), Err(StructuralError::SelfInsertion(_))));
    }

    #[test]
    fn cycle_rejected() {
        let a = node("a");
        let b = node("b");
        let c = node("c");
        a.add_child(&b, None).unwrap();
        b.add_child(&c, None).unwrap();

        assert!(matches!(c.add_child(&a, None), Err(StructuralError::Cycle { .. })));
        assert_eq!(a.parent(), None);
        assert_eq!(c.child_count(), 0);
    }

    #[test]
    fn remove_child_detaches() {
        let parent = node("p");
        let child = node("c");
        parent.add_child(&child, None).unwrap();

        assert!(parent.remove_child(&child));
        assert!(!parent.remove_child(&child));
        assert_eq!(child.parent(), None);
    }

    #[test]
    fn detach_from_parent() {
        let parent = node("p");
        let child = node("c");
        parent.add_child(&child, None).unwrap();

        assert!(child.detach());
        assert!(!child.detach());
        assert_eq!(parent.child_count(), 0);
    }

    #[test]
    fn parent_link_is_weak() {
        let child = node("c");
        {
            let parent = node("p");
            parent.add_child(&child, None).unwrap();
            assert!(child.parent().is_some());
        }
        assert_eq!(child.parent(), None);
    }

    #[test]
    fn ancestors_and_root() {
        let a = node("a");
        let b = node("b");
        let c = node("c");
        a.add_child(&b, None).unwrap();
        b.add_child(&c, None).unwrap();

        assert_eq!(c.ancestors().collect::<Vec<_>>(), vec![b.clone(), a.clone()]);
        assert_eq!(c.root(), a);
        assert_eq!(a.root(), a);
        assert!(a.is_ancestor_of(&c));
        assert!(!c.is_ancestor_of(&a));
        assert!(!a.is_ancestor_of(&a));
    }

    #[test]
    fn attributes_keep_order() {
        let n = node("n").with_attribute("b", "1").with_attribute("a", "2");
        n.set_attribute("b", "3");
        let keys: Vec<_> = n.attributes().keys().cloned().collect();
        assert_eq!(keys, ["b", "a"]);

        assert_eq!(n.remove_attribute("b").as_deref(), Some("3"));
        assert_eq!(n.attribute("b"), None);
        assert_eq!(n.attribute("a").as_deref(), Some("2"));
    }

    #[test]
    fn text_content() {
        let n = node("n").with_text("hello");
        assert_eq!(n.text().as_deref(), Some("hello"));
        assert_eq!(n.clear_text().as_deref(), Some("hello"));
        assert_eq!(n.text(), None);
    }

    #[test]
    fn set_child_replaces_same_name() {
        let order = ChildrenOrder::new([QName::unqualified("a"), QName::unqualified("b")]);
        let parent = node("p");
        let old = node("b");
        parent.add_child_ordered(&old, &order).unwrap();
        parent.add_child_ordered(&node("a"), &order).unwrap();

        let replacement = node("b");
        let removed = parent.set_child(&replacement, &order).unwrap();

        assert_eq!(removed, vec![old.clone()]);
        assert_eq!(old.parent(), None);
        assert_eq!(parent.index_of(&replacement), Some(1));
    }

    #[test]
    fn effective_resolver_walks_up() {
        let root = node("root");
        let mid = node("mid");
        let leaf = node("leaf");
        root.add_child(&mid, None).unwrap();
        mid.add_child(&leaf, None).unwrap();

        assert!(leaf.effective_resolver().is_none());

        root.set_property_resolver(Arc::new(MapResolver::new().with("k", "root")));
        let resolved = leaf.effective_resolver().and_then(|r| r.resolve("k"));
        assert_eq!(resolved.as_deref(), Some("root"));
    }

    #[test]
    fn detaching_drops_installed_resolver() {
        let parent = node("p");
        let child = node("c");
        parent.add_child(&child, None).unwrap();
        child.set_property_resolver(Arc::new(MapResolver::new()));

        parent.remove_child(&child);
        assert!(child.property_resolver().is_none());
    }

    #[test]
    fn fresh_node_keeps_resolver_when_attached() {
        let parent = node("p");
        let child = node("c");
        child.set_property_resolver(Arc::new(MapResolver::new()));
        parent.add_child(&child, None).unwrap();
        assert!(child.property_resolver().is_some());
    }

    #[test]
    fn scope_resolver_is_cached() {
        let n = node("n");
        let first = n.scope_resolver(|_| Arc::new(MapResolver::new()));
        let second = n.scope_resolver(|_| Arc::new(MapResolver::new().with("other", "x")));
        assert!(confmodel_property::same_resolver(&first, &second));
    }

    #[test]
    fn identity_equality() {
        let a = node("same");
        let b = node("same");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.downgrade().upgrade(), Some(a));
    }
}
