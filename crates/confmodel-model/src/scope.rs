//! Property declaration scopes
//!
//! A scope resolves keys against the `property` children declared directly
//! under one node. Chains are assembled from scopes with
//! [`compact`](confmodel_property::compact), nearest scope first.

use crate::names::{NAME_ATTR, PROPERTY_LOCAL, VALUE_ATTR};
use confmodel_node::{ConfigNode, WeakConfigNode};
use confmodel_property::{PropertyResolver, SharedResolver};
use std::sync::Arc;

/// Resolver over one node's own property declarations
///
/// Reads the live tree on every lookup, so declarations added after the
/// chain was built are visible without rebuilding it. Holds the node
/// weakly; once the node is gone every lookup misses.
#[derive(Debug)]
pub struct PropertyScope {
    node: WeakConfigNode,
}

impl PropertyScope {
    /// Create scope over `node`
    #[must_use]
    pub fn new(node: WeakConfigNode) -> Self {
        Self { node }
    }

    /// Value declared for `key` directly under `node`
    ///
    /// Later declarations override earlier ones. The value comes from the
    /// `value` attribute, falling back to the element text.
    #[must_use]
    pub fn declared(node: &ConfigNode, key: &str) -> Option<String> {
        node.children()
            .into_iter()
            .rev()
            .filter(|c| c.name().local_name() == PROPERTY_LOCAL)
            .find(|c| c.attribute(NAME_ATTR).as_deref() == Some(key))
            .and_then(|c| c.attribute(VALUE_ATTR).or_else(|| c.text()))
    }
}

impl PropertyResolver for PropertyScope {
    fn resolve(&self, key: &str) -> Option<String> {
        self.node.upgrade().and_then(|node| Self::declared(&node, key))
    }
}

/// Scope resolver of `node`
///
/// Created on first use and cached on the node, so every model wrapping the
/// same node contributes the identical resolver to its chain.
#[must_use]
pub fn scope_of(node: &ConfigNode) -> SharedResolver {
    node.scope_resolver(|weak| Arc::new(PropertyScope::new(weak)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use confmodel_node::QName;
    use confmodel_property::same_resolver;

    fn property(name: &str, value: &str) -> ConfigNode {
        ConfigNode::new(QName::new("urn:t", PROPERTY_LOCAL)).with_attribute(NAME_ATTR, name).with_attribute(VALUE_ATTR, value)
    }

    #[test]
    fn resolves_direct_declarations_only() {
        let outer = ConfigNode::new(QName::unqualified("outer"));
        let inner = ConfigNode::new(QName::unqualified("inner"));
        outer.add_child(&property("a", "1"), None).unwrap();
        outer.add_child(&inner, None).unwrap();
        inner.add_child(&property("b", "2"), None).unwrap();

        let scope = scope_of(&outer);
        assert_eq!(scope.resolve("a").as_deref(), Some("1"));
        assert_eq!(scope.resolve("b"), None);
    }

    #[test]
    fn text_value_and_override() {
        let node = ConfigNode::new(QName::unqualified("n"));
        let text = ConfigNode::new(QName::new("urn:other", PROPERTY_LOCAL))
            .with_attribute(NAME_ATTR, "t")
            .with_text("from-text");
        node.add_child(&text, None).unwrap();
        node.add_child(&property("dup", "first"), None).unwrap();
        node.add_child(&property("dup", "second"), None).unwrap();

        let scope = scope_of(&node);
        assert_eq!(scope.resolve("t").as_deref(), Some("from-text"));
        assert_eq!(scope.resolve("dup").as_deref(), Some("second"));
    }

    #[test]
    fn sees_later_declarations() {
        let node = ConfigNode::new(QName::unqualified("n"));
        let scope = scope_of(&node);
        assert_eq!(scope.resolve("late"), None);

        node.add_child(&property("late", "yes"), None).unwrap();
        assert_eq!(scope.resolve("late").as_deref(), Some("yes"));
    }

    #[test]
    fn cached_per_node() {
        let node = ConfigNode::new(QName::unqualified("n"));
        assert!(same_resolver(&scope_of(&node), &scope_of(&node)));
        assert!(!same_resolver(&scope_of(&node), &scope_of(&node.deep_copy())));
    }
}
