//! Canonical children ordering
//!
//! A [`ChildrenOrder`] lists the child names a node type accepts, in schema
//! order. New children are inserted at their canonical position instead of
//! being appended, so the tree never needs a full re-sort.

use crate::node::ConfigNode;
use crate::qname::QName;

/// Declared ordering of child element names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildrenOrder {
    names: Vec<QName>,
}

impl ChildrenOrder {
    /// Create ordering from names, first name sorts first
    #[must_use]
    pub fn new<I>(names: I) -> Self
    where
        I: IntoIterator<Item = QName>,
    {
        Self {
            names: names.into_iter().collect(),
        }
    }

    /// Ordering that accepts nothing, every child is appended
    #[inline]
    #[must_use]
    pub fn unordered() -> Self {
        Self::default()
    }

    /// Position of `name` in the declared order
    #[inline]
    #[must_use]
    pub fn rank(&self, name: &QName) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Index at which a child named `name` belongs among `existing`
    ///
    /// The new child goes right before the first existing child whose name
    /// ranks later, which puts it after every existing child of the same
    /// name. Names outside the declared order are appended, and existing
    /// children with undeclared names never stop the scan.
    #[must_use]
    pub fn insertion_index(&self, existing: &[ConfigNode], name: &QName) -> usize {
        let Some(rank) = self.rank(name) else {
            return existing.len();
        };
        existing
            .iter()
            .position(|child| self.rank(child.name()).is_some_and(|r| r > rank))
            .unwrap_or(existing.len())
    }

    /// Check that declared children appear in canonical order
    #[must_use]
    pub fn is_satisfied_by(&self, children: &[ConfigNode]) -> bool {
        let ranks: Vec<usize> = children.iter().filter_map(|c| self.rank(c.name())).collect();
        ranks.windows(2).all(|w| w[0] <= w[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(locals: &[&str]) -> Vec<QName> {
        locals.iter().map(|l| QName::unqualified(*l)).collect()
    }

    fn nodes(locals: &[&str]) -> Vec<ConfigNode> {
        names(locals).into_iter().map(ConfigNode::new).collect()
    }

    fn order() -> ChildrenOrder {
        ChildrenOrder::new(names(&["service", "reference", "component", "property"]))
    }

    #[test]
    fn rank_of_declared_and_undeclared() {
        let order = order();
        assert_eq!(order.rank(&QName::unqualified("service")), Some(0));
        assert_eq!(order.rank(&QName::unqualified("property")), Some(3));
        assert_eq!(order.rank(&QName::unqualified("extension")), None);
    }

    #[test]
    fn inserts_before_later_names() {
        let existing = nodes(&["component", "property"]);
        assert_eq!(order().insertion_index(&existing, &QName::unqualified("service")), 0);
        assert_eq!(order().insertion_index(&existing, &QName::unqualified("reference")), 0);
    }

    #[test]
    fn same_name_goes_after_last_of_group() {
        let existing = nodes(&["service", "service", "component"]);
        assert_eq!(order().insertion_index(&existing, &QName::unqualified("service")), 2);
    }

    #[test]
    fn undeclared_name_is_appended() {
        let existing = nodes(&["service", "component"]);
        assert_eq!(order().insertion_index(&existing, &QName::unqualified("extension")), 2);
    }

    #[test]
    fn undeclared_existing_children_are_skipped() {
        let existing = nodes(&["service", "extension", "property"]);
        assert_eq!(order().insertion_index(&existing, &QName::unqualified("component")), 2);
    }

    #[test]
    fn unordered_appends() {
        let existing = nodes(&["b", "a"]);
        assert_eq!(ChildrenOrder::unordered().insertion_index(&existing, &QName::unqualified("a")), 2);
    }

    #[test]
    fn satisfied_by() {
        assert!(order().is_satisfied_by(&nodes(&["service", "x", "component", "property"])));
        assert!(!order().is_satisfied_by(&nodes(&["property", "service"])));
    }
}
