//! Owned, serializable copies of configuration subtrees

use crate::node::ConfigNode;
use crate::qname::QName;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Detached value copy of a node and its descendants
///
/// Holds no locks and no back-references, so it can be inspected, compared
/// and serialized freely while the live tree keeps changing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Qualified name
    pub name: QName,
    /// Attributes in stored order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
    /// Text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Children in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    /// Create leaf snapshot
    #[must_use]
    pub fn new(name: QName) -> Self {
        Self {
            name,
            attributes: IndexMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// With attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// With text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// With appended child
    #[must_use]
    pub fn with_child(mut self, child: NodeSnapshot) -> Self {
        self.children.push(child);
        self
    }

    /// Total number of nodes in this subtree
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NodeSnapshot::node_count).sum::<usize>()
    }
}

impl ConfigNode {
    /// Copy this subtree into a [`NodeSnapshot`]
    ///
    /// Each node is read under its own lock; a subtree mutated concurrently
    /// may yield a mix of before and after states across different nodes.
    #[must_use]
    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            name: self.name().clone(),
            attributes: self.attributes(),
            text: self.text(),
            children: self.children().iter().map(ConfigNode::snapshot).collect(),
        }
    }

    /// Build a fresh detached tree from a snapshot
    #[must_use]
    pub fn from_snapshot(snapshot: &NodeSnapshot) -> Self {
        let node = Self::new(snapshot.name.clone());
        for (name, value) in &snapshot.attributes {
            node.set_attribute(name.clone(), value.clone());
        }
        if let Some(text) = &snapshot.text {
            node.set_text(text.clone());
        }
        for child in &snapshot.children {
            node.adopt(Self::from_snapshot(child));
        }
        node
    }

    /// Structural copy of this subtree with no parent and no resolvers
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        Self::from_snapshot(&self.snapshot())
    }
}
