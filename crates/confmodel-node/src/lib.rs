//! Confmodel Configuration Tree
//!
//! A mutable tree of named elements with attributes, text and ordered
//! children, shared safely between threads.
//!
//! # Core Concepts
//!
//! - [`ConfigNode`]: Shared handle to one element; parents own children
//! - [`QName`]: Namespace plus local name identifying an element
//! - [`ChildrenOrder`]: Canonical child ordering for a node type
//! - [`NodeSnapshot`]: Owned copy of a subtree for inspection and serialization
//!
//! # Example
//!
//! ```rust
//! use confmodel_node::{ChildrenOrder, ConfigNode, QName};
//!
//! let order = ChildrenOrder::new([QName::unqualified("service"), QName::unqualified("property")]);
//! let component = ConfigNode::new(QName::unqualified("component"));
//!
//! component.add_child_ordered(&ConfigNode::new(QName::unqualified("property")), &order).unwrap();
//! let index = component.add_child_ordered(&ConfigNode::new(QName::unqualified("service")), &order).unwrap();
//!
//! assert_eq!(index, 0);
//! assert!(order.is_satisfied_by(&component.children()));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod node;
mod order;
mod qname;
mod snapshot;

pub use error::StructuralError;
pub use node::{ConfigNode, WeakConfigNode};
pub use order::ChildrenOrder;
pub use qname::{QName, QNameError};
pub use snapshot::NodeSnapshot;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
