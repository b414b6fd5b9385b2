//! Error types for tree mutation

use crate::qname::QName;

/// Rejected tree mutations
///
/// Always surfaced to the caller of the mutating operation; the tree is left
/// unchanged.
#[derive(Debug, thiserror::Error)]
pub enum StructuralError {
    /// Node added beneath itself
    #[error("cannot add '{0}' as a child of itself")]
    SelfInsertion(QName),

    /// Node added beneath one of its own descendants
    #[error("adding '{child}' under '{parent}' would create a cycle")]
    Cycle { parent: QName, child: QName },

    /// Explicit position past the end of the child list
    #[error("child position {position} out of range (len {len})")]
    PositionOutOfRange { position: usize, len: usize },
}

impl StructuralError {
    /// Create cycle error
    pub fn cycle(parent: &QName, child: &QName) -> Self {
        Self::Cycle {
            parent: parent.clone(),
            child: child.clone(),
        }
    }
}
