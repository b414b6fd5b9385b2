//! Error types for the model layer
//!
//! Unrecognized elements and unresolved placeholders are not errors; only
//! rejected mutations and misconfigured marshallers surface here.

use confmodel_node::{QName, StructuralError};

/// Errors raised by model construction and mutation
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Tree mutation rejected
    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// Factory handed a node with a name its model type does not accept
    #[error("expected element '{expected}', found '{actual}'")]
    NameMismatch { expected: QName, actual: QName },

    /// Child model written while its node already has a parent
    #[error("element '{name}' is already attached to a parent")]
    AlreadyAttached { name: QName },
}

impl ModelError {
    /// Create name mismatch error
    pub fn name_mismatch(expected: &QName, actual: &QName) -> Self {
        Self::NameMismatch {
            expected: expected.clone(),
            actual: actual.clone(),
        }
    }
}

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;
