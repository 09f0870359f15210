//! Common error types for OGM.

use thiserror::Error;

/// Errors raised by the in-memory entity model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A field name cannot be used as a predicate.
    #[error("Invalid field name {name}: {reason}")]
    InvalidFieldName { name: String, reason: String },

    /// An edge value does not have the shape the declaration requires.
    #[error("Edge {edge} expects {expected} cardinality")]
    CardinalityMismatch { edge: String, expected: String },
}

impl ModelError {
    pub fn invalid_field_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFieldName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn cardinality_mismatch(edge: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::CardinalityMismatch {
            edge: edge.into(),
            expected: expected.into(),
        }
    }
}

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
