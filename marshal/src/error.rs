//! Marshal error types.

use ogm_core::ModelError;
use thiserror::Error;

/// Result type for marshal operations.
pub type MarshalResult<T> = Result<T, MarshalError>;

/// Errors that can occur while converting vertices and payloads.
#[derive(Debug, Error)]
pub enum MarshalError {
    #[error("Unknown type: {name}")]
    UnknownType { name: String },

    #[error("Undeclared edge: {edge} on type {type_name}")]
    UndeclaredEdge { type_name: String, edge: String },

    #[error("Edge {edge} element is not an object: {found}")]
    ExpectedObject { edge: String, found: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl MarshalError {
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }

    pub fn undeclared_edge(type_name: impl Into<String>, edge: impl Into<String>) -> Self {
        Self::UndeclaredEdge {
            type_name: type_name.into(),
            edge: edge.into(),
        }
    }

    pub fn expected_object(edge: impl Into<String>, found: &serde_json::Value) -> Self {
        Self::ExpectedObject {
            edge: edge.into(),
            found: found.to_string(),
        }
    }
}
