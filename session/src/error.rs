//! Session error types.

use ogm_connection::ConnectionError;
use ogm_marshal::MarshalError;
use ogm_registry::HookError;
use ogm_transaction::TransactionError;
use thiserror::Error;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The verb needs a stored vertex.
    #[error("{operation} requires a vertex with an id")]
    MissingId { operation: &'static str },

    /// Expansion depth outside 1..=10.
    #[error("invalid expansion depth: {0}")]
    InvalidDepth(u32),

    #[error("unknown type: {name}")]
    UnknownType { name: String },

    #[error("marshal error: {0}")]
    Marshal(#[from] MarshalError),

    #[error("transaction error: {0}")]
    Transaction(#[from] TransactionError),

    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Hook(#[from] HookError),
}

impl SessionError {
    pub fn missing_id(operation: &'static str) -> Self {
        Self::MissingId { operation }
    }

    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
