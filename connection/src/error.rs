//! Connection error types.

use ogm_transaction::{StoreError, TransactionError};
use thiserror::Error;

/// Errors from connection-level store calls.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

/// Result type for connection operations.
pub type ConnectionResult<T> = Result<T, ConnectionError>;
