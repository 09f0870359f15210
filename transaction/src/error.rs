//! Store and transaction error types.

use thiserror::Error;

use crate::store::RETRY_MARKER;
use crate::transaction::TxnState;

/// A failure reported by the backing store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("store error: {message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Whether the store signalled a conflict the caller may retry.
    ///
    /// This is a textual contract: the message must contain the retry marker.
    pub fn is_retryable(&self) -> bool {
        self.message.contains(RETRY_MARKER)
    }
}

/// Result type for store calls.
pub type StoreResult<T> = Result<T, StoreError>;

/// Transaction errors.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The store rejected the request, after any retries.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The transaction already reached a terminal state.
    #[error("transaction {id} is {state}")]
    NotOpen { id: u64, state: TxnState },

    /// A write was issued on a read-only transaction.
    #[error("transaction {id} is read-only")]
    ReadOnly { id: u64 },
}

impl TransactionError {
    pub fn not_open(id: u64, state: TxnState) -> Self {
        Self::NotOpen { id, state }
    }

    /// The underlying store error, if any.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for transaction operations.
pub type TransactionResult<T> = Result<T, TransactionError>;
