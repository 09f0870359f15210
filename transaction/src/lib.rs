//! OGM Transaction
//!
//! One logical unit of work against the backing graph store.
//!
//! Responsibilities:
//! - Define the store boundary (`Store`, `StoreTxn`, mutations, responses)
//! - Issue query, mutate, upsert and delete requests through one store handle
//! - Absorb transaction conflicts with a bounded, fixed-backoff retry
//! - Track the Open → Committed | Discarded lifecycle
//!
//! A `Transaction` takes `&mut self` for every store call, so calls on one
//! instance are serialized. Create one Transaction per concurrent unit of work.

mod config;
mod error;
mod nquad;
mod store;
mod transaction;

#[cfg(test)]
mod testing;

pub use config::{OgmConfig, RetryPolicy};
pub use error::{StoreError, StoreResult, TransactionError, TransactionResult};
pub use nquad::NquadObject;
pub use store::{Mutation, Operation, Request, Response, Store, StoreTxn, Vars, RETRY_MARKER};
pub use transaction::{Transaction, TxnState};
