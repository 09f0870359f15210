//! The backing store boundary.
//!
//! The store is a black box: it accepts query text with named variables,
//! JSON or N-Quad mutations, and schema alterations. Reads answer with one
//! JSON object keyed by the query's named blocks; writes answer with the ids
//! the store allocated for blank nodes.

use async_trait::async_trait;
use serde_json::Value as Json;
use std::collections::HashMap;

use crate::error::StoreResult;

/// Substring a store error message carries when the write may be retried.
pub const RETRY_MARKER: &str = "retry";

/// Named query variables (`$id` → `0x1`).
pub type Vars = HashMap<String, String>;

/// A schema-level alteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Predicate and type declarations.
    Schema(String),
    /// Remove every node, predicate and schema entry.
    DropAll,
}

/// One write against the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mutation {
    pub set_json: Option<Json>,
    pub delete_json: Option<Json>,
    pub set_nquads: Option<String>,
    pub del_nquads: Option<String>,
    /// Guard clause (`@if(...)`) evaluated against an upsert query.
    pub cond: Option<String>,
    pub commit_now: bool,
}

impl Mutation {
    pub fn set(payload: Json) -> Self {
        Self {
            set_json: Some(payload),
            ..Default::default()
        }
    }

    pub fn delete(payload: Json) -> Self {
        Self {
            delete_json: Some(payload),
            ..Default::default()
        }
    }

    pub fn set_nquads(statement: impl Into<String>) -> Self {
        Self {
            set_nquads: Some(statement.into()),
            ..Default::default()
        }
    }

    pub fn del_nquads(statement: impl Into<String>) -> Self {
        Self {
            del_nquads: Some(statement.into()),
            ..Default::default()
        }
    }

    pub fn with_cond(mut self, cond: impl Into<String>) -> Self {
        self.cond = Some(cond.into());
        self
    }

    pub fn commit_now(mut self, commit_now: bool) -> Self {
        self.commit_now = commit_now;
        self
    }
}

/// A query combined with conditional mutations (upsert block).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    pub query: String,
    pub vars: Vars,
    pub mutations: Vec<Mutation>,
    pub commit_now: bool,
}

/// The store's answer to a query, mutation or request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    /// Query results keyed by block name.
    pub json: Json,
    /// Ids allocated for blank nodes, keyed by blank-node name.
    pub uids: HashMap<String, String>,
}

/// A transactional client for the backing store.
#[async_trait]
pub trait Store: Send + Sync {
    /// Open a fresh transaction handle.
    fn new_txn(&self, read_only: bool) -> Box<dyn StoreTxn>;

    /// Apply a schema alteration.
    async fn alter(&self, operation: Operation) -> StoreResult<()>;

    /// Release the transport.
    async fn close(&self) -> StoreResult<()>;
}

/// One underlying store transaction.
#[async_trait]
pub trait StoreTxn: Send {
    async fn query(&mut self, text: &str, vars: &Vars) -> StoreResult<Response>;

    async fn mutate(&mut self, mutation: Mutation) -> StoreResult<Response>;

    async fn request(&mut self, request: Request) -> StoreResult<Response>;

    async fn commit(&mut self) -> StoreResult<()>;

    async fn discard(&mut self) -> StoreResult<()>;
}
