//! Transaction over one store handle, with conflict retry.

use ogm_core::predicate::{blank_node, is_blank_node, ID_PREDICATE, PLACEHOLDER};
use ogm_core::Payload;
use serde_json::Value as Json;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::RetryPolicy;
use crate::error::{StoreError, TransactionError, TransactionResult};
use crate::nquad::{statement, NquadObject};
use crate::store::{Mutation, Request, Response, Store, StoreTxn, Vars};

static NEXT_TXN_ID: AtomicU64 = AtomicU64::new(1);

/// Transaction lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnState {
    /// Accepting operations.
    Open,
    /// Committed, explicitly or by an auto-commit write.
    Committed,
    /// Discarded by the caller.
    Discarded,
    /// Discarded after a permanent failure or an exhausted retry budget.
    Failed,
}

impl fmt::Display for TxnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxnState::Open => write!(f, "open"),
            TxnState::Committed => write!(f, "committed"),
            TxnState::Discarded => write!(f, "discarded"),
            TxnState::Failed => write!(f, "discarded after failure"),
        }
    }
}

/// Kind of handle a retry opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    ReadOnly,
    ReadWrite,
}

/// Retry progress of one logical operation.
#[derive(Debug, Clone, Copy, Default)]
struct Attempt {
    retries: u32,
}

impl Attempt {
    fn next(self) -> Self {
        Self {
            retries: self.retries + 1,
        }
    }
}

/// One logical unit of work against the store.
///
/// On a retryable failure the stale handle is discarded and replaced while
/// the Transaction itself is reused. Every operation borrows `&mut self`, so
/// concurrent calls on one instance are impossible.
pub struct Transaction {
    id: u64,
    auto_commit: bool,
    read_only: bool,
    store: Arc<dyn Store>,
    handle: Box<dyn StoreTxn>,
    access: Access,
    policy: RetryPolicy,
    state: TxnState,
}

impl Transaction {
    /// Open a transaction with a fresh store handle.
    pub fn new(store: Arc<dyn Store>, auto_commit: bool, read_only: bool, policy: RetryPolicy) -> Self {
        let id = NEXT_TXN_ID.fetch_add(1, Ordering::Relaxed);
        let handle = store.new_txn(read_only);
        debug!(txn = id, auto_commit, read_only, "transaction opened");
        Self {
            id,
            auto_commit,
            read_only,
            store,
            handle,
            access: if read_only { Access::ReadOnly } else { Access::ReadWrite },
            policy,
            state: TxnState::Open,
        }
    }

    /// Correlation id used in log records.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> TxnState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == TxnState::Open
    }

    pub fn is_auto_commit(&self) -> bool {
        self.auto_commit
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    // ========== Reads ==========

    /// Run a query and return the result blocks.
    pub async fn query(&mut self, text: &str, vars: &Vars) -> TransactionResult<Json> {
        self.ensure_open()?;
        let mut attempt = Attempt::default();
        loop {
            debug!(txn = self.id, retries = attempt.retries, "query");
            match self.handle.query(text, vars).await {
                Ok(response) => return Ok(response.json),
                Err(err) => attempt = self.recover(attempt, err, Access::ReadOnly).await?,
            }
        }
    }

    // ========== Writes ==========

    /// Write a JSON payload and return the id of its subject.
    ///
    /// A payload without an id is written as the placeholder blank node. The
    /// store's allocation for the placeholder wins; otherwise the payload's
    /// own id is returned.
    pub async fn mutate(&mut self, mut payload: Payload) -> TransactionResult<Option<String>> {
        self.ensure_writable().await?;

        let existing = match payload.get(ID_PREDICATE).and_then(Json::as_str) {
            Some(id) if !id.is_empty() => Some(id.to_string()).filter(|id| !is_blank_node(id)),
            _ => {
                payload.insert(ID_PREDICATE.to_string(), Json::String(blank_node()));
                None
            }
        };

        let mutation = Mutation::set(Json::Object(payload)).commit_now(self.auto_commit);
        let response = self.write(mutation).await?;
        Ok(response.uids.get(PLACEHOLDER).cloned().or(existing))
    }

    /// Add one `<subject> <predicate> object` triple. A missing or null object is a no-op.
    ///
    /// Not retried: a failure discards the handle and propagates.
    pub async fn mutate_nquads(
        &mut self,
        subject: &str,
        predicate: &str,
        object: Option<NquadObject>,
    ) -> TransactionResult<Option<String>> {
        let Some(object) = object.filter(|o| !o.is_null()) else {
            return Ok(None);
        };
        self.ensure_writable().await?;
        let mutation =
            Mutation::set_nquads(statement(subject, predicate, &object)).commit_now(self.auto_commit);
        self.write_once(mutation).await?;
        Ok(Some(subject.to_string()))
    }

    /// Remove one `<subject> <predicate> object` triple. A missing or null object is a no-op.
    pub async fn delete_nquads(
        &mut self,
        subject: &str,
        predicate: &str,
        object: Option<NquadObject>,
    ) -> TransactionResult<Option<String>> {
        let Some(object) = object.filter(|o| !o.is_null()) else {
            return Ok(None);
        };
        self.ensure_writable().await?;
        let mutation =
            Mutation::del_nquads(statement(subject, predicate, &object)).commit_now(self.auto_commit);
        self.write_once(mutation).await?;
        Ok(Some(subject.to_string()))
    }

    /// Delete a node (`{"uid": ..}`) or a list of nodes.
    ///
    /// Values with neither an id nor any element are a no-op.
    pub async fn delete(&mut self, values: Json) -> TransactionResult<Option<String>> {
        let id = values
            .get(ID_PREDICATE)
            .and_then(Json::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        let batch = values.as_array().is_some_and(|items| !items.is_empty());
        if id.is_none() && !batch {
            return Ok(None);
        }

        self.ensure_writable().await?;
        let mutation = Mutation::delete(values).commit_now(self.auto_commit);
        self.write(mutation).await?;
        Ok(id)
    }

    /// Run a query and a conditional write in one committed request.
    pub async fn upsert(
        &mut self,
        query: &str,
        values: Payload,
        condition: Option<&str>,
    ) -> TransactionResult<bool> {
        self.ensure_writable().await?;

        let mut mutation = Mutation::set(Json::Object(values));
        if let Some(cond) = condition {
            mutation = mutation.with_cond(guard_clause(cond));
        }
        let request = Request {
            query: query.to_string(),
            vars: Vars::new(),
            mutations: vec![mutation],
            commit_now: true,
        };

        let mut attempt = Attempt::default();
        loop {
            debug!(txn = self.id, retries = attempt.retries, "upsert");
            match self.handle.request(request.clone()).await {
                Ok(_) => {
                    self.mark_committed();
                    return Ok(true);
                }
                Err(err) => attempt = self.recover(attempt, err, Access::ReadWrite).await?,
            }
        }
    }

    // ========== Lifecycle ==========

    pub async fn commit(&mut self) -> TransactionResult<()> {
        self.ensure_open()?;
        match self.handle.commit().await {
            Ok(()) => {
                self.mark_committed();
                Ok(())
            }
            Err(err) => Err(self.fail(err).await),
        }
    }

    /// Discard the transaction. A no-op once it reached a terminal state.
    pub async fn discard(&mut self) -> TransactionResult<()> {
        if !self.is_open() {
            return Ok(());
        }
        self.state = TxnState::Discarded;
        debug!(txn = self.id, "discard");
        self.handle.discard().await?;
        Ok(())
    }

    // ========== Internals ==========

    fn ensure_open(&self) -> TransactionResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(TransactionError::not_open(self.id, self.state))
        }
    }

    /// Writes need an open read-write transaction. A read-only handle left
    /// behind by a query retry is swapped for a read-write one.
    async fn ensure_writable(&mut self) -> TransactionResult<()> {
        self.ensure_open()?;
        if self.read_only {
            return Err(TransactionError::ReadOnly { id: self.id });
        }
        if self.access == Access::ReadOnly {
            self.discard_quietly().await;
            self.handle = self.store.new_txn(false);
            self.access = Access::ReadWrite;
        }
        Ok(())
    }

    /// Issue a mutation under the retry policy.
    async fn write(&mut self, mutation: Mutation) -> TransactionResult<Response> {
        let mut attempt = Attempt::default();
        loop {
            debug!(txn = self.id, retries = attempt.retries, "mutate");
            match self.handle.mutate(mutation.clone()).await {
                Ok(response) => {
                    if mutation.commit_now {
                        self.mark_committed();
                    }
                    return Ok(response);
                }
                Err(err) => attempt = self.recover(attempt, err, Access::ReadWrite).await?,
            }
        }
    }

    /// Issue a mutation once.
    async fn write_once(&mut self, mutation: Mutation) -> TransactionResult<Response> {
        debug!(txn = self.id, "mutate nquads");
        let commit_now = mutation.commit_now;
        match self.handle.mutate(mutation).await {
            Ok(response) => {
                if commit_now {
                    self.mark_committed();
                }
                Ok(response)
            }
            Err(err) => Err(self.fail(err).await),
        }
    }

    /// The retry step: discard the stale handle, then either open a fresh one
    /// and hand back the next attempt, or give up with the original error.
    async fn recover(
        &mut self,
        attempt: Attempt,
        err: StoreError,
        access: Access,
    ) -> TransactionResult<Attempt> {
        if !(err.is_retryable() && self.policy.allows(attempt.retries)) {
            return Err(self.fail(err).await);
        }

        self.discard_quietly().await;
        let next = attempt.next();
        warn!(txn = self.id, retry = next.retries, error = %err, "retrying after conflict");
        self.handle = self.store.new_txn(access == Access::ReadOnly);
        self.access = access;
        tokio::time::sleep(self.policy.backoff).await;
        Ok(next)
    }

    async fn fail(&mut self, err: StoreError) -> TransactionError {
        self.discard_quietly().await;
        self.state = TxnState::Failed;
        debug!(txn = self.id, error = %err, "transaction failed");
        err.into()
    }

    /// Discard the current handle; a failure here must not mask the caller's error.
    async fn discard_quietly(&mut self) {
        if let Err(err) = self.handle.discard().await {
            debug!(txn = self.id, error = %err, "discard failed");
        }
    }

    fn mark_committed(&mut self) {
        self.state = TxnState::Committed;
        debug!(txn = self.id, "committed");
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("auto_commit", &self.auto_commit)
            .field("read_only", &self.read_only)
            .field("state", &self.state)
            .finish()
    }
}

/// Wrap a bare condition as a store guard clause.
fn guard_clause(cond: &str) -> String {
    let cond = cond.trim();
    if cond.starts_with("@if") {
        cond.to_string()
    } else {
        format!("@if({})", cond)
    }
}
