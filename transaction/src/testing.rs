//! A scripted store for exercising the retry and lifecycle paths.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::config::RetryPolicy;
use crate::error::{StoreError, StoreResult};
use crate::store::{Mutation, Operation, Request, Response, Store, StoreTxn, Vars};
use crate::transaction::Transaction;

/// What the store will do, and what it has seen.
#[derive(Debug, Default)]
pub(crate) struct ScriptState {
    /// Every query, mutate and request fails with this error.
    pub always_fail: Option<StoreError>,
    /// The next calls fail with these errors, in order.
    pub fail_next: VecDeque<StoreError>,
    /// Discard fails with this error (after being counted).
    pub discard_error: Option<StoreError>,
    /// Answer to every successful call.
    pub response: Response,

    pub calls: usize,
    pub discards: usize,
    pub commits: usize,
    /// `read_only` flag of every handle opened.
    pub opened: Vec<bool>,
    pub mutations: Vec<Mutation>,
    pub requests: Vec<Request>,
}

impl ScriptState {
    fn outcome(&mut self) -> StoreResult<Response> {
        self.calls += 1;
        if let Some(err) = &self.always_fail {
            return Err(err.clone());
        }
        match self.fail_next.pop_front() {
            Some(err) => Err(err),
            None => Ok(self.response.clone()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedStore {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(script: impl FnOnce(&mut ScriptState)) -> Self {
        let store = Self::new();
        script(&mut *store.state());
        store
    }

    pub fn state(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap()
    }

    /// Open a transaction with the default retry budget and no backoff.
    pub fn open(&self, auto_commit: bool, read_only: bool) -> Transaction {
        let policy = RetryPolicy {
            max_retries: 5,
            backoff: Duration::ZERO,
        };
        Transaction::new(Arc::new(self.clone()), auto_commit, read_only, policy)
    }
}

#[async_trait]
impl Store for ScriptedStore {
    fn new_txn(&self, read_only: bool) -> Box<dyn StoreTxn> {
        self.state().opened.push(read_only);
        Box::new(ScriptedTxn {
            state: self.state.clone(),
        })
    }

    async fn alter(&self, _operation: Operation) -> StoreResult<()> {
        self.state().outcome().map(|_| ())
    }

    async fn close(&self) -> StoreResult<()> {
        Ok(())
    }
}

struct ScriptedTxn {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedTxn {
    fn state(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl StoreTxn for ScriptedTxn {
    async fn query(&mut self, _text: &str, _vars: &Vars) -> StoreResult<Response> {
        self.state().outcome()
    }

    async fn mutate(&mut self, mutation: Mutation) -> StoreResult<Response> {
        let mut state = self.state();
        state.mutations.push(mutation);
        state.outcome()
    }

    async fn request(&mut self, request: Request) -> StoreResult<Response> {
        let mut state = self.state();
        state.requests.push(request);
        state.outcome()
    }

    async fn commit(&mut self) -> StoreResult<()> {
        self.state().commits += 1;
        Ok(())
    }

    async fn discard(&mut self) -> StoreResult<()> {
        let mut state = self.state();
        state.discards += 1;
        match &state.discard_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
