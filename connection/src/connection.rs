//! Store connection.

use ogm_core::predicate::ID_PREDICATE;
use ogm_transaction::{OgmConfig, Operation, Store, Transaction, Vars};
use serde_json::Value as Json;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::ConnectionResult;

/// Lightweight read used to confirm the store answers.
pub const PING_QUERY: &str = "{ ping(func: has(dgraph.type), first: 1) { uid } }";

/// A handle on the backing store.
///
/// `verified` only becomes true after a successful ping query.
pub struct Connection {
    store: Arc<dyn Store>,
    config: OgmConfig,
    verified: bool,
}

impl Connection {
    pub fn new(store: Arc<dyn Store>, config: OgmConfig) -> Self {
        Self {
            store,
            config,
            verified: false,
        }
    }

    pub fn config(&self) -> &OgmConfig {
        &self.config
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    /// Ping the store through a throwaway read-only transaction.
    ///
    /// Never fails: the outcome is the returned flag and the log.
    pub async fn connect(&mut self, announce: bool) -> bool {
        let mut ping = self.new_transaction(true, true);
        self.verified = match ping.query(PING_QUERY, &Vars::new()).await {
            Ok(_) => {
                if announce {
                    info!(txn = ping.id(), "connected to graph store");
                }
                true
            }
            Err(err) => {
                warn!(txn = ping.id(), error = %err, "graph store unreachable");
                false
            }
        };
        if let Err(err) = ping.discard().await {
            debug!(txn = ping.id(), error = %err, "ping discard failed");
        }
        self.verified
    }

    /// Create a transaction. Connectivity is not checked.
    pub fn new_transaction(&self, auto_commit: bool, read_only: bool) -> Transaction {
        Transaction::new(
            self.store.clone(),
            auto_commit,
            read_only,
            self.config.retry_policy(),
        )
    }

    /// Run a query on a fresh auto-commit, read-only transaction.
    pub async fn query(&self, text: &str, vars: &Vars) -> ConnectionResult<Json> {
        let mut txn = self.new_transaction(true, true);
        Ok(txn.query(text, vars).await?)
    }

    /// Delete every vertex of `type_name`, or wipe the whole store.
    pub async fn clear(&self, type_name: Option<&str>) -> ConnectionResult<()> {
        let Some(type_name) = type_name else {
            info!("dropping all data");
            self.store.alter(Operation::DropAll).await?;
            return Ok(());
        };

        let text = format!("{{ vertex(func: type({})) {{ {} }} }}", type_name, ID_PREDICATE);
        let result = self.query(&text, &Vars::new()).await?;
        let targets: Vec<Json> = result
            .get("vertex")
            .and_then(Json::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get(ID_PREDICATE))
                    .map(|id| serde_json::json!({ ID_PREDICATE: id }))
                    .collect()
            })
            .unwrap_or_default();

        info!(type_name, count = targets.len(), "clearing type");
        let mut txn = self.new_transaction(true, false);
        txn.delete(Json::Array(targets)).await?;
        Ok(())
    }

    /// Apply schema text, retrying conflicts under the retry policy.
    pub async fn apply_schema(&self, schema: &str) -> ConnectionResult<()> {
        let policy = self.config.retry_policy();
        let mut retries = 0;
        loop {
            match self.store.alter(Operation::Schema(schema.to_string())).await {
                Ok(()) => {
                    debug!(retries, "schema applied");
                    return Ok(());
                }
                Err(err) if err.is_retryable() && policy.allows(retries) => {
                    retries += 1;
                    warn!(retry = retries, error = %err, "retrying schema alteration");
                    tokio::time::sleep(policy.backoff).await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Release the transport. The connection is consumed.
    pub async fn disconnect(self) -> ConnectionResult<()> {
        debug!("disconnecting");
        self.store.close().await?;
        Ok(())
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("config", &self.config)
            .field("verified", &self.verified)
            .finish()
    }
}
