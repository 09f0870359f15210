//! Mapping-layer configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables shared by connections, transactions and sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OgmConfig {
    /// Retries after the first attempt before a conflict is surfaced.
    pub max_retries: u32,
    /// Fixed delay between a discarded handle and the retried attempt.
    pub retry_backoff_ms: u64,
    /// Expansion depth used when a caller does not pick one.
    pub default_depth: u32,
    /// Upper bound for `all` result pages.
    pub max_limit: usize,
}

impl Default for OgmConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            retry_backoff_ms: 100,
            default_depth: 3,
            max_limit: 1000,
        }
    }
}

impl OgmConfig {
    /// Load a config from JSON; missing keys keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_backoff_ms(mut self, retry_backoff_ms: u64) -> Self {
        self.retry_backoff_ms = retry_backoff_ms;
        self
    }

    pub fn with_default_depth(mut self, default_depth: u32) -> Self {
        self.default_depth = default_depth;
        self
    }

    pub fn with_max_limit(mut self, max_limit: usize) -> Self {
        self.max_limit = max_limit;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

/// Bounded fixed-backoff retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        OgmConfig::default().retry_policy()
    }
}

impl RetryPolicy {
    /// Whether another attempt is allowed after `retries` retries.
    pub fn allows(&self, retries: u32) -> bool {
        retries < self.max_retries
    }
}
