//! OGM Test Support
//!
//! Shared fixtures for the end-to-end tests:
//! - `MemoryStore`, an in-memory store speaking the store protocol
//! - A Pet/Owner registry with recording hooks
//! - Tracing setup that writes through the test harness

pub mod fixtures;
pub mod prelude;

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a test-writer subscriber filtered by `RUST_LOG`. Idempotent.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
