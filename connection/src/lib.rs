//! OGM Connection
//!
//! Owns the store handle and the mapping-layer configuration, verifies
//! reachability, applies schema and hands out transactions.

mod connection;
mod error;

pub use connection::{Connection, PING_QUERY};
pub use error::{ConnectionError, ConnectionResult};
