//! OGM Session
//!
//! The entity-aware facade over transactions.
//!
//! Responsibilities:
//! - Sequence hooks, marshaling and transaction calls for the CRUD verbs
//! - Build filter, listing and id queries with nested expansion clauses
//! - Link and unlink stored vertices by raw id
//! - Accumulate schema fragments and re-apply them after a full clear
//!
//! Every verb takes an optional caller transaction. Without one, a fresh
//! auto-commit transaction is used for exactly that call.

mod error;
mod expansion;
mod query;
mod session;

pub use error::{SessionError, SessionResult};
pub use expansion::{expansion, MAX_DEPTH};
pub use query::{Order, QueryOptions, EXPAND_TOKEN, RESULT_BLOCK};
pub use session::GraphSession;
