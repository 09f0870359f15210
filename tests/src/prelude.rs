//! Everything an end-to-end test needs in one import.

pub use crate::fixtures::{memory_session, pet_registry, Recorded, RecordingHooks};
pub use crate::init_tracing;
pub use crate::memory::{MemoryStore, CONFLICT_MESSAGE};
pub use ogm_connection::Connection;
pub use ogm_core::{EdgeValue, Payload, Value, Vertex};
pub use ogm_registry::{Cardinality, Registry, RegistryBuilder};
pub use ogm_session::{GraphSession, Order, QueryOptions, SessionError};
pub use ogm_transaction::{OgmConfig, TransactionError, TxnState, Vars};
