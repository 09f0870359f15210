//! OGM Marshal
//!
//! Convert vertices to and from the store's generic payload format.
//!
//! Responsibilities:
//! - Emit scalar predicates, rewriting locale variants into store syntax
//! - Emit directed edges as nested payloads when traversing
//! - Never write undirected (reverse) edges
//! - Rebuild typed vertices from query results, including reverse projections
//!
//! # Module Structure
//!
//! - `marshaler` - The Marshaler facade bound to a registry
//! - `marshal` - Vertex to payload
//! - `unmarshal` - Payload to vertex
//! - `error` - Error types for marshaling failures

mod error;
mod marshal;
mod marshaler;
mod unmarshal;

#[cfg(test)]
mod testing;

pub use error::{MarshalError, MarshalResult};
pub use marshaler::Marshaler;
