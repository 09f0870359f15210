//! OGM Core Types
//!
//! This crate provides the foundational types used throughout OGM:
//! - Value types (the Value enum mirroring the store's JSON scalars)
//! - Vertex structures (Vertex, EdgeValue)
//! - Predicate naming conventions (ids, types, locales, reverse edges)
//! - Common error types

mod error;
pub mod predicate;
mod value;
mod vertex;

pub use error::*;
pub use value::*;
pub use vertex::*;
