//! OGM Registry
//!
//! Runtime lookup of entity types: scalar fields with defaults, edge
//! declarations, and optional lifecycle hooks. The registry is immutable
//! after construction via RegistryBuilder and is the single source of truth
//! the marshaling engine and sessions consult instead of reflection.

mod builder;
mod hooks;
mod registry;
mod schema;
mod types;

pub use builder::{RegistryBuilder, RegistryError, TypeBuilder};
pub use hooks::{HookError, HookResult, VertexHooks};
pub use registry::Registry;
pub use schema::SchemaFragments;
pub use types::*;
