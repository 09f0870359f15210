//! The Marshaler facade.

use ogm_core::{Payload, Vertex};
use ogm_registry::Registry;

use crate::error::MarshalResult;

/// Converts vertices of registered types to and from store payloads.
#[derive(Debug, Clone, Copy)]
pub struct Marshaler<'r> {
    registry: &'r Registry,
}

impl<'r> Marshaler<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Marshal a vertex for a write. See [`crate::marshal::marshal`].
    pub fn marshal(&self, vertex: &Vertex, traverse: bool) -> MarshalResult<Payload> {
        crate::marshal::marshal(self.registry, vertex, traverse)
    }

    /// Populate a vertex from a query result payload.
    pub fn unmarshal(&self, vertex: &mut Vertex, payload: Payload) -> MarshalResult<()> {
        crate::unmarshal::unmarshal(self.registry, vertex, payload)
    }
}
