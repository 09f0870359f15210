//! The Registry - immutable entity type lookup.

use crate::{EdgeDecl, EntityType, VertexHooks};
use ogm_core::Vertex;
use std::collections::HashMap;
use std::sync::Arc;

/// The Registry provides runtime lookup of entity types.
/// It is immutable after construction.
#[derive(Debug, Default)]
pub struct Registry {
    /// Entity types in declaration order.
    types: Vec<EntityType>,
    /// Type position lookup by name.
    type_names: HashMap<String, usize>,
}

impl Registry {
    /// Create a registry (use RegistryBuilder for construction).
    pub(crate) fn new(types: Vec<EntityType>) -> Self {
        let type_names = types
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.clone(), i))
            .collect();
        Self { types, type_names }
    }

    // ==================== Type Lookups ====================

    /// Get a type definition by name.
    pub fn get_type(&self, name: &str) -> Option<&EntityType> {
        self.type_names.get(name).map(|&i| &self.types[i])
    }

    /// Check if a type is registered.
    pub fn has_type(&self, name: &str) -> bool {
        self.type_names.contains_key(name)
    }

    /// Get all type definitions in declaration order.
    pub fn all_types(&self) -> impl Iterator<Item = &EntityType> {
        self.types.iter()
    }

    /// Get the number of types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    // ==================== Edge Lookups ====================

    /// Get the edge declaration for a field of a type.
    pub fn get_edge(&self, type_name: &str, field: &str) -> Option<&EdgeDecl> {
        self.get_type(type_name).and_then(|t| t.get_edge(field))
    }

    /// Check whether any registered type reads `predicate` through its reverse projection.
    pub fn is_reversed(&self, predicate: &str) -> bool {
        self.types
            .iter()
            .flat_map(|t| t.undirected_edges())
            .any(|e| e.reverse_of.as_deref() == Some(predicate))
    }

    // ==================== Instances ====================

    /// Construct a zero-argument instance of a type.
    pub fn instantiate(&self, type_name: &str) -> Option<Vertex> {
        self.get_type(type_name).map(EntityType::instantiate)
    }

    /// Get the hooks attached to a type.
    pub fn hooks(&self, type_name: &str) -> Option<Arc<dyn VertexHooks>> {
        self.get_type(type_name).and_then(|t| t.hooks.clone())
    }
}
