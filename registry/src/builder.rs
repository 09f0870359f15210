//! RegistryBuilder for constructing an immutable Registry.

use crate::{Cardinality, EdgeDecl, EntityType, FieldDef, Registry, VertexHooks};
use ogm_core::predicate::validate_field_name;
use ogm_core::{ModelError, Value};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during registry construction.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate type name: {0}")]
    DuplicateTypeName(String),

    #[error("Duplicate field {field} on type {type_name}")]
    DuplicateField { type_name: String, field: String },

    #[error("Edge {edge} on type {type_name} targets unknown type {target}")]
    UnknownEdgeTarget {
        type_name: String,
        edge: String,
        target: String,
    },

    #[error("Edge {edge} on type {type_name} reverses {reverse_of}, which is not a directed edge of {target}")]
    UnknownReverseEdge {
        type_name: String,
        edge: String,
        target: String,
        reverse_of: String,
    },

    #[error("Invalid field: {0}")]
    InvalidField(#[from] ModelError),
}

/// Builder for constructing an immutable Registry.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    /// Types being built, in declaration order.
    types: Vec<EntityType>,
    /// Type name to position mapping.
    type_names: HashMap<String, usize>,
}

impl RegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity type definition.
    pub fn add_type(&mut self, name: impl Into<String>) -> TypeBuilder<'_> {
        TypeBuilder {
            builder: self,
            def: EntityType::new(name),
            repeated_edges: Vec::new(),
        }
    }

    /// Check whether a type has been declared.
    pub fn has_type(&self, name: &str) -> bool {
        self.type_names.contains_key(name)
    }

    /// Build the immutable Registry.
    ///
    /// Edge targets and reverse-edge names are resolved here, so types may
    /// reference each other regardless of declaration order.
    pub fn build(self) -> Result<Registry, RegistryError> {
        for def in &self.types {
            for edge in def.edges.values() {
                let target = self
                    .type_names
                    .get(&edge.target)
                    .map(|&i| &self.types[i])
                    .ok_or_else(|| RegistryError::UnknownEdgeTarget {
                        type_name: def.name.clone(),
                        edge: edge.name.clone(),
                        target: edge.target.clone(),
                    })?;

                if let Some(reverse_of) = &edge.reverse_of {
                    let reversible = target
                        .get_edge(reverse_of)
                        .map(EdgeDecl::is_directed)
                        .unwrap_or(false);
                    if !reversible {
                        return Err(RegistryError::UnknownReverseEdge {
                            type_name: def.name.clone(),
                            edge: edge.name.clone(),
                            target: edge.target.clone(),
                            reverse_of: reverse_of.clone(),
                        });
                    }
                }
            }
        }

        Ok(Registry::new(self.types))
    }
}

/// Builder for an entity type definition.
pub struct TypeBuilder<'a> {
    builder: &'a mut RegistryBuilder,
    def: EntityType,
    /// Edge names declared more than once; reported by `done()`.
    repeated_edges: Vec<String>,
}

impl<'a> TypeBuilder<'a> {
    /// Add a scalar field with its default value.
    pub fn field(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.def.fields.push(FieldDef::new(name, default));
        self
    }

    /// Add an indexed scalar field.
    pub fn indexed_field(
        mut self,
        name: impl Into<String>,
        default: impl Into<Value>,
        tokenizer: impl Into<String>,
    ) -> Self {
        self.def
            .fields
            .push(FieldDef::new(name, default).with_index(tokenizer));
        self
    }

    /// Add a directed edge slot.
    pub fn edge(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        self.insert_edge(EdgeDecl::new(name, target, cardinality));
        self
    }

    /// Add an edge slot read from the reverse projection of `reverse_of`.
    pub fn reverse_edge(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        cardinality: Cardinality,
        reverse_of: impl Into<String>,
    ) -> Self {
        self.insert_edge(EdgeDecl::new(name, target, cardinality).reverse_of(reverse_of));
        self
    }

    fn insert_edge(&mut self, decl: EdgeDecl) {
        if self.def.edges.contains_key(&decl.name) {
            self.repeated_edges.push(decl.name.clone());
        }
        self.def.edges.insert(decl.name.clone(), decl);
    }

    /// Attach lifecycle hooks.
    pub fn hooks(mut self, hooks: Arc<dyn VertexHooks>) -> Self {
        self.def.hooks = Some(hooks);
        self
    }

    /// Finish building this type.
    pub fn done(self) -> Result<(), RegistryError> {
        let def = self.def;

        // Check for duplicate name
        if self.builder.type_names.contains_key(&def.name) {
            return Err(RegistryError::DuplicateTypeName(def.name));
        }

        if let Some(field) = self.repeated_edges.into_iter().next() {
            return Err(RegistryError::DuplicateField {
                type_name: def.name,
                field,
            });
        }

        let mut seen = std::collections::HashSet::new();
        for name in def.fields.iter().map(|f| &f.name).chain(def.edges.keys()) {
            validate_field_name(name)?;
            if !seen.insert(name.as_str()) {
                return Err(RegistryError::DuplicateField {
                    type_name: def.name.clone(),
                    field: name.clone(),
                });
            }
        }

        self.builder
            .type_names
            .insert(def.name.clone(), self.builder.types.len());
        self.builder.types.push(def);

        Ok(())
    }
}
