//! Entity type definitions.

use ogm_core::{Value, Vertex};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::hooks::VertexHooks;

/// How many vertices an edge slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cardinality {
    /// Exactly one linked vertex (or none).
    #[default]
    Single,
    /// Any number of linked vertices.
    Multiple,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::Single => write!(f, "single"),
            Cardinality::Multiple => write!(f, "multiple"),
        }
    }
}

/// Whether an edge is stored under its own name or derived from a reverse projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Written and read literally under its own name.
    Directed,
    /// Read from another edge's reverse projection; never written.
    Undirected,
}

/// Scalar field definition within a type.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name (may carry a `$locale` suffix).
    pub name: String,
    /// Value a freshly constructed instance carries.
    pub default: Value,
    /// Store index tokenizer (e.g. "exact", "hash", "term"), if indexed.
    pub index: Option<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            index: None,
        }
    }

    pub fn with_index(mut self, tokenizer: impl Into<String>) -> Self {
        self.index = Some(tokenizer.into());
        self
    }
}

/// Metadata describing one named edge slot on an entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeDecl {
    /// Field name of the slot.
    pub name: String,
    /// Entity type of linked vertices.
    pub target: String,
    /// Single or multiple.
    pub cardinality: Cardinality,
    /// Directed edge on `target` this slot is the reverse of.
    pub reverse_of: Option<String>,
}

impl EdgeDecl {
    pub fn new(name: impl Into<String>, target: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            cardinality,
            reverse_of: None,
        }
    }

    /// Declare this slot as the reverse of `predicate`. An empty name keeps it directed.
    pub fn reverse_of(mut self, predicate: impl Into<String>) -> Self {
        let predicate = predicate.into();
        self.reverse_of = if predicate.is_empty() { None } else { Some(predicate) };
        self
    }

    /// Direction derived from the presence of a reverse-edge name.
    pub fn direction(&self) -> Direction {
        match self.reverse_of.as_deref() {
            Some(name) if !name.is_empty() => Direction::Undirected,
            _ => Direction::Directed,
        }
    }

    pub fn is_directed(&self) -> bool {
        self.direction() == Direction::Directed
    }
}

/// Entity type definition.
#[derive(Clone)]
pub struct EntityType {
    /// Type name (the discriminator stored with every vertex).
    pub name: String,
    /// Scalar fields in declaration order.
    pub fields: Vec<FieldDef>,
    /// Edge slots by field name.
    pub edges: HashMap<String, EdgeDecl>,
    /// Optional lifecycle hooks.
    pub hooks: Option<Arc<dyn VertexHooks>>,
}

impl EntityType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            edges: HashMap::new(),
            hooks: None,
        }
    }

    /// Get a field definition by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get an edge declaration by field name.
    pub fn get_edge(&self, name: &str) -> Option<&EdgeDecl> {
        self.edges.get(name)
    }

    /// Check if a field name is declared as an edge.
    pub fn is_edge(&self, name: &str) -> bool {
        self.edges.contains_key(name)
    }

    /// Iterate over the undirected (reverse) edges.
    pub fn undirected_edges(&self) -> impl Iterator<Item = &EdgeDecl> {
        self.edges.values().filter(|e| !e.is_directed())
    }

    /// Construct a zero-argument instance with every field at its default.
    pub fn instantiate(&self) -> Vertex {
        let mut vertex = Vertex::new(self.name.clone());
        for field in &self.fields {
            vertex.attributes.insert(field.name.clone(), field.default.clone());
        }
        vertex
    }
}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("edges", &self.edges)
            .field("hooks", &self.hooks.is_some())
            .finish()
    }
}
