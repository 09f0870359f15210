//! Vertex structures for OGM.
//!
//! A vertex is one typed node of the graph as the application sees it: an
//! optional store id, a type name, scalar predicates and the edges declared
//! for its type.

use std::collections::HashMap;

use crate::predicate::{locale_key, ID_PREDICATE};
use crate::{Attributes, Value};

/// Linked entities held in one edge slot.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeValue {
    /// Edge declared with single cardinality.
    Single(Box<Vertex>),
    /// Edge declared with multiple cardinality.
    Multiple(Vec<Vertex>),
}

impl EdgeValue {
    /// Number of linked vertices.
    pub fn len(&self) -> usize {
        match self {
            EdgeValue::Single(_) => 1,
            EdgeValue::Multiple(items) => items.len(),
        }
    }

    /// Returns true if no vertex is linked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the linked vertex if this is a single edge.
    pub fn as_single(&self) -> Option<&Vertex> {
        match self {
            EdgeValue::Single(v) => Some(v),
            EdgeValue::Multiple(_) => None,
        }
    }

    /// Get the linked vertices if this is a multiple edge.
    pub fn as_multiple(&self) -> Option<&[Vertex]> {
        match self {
            EdgeValue::Single(_) => None,
            EdgeValue::Multiple(items) => Some(items),
        }
    }

    /// Iterate over every linked vertex.
    pub fn iter(&self) -> impl Iterator<Item = &Vertex> {
        let (single, many) = match self {
            EdgeValue::Single(v) => (Some(v.as_ref()), [].iter()),
            EdgeValue::Multiple(items) => (None, items.iter()),
        };
        single.into_iter().chain(many)
    }
}

impl From<Vertex> for EdgeValue {
    fn from(vertex: Vertex) -> Self {
        EdgeValue::Single(Box::new(vertex))
    }
}

impl From<Vec<Vertex>> for EdgeValue {
    fn from(vertices: Vec<Vertex>) -> Self {
        EdgeValue::Multiple(vertices)
    }
}

/// A typed node of the graph.
///
/// "Exists" means the vertex carries a non-empty store id. Deleting a vertex
/// through a session does not clear the id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vertex {
    /// Store-assigned identifier, absent until created.
    pub id: Option<String>,
    /// Entity type name (reference to registry).
    pub type_name: String,
    /// Scalar predicate values, including `name$locale` variants.
    pub attributes: Attributes,
    /// Edge slots by field name.
    pub edges: HashMap<String, EdgeValue>,
}

impl Vertex {
    /// Create an empty vertex of the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    /// Builder-style id assignment.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder-style attribute assignment.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// The store id, if present and non-empty.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Returns true if the vertex has been created in the store.
    pub fn exists(&self) -> bool {
        self.id().is_some()
    }

    /// Get an attribute value by name.
    pub fn get_attr(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Get a string attribute by name.
    pub fn str_attr(&self, name: &str) -> Option<&str> {
        self.get_attr(name).and_then(Value::as_str)
    }

    /// Set an attribute value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        if name == ID_PREDICATE {
            self.id = value.into().as_str().map(str::to_string);
            return;
        }
        self.attributes.insert(name, value.into());
    }

    /// Remove an attribute.
    pub fn remove_attr(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }

    /// Get the locale variant of an attribute.
    pub fn localized(&self, name: &str, locale: &str) -> Option<&Value> {
        self.attributes.get(&locale_key(name, locale))
    }

    /// Set the locale variant of an attribute.
    pub fn set_localized(&mut self, name: &str, locale: &str, value: impl Into<Value>) {
        self.attributes.insert(locale_key(name, locale), value.into());
    }

    /// Get an edge slot by name.
    pub fn edge(&self, name: &str) -> Option<&EdgeValue> {
        self.edges.get(name)
    }

    /// Get the vertex held by a single edge slot.
    pub fn single(&self, name: &str) -> Option<&Vertex> {
        self.edge(name).and_then(EdgeValue::as_single)
    }

    /// Get the vertices held by a multiple edge slot (empty when unset).
    pub fn multiple(&self, name: &str) -> &[Vertex] {
        self.edge(name).and_then(EdgeValue::as_multiple).unwrap_or(&[])
    }

    /// Replace an edge slot.
    pub fn set_edge(&mut self, name: impl Into<String>, value: impl Into<EdgeValue>) {
        self.edges.insert(name.into(), value.into());
    }

    /// Append a vertex to a multiple edge slot, creating it if needed.
    ///
    /// A single slot under the same name is converted to a multiple one.
    pub fn push_edge(&mut self, name: impl Into<String>, vertex: Vertex) {
        let name = name.into();
        let items = match self.edges.remove(&name) {
            Some(EdgeValue::Multiple(mut items)) => {
                items.push(vertex);
                items
            }
            Some(EdgeValue::Single(existing)) => vec![*existing, vertex],
            None => vec![vertex],
        };
        self.edges.insert(name, EdgeValue::Multiple(items));
    }

    /// Remove an edge slot.
    pub fn remove_edge(&mut self, name: &str) -> Option<EdgeValue> {
        self.edges.remove(name)
    }
}
