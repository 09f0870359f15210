//! Single-triple mutation statements.

use ogm_core::Value;
use std::fmt;

/// Object position of an N-Quad statement.
#[derive(Debug, Clone, PartialEq)]
pub enum NquadObject {
    /// Another node, by store id.
    Node(String),
    /// A scalar literal.
    Literal(Value),
    /// Every object (deletion only).
    Any,
}

impl NquadObject {
    pub fn node(id: impl Into<String>) -> Self {
        Self::Node(id.into())
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// A null literal names no object at all.
    pub fn is_null(&self) -> bool {
        matches!(self, NquadObject::Literal(Value::Null))
    }
}

impl fmt::Display for NquadObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NquadObject::Node(id) => write!(f, "<{}>", id),
            NquadObject::Literal(Value::String(s)) => write!(f, "{}", serde_json::Value::from(s.as_str())),
            NquadObject::Literal(value) => {
                write!(f, "{}", serde_json::Value::from(value.to_json().to_string()))
            }
            NquadObject::Any => write!(f, "*"),
        }
    }
}

impl From<Value> for NquadObject {
    fn from(value: Value) -> Self {
        NquadObject::Literal(value)
    }
}

/// Render `<subject> <predicate> object .`
pub(crate) fn statement(subject: &str, predicate: &str, object: &NquadObject) -> String {
    format!("<{}> <{}> {} .", subject, predicate, object)
}
