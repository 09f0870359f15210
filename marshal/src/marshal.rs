//! Vertex to payload conversion.

use ogm_core::predicate::{is_private, to_store_key, ID_PREDICATE, TYPE_PREDICATE};
use ogm_core::{EdgeValue, ModelError, Payload, Vertex};
use ogm_registry::{Cardinality, Registry};
use serde_json::Value as Json;

use crate::error::{MarshalError, MarshalResult};

/// Marshal a vertex into a write payload.
///
/// Without `traverse` every edge slot is dropped. With it, directed edges are
/// emitted as nested payloads (one level, non-traversing) and undirected edges
/// are still dropped.
pub fn marshal(registry: &Registry, vertex: &Vertex, traverse: bool) -> MarshalResult<Payload> {
    marshal_as(registry, vertex, &vertex.type_name, traverse)
}

fn marshal_as(
    registry: &Registry,
    vertex: &Vertex,
    type_name: &str,
    traverse: bool,
) -> MarshalResult<Payload> {
    let def = registry
        .get_type(type_name)
        .ok_or_else(|| MarshalError::unknown_type(type_name))?;

    let mut payload = Payload::new();
    if let Some(id) = vertex.id() {
        payload.insert(ID_PREDICATE.to_string(), Json::String(id.to_string()));
    }
    payload.insert(
        TYPE_PREDICATE.to_string(),
        Json::String(def.name.clone()),
    );

    for (name, value) in &vertex.attributes {
        if is_private(name) || def.is_edge(name) {
            continue;
        }
        payload.insert(to_store_key(name).into_owned(), value.to_json());
    }

    if !traverse {
        return Ok(payload);
    }

    for (name, linked) in &vertex.edges {
        let decl = def
            .get_edge(name)
            .ok_or_else(|| MarshalError::undeclared_edge(&def.name, name))?;
        if !decl.is_directed() {
            continue;
        }

        let nested = match (decl.cardinality, linked) {
            (Cardinality::Single, EdgeValue::Single(target)) => {
                Json::Object(marshal_nested(registry, target, &decl.target)?)
            }
            (Cardinality::Multiple, EdgeValue::Multiple(targets)) => Json::Array(
                targets
                    .iter()
                    .map(|t| marshal_nested(registry, t, &decl.target).map(Json::Object))
                    .collect::<MarshalResult<_>>()?,
            ),
            (cardinality, _) => {
                return Err(ModelError::cardinality_mismatch(name, cardinality.to_string()).into())
            }
        };
        payload.insert(name.clone(), nested);
    }

    Ok(payload)
}

fn marshal_nested(registry: &Registry, target: &Vertex, declared: &str) -> MarshalResult<Payload> {
    let type_name = if target.type_name.is_empty() {
        declared
    } else {
        target.type_name.as_str()
    };
    marshal_as(registry, target, type_name, false)
}
