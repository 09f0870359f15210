//! Payload to vertex conversion.

use ogm_core::predicate::{from_store_key, is_private, reverse_key, ID_PREDICATE, TYPE_PREDICATE};
use ogm_core::{EdgeValue, Payload, Value, Vertex};
use ogm_registry::{Cardinality, EdgeDecl, Registry};
use serde_json::Value as Json;

use crate::error::{MarshalError, MarshalResult};

/// Populate `vertex` from a query result payload.
///
/// Every declared edge slot is reset first, so an edge absent from the
/// payload leaves the slot empty rather than stale. Undirected slots are read
/// from the store's `~predicate` projection.
pub fn unmarshal(registry: &Registry, vertex: &mut Vertex, mut payload: Payload) -> MarshalResult<()> {
    let def = registry
        .get_type(&vertex.type_name)
        .ok_or_else(|| MarshalError::unknown_type(&vertex.type_name))?;

    for name in def.edges.keys() {
        vertex.edges.remove(name);
    }

    for decl in def.undirected_edges() {
        if let Some(reverse_of) = &decl.reverse_of {
            if let Some(projected) = payload.remove(&reverse_key(reverse_of)) {
                payload.insert(decl.name.clone(), projected);
            }
        }
    }

    for (key, value) in payload {
        if is_private(&key) || key == TYPE_PREDICATE {
            continue;
        }
        if key == ID_PREDICATE {
            vertex.id = value.as_str().map(str::to_string);
            continue;
        }

        if let Some(decl) = def.get_edge(&key) {
            if let Some(linked) = unmarshal_edge(registry, decl, value)? {
                vertex.edges.insert(key, linked);
            }
            continue;
        }

        vertex
            .attributes
            .insert(from_store_key(&key).into_owned(), Value::from(value));
    }

    Ok(())
}

/// Build the slot contents for one declared edge.
///
/// Arrays are the store's usual shape; a single-cardinality slot keeps the
/// last element. A bare object is accepted as one linked vertex. Any other
/// value leaves the slot unset.
fn unmarshal_edge(registry: &Registry, decl: &EdgeDecl, value: Json) -> MarshalResult<Option<EdgeValue>> {
    let mut linked = match value {
        Json::Array(items) => items
            .into_iter()
            .map(|item| unmarshal_linked(registry, decl, item))
            .collect::<MarshalResult<Vec<_>>>()?,
        Json::Object(_) => vec![unmarshal_linked(registry, decl, value)?],
        _ => return Ok(None),
    };

    Ok(match decl.cardinality {
        Cardinality::Single => linked.pop().map(EdgeValue::from),
        Cardinality::Multiple => Some(EdgeValue::Multiple(linked)),
    })
}

fn unmarshal_linked(registry: &Registry, decl: &EdgeDecl, item: Json) -> MarshalResult<Vertex> {
    let Json::Object(fields) = item else {
        return Err(MarshalError::expected_object(&decl.name, &item));
    };
    let mut linked = registry
        .instantiate(&decl.target)
        .ok_or_else(|| MarshalError::unknown_type(&decl.target))?;
    unmarshal(registry, &mut linked, fields)?;
    Ok(linked)
}
