//! Query text builders.

use ogm_core::Payload;
use serde_json::Value as Json;

/// Name of the block every session query answers under.
pub const RESULT_BLOCK: &str = "vertex";

/// Token replaced by the expansion clause in caller-supplied queries.
pub const EXPAND_TOKEN: &str = "%expand%";

/// Sort order of an `all` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Order {
    Asc(String),
    Desc(String),
}

/// Paging, ordering and depth of an `all` listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub order: Option<Order>,
    /// Page size. Absent, zero or above the configured maximum means the maximum.
    pub limit: Option<usize>,
    pub offset: usize,
    pub depth: Option<u32>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_asc(mut self, predicate: impl Into<String>) -> Self {
        self.order = Some(Order::Asc(predicate.into()));
        self
    }

    pub fn order_desc(mut self, predicate: impl Into<String>) -> Self {
        self.order = Some(Order::Desc(predicate.into()));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }
}

pub(crate) fn clamp_limit(limit: Option<usize>, max: usize) -> usize {
    match limit {
        Some(n) if n > 0 && n <= max => n,
        _ => max,
    }
}

/// One vertex by id, guarded by type. Takes the `$id` variable.
pub(crate) fn by_id(type_name: &str, clause: &str) -> String {
    format!(
        "query {block}($id: string) {{ {block}(func: uid($id)) @filter(type({type_name})) {{ {clause} }} }}",
        block = RESULT_BLOCK,
    )
}

/// Vertices matched by a root function, guarded by type.
pub(crate) fn by_function(type_name: &str, function: &str, clause: &str) -> String {
    format!(
        "{{ {block}(func: {function}) @filter(type({type_name})) {{ {clause} }} }}",
        block = RESULT_BLOCK,
    )
}

/// A page of every vertex of a type.
pub(crate) fn listing(type_name: &str, order: Option<&Order>, limit: usize, offset: usize, clause: &str) -> String {
    let mut args = format!("func: type({})", type_name);
    match order {
        Some(Order::Asc(predicate)) => args.push_str(&format!(", orderasc: {}", predicate)),
        Some(Order::Desc(predicate)) => args.push_str(&format!(", orderdesc: {}", predicate)),
        None => {}
    }
    args.push_str(&format!(", first: {}", limit));
    if offset > 0 {
        args.push_str(&format!(", offset: {}", offset));
    }
    format!("{{ {}({}) {{ {} }} }}", RESULT_BLOCK, args, clause)
}

/// The objects of the result block; anything else is dropped.
pub(crate) fn result_items(mut json: Json) -> Vec<Payload> {
    match json.get_mut(RESULT_BLOCK).map(Json::take) {
        Some(Json::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Json::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
