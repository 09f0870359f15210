//! Schema text generated from the registry.
//!
//! Scalar predicate types are inferred from field defaults. A directed edge
//! becomes a `uid` predicate (`[uid]` for multiple cardinality) and gains
//! `@reverse` when another type reads it backwards. Undirected edges add no
//! predicate; they only appear in their type's declaration as `<~name>`.

use crate::{Cardinality, Registry};
use ogm_core::predicate::{reverse_key, split_locale};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct PredicateSpec {
    kind: &'static str,
    list: bool,
    tokenizers: Vec<String>,
    lang: bool,
    reverse: bool,
}

impl PredicateSpec {
    fn render(&self, name: &str) -> String {
        let mut line = if self.list {
            format!("{}: [{}]", name, self.kind)
        } else {
            format!("{}: {}", name, self.kind)
        };
        if !self.tokenizers.is_empty() {
            line.push_str(&format!(" @index({})", self.tokenizers.join(", ")));
        }
        if self.lang {
            line.push_str(" @lang");
        }
        if self.reverse {
            line.push_str(" @reverse");
        }
        line.push_str(" .");
        line
    }
}

/// Predicate and type declarations for the store's schema alteration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaFragments {
    /// One line per predicate, sorted by name.
    pub predicates: Vec<String>,
    /// One declaration per entity type, in registration order.
    pub types: Vec<String>,
}

impl SchemaFragments {
    /// Join every fragment into one schema document.
    pub fn to_schema_string(&self) -> String {
        self.predicates
            .iter()
            .chain(self.types.iter())
            .cloned()
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Registry {
    /// Generate the schema fragments for every registered type.
    pub fn schema_fragments(&self) -> SchemaFragments {
        let mut predicates: BTreeMap<String, PredicateSpec> = BTreeMap::new();
        let mut types = Vec::new();

        for def in self.all_types() {
            let mut members: Vec<String> = Vec::new();

            for field in &def.fields {
                let (base, locale) = split_locale(&field.name);
                let spec = predicates.entry(base.to_string()).or_default();
                if spec.kind.is_empty() {
                    spec.kind = field.default.schema_type();
                    spec.list = field.default.as_list().is_some();
                }
                if let Some(tokenizer) = &field.index {
                    if !spec.tokenizers.contains(tokenizer) {
                        spec.tokenizers.push(tokenizer.clone());
                    }
                }
                spec.lang |= locale.is_some();
                if !members.iter().any(|m| m == base) {
                    members.push(base.to_string());
                }
            }

            let mut edges: Vec<_> = def.edges.values().collect();
            edges.sort_by(|a, b| a.name.cmp(&b.name));
            for edge in edges {
                match &edge.reverse_of {
                    Some(reverse_of) => members.push(format!("<{}>", reverse_key(reverse_of))),
                    None => {
                        let spec = predicates.entry(edge.name.clone()).or_default();
                        spec.kind = "uid";
                        spec.list = edge.cardinality == Cardinality::Multiple;
                        spec.reverse = self.is_reversed(&edge.name);
                        members.push(edge.name.clone());
                    }
                }
            }

            types.push(format!("type {} {{ {} }}", def.name, members.join(" ")));
        }

        SchemaFragments {
            predicates: predicates
                .iter()
                .map(|(name, spec)| spec.render(name))
                .collect(),
            types,
        }
    }
}
