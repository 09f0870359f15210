//! Nested expansion clauses.

use std::sync::OnceLock;

use crate::error::{SessionError, SessionResult};

/// Deepest expansion a query may request.
pub const MAX_DEPTH: u32 = 10;

const LEVEL: &str = "uid expand(_all_)";

static CLAUSES: OnceLock<Vec<String>> = OnceLock::new();

fn clauses() -> &'static [String] {
    CLAUSES.get_or_init(|| {
        let mut clauses = Vec::with_capacity(MAX_DEPTH as usize);
        let mut clause = LEVEL.to_string();
        for _ in 0..MAX_DEPTH {
            clauses.push(clause.clone());
            clause = format!("{} {{ {} }}", LEVEL, clause);
        }
        clauses
    })
}

/// The selection fetching `depth` levels of id and predicates.
pub fn expansion(depth: u32) -> SessionResult<&'static str> {
    if !(1..=MAX_DEPTH).contains(&depth) {
        return Err(SessionError::InvalidDepth(depth));
    }
    Ok(&clauses()[depth as usize - 1])
}
