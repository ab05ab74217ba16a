//! Structural normalizer for graph payloads.
//!
//! Producers that cannot tell an empty list from an empty object write
//! `graph.nodes` / `graph.edges` as `{}`. Consumers expect lists, so an empty
//! mapping under those two keys is rewritten to an empty sequence.

use tracing::trace;

use crate::value::key_matches;
use crate::Value;

pub const GRAPH: &str = "graph";
pub const NODES: &str = "nodes";
pub const EDGES: &str = "edges";

/// Rewrites every `graph.nodes` / `graph.edges` empty mapping in place.
///
/// Children are visited first, so `graph` keys at any depth are handled.
/// Non-empty mappings are never touched, which makes the pass idempotent.
pub fn normalize(value: &mut Value) {
    match value {
        Value::Sequence(items) => items.iter_mut().for_each(normalize),
        Value::Mapping(entries) => {
            for (key, val) in entries.iter_mut() {
                normalize(val);
                if key_matches(key, GRAPH) {
                    normalize_graph(val);
                }
            }
        }
        _ => {}
    }
}

/// By-value form of [`normalize`].
pub fn normalized(mut value: Value) -> Value {
    normalize(&mut value);
    value
}

fn normalize_graph(graph: &mut Value) {
    let Value::Mapping(entries) = graph else {
        return;
    };
    for (key, val) in entries.iter_mut() {
        let is_empty_mapping = matches!(val, Value::Mapping(m) if m.is_empty());
        if is_empty_mapping && (key_matches(key, NODES) || key_matches(key, EDGES)) {
            trace!(field = %crate::coerce_key(key), "rewriting empty graph mapping to sequence");
            *val = Value::Sequence(Vec::new());
        }
    }
}
