//! Human-readable dumps of decoded payloads.

use std::fmt::Write as _;

use nodepack_codec::{coerce_key, Value};

/// One-line text of a value: scalars as-is, containers as compact JSON-like text.
fn text(value: &Value) -> String {
    coerce_key(value)
}

/// Multi-line description of `value` and its direct children.
pub fn describe(value: &Value) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Value type: {}", value.type_name());
    match value {
        Value::Mapping(entries) => {
            let _ = writeln!(out, "Mapping with {} entries:", entries.len());
            for (key, val) in entries {
                write_entry(&mut out, key, val);
            }
        }
        Value::Sequence(items) => {
            let _ = writeln!(out, "Sequence with {} items:", items.len());
            for item in items {
                let _ = writeln!(out, "  Item ({}): {}", item.type_name(), text(item));
            }
        }
        scalar => {
            let _ = writeln!(out, "Value: {}", text(scalar));
        }
    }
    out
}

/// Describes the mapping stored under `key`, or why there is none.
pub fn describe_entry(value: &Value, key: &str) -> String {
    let mut out = String::new();
    match value.get(key) {
        Some(Value::Mapping(entries)) => {
            let _ = writeln!(out, "Contents of {key:?}:");
            for (k, v) in entries {
                write_entry(&mut out, k, v);
                out.push('\n');
            }
        }
        Some(other) => {
            let _ = writeln!(
                out,
                "Entry {key:?} is not a mapping. Actual type: {}",
                other.type_name()
            );
        }
        None => {
            let _ = writeln!(out, "Key {key:?} not found.");
        }
    }
    out
}

fn write_entry(out: &mut String, key: &Value, val: &Value) {
    let _ = writeln!(out, "  Key ({}): {}", key.type_name(), text(key));
    let _ = writeln!(out, "  Value ({}): {}", val.type_name(), text(val));
    if val.is_container() {
        out.push_str("  Complex value detected.\n");
    }
}
