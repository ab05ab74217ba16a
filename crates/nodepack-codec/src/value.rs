//! [`Value`]: the universal value type shared by the JSON and MessagePack codecs.

use std::fmt::Write as _;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use indexmap::IndexMap;

/// String-keyed projection of a top-level mapping.
///
/// Nested mappings inside a dictionary are [`Value::Mapping`]s whose keys are
/// all [`Value::String`] and unique.
pub type Dictionary = IndexMap<String, Value>;

/// Text that [`coerce_key`] produces for a `Null` key.
pub const NULL_KEY: &str = "null";

/// Dynamically-typed value tree.
///
/// Covers everything the MessagePack and JSON codecs can carry:
/// - scalars (null, bool, signed 64-bit integers, 64-bit floats, strings)
/// - raw binary (`bin` family on the wire; not representable in JSON)
/// - ordered sequences
/// - ordered mappings whose keys are themselves values
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON null / MsgPack nil
    Null,
    /// Boolean value
    Bool(bool),
    /// Signed integer
    Integer(i64),
    /// Floating-point number
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Raw bytes
    Binary(Vec<u8>),
    /// Ordered list of values
    Sequence(Vec<Value>),
    /// Ordered key/value pairs, in wire or insertion order
    Mapping(Vec<(Value, Value)>),
}

impl Value {
    /// Short name of the variant, used by error messages and the inspector.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Binary(_) => "binary",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether the value is a sequence or mapping.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Sequence(_) | Value::Mapping(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a mapping entry by its coerced key.
    ///
    /// When several keys coerce to the same text the last one wins, matching
    /// [`project_keys`].
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping()?
            .iter()
            .rev()
            .find(|(k, _)| key_matches(k, key))
            .map(|(_, v)| v)
    }

    /// Converts a top-level mapping into its string-keyed [`Dictionary`].
    ///
    /// Returns the value back unchanged when it is not a mapping.
    pub fn into_dictionary(self) -> Result<Dictionary, Value> {
        match self {
            Value::Mapping(entries) => Ok(project_entries(entries)),
            other => Err(other),
        }
    }
}

/// Whether `key` coerces to `name`, without allocating for string keys.
///
/// Container text always starts with `[` or `{`, so containers are only
/// rendered when `name` could match.
pub(crate) fn key_matches(key: &Value, name: &str) -> bool {
    match key {
        Value::String(s) => s == name,
        Value::Sequence(_) | Value::Mapping(_) if !name.starts_with(['[', '{']) => false,
        other => coerce_key(other) == name,
    }
}

/// Renders a mapping key as text.
///
/// Strings pass through, numbers and booleans use their canonical text,
/// `Null` becomes [`NULL_KEY`], binary becomes standard base64 and
/// containers become compact JSON-like text.
///
/// Container text is written in a single pass: a container nested as a key
/// inside a key is written bare, never re-quoted, so the text stays linear in
/// the size of the key.
pub fn coerce_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Null => NULL_KEY.to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => format_float_key(*f),
        Value::Binary(b) => STANDARD.encode(b),
        Value::Sequence(_) | Value::Mapping(_) => {
            let mut out = String::new();
            write_key_text(&mut out, key);
            out
        }
    }
}

/// Recursively replaces every mapping key with its [`coerce_key`] text.
///
/// Duplicate coerced keys collapse: the last value wins and keeps the
/// position of the first occurrence.
pub fn project_keys(value: Value) -> Value {
    match value {
        Value::Mapping(entries) => Value::Mapping(
            project_entries(entries)
                .into_iter()
                .map(|(k, v)| (Value::String(k), v))
                .collect(),
        ),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(project_keys).collect()),
        scalar => scalar,
    }
}

fn project_entries(entries: Vec<(Value, Value)>) -> Dictionary {
    let mut out = Dictionary::with_capacity(entries.len());
    for (key, val) in entries {
        out.insert(coerce_key(&key), project_keys(val));
    }
    out
}

/// Shortest text for a finite float that still reads back as a float
/// (`1.0`, `0.5`, `1e300`).
pub(crate) fn format_float(f: f64) -> String {
    format!("{f:?}")
}

fn format_float_key(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_owned()
    } else if f.is_infinite() {
        if f > 0.0 {
            "Infinity".to_owned()
        } else {
            "-Infinity".to_owned()
        }
    } else {
        format_float(f)
    }
}

fn write_key_text(out: &mut String, value: &Value) {
    match value {
        Value::String(s) => write_quoted(out, s),
        Value::Binary(b) => write_quoted(out, &STANDARD.encode(b)),
        Value::Sequence(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_key_text(out, item);
            }
            out.push(']');
        }
        Value::Mapping(entries) => {
            out.push('{');
            for (i, (k, v)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                if k.is_container() {
                    write_key_text(out, k);
                } else {
                    write_quoted(out, &coerce_key(k));
                }
                out.push(':');
                write_key_text(out, v);
            }
            out.push('}');
        }
        scalar => out.push_str(&coerce_key(scalar)),
    }
}

/// Writes `s` as a JSON string literal.
pub(crate) fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Binary(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Dictionary> for Value {
    fn from(dict: Dictionary) -> Self {
        Value::Mapping(
            dict.into_iter()
                .map(|(k, v)| (Value::String(k), v))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: Vec<(Value, Value)>) -> Value {
        Value::Mapping(entries)
    }

    #[test]
    fn coerce_key_scalars() {
        assert_eq!(coerce_key(&Value::from("id")), "id");
        assert_eq!(coerce_key(&Value::Integer(-42)), "-42");
        assert_eq!(coerce_key(&Value::Bool(true)), "true");
        assert_eq!(coerce_key(&Value::Null), NULL_KEY);
        assert_eq!(coerce_key(&Value::Float(1.0)), "1.0");
        assert_eq!(coerce_key(&Value::Float(0.25)), "0.25");
        assert_eq!(coerce_key(&Value::Float(f64::NAN)), "NaN");
        assert_eq!(coerce_key(&Value::Binary(vec![1, 2, 3])), "AQID");
    }

    #[test]
    fn coerce_key_containers_render_as_compact_text() {
        let key = Value::Sequence(vec![Value::Integer(1), Value::from("a\"b")]);
        assert_eq!(coerce_key(&key), r#"[1,"a\"b"]"#);
        let key = map(vec![(Value::Integer(7), Value::Null)]);
        assert_eq!(coerce_key(&key), r#"{"7":null}"#);
    }

    #[test]
    fn nested_container_keys_stay_linear() {
        let mut key = map(vec![(Value::from("a"), Value::Null)]);
        let mut expected = r#"{"a":null}"#.to_owned();
        for _ in 0..40 {
            key = map(vec![(key, Value::Null)]);
            expected = format!("{{{expected}:null}}");
        }
        let text = coerce_key(&key);
        assert_eq!(text.len(), 10 + 40 * 7);
        assert_eq!(text, expected);
        assert!(!text.contains('\\'));
    }

    #[test]
    fn project_keys_is_recursive_and_last_write_wins() {
        let value = map(vec![
            (Value::Integer(1), Value::from("first")),
            (
                Value::Integer(2),
                Value::Sequence(vec![map(vec![(Value::Bool(false), Value::Null)])]),
            ),
            (Value::from("1"), Value::from("second")),
        ]);
        let projected = project_keys(value);
        assert_eq!(
            projected,
            map(vec![
                (Value::from("1"), Value::from("second")),
                (
                    Value::from("2"),
                    Value::Sequence(vec![map(vec![(Value::from("false"), Value::Null)])]),
                ),
            ])
        );
    }

    #[test]
    fn get_uses_coerced_keys() {
        let value = map(vec![
            (Value::Integer(3), Value::from("a")),
            (Value::from("3"), Value::from("b")),
        ]);
        assert_eq!(value.get("3"), Some(&Value::from("b")));
        assert_eq!(value.get("4"), None);
        let keyed = map(vec![(Value::Sequence(vec![Value::Integer(1)]), Value::Null)]);
        assert_eq!(keyed.get("[1]"), Some(&Value::Null));
        assert_eq!(keyed.get("1"), None);
        assert_eq!(Value::Null.get("3"), None);
    }

    #[test]
    fn into_dictionary_rejects_non_mappings() {
        assert_eq!(
            Value::Integer(1).into_dictionary(),
            Err(Value::Integer(1))
        );
        let dict = map(vec![(Value::Integer(5), Value::Bool(true))])
            .into_dictionary()
            .unwrap();
        assert_eq!(dict.get("5"), Some(&Value::Bool(true)));
    }

    #[test]
    fn dictionary_converts_back_to_mapping() {
        let mut dict = Dictionary::new();
        dict.insert("a".into(), Value::Integer(1));
        assert_eq!(
            Value::from(dict),
            map(vec![(Value::from("a"), Value::Integer(1))])
        );
    }
}
