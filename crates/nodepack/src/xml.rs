//! JSON → XML transform.
//!
//! Element layout follows the common JSON-to-XML convention:
//! - the document object is wrapped in a `root` element
//! - every property becomes an element named by its key
//! - array values repeat the element once per item; an empty array emits nothing
//! - `@name` properties become attributes and `#text` becomes text content
//! - `null` and `{}` become empty elements (`<k/>`)

use std::fmt::Write as _;
use std::io;

use nodepack_codec::json::{self, ParseError};
use nodepack_codec::{coerce_key, Value};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

/// Element name wrapping the document object.
pub const ROOT: &str = "root";

const ATTRIBUTE_PREFIX: char = '@';
const TEXT_KEY: &str = "#text";
const INDENT: usize = 2;

type XmlWriter = Writer<Vec<u8>>;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("invalid JSON: {0}")]
    Json(#[from] ParseError),
    #[error("top-level JSON value must be an object, found {found}")]
    NotAnObject { found: &'static str },
    #[error("attribute {name} must have a scalar value")]
    InvalidAttribute { name: String },
    #[error("XML write failed: {0}")]
    Write(#[from] io::Error),
}

/// Renders a JSON object document as indented XML.
pub fn json_to_xml(json: &str) -> Result<String, TransformError> {
    let value = json::parse(json)?;
    if !matches!(value, Value::Mapping(_)) {
        return Err(TransformError::NotAnObject {
            found: value.type_name(),
        });
    }
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);
    write_element(&mut writer, ROOT, &value)?;
    String::from_utf8(writer.into_inner())
        .map_err(|err| TransformError::Write(io::Error::new(io::ErrorKind::InvalidData, err)))
}

/// Escapes a key into a valid XML name.
///
/// Characters not allowed at their position are written as `_xHHHH_`
/// (eight hex digits outside the basic plane). A literal `_x` is escaped
/// too so the encoding stays reversible. An empty key becomes `_`.
pub fn encode_name(name: &str) -> String {
    if name.is_empty() {
        return "_".to_owned();
    }
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    let mut first = true;
    while let Some(c) = chars.next() {
        let valid = if first {
            is_name_start(c)
        } else {
            is_name_char(c)
        };
        let escapes_marker = c == '_' && chars.peek() == Some(&'x');
        if valid && !escapes_marker {
            out.push(c);
        } else if (c as u32) <= 0xffff {
            let _ = write!(out, "_x{:04X}_", c as u32);
        } else {
            let _ = write!(out, "_x{:08X}_", c as u32);
        }
        first = false;
    }
    out
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_numeric() || c == '-' || c == '.' || c == '\u{b7}'
}

/// Text form of a scalar; `None` for containers.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Binary(_) => Some(coerce_key(value)),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn write_element(writer: &mut XmlWriter, name: &str, value: &Value) -> Result<(), TransformError> {
    match value {
        Value::Sequence(items) => {
            for item in items {
                write_element(writer, name, item)?;
            }
        }
        Value::Mapping(entries) => write_object(writer, name, entries)?,
        Value::Null => writer.write_event(Event::Empty(BytesStart::new(name)))?,
        scalar => {
            let text = scalar_text(scalar).unwrap_or_default();
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            writer.write_event(Event::Text(BytesText::new(&text)))?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
    }
    Ok(())
}

fn write_object(
    writer: &mut XmlWriter,
    name: &str,
    entries: &[(Value, Value)],
) -> Result<(), TransformError> {
    let mut start = BytesStart::new(name);
    let mut text: Option<String> = None;
    let mut children = Vec::new();
    for (key, val) in entries {
        let key = coerce_key(key);
        if let Some(attr) = key.strip_prefix(ATTRIBUTE_PREFIX) {
            let value = scalar_text(val)
                .ok_or_else(|| TransformError::InvalidAttribute { name: key.clone() })?;
            start.push_attribute((encode_name(attr).as_str(), value.as_str()));
        } else if key == TEXT_KEY {
            let value = scalar_text(val).unwrap_or_default();
            text.get_or_insert_with(String::new).push_str(&value);
        } else {
            children.push((encode_name(&key), val));
        }
    }

    if text.is_none() && children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    if let Some(text) = text {
        writer.write_event(Event::Text(BytesText::new(&text)))?;
    }
    for (child, val) in children {
        write_element(writer, &child, val)?;
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
