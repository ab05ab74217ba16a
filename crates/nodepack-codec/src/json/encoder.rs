//! `JsonEncoder`: writes a [`Value`] tree as UTF-8 JSON text.

use nodepack_buffers::Writer;

use super::error::EncodeError;
use crate::value::{coerce_key, format_float};
use crate::Value;

const INDENT: &[u8] = b"  ";

/// JSON writer over a [`Writer`] buffer.
///
/// Unlike a general-purpose serializer, this encoder refuses values JSON
/// cannot carry ([`Value::Binary`], NaN, infinities) instead of silently
/// rewriting them. Non-string mapping keys are written as their
/// [`coerce_key`] text.
pub struct JsonEncoder {
    pub writer: Writer,
    indent: bool,
    level: usize,
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonEncoder {
    /// Compact encoder: no whitespace between tokens.
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
            indent: false,
            level: 0,
        }
    }

    /// Pretty encoder: two-space indentation and `"key": value` pairs.
    pub fn indented() -> Self {
        Self {
            indent: true,
            ..Self::new()
        }
    }

    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        self.writer.reset();
        self.level = 0;
        match self.write_any(value) {
            Ok(()) => Ok(self.writer.flush()),
            Err(err) => {
                self.writer.reset();
                Err(err)
            }
        }
    }

    pub fn write_any(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Null => self.write_null(),
            Value::Bool(b) => self.write_boolean(*b),
            Value::Integer(i) => self.writer.ascii(&i.to_string()),
            Value::Float(f) => self.write_float(*f)?,
            Value::String(s) => self.write_str(s),
            Value::Binary(_) => return Err(EncodeError::Binary { path: "$".into() }),
            Value::Sequence(items) => self.write_arr(items)?,
            Value::Mapping(entries) => self.write_obj(entries)?,
        }
        Ok(())
    }

    pub fn write_null(&mut self) {
        self.writer.u32(0x6e756c6c); // "null"
    }

    pub fn write_boolean(&mut self, b: bool) {
        if b {
            self.writer.u32(0x74727565); // "true"
        } else {
            self.writer.u8(b'f');
            self.writer.u32(0x616c7365); // "alse"
        }
    }

    pub fn write_float(&mut self, float: f64) -> Result<(), EncodeError> {
        if !float.is_finite() {
            return Err(EncodeError::NonFiniteFloat { path: "$".into() });
        }
        self.writer.ascii(&format_float(float));
        Ok(())
    }

    /// Write a JSON-escaped string literal.
    pub fn write_str(&mut self, s: &str) {
        let bytes = s.as_bytes();
        // Fast path: printable ASCII without quotes or backslashes.
        if bytes
            .iter()
            .all(|&b| (32..=126).contains(&b) && b != b'"' && b != b'\\')
        {
            self.writer.ensure_capacity(bytes.len() + 2);
            self.writer.u8(b'"');
            self.writer.buf(bytes);
            self.writer.u8(b'"');
            return;
        }
        let mut quoted = String::with_capacity(bytes.len() + 8);
        crate::value::write_quoted(&mut quoted, s);
        self.writer.utf8(&quoted);
    }

    fn newline(&mut self) {
        if self.indent {
            self.writer.u8(b'\n');
            for _ in 0..self.level {
                self.writer.buf(INDENT);
            }
        }
    }

    pub fn write_arr(&mut self, items: &[Value]) -> Result<(), EncodeError> {
        if items.is_empty() {
            self.writer.ascii("[]");
            return Ok(());
        }
        self.writer.u8(b'[');
        self.level += 1;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.writer.u8(b',');
            }
            self.newline();
            self.write_any(item)
                .map_err(|e| e.within(&format!("[{i}]")))?;
        }
        self.level -= 1;
        self.newline();
        self.writer.u8(b']');
        Ok(())
    }

    pub fn write_obj(&mut self, entries: &[(Value, Value)]) -> Result<(), EncodeError> {
        if entries.is_empty() {
            self.writer.ascii("{}");
            return Ok(());
        }
        self.writer.u8(b'{');
        self.level += 1;
        for (i, (key, val)) in entries.iter().enumerate() {
            if i > 0 {
                self.writer.u8(b',');
            }
            self.newline();
            let key = match key {
                Value::String(s) => std::borrow::Cow::Borrowed(s.as_str()),
                other => std::borrow::Cow::Owned(coerce_key(other)),
            };
            self.write_str(&key);
            self.writer.u8(b':');
            if self.indent {
                self.writer.u8(b' ');
            }
            self.write_any(val)
                .map_err(|e| e.within(&format!(".{key}")))?;
        }
        self.level -= 1;
        self.newline();
        self.writer.u8(b'}');
        Ok(())
    }
}
