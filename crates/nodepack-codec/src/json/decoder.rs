//! `JsonDecoder`: strict JSON text parser producing [`Value`].

use indexmap::IndexMap;

use super::error::{ParseError, ParseErrorKind};
use crate::{DecodeLimits, Value};

/// Maximum array/object nesting accepted by [`JsonDecoder`].
pub const MAX_JSON_DEPTH: usize = DecodeLimits::MAX_DEPTH_CEILING;

/// Byte-cursor JSON parser.
///
/// Objects keep insertion order; a repeated key replaces the earlier value in
/// place. Integers without fraction or exponent that fit in `i64` become
/// [`Value::Integer`], every other number becomes [`Value::Float`].
pub struct JsonDecoder<'a> {
    text: &'a str,
    data: &'a [u8],
    x: usize,
    depth: usize,
}

impl<'a> JsonDecoder<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            data: text.as_bytes(),
            x: 0,
            depth: 0,
        }
    }

    /// Parses the whole input as exactly one JSON value.
    pub fn decode(mut self) -> Result<Value, ParseError> {
        let value = self.read_any()?;
        self.skip_whitespace();
        if self.x < self.data.len() {
            return Err(self.error(ParseErrorKind::TrailingCharacters));
        }
        Ok(value)
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::at(kind, self.text, self.x)
    }

    fn error_at(&self, kind: ParseErrorKind, offset: usize) -> ParseError {
        ParseError::at(kind, self.text, offset)
    }

    fn peek(&self) -> Result<u8, ParseError> {
        self.data
            .get(self.x)
            .copied()
            .ok_or_else(|| self.error(ParseErrorKind::UnexpectedEof))
    }

    fn read_any(&mut self) -> Result<Value, ParseError> {
        self.skip_whitespace();
        match self.peek()? {
            b'"' => Ok(Value::String(self.read_str()?)),
            b'[' => self.read_arr(),
            b'{' => self.read_obj(),
            b'n' => self.read_literal(b"null", Value::Null),
            b't' => self.read_literal(b"true", Value::Bool(true)),
            b'f' => self.read_literal(b"false", Value::Bool(false)),
            b'-' | b'0'..=b'9' => self.read_num(),
            _ => Err(self.error(ParseErrorKind::UnexpectedChar)),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.x < self.data.len() {
            match self.data[self.x] {
                b' ' | b'\t' | b'\n' | b'\r' => self.x += 1,
                _ => break,
            }
        }
    }

    fn read_literal(&mut self, literal: &[u8], value: Value) -> Result<Value, ParseError> {
        let end = self.x + literal.len();
        if end > self.data.len() {
            return Err(self.error_at(ParseErrorKind::UnexpectedEof, self.data.len()));
        }
        if &self.data[self.x..end] != literal {
            return Err(self.error(ParseErrorKind::UnexpectedChar));
        }
        self.x = end;
        Ok(value)
    }

    fn digits(&mut self) -> usize {
        let start = self.x;
        while self.x < self.data.len() && self.data[self.x].is_ascii_digit() {
            self.x += 1;
        }
        self.x - start
    }

    fn read_num(&mut self) -> Result<Value, ParseError> {
        let start = self.x;
        if self.data[self.x] == b'-' {
            self.x += 1;
        }
        let int_start = self.x;
        let int_len = self.digits();
        if int_len == 0 {
            return Err(self.error(ParseErrorKind::InvalidNumber));
        }
        if int_len > 1 && self.data[int_start] == b'0' {
            return Err(self.error_at(ParseErrorKind::InvalidNumber, int_start));
        }
        let mut is_float = false;
        if self.x < self.data.len() && self.data[self.x] == b'.' {
            is_float = true;
            self.x += 1;
            if self.digits() == 0 {
                return Err(self.error(ParseErrorKind::InvalidNumber));
            }
        }
        if self.x < self.data.len() && matches!(self.data[self.x], b'e' | b'E') {
            is_float = true;
            self.x += 1;
            if self.x < self.data.len() && matches!(self.data[self.x], b'+' | b'-') {
                self.x += 1;
            }
            if self.digits() == 0 {
                return Err(self.error(ParseErrorKind::InvalidNumber));
            }
        }

        let s = &self.text[start..self.x];
        if !is_float {
            if let Ok(i) = s.parse::<i64>() {
                return Ok(Value::Integer(i));
            }
        }
        match s.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Value::Float(f)),
            _ => Err(self.error_at(ParseErrorKind::InvalidNumber, start)),
        }
    }

    fn read_str(&mut self) -> Result<String, ParseError> {
        // Caller guarantees the opening quote.
        self.x += 1;
        let x0 = self.x;
        let mut escaped = false;
        loop {
            let Some(&b) = self.data.get(self.x) else {
                return Err(self.error(ParseErrorKind::UnexpectedEof));
            };
            match b {
                b'"' => break,
                b'\\' => {
                    escaped = true;
                    self.read_escape()?;
                }
                0x00..=0x1f => return Err(self.error(ParseErrorKind::ControlCharacter)),
                _ => self.x += 1,
            }
        }
        let x1 = self.x;
        self.x += 1;
        if !escaped {
            return Ok(self.text[x0..x1].to_owned());
        }
        // Quotes are ASCII, so the slice including them is valid UTF-8.
        serde_json::from_str::<String>(&self.text[x0 - 1..=x1])
            .map_err(|_| self.error_at(ParseErrorKind::InvalidEscape, x0))
    }

    fn read_escape(&mut self) -> Result<(), ParseError> {
        let at = self.x;
        self.x += 1;
        let Some(&c) = self.data.get(self.x) else {
            return Err(self.error(ParseErrorKind::UnexpectedEof));
        };
        match c {
            b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => {
                self.x += 1;
                Ok(())
            }
            b'u' => {
                let hex = self.data.get(self.x + 1..self.x + 5);
                match hex {
                    Some(h) if h.iter().all(u8::is_ascii_hexdigit) => {
                        self.x += 5;
                        Ok(())
                    }
                    Some(_) => Err(self.error_at(ParseErrorKind::InvalidEscape, at)),
                    None => Err(self.error_at(ParseErrorKind::UnexpectedEof, self.data.len())),
                }
            }
            _ => Err(self.error_at(ParseErrorKind::InvalidEscape, at)),
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_JSON_DEPTH {
            return Err(self.error(ParseErrorKind::TooDeep(MAX_JSON_DEPTH)));
        }
        Ok(())
    }

    fn read_arr(&mut self) -> Result<Value, ParseError> {
        self.enter()?;
        self.x += 1;
        let mut arr = Vec::new();
        self.skip_whitespace();
        if self.peek()? == b']' {
            self.x += 1;
            self.depth -= 1;
            return Ok(Value::Sequence(arr));
        }
        loop {
            arr.push(self.read_any()?);
            self.skip_whitespace();
            match self.peek()? {
                b',' => self.x += 1,
                b']' => {
                    self.x += 1;
                    self.depth -= 1;
                    return Ok(Value::Sequence(arr));
                }
                _ => return Err(self.error(ParseErrorKind::UnexpectedChar)),
            }
        }
    }

    fn read_obj(&mut self) -> Result<Value, ParseError> {
        self.enter()?;
        self.x += 1;
        let mut obj: IndexMap<String, Value> = IndexMap::new();
        self.skip_whitespace();
        if self.peek()? == b'}' {
            self.x += 1;
            self.depth -= 1;
            return Ok(Value::Mapping(Vec::new()));
        }
        loop {
            self.skip_whitespace();
            if self.peek()? != b'"' {
                return Err(self.error(ParseErrorKind::UnexpectedChar));
            }
            let key = self.read_str()?;
            self.skip_whitespace();
            if self.peek()? != b':' {
                return Err(self.error(ParseErrorKind::UnexpectedChar));
            }
            self.x += 1;
            let val = self.read_any()?;
            obj.insert(key, val);
            self.skip_whitespace();
            match self.peek()? {
                b',' => self.x += 1,
                b'}' => {
                    self.x += 1;
                    self.depth -= 1;
                    return Ok(Value::Mapping(
                        obj.into_iter()
                            .map(|(k, v)| (Value::String(k), v))
                            .collect(),
                    ));
                }
                _ => return Err(self.error(ParseErrorKind::UnexpectedChar)),
            }
        }
    }
}
