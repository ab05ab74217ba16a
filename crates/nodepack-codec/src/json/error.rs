//! JSON parser/serializer error types.

use thiserror::Error;

/// Why a JSON document failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected character")]
    UnexpectedChar,
    #[error("invalid number")]
    InvalidNumber,
    #[error("invalid string escape")]
    InvalidEscape,
    #[error("control character in string")]
    ControlCharacter,
    #[error("trailing characters after JSON value")]
    TrailingCharacters,
    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
}

/// Malformed JSON, with the position of the offending byte.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}, column {column} (byte {offset})")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte offset into the input.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl ParseError {
    pub(crate) fn at(kind: ParseErrorKind, text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let mut line = 1;
        let mut line_start = 0;
        for (i, b) in text.as_bytes()[..offset].iter().enumerate() {
            if *b == b'\n' {
                line += 1;
                line_start = i + 1;
            }
        }
        let column = String::from_utf8_lossy(&text.as_bytes()[line_start..offset])
            .chars()
            .count()
            + 1;
        Self {
            kind,
            offset,
            line,
            column,
        }
    }
}

/// A value tree that has no JSON representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("binary value at {path} cannot be written as JSON")]
    Binary { path: String },
    #[error("non-finite float at {path} cannot be written as JSON")]
    NonFiniteFloat { path: String },
}

impl EncodeError {
    /// Path of the offending value, `$`-rooted (`$.graph.nodes[0]`).
    pub fn path(&self) -> &str {
        match self {
            EncodeError::Binary { path } | EncodeError::NonFiniteFloat { path } => path,
        }
    }

    /// Prefixes the recorded path with the container segment it was found in.
    pub(crate) fn within(mut self, segment: &str) -> Self {
        let path = match &mut self {
            EncodeError::Binary { path } | EncodeError::NonFiniteFloat { path } => path,
        };
        // Paths are built leaf-first while unwinding: "$" + segments.
        let rest = path.strip_prefix('$').unwrap_or(path.as_str()).to_owned();
        *path = format!("${segment}{rest}");
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_counts_lines_and_columns() {
        let text = "{\n  \"a\": x\n}";
        let offset = text.find('x').unwrap();
        let err = ParseError::at(ParseErrorKind::UnexpectedChar, text, offset);
        assert_eq!((err.line, err.column, err.offset), (2, 8, offset));
        assert_eq!(
            err.to_string(),
            format!("unexpected character at line 2, column 8 (byte {offset})")
        );
    }

    #[test]
    fn encode_error_paths_build_outwards() {
        let err = EncodeError::Binary { path: "$".into() }
            .within("[2]")
            .within(".params");
        assert_eq!(err.path(), "$.params[2]");
    }
}
