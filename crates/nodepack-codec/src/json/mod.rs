//! JSON text codec.

pub mod decoder;
pub mod encoder;
pub mod error;

pub use decoder::{JsonDecoder, MAX_JSON_DEPTH};
pub use encoder::JsonEncoder;
pub use error::{EncodeError, ParseError, ParseErrorKind};

use crate::Value;

/// Parses JSON text into a [`Value`] tree.
pub fn parse(text: &str) -> Result<Value, ParseError> {
    JsonDecoder::new(text).decode()
}

/// Renders a [`Value`] tree as JSON text.
///
/// `indent` switches to two-space pretty printing; it never changes meaning.
pub fn serialize(value: &Value, indent: bool) -> Result<String, EncodeError> {
    let mut encoder = if indent {
        JsonEncoder::indented()
    } else {
        JsonEncoder::new()
    };
    let bytes = encoder.encode(value)?;
    // The encoder only ever writes UTF-8.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
