//! Conversion facade: JSON text, MessagePack bytes, dictionaries and XML.
//!
//! Every pipeline is a straight composition of codec stages. The first failing
//! stage aborts the call and nothing is produced.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use nodepack_codec::json::{self, EncodeError, ParseError};
use nodepack_codec::msgpack::{self, DecodeError};
use nodepack_codec::{normalize, CodecOptions, Dictionary, Value};
use thiserror::Error;
use tracing::warn;

use crate::xml::{json_to_xml, TransformError};

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("JSON parse failed: {0}")]
    Parse(#[from] ParseError),
    #[error("MessagePack decode failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("JSON encode failed: {0}")]
    Encode(#[from] EncodeError),
    #[error("XML transform failed: {0}")]
    Transform(#[from] TransformError),
}

impl ConvertError {
    /// Name of the pipeline stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            ConvertError::Parse(_) => "parse",
            ConvertError::Decode(_) => "decode",
            ConvertError::Encode(_) => "encode",
            ConvertError::Transform(_) => "transform",
        }
    }
}

fn logged<T>(op: &'static str, result: Result<T, ConvertError>) -> Result<T, ConvertError> {
    result.inspect_err(|err| warn!(op, stage = err.stage(), error = %err, "conversion failed"))
}

/// JSON text → normalized value tree → MessagePack bytes.
///
/// Strings are always written as plain `str`, whatever resolver the decode
/// side uses.
pub fn json_to_binary(text: &str) -> Result<Vec<u8>, ConvertError> {
    logged("json_to_binary", encode_json(text))
}

fn encode_json(text: &str) -> Result<Vec<u8>, ConvertError> {
    let mut value = json::parse(text)?;
    normalize(&mut value);
    Ok(msgpack::encode(&value))
}

/// MessagePack bytes → normalized, string-keyed dictionary.
///
/// The payload must be a mapping at the top level.
pub fn binary_to_dictionary(
    bytes: &[u8],
    options: &CodecOptions,
) -> Result<Dictionary, ConvertError> {
    logged("binary_to_dictionary", decode_dictionary(bytes, options))
}

fn decode_dictionary(bytes: &[u8], options: &CodecOptions) -> Result<Dictionary, ConvertError> {
    let mut value = Value::Mapping(msgpack::decode_mapping(bytes, options)?);
    normalize(&mut value);
    Ok(value.into_dictionary().unwrap_or_default())
}

/// MessagePack bytes → indented JSON text.
///
/// Binary leaves are written as standard base64 strings.
pub fn binary_to_json(bytes: &[u8], options: &CodecOptions) -> Result<String, ConvertError> {
    logged("binary_to_json", decode_json(bytes, options))
}

fn decode_json(bytes: &[u8], options: &CodecOptions) -> Result<String, ConvertError> {
    let value = binary_as_base64(Value::from(decode_dictionary(bytes, options)?));
    Ok(json::serialize(&value, true)?)
}

/// MessagePack bytes → XML under a `root` element.
pub fn binary_to_xml(bytes: &[u8], options: &CodecOptions) -> Result<String, ConvertError> {
    logged("binary_to_xml", decode_xml(bytes, options))
}

fn decode_xml(bytes: &[u8], options: &CodecOptions) -> Result<String, ConvertError> {
    let json = decode_json(bytes, options)?;
    Ok(json_to_xml(&json)?)
}

fn binary_as_base64(value: Value) -> Value {
    match value {
        Value::Binary(bytes) => Value::String(STANDARD.encode(bytes)),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(binary_as_base64).collect()),
        Value::Mapping(entries) => Value::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k, binary_as_base64(v)))
                .collect(),
        ),
        scalar => scalar,
    }
}

/// The facade bound to one [`CodecOptions`], for repeated calls.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: CodecOptions,
}

impl Converter {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    pub fn json_to_binary(&self, text: &str) -> Result<Vec<u8>, ConvertError> {
        json_to_binary(text)
    }

    pub fn binary_to_dictionary(&self, bytes: &[u8]) -> Result<Dictionary, ConvertError> {
        binary_to_dictionary(bytes, &self.options)
    }

    pub fn binary_to_json(&self, bytes: &[u8]) -> Result<String, ConvertError> {
        binary_to_json(bytes, &self.options)
    }

    pub fn binary_to_xml(&self, bytes: &[u8]) -> Result<String, ConvertError> {
        binary_to_xml(bytes, &self.options)
    }
}
