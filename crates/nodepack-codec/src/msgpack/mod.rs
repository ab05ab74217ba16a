//! MessagePack binary codec.

pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod limits;
pub mod resolver;

pub use constants::{MsgPackMarker, GUID_EXT_TYPE};
pub use decoder::MsgPackDecoder;
pub use encoder::{Extension, MsgPackEncoder};
pub use error::{DecodeError, LimitExceeded};
pub use limits::DecodeLimits;
pub use resolver::{CompositeResolver, GuidResolver, Resolver, StandardResolver};

use crate::{CodecOptions, Value};

/// Encodes a [`Value`] tree as standard MessagePack.
///
/// Encoding needs no options: resolvers only apply when decoding.
pub fn encode(value: &Value) -> Vec<u8> {
    MsgPackEncoder::new().encode(value)
}

/// Decodes one MessagePack value spanning the whole buffer.
pub fn decode(bytes: &[u8], options: &CodecOptions) -> Result<Value, DecodeError> {
    MsgPackDecoder::new(options).decode(bytes)
}

/// Like [`decode`], but the top-level value must be a mapping.
///
/// Returns the raw entries with their keys as decoded.
pub fn decode_mapping(
    bytes: &[u8],
    options: &CodecOptions,
) -> Result<Vec<(Value, Value)>, DecodeError> {
    match decode(bytes, options)? {
        Value::Mapping(entries) => Ok(entries),
        other => Err(DecodeError::NotAMapping {
            found: other.type_name(),
        }),
    }
}
