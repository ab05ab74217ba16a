//! Value model and codecs for nodepack.
//!
//! - [`Value`]: the dynamically-typed tree every conversion goes through
//! - [`json`]: strict JSON text parser and serializer
//! - [`msgpack`]: bounded MessagePack decoder and deterministic encoder
//! - [`normalize`](normalize::normalize): the `graph.nodes` / `graph.edges` rewrite
//!
//! ```
//! use nodepack_codec::{json, msgpack, CodecOptions, Value};
//!
//! let value = json::parse(r#"{"a": [1, 2.5, null]}"#).unwrap();
//! let options = CodecOptions::default();
//! let bytes = msgpack::encode(&value);
//! assert_eq!(msgpack::decode(&bytes, &options).unwrap(), value);
//! ```

pub mod json;
pub mod msgpack;
pub mod normalize;
mod options;
mod value;

pub use json::{EncodeError, ParseError};
pub use msgpack::{DecodeError, DecodeLimits};
pub use normalize::{normalize, normalized};
pub use options::CodecOptions;
pub use value::{coerce_key, project_keys, Dictionary, Value, NULL_KEY};
