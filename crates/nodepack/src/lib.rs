//! nodepack: moves workflow payloads between JSON, MessagePack and XML.
//!
//! The codecs live in [`nodepack_codec`]; this crate composes them into the
//! conversion pipelines and adds the glue around them.
//!
//! ```
//! use nodepack::Converter;
//!
//! let converter = Converter::default();
//! let bytes = converter.json_to_binary(r#"{"graph": {"nodes": {}}}"#).unwrap();
//! let json = converter.binary_to_json(&bytes).unwrap();
//! assert_eq!(json, "{\n  \"graph\": {\n    \"nodes\": []\n  }\n}");
//! ```

pub mod cli;
pub mod config;
pub mod convert;
pub mod inspect;
pub mod job;
pub mod sink;
pub mod xml;

pub use config::{Config, ConfigError};
pub use convert::{
    binary_to_dictionary, binary_to_json, binary_to_xml, json_to_binary, ConvertError, Converter,
};
pub use job::JobRequest;
pub use nodepack_codec::{CodecOptions, Dictionary, Value};
pub use sink::{base64_to_bytes, save_base64_to_file, SinkError};
pub use xml::{json_to_xml, TransformError};
