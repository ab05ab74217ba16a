//! Command logic behind the `nodepack` binary.
//!
//! - `pack` - JSON → MessagePack
//! - `unpack` - MessagePack → indented JSON
//! - `xml` - MessagePack → XML
//! - `inspect` - MessagePack → inspector dump
//! - `save-base64` - base64 text → file
//!
//! The binary only parses arguments and moves bytes between files and stdio.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use nodepack_codec::msgpack;
use thiserror::Error;

use crate::config::ConfigError;
use crate::convert::{ConvertError, Converter};
use crate::inspect::{describe, describe_entry};
use crate::sink::SinkError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error("input is not valid UTF-8")]
    NotUtf8,
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl CliError {
    fn io(context: impl Into<String>) -> impl FnOnce(io::Error) -> Self {
        let context = context.into();
        move |source| CliError::Io { context, source }
    }
}

/// Reads `path`, or stdin when `None`.
pub fn read_input(path: Option<&Path>) -> Result<Vec<u8>, CliError> {
    match path {
        Some(path) => fs::read(path).map_err(CliError::io(format!("reading {}", path.display()))),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .map_err(CliError::io("reading stdin"))?;
            Ok(buf)
        }
    }
}

/// Writes to `path`, or stdout when `None`.
pub fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<(), CliError> {
    match path {
        Some(path) => fs::write(path, bytes).map_err(CliError::io(format!("writing {}", path.display()))),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(bytes)
                .and_then(|()| stdout.flush())
                .map_err(CliError::io("writing stdout"))
        }
    }
}

fn text(input: &[u8]) -> Result<&str, CliError> {
    std::str::from_utf8(input).map_err(|_| CliError::NotUtf8)
}

pub fn pack(input: &[u8], converter: &Converter) -> Result<Vec<u8>, CliError> {
    Ok(converter.json_to_binary(text(input)?)?)
}

pub fn unpack(input: &[u8], converter: &Converter) -> Result<String, CliError> {
    Ok(converter.binary_to_json(input)?)
}

pub fn xml(input: &[u8], converter: &Converter) -> Result<String, CliError> {
    Ok(converter.binary_to_xml(input)?)
}

/// Dumps the whole payload, or one nested mapping when `key` is given.
pub fn inspect(input: &[u8], converter: &Converter, key: Option<&str>) -> Result<String, CliError> {
    let value = msgpack::decode(input, converter.options()).map_err(ConvertError::from)?;
    Ok(match key {
        Some(key) => describe_entry(&value, key),
        None => describe(&value),
    })
}

/// Decodes base64 `input` into `out`, returning the byte count.
pub fn save_base64(input: &[u8], out: &Path) -> Result<usize, CliError> {
    Ok(crate::sink::save_base64_to_file(text(input)?, out)?)
}
