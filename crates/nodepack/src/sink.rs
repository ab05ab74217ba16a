//! Writing base64 payloads (e.g. generated images) to disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("input is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Decodes standard (padded) base64.
pub fn base64_to_bytes(text: &str) -> Result<Vec<u8>, SinkError> {
    Ok(STANDARD.decode(text.trim())?)
}

/// Decodes `text` and writes the bytes to `path`, returning the byte count.
///
/// Nothing is written when the input does not decode.
pub fn save_base64_to_file(text: &str, path: impl AsRef<Path>) -> Result<usize, SinkError> {
    let path = path.as_ref();
    let bytes = base64_to_bytes(text)?;
    fs::write(path, &bytes).map_err(|source| SinkError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "saved base64 payload");
    Ok(bytes.len())
}
