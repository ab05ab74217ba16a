//! MessagePack decoder error type.

use nodepack_buffers::BufferError;
use thiserror::Error;

/// Which untrusted-data limit a payload exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LimitExceeded {
    #[error("nesting deeper than {limit} levels")]
    Depth { limit: usize },
    #[error("allocation beyond {limit} bytes")]
    Allocation { limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("truncated input: needed {needed} bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },
    #[error("unsupported type tag 0x{tag:02x} at offset {offset}")]
    UnsupportedTag { tag: u8, offset: usize },
    #[error("unsupported extension type {ext_type} ({len} bytes) at offset {offset}")]
    UnsupportedExtension {
        ext_type: i8,
        len: usize,
        offset: usize,
    },
    #[error("untrusted data rejected: {0}")]
    UntrustedDataRejected(LimitExceeded),
    #[error("invalid UTF-8 string at offset {offset}")]
    InvalidUtf8 { offset: usize },
    #[error("trailing bytes after value at offset {offset}")]
    TrailingBytes { offset: usize },
    #[error("expected a mapping at the top level, found {found}")]
    NotAMapping { found: &'static str },
}

impl From<BufferError> for DecodeError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer { offset, needed } => DecodeError::Truncated { offset, needed },
            BufferError::InvalidUtf8 { offset } => DecodeError::InvalidUtf8 { offset },
        }
    }
}
