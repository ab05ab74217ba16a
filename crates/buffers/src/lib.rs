//! Byte buffer utilities shared by the nodepack codecs.
//!
//! - [`Writer`] - appends big-endian integers, floats and raw bytes to an
//!   auto-growing buffer
//! - [`Reader`] - reads the same shapes back from a byte slice, returning
//!   [`BufferError`] instead of panicking when input runs out
//!
//! # Example
//!
//! ```
//! use nodepack_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.u8(0x01);
//! writer.u16(0x0203);
//! writer.utf8("hello");
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.try_u8(), Ok(0x01));
//! assert_eq!(reader.try_u16(), Ok(0x0203));
//! assert_eq!(reader.try_utf8(5), Ok("hello"));
//! ```

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

/// Error type for buffer operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read `needed` bytes at `offset` past the end of the buffer.
    EndOfBuffer { offset: usize, needed: usize },
    /// Invalid UTF-8 sequence starting at `offset`.
    InvalidUtf8 { offset: usize },
}

impl BufferError {
    /// Byte offset where the failing read started.
    pub fn offset(&self) -> usize {
        match self {
            BufferError::EndOfBuffer { offset, .. } | BufferError::InvalidUtf8 { offset } => {
                *offset
            }
        }
    }
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer { offset, needed } => {
                write!(f, "end of buffer: needed {needed} bytes at offset {offset}")
            }
            BufferError::InvalidUtf8 { offset } => {
                write!(f, "invalid UTF-8 sequence at offset {offset}")
            }
        }
    }
}

impl std::error::Error for BufferError {}
