//! Binary buffer reader with cursor tracking.

use std::str;

use crate::BufferError;

/// A binary buffer reader over a byte slice.
///
/// Every read is bounds-checked and returns [`BufferError::EndOfBuffer`]
/// instead of panicking, so the reader is safe to point at untrusted input.
///
/// # Example
///
/// ```
/// use nodepack_buffers::Reader;
///
/// let data = [0x01, 0x02, 0x03];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.try_u8(), Ok(0x01));
/// assert_eq!(reader.try_u16(), Ok(0x0203));
/// assert!(reader.try_u8().is_err());
/// ```
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.uint8.len() - self.x
    }

    /// Whether the cursor reached the end of the input.
    pub fn is_done(&self) -> bool {
        self.x >= self.uint8.len()
    }

    #[inline]
    fn check(&self, needed: usize) -> Result<(), BufferError> {
        if needed > self.size() {
            Err(BufferError::EndOfBuffer {
                offset: self.x,
                needed,
            })
        } else {
            Ok(())
        }
    }

    #[inline]
    fn array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        self.check(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.uint8[self.x..self.x + N]);
        self.x += N;
        Ok(out)
    }

    /// Peeks at the current byte without advancing the cursor.
    pub fn try_peek(&self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.uint8[self.x])
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn try_u8(&mut self) -> Result<u8, BufferError> {
        self.array::<1>().map(|b| b[0])
    }

    /// Reads a signed 8-bit integer.
    #[inline]
    pub fn try_i8(&mut self) -> Result<i8, BufferError> {
        self.array::<1>().map(i8::from_be_bytes)
    }

    /// Reads an unsigned 16-bit integer (big-endian).
    #[inline]
    pub fn try_u16(&mut self) -> Result<u16, BufferError> {
        self.array().map(u16::from_be_bytes)
    }

    /// Reads a signed 16-bit integer (big-endian).
    #[inline]
    pub fn try_i16(&mut self) -> Result<i16, BufferError> {
        self.array().map(i16::from_be_bytes)
    }

    /// Reads an unsigned 32-bit integer (big-endian).
    #[inline]
    pub fn try_u32(&mut self) -> Result<u32, BufferError> {
        self.array().map(u32::from_be_bytes)
    }

    /// Reads a signed 32-bit integer (big-endian).
    #[inline]
    pub fn try_i32(&mut self) -> Result<i32, BufferError> {
        self.array().map(i32::from_be_bytes)
    }

    /// Reads an unsigned 64-bit integer (big-endian).
    #[inline]
    pub fn try_u64(&mut self) -> Result<u64, BufferError> {
        self.array().map(u64::from_be_bytes)
    }

    /// Reads a signed 64-bit integer (big-endian).
    #[inline]
    pub fn try_i64(&mut self) -> Result<i64, BufferError> {
        self.array().map(i64::from_be_bytes)
    }

    /// Reads a 32-bit floating point number (big-endian).
    #[inline]
    pub fn try_f32(&mut self) -> Result<f32, BufferError> {
        self.array().map(f32::from_be_bytes)
    }

    /// Reads a 64-bit floating point number (big-endian).
    #[inline]
    pub fn try_f64(&mut self) -> Result<f64, BufferError> {
        self.array().map(f64::from_be_bytes)
    }

    /// Returns a subslice of the given size and advances the cursor.
    pub fn try_buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let bin = &self.uint8[self.x..self.x + size];
        self.x += size;
        Ok(bin)
    }

    /// Reads a UTF-8 string of `size` bytes.
    pub fn try_utf8(&mut self, size: usize) -> Result<&'a str, BufferError> {
        let offset = self.x;
        let bin = self.try_buf(size)?;
        str::from_utf8(bin).map_err(|_| {
            self.x = offset;
            BufferError::InvalidUtf8 { offset }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian_integers() {
        let data = [0xff, 0xfe, 0x00, 0x00, 0x01, 0x00];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.try_i16(), Ok(-2));
        assert_eq!(reader.try_u32(), Ok(256));
        assert!(reader.is_done());
    }

    #[test]
    fn end_of_buffer_reports_offset() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = Reader::new(&data);
        reader.try_u8().unwrap();
        assert_eq!(
            reader.try_u32(),
            Err(BufferError::EndOfBuffer {
                offset: 1,
                needed: 4
            })
        );
        // A failed read leaves the cursor in place.
        assert_eq!(reader.x, 1);
    }

    #[test]
    fn buf_does_not_overrun() {
        let data = [1u8, 2, 3];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.try_buf(2), Ok(&data[..2]));
        assert!(reader.try_buf(2).is_err());
        assert_eq!(reader.size(), 1);
    }

    #[test]
    fn utf8_rejects_invalid_sequences() {
        let data = [0xc3, 0x28];
        let mut reader = Reader::new(&data);
        assert_eq!(
            reader.try_utf8(2),
            Err(BufferError::InvalidUtf8 { offset: 0 })
        );
        assert_eq!(reader.x, 0);
    }

    #[test]
    fn floats_roundtrip_through_bytes() {
        let mut data = Vec::new();
        data.extend_from_slice(&1.25f32.to_be_bytes());
        data.extend_from_slice(&(-2.5f64).to_be_bytes());
        let mut reader = Reader::new(&data);
        assert_eq!(reader.try_f32(), Ok(1.25));
        assert_eq!(reader.try_f64(), Ok(-2.5));
    }
}
