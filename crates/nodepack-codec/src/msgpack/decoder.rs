//! `MsgPackDecoder`: bounded MessagePack decoder for untrusted input.
//!
//! Every length prefix is checked against the remaining input before anything
//! is allocated, and every allocation is charged against the call's
//! [`DecodeLimits`](super::DecodeLimits) budget.

use std::mem::size_of;

use nodepack_buffers::Reader;
use tracing::debug;

use super::constants::*;
use super::error::DecodeError;
use super::limits::Budget;
use super::resolver::Resolver;
use crate::{CodecOptions, Value};

/// Slot cost of one decoded sequence element.
const SLOT: usize = size_of::<Value>();

pub struct MsgPackDecoder<'o> {
    options: &'o CodecOptions,
}

impl<'o> MsgPackDecoder<'o> {
    pub fn new(options: &'o CodecOptions) -> Self {
        Self { options }
    }

    /// Decodes exactly one value spanning all of `input`.
    pub fn decode(&self, input: &[u8]) -> Result<Value, DecodeError> {
        let mut cursor = Cursor {
            reader: Reader::new(input),
            budget: Budget::new(self.options.limits),
            resolver: self.options.resolver.as_ref(),
        };
        let value = cursor.read_any()?;
        if !cursor.reader.is_done() {
            return Err(DecodeError::TrailingBytes {
                offset: cursor.reader.x,
            });
        }
        debug!(
            bytes = input.len(),
            allocated = cursor.budget.allocated(),
            max_depth = self.options.limits.max_depth,
            "decoded msgpack payload"
        );
        Ok(value)
    }
}

struct Cursor<'a, 'o> {
    reader: Reader<'a>,
    budget: Budget,
    resolver: &'o dyn Resolver,
}

impl<'a> Cursor<'a, '_> {
    fn read_any(&mut self) -> Result<Value, DecodeError> {
        let offset = self.reader.x;
        let byte = self.reader.try_u8()?;

        // positive fixint: 0x00–0x7f
        if byte <= 0x7f {
            return Ok(Value::Integer(byte as i64));
        }
        // negative fixint: 0xe0–0xff
        if byte >= 0xe0 {
            return Ok(Value::Integer(byte as i8 as i64));
        }
        match byte & 0xf0 {
            FIXMAP => return self.read_map(byte as usize & 0xf),
            FIXARRAY => return self.read_arr(byte as usize & 0xf),
            _ => {}
        }
        // fixstr: 0xa0–0xbf
        if byte & 0xe0 == FIXSTR {
            return self.read_str(byte as usize & 0x1f);
        }

        match byte {
            0xc0 => Ok(Value::Null),
            0xc2 => Ok(Value::Bool(false)),
            0xc3 => Ok(Value::Bool(true)),
            BIN8 => {
                let n = self.reader.try_u8()? as usize;
                self.read_bin(n)
            }
            BIN16 => {
                let n = self.reader.try_u16()? as usize;
                self.read_bin(n)
            }
            BIN32 => {
                let n = self.reader.try_u32()? as usize;
                self.read_bin(n)
            }
            EXT8 => {
                let n = self.reader.try_u8()? as usize;
                self.read_ext(n, offset)
            }
            EXT16 => {
                let n = self.reader.try_u16()? as usize;
                self.read_ext(n, offset)
            }
            EXT32 => {
                let n = self.reader.try_u32()? as usize;
                self.read_ext(n, offset)
            }
            FLOAT32 => Ok(Value::Float(self.reader.try_f32()? as f64)),
            FLOAT64 => Ok(Value::Float(self.reader.try_f64()?)),
            UINT8 => Ok(Value::Integer(self.reader.try_u8()? as i64)),
            UINT16 => Ok(Value::Integer(self.reader.try_u16()? as i64)),
            UINT32 => Ok(Value::Integer(self.reader.try_u32()? as i64)),
            UINT64 => {
                let n = self.reader.try_u64()?;
                Ok(i64::try_from(n).map_or(Value::Float(n as f64), Value::Integer))
            }
            INT8 => Ok(Value::Integer(self.reader.try_i8()? as i64)),
            INT16 => Ok(Value::Integer(self.reader.try_i16()? as i64)),
            INT32 => Ok(Value::Integer(self.reader.try_i32()? as i64)),
            INT64 => Ok(Value::Integer(self.reader.try_i64()?)),
            FIXEXT1 => self.read_ext(1, offset),
            FIXEXT2 => self.read_ext(2, offset),
            FIXEXT4 => self.read_ext(4, offset),
            FIXEXT8 => self.read_ext(8, offset),
            FIXEXT16 => self.read_ext(16, offset),
            STR8 => {
                let n = self.reader.try_u8()? as usize;
                self.read_str(n)
            }
            STR16 => {
                let n = self.reader.try_u16()? as usize;
                self.read_str(n)
            }
            STR32 => {
                let n = self.reader.try_u32()? as usize;
                self.read_str(n)
            }
            ARRAY16 => {
                let n = self.reader.try_u16()? as usize;
                self.read_arr(n)
            }
            ARRAY32 => {
                let n = self.reader.try_u32()? as usize;
                self.read_arr(n)
            }
            MAP16 => {
                let n = self.reader.try_u16()? as usize;
                self.read_map(n)
            }
            MAP32 => {
                let n = self.reader.try_u32()? as usize;
                self.read_map(n)
            }
            // 0xc1 is the only marker left.
            tag => Err(DecodeError::UnsupportedTag { tag, offset }),
        }
    }

    /// Fails with `Truncated` unless `needed` more bytes exist.
    fn require(&self, needed: usize) -> Result<(), DecodeError> {
        if needed > self.reader.size() {
            return Err(DecodeError::Truncated {
                offset: self.reader.x,
                needed,
            });
        }
        Ok(())
    }

    fn read_str(&mut self, len: usize) -> Result<Value, DecodeError> {
        self.require(len)?;
        self.budget.charge(len)?;
        let s = self.reader.try_utf8(len)?;
        Ok(Value::String(s.to_owned()))
    }

    fn read_bin(&mut self, len: usize) -> Result<Value, DecodeError> {
        self.require(len)?;
        self.budget.charge(len)?;
        Ok(Value::Binary(self.reader.try_buf(len)?.to_vec()))
    }

    fn read_ext(&mut self, len: usize, offset: usize) -> Result<Value, DecodeError> {
        let ext_type = self.reader.try_i8()?;
        self.require(len)?;
        self.budget.charge(len)?;
        let data = self.reader.try_buf(len)?;
        self.resolver
            .read_ext(ext_type, data)
            .ok_or(DecodeError::UnsupportedExtension {
                ext_type,
                len,
                offset,
            })
    }

    fn read_arr(&mut self, len: usize) -> Result<Value, DecodeError> {
        self.budget.enter()?;
        // Every element takes at least one byte.
        self.require(len)?;
        self.budget.charge(len.saturating_mul(SLOT))?;
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(self.read_any()?);
        }
        self.budget.leave();
        Ok(Value::Sequence(items))
    }

    fn read_map(&mut self, len: usize) -> Result<Value, DecodeError> {
        self.budget.enter()?;
        // Every entry takes at least a key byte and a value byte.
        self.require(len.saturating_mul(2))?;
        self.budget.charge(len.saturating_mul(2 * SLOT))?;
        let mut entries = Vec::with_capacity(len);
        for _ in 0..len {
            let key = self.read_any()?;
            let val = self.read_any()?;
            entries.push((key, val));
        }
        self.budget.leave();
        Ok(Value::Mapping(entries))
    }
}
