//! `MsgPackEncoder`: deterministic MessagePack encoder.

use nodepack_buffers::Writer;

use super::constants::*;
use crate::Value;

/// An extension type and its raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub ext_type: i8,
    pub data: Vec<u8>,
}

/// Writes [`Value`] trees in the smallest standard form for every header.
///
/// Strings are always written as `str`. Extensions only come out of
/// [`write_ext`](Self::write_ext), never out of [`Value`] leaves.
pub struct MsgPackEncoder {
    pub writer: Writer,
}

impl Default for MsgPackEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MsgPackEncoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    pub fn encode(&mut self, value: &Value) -> Vec<u8> {
        self.writer.reset();
        self.write_any(value);
        self.writer.flush()
    }

    pub fn write_any(&mut self, value: &Value) {
        match value {
            Value::Null => self.write_null(),
            Value::Bool(b) => self.write_boolean(*b),
            Value::Integer(i) => self.write_integer(*i),
            Value::Float(f) => self.write_float(*f),
            Value::String(s) => self.write_str(s),
            Value::Binary(b) => self.write_bin(b),
            Value::Sequence(items) => self.write_arr(items),
            Value::Mapping(entries) => self.write_map(entries),
        }
    }

    pub fn write_null(&mut self) {
        self.writer.u8(MsgPackMarker::Null as u8);
    }

    pub fn write_boolean(&mut self, b: bool) {
        let marker = if b {
            MsgPackMarker::True
        } else {
            MsgPackMarker::False
        };
        self.writer.u8(marker as u8);
    }

    /// Always float64, so every float decodes back bit-exact.
    pub fn write_float(&mut self, float: f64) {
        self.writer.u8f64(FLOAT64, float);
    }

    pub fn write_integer(&mut self, int: i64) {
        if int >= 0 {
            self.write_u_integer(int as u64);
        } else if int >= -32 {
            // negative fixint
            self.writer.u8(int as i8 as u8);
        } else if int >= i8::MIN as i64 {
            self.writer.u8u8(INT8, int as i8 as u8);
        } else if int >= i16::MIN as i64 {
            self.writer.u8u16(INT16, int as i16 as u16);
        } else if int >= i32::MIN as i64 {
            self.writer.u8u32(INT32, int as i32 as u32);
        } else {
            self.writer.u8u64(INT64, int as u64);
        }
    }

    pub fn write_u_integer(&mut self, uint: u64) {
        if uint <= 0x7f {
            self.writer.u8(uint as u8);
        } else if uint <= 0xff {
            self.writer.u8u8(UINT8, uint as u8);
        } else if uint <= 0xffff {
            self.writer.u8u16(UINT16, uint as u16);
        } else if uint <= 0xffff_ffff {
            self.writer.u8u32(UINT32, uint as u32);
        } else {
            self.writer.u8u64(UINT64, uint);
        }
    }

    pub fn write_str_hdr(&mut self, length: usize) {
        if length <= 0x1f {
            self.writer.u8(FIXSTR | length as u8);
        } else if length <= 0xff {
            self.writer.u8u8(STR8, length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(STR16, length as u16);
        } else {
            self.writer.u8u32(STR32, length as u32);
        }
    }

    pub fn write_str(&mut self, s: &str) {
        self.write_str_hdr(s.len());
        self.writer.utf8(s);
    }

    pub fn write_bin_hdr(&mut self, length: usize) {
        if length <= 0xff {
            self.writer.u8u8(BIN8, length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(BIN16, length as u16);
        } else {
            self.writer.u8u32(BIN32, length as u32);
        }
    }

    pub fn write_bin(&mut self, buf: &[u8]) {
        self.write_bin_hdr(buf.len());
        self.writer.buf(buf);
    }

    pub fn write_arr_hdr(&mut self, length: usize) {
        if length <= 0xf {
            self.writer.u8(FIXARRAY | length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(ARRAY16, length as u16);
        } else {
            self.writer.u8u32(ARRAY32, length as u32);
        }
    }

    pub fn write_arr(&mut self, items: &[Value]) {
        self.write_arr_hdr(items.len());
        for item in items {
            self.write_any(item);
        }
    }

    pub fn write_map_hdr(&mut self, length: usize) {
        if length <= 0xf {
            self.writer.u8(FIXMAP | length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(MAP16, length as u16);
        } else {
            self.writer.u8u32(MAP32, length as u32);
        }
    }

    /// Keys are written as the values they are; no string coercion.
    pub fn write_map(&mut self, entries: &[(Value, Value)]) {
        self.write_map_hdr(entries.len());
        for (key, val) in entries {
            self.write_any(key);
            self.write_any(val);
        }
    }

    pub fn write_ext_hdr(&mut self, ext_type: i8, length: usize) {
        let tag = ext_type as u8;
        match length {
            1 => self.writer.u8u8(FIXEXT1, tag),
            2 => self.writer.u8u8(FIXEXT2, tag),
            4 => self.writer.u8u8(FIXEXT4, tag),
            8 => self.writer.u8u8(FIXEXT8, tag),
            16 => self.writer.u8u8(FIXEXT16, tag),
            _ => {
                if length <= 0xff {
                    self.writer.u8u8(EXT8, length as u8);
                } else if length <= 0xffff {
                    self.writer.u8u16(EXT16, length as u16);
                } else {
                    self.writer.u8u32(EXT32, length as u32);
                }
                self.writer.u8(tag);
            }
        }
    }

    pub fn write_ext(&mut self, ext: &Extension) {
        self.write_ext_hdr(ext.ext_type, ext.data.len());
        self.writer.buf(&ext.data);
    }
}
