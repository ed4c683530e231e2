//! Minimal protobuf wire-format primitives
//!
//! The envelope schema is plain protobuf. This module carries just enough of
//! the wire format to decode the five-field envelope (and its embedded
//! timestamps), plus the matching writers used to produce synthetic
//! recordings in tests and tools. Unknown fields are skippable so newer
//! recordings remain readable.

use crate::error::RecError;
use bytes::{BufMut, BytesMut};

/// Varint wire type
pub const WIRE_VARINT: u8 = 0;
/// 64-bit fixed wire type
pub const WIRE_FIXED64: u8 = 1;
/// Length-delimited wire type
pub const WIRE_LEN: u8 = 2;
/// 32-bit fixed wire type
pub const WIRE_FIXED32: u8 = 5;

/// Cursor over a protobuf-encoded buffer
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    /// Create a reader over `buf`
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Whether all input has been consumed
    pub fn is_done(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn malformed(&self, what: &str) -> RecError {
        RecError::Decode(format!("{} at byte {}", what, self.pos))
    }

    /// Read a varint
    pub fn read_varint(&mut self) -> Result<u64, RecError> {
        let mut value = 0u64;
        let mut shift = 0u32;
        loop {
            let byte = *self
                .buf
                .get(self.pos)
                .ok_or_else(|| self.malformed("varint runs past end of input"))?;
            self.pos += 1;
            if shift >= 64 {
                return Err(self.malformed("varint longer than 10 bytes"));
            }
            value |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }

    /// Read a field tag, returning (field number, wire type)
    pub fn read_tag(&mut self) -> Result<(u32, u8), RecError> {
        let tag = self.read_varint()?;
        let field = (tag >> 3) as u32;
        let wire = (tag & 0x07) as u8;
        if field == 0 {
            return Err(self.malformed("field number 0"));
        }
        Ok((field, wire))
    }

    /// Read a length-delimited chunk (bytes, string, or sub-message)
    pub fn read_len_delimited(&mut self) -> Result<&'a [u8], RecError> {
        let len = self.read_varint()? as usize;
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.buf.len())
            .ok_or_else(|| self.malformed("length-delimited field runs past end of input"))?;
        let chunk = &self.buf[self.pos..end];
        self.pos = end;
        Ok(chunk)
    }

    /// Read a 32-bit fixed field (little-endian)
    pub fn read_fixed32(&mut self) -> Result<u32, RecError> {
        let end = self.pos + 4;
        if end > self.buf.len() {
            return Err(self.malformed("fixed32 runs past end of input"));
        }
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.buf[self.pos..end]);
        self.pos = end;
        Ok(u32::from_le_bytes(raw))
    }

    /// Read a 64-bit fixed field (little-endian)
    pub fn read_fixed64(&mut self) -> Result<u64, RecError> {
        let end = self.pos + 8;
        if end > self.buf.len() {
            return Err(self.malformed("fixed64 runs past end of input"));
        }
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.buf[self.pos..end]);
        self.pos = end;
        Ok(u64::from_le_bytes(raw))
    }

    /// Skip over one field of the given wire type
    pub fn skip(&mut self, wire_type: u8) -> Result<(), RecError> {
        match wire_type {
            WIRE_VARINT => self.read_varint().map(|_| ()),
            WIRE_FIXED64 => self.read_fixed64().map(|_| ()),
            WIRE_LEN => self.read_len_delimited().map(|_| ()),
            WIRE_FIXED32 => self.read_fixed32().map(|_| ()),
            other => Err(self.malformed(&format!("unsupported wire type {}", other))),
        }
    }
}

/// Write a varint
pub fn put_varint(buf: &mut BytesMut, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Write a field tag
pub fn put_tag(buf: &mut BytesMut, field: u32, wire_type: u8) {
    put_varint(buf, (u64::from(field) << 3) | u64::from(wire_type));
}

/// Write a varint field
pub fn put_varint_field(buf: &mut BytesMut, field: u32, value: u64) {
    put_tag(buf, field, WIRE_VARINT);
    put_varint(buf, value);
}

/// Write a bytes field
pub fn put_bytes_field(buf: &mut BytesMut, field: u32, data: &[u8]) {
    put_tag(buf, field, WIRE_LEN);
    put_varint(buf, data.len() as u64);
    buf.put_slice(data);
}

/// Write an embedded message field
pub fn put_message_field(buf: &mut BytesMut, field: u32, message: &[u8]) {
    put_bytes_field(buf, field, message);
}

/// Write a float field (fixed32)
pub fn put_float_field(buf: &mut BytesMut, field: u32, value: f32) {
    put_tag(buf, field, WIRE_FIXED32);
    buf.put_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varint_round_trip() {
        for value in [0u64, 1, 127, 128, 300, u32::MAX as u64, u64::MAX] {
            let mut buf = BytesMut::new();
            put_varint(&mut buf, value);
            let mut reader = WireReader::new(&buf);
            assert_eq!(reader.read_varint().unwrap(), value);
            assert!(reader.is_done());
        }
    }

    #[test]
    fn test_truncated_varint_is_error() {
        let mut reader = WireReader::new(&[0x80, 0x80]);
        assert!(reader.read_varint().is_err());
    }

    #[test]
    fn test_tag_round_trip() {
        let mut buf = BytesMut::new();
        put_tag(&mut buf, 6, WIRE_VARINT);
        let mut reader = WireReader::new(&buf);
        assert_eq!(reader.read_tag().unwrap(), (6, WIRE_VARINT));
    }

    #[test]
    fn test_len_delimited_past_end_is_error() {
        // declares 16 bytes, provides 2
        let mut reader = WireReader::new(&[0x10, 0xAA, 0xBB]);
        assert!(reader.read_len_delimited().is_err());
    }

    #[test]
    fn test_skip_unknown_field() {
        let mut buf = BytesMut::new();
        put_varint_field(&mut buf, 9, 42);
        put_float_field(&mut buf, 10, 1.5);
        let mut reader = WireReader::new(&buf);
        let (field, wire) = reader.read_tag().unwrap();
        assert_eq!(field, 9);
        reader.skip(wire).unwrap();
        let (field, wire) = reader.read_tag().unwrap();
        assert_eq!(field, 10);
        reader.skip(wire).unwrap();
        assert!(reader.is_done());
    }
}
