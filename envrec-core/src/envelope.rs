//! Envelope schema decoding and synthetic-stream encoding
//!
//! A completed frame body is one protobuf-encoded envelope:
//!
//! | field | name            | type              |
//! |-------|-----------------|-------------------|
//! | 1     | dataType        | int32             |
//! | 2     | serializedData  | bytes             |
//! | 3     | sent            | TimeStamp message |
//! | 4     | received        | TimeStamp message |
//! | 5     | sampleTimeStamp | TimeStamp message |
//! | 6     | senderStamp     | uint32            |
//!
//! `TimeStamp` is field 1 `seconds` (int32) and field 2 `microseconds`
//! (int32). The framing layer never validates the payload carried in
//! `serializedData`.

use crate::constants::{ENVELOPE_HEADER_LEN, ENVELOPE_MAGIC, MAX_ENVELOPE_LEN};
use crate::error::RecError;
use crate::proto::{
    put_bytes_field, put_message_field, put_varint_field, WireReader, WIRE_LEN, WIRE_VARINT,
};
use crate::types::{Envelope, TimeStamp};
use bytes::{BufMut, Bytes, BytesMut};

/// Decode one envelope from a completed frame body
///
/// Unknown fields are skipped; truncated or malformed input yields
/// [`RecError::Decode`]. Missing fields keep their zero defaults.
pub fn decode_envelope(data: &[u8]) -> Result<Envelope, RecError> {
    let mut reader = WireReader::new(data);
    let mut envelope = Envelope::default();

    while !reader.is_done() {
        let (field, wire) = reader.read_tag()?;
        match (field, wire) {
            (1, WIRE_VARINT) => envelope.data_type = reader.read_varint()? as i32,
            (2, WIRE_LEN) => {
                envelope.payload = Bytes::copy_from_slice(reader.read_len_delimited()?)
            }
            (3, WIRE_LEN) => envelope.sent = decode_timestamp(reader.read_len_delimited()?)?,
            (4, WIRE_LEN) => envelope.received = decode_timestamp(reader.read_len_delimited()?)?,
            (5, WIRE_LEN) => {
                envelope.sample_time_stamp = decode_timestamp(reader.read_len_delimited()?)?
            }
            (6, WIRE_VARINT) => envelope.sender_stamp = reader.read_varint()? as u32,
            (_, wire) => reader.skip(wire)?,
        }
    }

    Ok(envelope)
}

fn decode_timestamp(data: &[u8]) -> Result<TimeStamp, RecError> {
    let mut reader = WireReader::new(data);
    let mut ts = TimeStamp::default();

    while !reader.is_done() {
        let (field, wire) = reader.read_tag()?;
        match (field, wire) {
            (1, WIRE_VARINT) => ts.seconds = reader.read_varint()? as i32,
            (2, WIRE_VARINT) => ts.microseconds = reader.read_varint()? as i32,
            (_, wire) => reader.skip(wire)?,
        }
    }

    Ok(ts)
}

/// Encode one envelope to its wire form
pub fn encode_envelope(envelope: &Envelope) -> Bytes {
    let mut buf = BytesMut::with_capacity(32 + envelope.payload.len());

    // int32 fields serialize as 64-bit two's complement varints
    put_varint_field(&mut buf, 1, envelope.data_type as i64 as u64);
    put_bytes_field(&mut buf, 2, &envelope.payload);
    put_message_field(&mut buf, 3, &encode_timestamp(&envelope.sent));
    put_message_field(&mut buf, 4, &encode_timestamp(&envelope.received));
    put_message_field(&mut buf, 5, &encode_timestamp(&envelope.sample_time_stamp));
    put_varint_field(&mut buf, 6, u64::from(envelope.sender_stamp));

    buf.freeze()
}

fn encode_timestamp(ts: &TimeStamp) -> BytesMut {
    let mut buf = BytesMut::with_capacity(12);
    put_varint_field(&mut buf, 1, ts.seconds as i64 as u64);
    put_varint_field(&mut buf, 2, ts.microseconds as i64 as u64);
    buf
}

/// Wrap a frame body in the 5-byte recording header
///
/// Layout: `0x0D`, then the little-endian u32 `(len << 8) | 0xA4` whose low
/// byte is the second magic byte. Used for synthetic recordings in tests and
/// tools; this layer otherwise never writes recordings.
pub fn encode_frame(body: &[u8]) -> Result<Bytes, RecError> {
    if body.len() as u64 > u64::from(MAX_ENVELOPE_LEN) {
        return Err(RecError::EnvelopeTooLarge(
            body.len() as u32,
            MAX_ENVELOPE_LEN,
        ));
    }

    let mut buf = BytesMut::with_capacity(ENVELOPE_HEADER_LEN + body.len());
    buf.put_u8(ENVELOPE_MAGIC[0]);
    buf.put_u32_le(((body.len() as u32) << 8) | u32::from(ENVELOPE_MAGIC[1]));
    buf.put_slice(body);
    Ok(buf.freeze())
}
