//! Constants for the envelope recording format

/// Magic pair opening every envelope header
pub const ENVELOPE_MAGIC: [u8; 2] = [0x0D, 0xA4];

/// Envelope header size: magic byte + 4-byte little-endian length field
/// whose low byte doubles as the second magic byte
pub const ENVELOPE_HEADER_LEN: usize = 5;

/// Ceiling of the 24-bit length field (~16.7 MB)
///
/// Every value the header can declare is a valid body length; this bound
/// only matters when framing a body, since larger bodies cannot be
/// encoded at all.
pub const MAX_ENVELOPE_LEN: u32 = 0xFF_FFFF;

/// Message identifier for image readings in the standard message set
pub const IMAGE_READING: i32 = 1055;

/// Message identifier for ground steering requests in the standard message set
pub const GROUND_STEERING_REQUEST: i32 = 1090;

/// Decode the declared body length from a 5-byte envelope header
///
/// Bytes 1..5 form a little-endian u32 whose low byte (the second magic
/// byte) belongs to the header, so the length is that value shifted right
/// by 8 bits. Assumes the magic pair has already been checked.
pub const fn declared_len(header: &[u8; ENVELOPE_HEADER_LEN]) -> u32 {
    u32::from_le_bytes([header[1], header[2], header[3], header[4]]) >> 8
}
