//! Image reading handler (message identifier 1055)

use envrec_core::proto::{WireReader, WIRE_LEN, WIRE_VARINT};
use envrec_core::{PayloadHandler, RecError};

/// Decoded image reading message
///
/// Schema: field 1 `fourcc` (string), 2 `width` (uint32), 3 `height`
/// (uint32), 4 `data` (bytes).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageReading {
    /// Four-character codec code
    pub fourcc: String,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Encoded image container bytes
    pub data: Vec<u8>,
}

fn handler_err(err: RecError) -> RecError {
    RecError::Handler(format!("image payload: {}", err))
}

/// Decode one image reading message
pub fn decode_image_reading(payload: &[u8]) -> Result<ImageReading, RecError> {
    let mut reader = WireReader::new(payload);
    let mut image = ImageReading::default();

    while !reader.is_done() {
        let (field, wire) = reader.read_tag().map_err(handler_err)?;
        match (field, wire) {
            (1, WIRE_LEN) => {
                let raw = reader.read_len_delimited().map_err(handler_err)?;
                image.fourcc = String::from_utf8(raw.to_vec())
                    .map_err(|_| RecError::Handler("image payload: fourcc is not UTF-8".into()))?;
            }
            (2, WIRE_VARINT) => image.width = reader.read_varint().map_err(handler_err)? as u32,
            (3, WIRE_VARINT) => image.height = reader.read_varint().map_err(handler_err)? as u32,
            (4, WIRE_LEN) => image.data = reader.read_len_delimited().map_err(handler_err)?.to_vec(),
            (_, wire) => reader.skip(wire).map_err(handler_err)?,
        }
    }

    Ok(image)
}

/// Size declared inside the encoded container itself
///
/// The container opens with a 4-byte little-endian size field at byte
/// offset 2, which says how many bytes make up one encoded image.
pub fn embedded_container_size(data: &[u8]) -> Result<u32, RecError> {
    if data.len() < 6 {
        return Err(RecError::Handler(format!(
            "image container too short for its size field: {} bytes",
            data.len()
        )));
    }
    Ok(u32::from_le_bytes([data[2], data[3], data[4], data[5]]))
}

/// Reports each image's codec, dimensions, and declared container size
///
/// Decoding pixels and any display are outside this tool; the payload bytes
/// are handed over exactly as carried in the envelope.
#[derive(Debug, Default)]
pub struct ImageInspector {
    /// Number of images handled
    pub images: u64,
}

impl PayloadHandler for ImageInspector {
    fn handle(&mut self, _data_type: i32, payload: &[u8]) -> Result<(), RecError> {
        let image = decode_image_reading(payload)?;
        let declared = embedded_container_size(&image.data)?;

        if declared as usize > image.data.len() {
            return Err(RecError::Handler(format!(
                "declared image size {} exceeds {} available bytes",
                declared,
                image.data.len()
            )));
        }

        self.images += 1;
        println!(
            "image: fourcc={} {}x{}, container {} bytes",
            image.fourcc, image.width, image.height, declared
        );
        Ok(())
    }
}
