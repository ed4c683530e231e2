//! Ground steering handler (message identifier 1090)

use envrec_core::proto::{WireReader, WIRE_FIXED32};
use envrec_core::{PayloadHandler, RecError};

fn handler_err(err: RecError) -> RecError {
    RecError::Handler(format!("ground steering payload: {}", err))
}

/// Decode the single scalar of a ground steering request
///
/// Schema: field 1 `groundSteering` (float).
pub fn decode_ground_steering(payload: &[u8]) -> Result<f32, RecError> {
    let mut reader = WireReader::new(payload);
    let mut angle = 0.0f32;

    while !reader.is_done() {
        let (field, wire) = reader.read_tag().map_err(handler_err)?;
        match (field, wire) {
            (1, WIRE_FIXED32) => {
                angle = f32::from_bits(reader.read_fixed32().map_err(handler_err)?)
            }
            (_, wire) => reader.skip(wire).map_err(handler_err)?,
        }
    }

    Ok(angle)
}

/// Prints each decoded ground steering angle, as the original replay tool did
#[derive(Debug, Default)]
pub struct GroundSteeringPrinter {
    /// Number of readings handled
    pub readings: u64,
}

impl PayloadHandler for GroundSteeringPrinter {
    fn handle(&mut self, _data_type: i32, payload: &[u8]) -> Result<(), RecError> {
        let angle = decode_ground_steering(payload)?;
        self.readings += 1;
        println!("groundSteering = {}", angle);
        Ok(())
    }
}
