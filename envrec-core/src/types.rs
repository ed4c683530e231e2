//! Core types for envelope recordings

use crate::constants::{GROUND_STEERING_REQUEST, IMAGE_READING};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A seconds/microseconds pair as carried by envelope metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeStamp {
    /// Whole seconds
    pub seconds: i32,

    /// Microseconds within the second
    pub microseconds: i32,
}

impl TimeStamp {
    /// Create a new timestamp
    pub fn new(seconds: i32, microseconds: i32) -> Self {
        Self {
            seconds,
            microseconds,
        }
    }

    /// Total microseconds since the epoch of this timestamp
    pub fn total_micros(&self) -> i64 {
        self.seconds as i64 * 1_000_000 + self.microseconds as i64
    }
}

/// One decoded record from the recording
///
/// Envelopes are immutable once decoded: they are produced by the envelope
/// decoder, consumed once by the dispatcher, then dropped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Envelope {
    /// Identifier of the payload's semantic kind
    pub data_type: i32,

    /// Logical sender/channel identifier
    pub sender_stamp: u32,

    /// When the envelope was sent
    pub sent: TimeStamp,

    /// When the envelope was received
    pub received: TimeStamp,

    /// When the carried sample was taken
    pub sample_time_stamp: TimeStamp,

    /// Opaque payload bytes, interpreted only by the handler matching
    /// `data_type`
    pub payload: Bytes,
}

/// One completed frame body as delimited by the frame reader
///
/// The bytes are exactly the declared body length; the framing layer never
/// inspects them.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Stream offset of the frame's magic byte
    pub offset: u64,

    /// The body bytes
    pub bytes: Bytes,
}

impl Frame {
    /// Body length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the body is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Known message kinds from the standard message set
///
/// A closed mapping from `data_type` to the payloads this tool understands;
/// anything outside it is passed over by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Compressed camera frame (1055)
    ImageReading,
    /// Ground steering request carrying one scalar angle (1090)
    GroundSteeringRequest,
}

impl MessageKind {
    /// Look up a known kind by message identifier
    pub fn from_id(data_type: i32) -> Option<Self> {
        match data_type {
            IMAGE_READING => Some(MessageKind::ImageReading),
            GROUND_STEERING_REQUEST => Some(MessageKind::GroundSteeringRequest),
            _ => None,
        }
    }

    /// The message identifier for this kind
    pub fn id(&self) -> i32 {
        match self {
            MessageKind::ImageReading => IMAGE_READING,
            MessageKind::GroundSteeringRequest => GROUND_STEERING_REQUEST,
        }
    }

    /// Human-readable message name
    pub fn name(&self) -> &'static str {
        match self {
            MessageKind::ImageReading => "ImageReading",
            MessageKind::GroundSteeringRequest => "GroundSteeringRequest",
        }
    }
}
