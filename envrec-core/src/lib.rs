//! # Envrec Core
//!
//! Reader for length-framed envelope recordings: the byte-level framing
//! state machine, the envelope decoder, and the dispatcher that routes each
//! payload to a type-specific handler.
//!
//! ## Modules
//!
//! - `constants`: Recording format constants and known message identifiers
//! - `types`: Core types (Frame, Envelope, TimeStamp, MessageKind)
//! - `proto`: Protobuf wire-format primitives for the envelope schema
//! - `envelope`: Envelope decoding and synthetic-stream encoding
//! - `reader`: Streaming frame reader with resynchronization
//! - `dispatch`: Payload routing keyed on message identifier
//! - `replay`: Sequential frame-to-handler replay loop

#![warn(missing_docs)]

pub mod constants;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod proto;
pub mod reader;
pub mod replay;
pub mod types;

// Re-export commonly used types
pub use dispatch::{Dispatcher, PayloadHandler};
pub use envelope::{decode_envelope, encode_envelope, encode_frame};
pub use error::RecError;
pub use reader::{FrameReader, ReaderStats};
pub use replay::{replay, ReplayStats};
pub use types::{Envelope, Frame, MessageKind, TimeStamp};

/// Result type alias for recording operations
pub type Result<T> = std::result::Result<T, RecError>;
