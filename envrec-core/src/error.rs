//! Error types for recording replay operations

/// Errors that can occur while reading or dispatching a recording
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecError {
    /// Invalid envelope magic detected at a header position
    #[error("invalid envelope magic: expected 0D A4, got {0:02X?}")]
    BadMagic([u8; 2]),

    /// Body length exceeds what the 24-bit length field can encode
    #[error("envelope body length {0} exceeds maximum {1}")]
    EnvelopeTooLarge(u32, u32),

    /// Stream ended mid-header or mid-body
    #[error("truncated stream: expected {expected} bytes, got {actual}")]
    TruncatedStream {
        /// The number of bytes the header or body still required.
        expected: usize,
        /// The number of bytes actually available.
        actual: usize,
    },

    /// A completed frame did not parse under the envelope schema
    #[error("envelope decode error: {0}")]
    Decode(String),

    /// A payload handler rejected its payload
    #[error("handler error: {0}")]
    Handler(String),

    /// IO error while reading the byte source
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for RecError {
    fn from(err: std::io::Error) -> Self {
        RecError::Io(err.to_string())
    }
}
