//! Sequential replay loop: frames to envelopes to handlers
//!
//! One logical task pulls the byte source to exhaustion. Envelopes are
//! decoded and dispatched in exactly the order their frames complete; a
//! frame that fails to decode or a payload a handler rejects is counted and
//! skipped, never fatal. Only I/O failures abort the loop.

use crate::dispatch::Dispatcher;
use crate::envelope::decode_envelope;
use crate::error::RecError;
use crate::reader::FrameReader;
use std::io::Read;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Outcome counters for one replay run
#[derive(Debug, Clone, Default)]
pub struct ReplayStats {
    /// Completed frames delivered by the reader
    pub frames: u64,

    /// Frames that decoded into envelopes
    pub records: u64,

    /// Envelopes routed to a registered handler
    pub dispatched: u64,

    /// Envelopes with no handler for their identifier
    pub unknown: u64,

    /// Frames dropped because they did not parse as envelopes
    pub decode_failures: u64,

    /// Payloads rejected by their handler
    pub handler_failures: u64,

    /// Bytes discarded during header resynchronization
    pub resync_bytes_skipped: u64,

    /// Whether the stream ended mid-header or mid-body
    pub truncated: bool,
}

/// Drain `reader`, decoding and dispatching every recoverable envelope
pub fn replay<R: Read>(
    mut reader: FrameReader<R>,
    dispatcher: &mut Dispatcher,
) -> Result<ReplayStats, RecError> {
    let mut stats = ReplayStats::default();

    loop {
        match reader.next_frame() {
            Ok(Some(frame)) => {
                stats.frames += 1;
                let envelope = match decode_envelope(&frame.bytes) {
                    Ok(envelope) => envelope,
                    Err(_err) => {
                        #[cfg(feature = "logging")]
                        warn!(offset = frame.offset, error = %_err, "dropping undecodable frame");
                        stats.decode_failures += 1;
                        continue;
                    }
                };
                stats.records += 1;

                #[cfg(feature = "logging")]
                debug!(
                    data_type = envelope.data_type,
                    sender_stamp = envelope.sender_stamp,
                    sent = envelope.sent.total_micros(),
                    received = envelope.received.total_micros(),
                    sample_time = envelope.sample_time_stamp.total_micros(),
                    "envelope"
                );

                match dispatcher.dispatch(&envelope) {
                    Ok(true) => stats.dispatched += 1,
                    Ok(false) => stats.unknown += 1,
                    Err(_err) => {
                        #[cfg(feature = "logging")]
                        warn!(
                            data_type = envelope.data_type,
                            error = %_err,
                            "handler rejected payload"
                        );
                        stats.handler_failures += 1;
                    }
                }
            }
            Ok(None) => break,
            Err(RecError::TruncatedStream { expected, actual }) => {
                #[cfg(feature = "logging")]
                warn!(expected, actual, "stream truncated, stopping");
                let _ = (expected, actual);
                stats.truncated = true;
                break;
            }
            Err(err) => return Err(err),
        }
    }

    stats.resync_bytes_skipped = reader.stats().resync_bytes_skipped;
    Ok(stats)
}
