//! Streaming frame reader with resynchronization
//!
//! Turns an undifferentiated byte stream into completed frame bodies. The
//! reader is a two-state machine: scan for a 5-byte header opening with the
//! magic pair, then accumulate exactly the declared number of body bytes.
//! Bad magic bytes are skipped one candidate position at a time so a
//! corrupted stretch of stream can never stall the reader.
//!
//! Reads from the source are batched internally; framing decisions are
//! identical to byte-at-a-time consumption.

use crate::constants::{declared_len, ENVELOPE_HEADER_LEN, ENVELOPE_MAGIC};
use crate::error::RecError;
use crate::types::Frame;
use bytes::{Buf, BytesMut};
use std::io::{ErrorKind, Read};

#[cfg(feature = "logging")]
use tracing::{debug, warn};

const READ_CHUNK: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingHeader,
    AccumulatingBody { target: usize, header_offset: u64 },
}

/// Counters accumulated while reading a stream
#[derive(Debug, Clone, Default)]
pub struct ReaderStats {
    /// Bytes the framer has advanced past (headers, bodies, and resync
    /// discards); read-ahead still sitting in the buffer is not counted
    pub bytes_consumed: u64,

    /// Completed frames emitted
    pub frames_emitted: u64,

    /// Bytes discarded while hunting for a valid header
    pub resync_bytes_skipped: u64,
}

/// Parse a 5-byte envelope header, returning the declared body length
///
/// Any length the 24-bit field can declare is valid; the body is accepted
/// at whatever size the header announces.
pub fn parse_header(header: &[u8; ENVELOPE_HEADER_LEN]) -> Result<usize, RecError> {
    if header[0] != ENVELOPE_MAGIC[0] || header[1] != ENVELOPE_MAGIC[1] {
        return Err(RecError::BadMagic([header[0], header[1]]));
    }

    Ok(declared_len(header) as usize)
}

/// Pull-based frame reader over any byte source
///
/// The source is owned exclusively by the reader; frames come out in exactly
/// the order their bodies complete in the input.
pub struct FrameReader<R> {
    source: R,
    pending: BytesMut,
    state: State,
    /// Absolute stream offset of the first pending byte
    offset: u64,
    eof: bool,
    done: bool,
    stats: ReaderStats,
}

impl<R: Read> FrameReader<R> {
    /// Create a reader over `source`
    pub fn new(source: R) -> Self {
        Self {
            source,
            pending: BytesMut::with_capacity(READ_CHUNK),
            state: State::AwaitingHeader,
            offset: 0,
            eof: false,
            done: false,
            stats: ReaderStats::default(),
        }
    }

    /// Counters observed so far
    pub fn stats(&self) -> ReaderStats {
        ReaderStats {
            bytes_consumed: self.offset,
            ..self.stats.clone()
        }
    }

    /// Advance to the next completed frame
    ///
    /// Returns `Ok(None)` once the source is cleanly exhausted. End of
    /// stream mid-header or mid-body yields
    /// [`RecError::TruncatedStream`]; no partial frame is ever emitted,
    /// and subsequent calls return `Ok(None)`.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, RecError> {
        if self.done {
            return Ok(None);
        }

        loop {
            match self.state {
                State::AwaitingHeader => {
                    if self.pending.len() < ENVELOPE_HEADER_LEN {
                        if self.fill()? {
                            continue;
                        }
                        self.done = true;
                        if self.pending.is_empty() {
                            return Ok(None);
                        }
                        return Err(RecError::TruncatedStream {
                            expected: ENVELOPE_HEADER_LEN,
                            actual: self.pending.len(),
                        });
                    }

                    let mut header = [0u8; ENVELOPE_HEADER_LEN];
                    header.copy_from_slice(&self.pending[..ENVELOPE_HEADER_LEN]);

                    match parse_header(&header) {
                        Ok(target) => {
                            let header_offset = self.offset;
                            self.advance(ENVELOPE_HEADER_LEN);
                            self.state = State::AccumulatingBody {
                                target,
                                header_offset,
                            };
                        }
                        Err(_err) => {
                            #[cfg(feature = "logging")]
                            warn!(offset = self.offset, error = %_err, "resynchronizing");
                            self.resync();
                        }
                    }
                }

                State::AccumulatingBody {
                    target,
                    header_offset,
                } => {
                    if self.pending.len() < target {
                        if self.fill()? {
                            continue;
                        }
                        self.done = true;
                        return Err(RecError::TruncatedStream {
                            expected: target,
                            actual: self.pending.len(),
                        });
                    }

                    let bytes = self.pending.split_to(target).freeze();
                    self.offset += target as u64;
                    self.state = State::AwaitingHeader;
                    self.stats.frames_emitted += 1;

                    #[cfg(feature = "logging")]
                    debug!(offset = header_offset, len = target, "frame complete");

                    return Ok(Some(Frame {
                        offset: header_offset,
                        bytes,
                    }));
                }
            }
        }
    }

    /// Discard bytes up to the next candidate magic byte
    ///
    /// A header can only begin at a `0x0D` byte, so jumping straight to the
    /// next one is observably identical to discarding one byte at a time.
    /// At least one byte is always consumed, which bounds resynchronization
    /// by the stream length.
    fn resync(&mut self) {
        let skip = match memchr::memchr(ENVELOPE_MAGIC[0], &self.pending[1..]) {
            Some(pos) => pos + 1,
            None => self.pending.len(),
        };
        self.advance(skip);
        self.stats.resync_bytes_skipped += skip as u64;
    }

    fn advance(&mut self, n: usize) {
        self.pending.advance(n);
        self.offset += n as u64;
    }

    /// Pull more bytes from the source; `Ok(false)` means end of stream
    fn fill(&mut self) -> Result<bool, RecError> {
        if self.eof {
            return Ok(false);
        }
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match self.source.read(&mut chunk) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(false);
                }
                Ok(n) => {
                    self.pending.extend_from_slice(&chunk[..n]);
                    return Ok(true);
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = Result<Frame, RecError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}

/// Read every recoverable frame out of an in-memory buffer
///
/// Stops at clean end of stream or at truncation; frames recovered up to
/// that point stand. Use [`FrameReader`] directly when the distinction
/// matters.
pub fn scan_stream(data: &[u8]) -> (Vec<Frame>, ReaderStats) {
    let mut reader = FrameReader::new(std::io::Cursor::new(data));
    let mut frames = Vec::new();
    loop {
        match reader.next_frame() {
            Ok(Some(frame)) => frames.push(frame),
            Ok(None) | Err(_) => break,
        }
    }
    (frames, reader.stats())
}
