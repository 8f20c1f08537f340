//! Byte-stream framing for the RTD serial protocol.
//!
//! The console emits frames delimited by `0x16` (start) and `0x17` (end),
//! but the serial layer delivers arbitrarily sized chunks: a frame may span
//! any number of chunks and one chunk may contain several frames. [`Framer`]
//! accumulates chunks and yields each complete frame, inclusive of both
//! marker bytes, in arrival order.
//!
//! Frame boundaries are "first start, first end after it". If a second start
//! marker appears before an end marker, it is swallowed as frame payload.
//! That is the protocol's own assumption, not a defect: payload bytes are
//! printable ASCII, so a stray `0x16` can only come from line noise inside an
//! already-corrupt frame.

use bytes::{Buf, Bytes, BytesMut};
use tracing::{trace, warn};

use crate::packet::{FRAME_END, FRAME_START};

/// Default cap on bytes retained between `feed` calls.
///
/// Real frames are well under 1KiB; a buffer this large means the stream is
/// corrupt (a start marker whose end marker never arrived).
pub const DEFAULT_MAX_BUFFER: usize = 4096;

/// Accumulates serial chunks and extracts complete delimited frames.
///
/// The internal buffer persists across [`feed`](Framer::feed) calls. Feeding
/// never fails; incomplete frames simply wait for more bytes.
#[derive(Debug)]
pub struct Framer {
    buf: BytesMut,
    max_buffer: usize,
}

impl Default for Framer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framer {
    /// Create a framer with the default buffer bound.
    pub fn new() -> Self {
        Self::with_max_buffer(DEFAULT_MAX_BUFFER)
    }

    /// Create a framer with a custom buffer bound.
    pub fn with_max_buffer(max_buffer: usize) -> Self {
        Self { buf: BytesMut::new(), max_buffer }
    }

    /// Append a chunk and extract every complete frame it unlocked.
    ///
    /// Frames are returned in arrival order, each spanning `[0x16, 0x17]`
    /// inclusive. Bytes belonging to a trailing partial frame are retained
    /// for the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Bytes> {
        trace!(len = chunk.len(), buffered = self.buf.len(), "chunk received");
        self.buf.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(frame) = self.take_frame() {
            frames.push(frame);
        }

        self.enforce_bound();
        frames
    }

    /// Discard any buffered partial frame.
    ///
    /// Called on disconnect; a frame torn across the disconnect boundary must
    /// not be stitched to bytes from a later session.
    pub fn reset(&mut self) {
        if !self.buf.is_empty() {
            trace!(dropped = self.buf.len(), "framer reset, discarding partial frame");
        }
        self.buf.clear();
    }

    /// Number of bytes currently retained waiting for a frame boundary.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    fn take_frame(&mut self) -> Option<Bytes> {
        let start = self.buf.iter().position(|&b| b == FRAME_START)?;
        let end = start + self.buf[start..].iter().position(|&b| b == FRAME_END)?;

        // Everything through `end` leaves the buffer; inter-frame noise
        // before `start` is dropped with it.
        let mut head = self.buf.split_to(end + 1);
        head.advance(start);
        Some(head.freeze())
    }

    /// Resynchronize when a start marker's end marker never arrives.
    ///
    /// Drops the oldest bytes up to and excluding the next start marker,
    /// clearing entirely if there is none. Only reachable when the buffer
    /// holds no complete frame.
    fn enforce_bound(&mut self) {
        while self.buf.len() > self.max_buffer {
            match self.buf[1..].iter().position(|&b| b == FRAME_START) {
                Some(i) => {
                    warn!(dropped = i + 1, "framer buffer over limit, resynchronizing");
                    self.buf.advance(i + 1);
                }
                None => {
                    warn!(dropped = self.buf.len(), "framer buffer over limit, clearing");
                    self.buf.clear();
                }
            }
        }
    }
}
