//! Reply accumulation across partial serial reads.
//!
//! A serial read returns whatever bytes arrived before the timeout, which may
//! be half a reply or a reply preceded by line noise. [`FrameAccumulator`]
//! buffers those chunks and hands out the reply once its `ETX` arrives.
//!
//! ```text
//! ┌─────────────┐  LF or STX   ┌──────────┐  ETX   ┌─────────────┐
//! │WaitingStart │─────────────>│Collecting│───────>│Frame ready  │
//! └─────────────┘              └──────────┘        └─────────────┘
//!       │ other bytes               │ > MAX_FRAME_SIZE
//!       │ (discarded)               └──> Error::FrameTooLarge
//! ```
//!
//! An accumulator lives for one read cycle only. Bytes after the `ETX` of the
//! first complete reply are discarded with it.
//!
//! # Example
//!
//! ```
//! use checkout_scale_protocol::FrameAccumulator;
//!
//! let mut acc = FrameAccumulator::new();
//! assert!(acc.feed(b"\n02.49").unwrap().is_none());
//! let frame = acc.feed(b"4LB\r\nS00\r\x03").unwrap().unwrap();
//! assert_eq!(&frame[..], b"\n02.494LB\r\nS00\r\x03");
//! ```

use bytes::{Bytes, BytesMut};
use checkout_scale_core::{Error, Result, constants::*};
use tracing::trace;

/// State of the accumulator's scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulatorState {
    /// Discarding bytes until a line feed or STX opens a reply.
    WaitingStart,

    /// Buffering reply bytes until ETX.
    Collecting,
}

/// Buffers partial reads until one complete reply is available.
#[derive(Debug)]
pub struct FrameAccumulator {
    buffer: BytesMut,
    state: AccumulatorState,
    max_size: usize,
    discarded: usize,
}

impl FrameAccumulator {
    /// Create an accumulator bounded by `MAX_FRAME_SIZE`.
    pub fn new() -> Self {
        Self::with_max_size(MAX_FRAME_SIZE)
    }

    /// Create an accumulator with a custom size bound.
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(max_size.min(MAX_FRAME_SIZE)),
            state: AccumulatorState::WaitingStart,
            max_size,
            discarded: 0,
        }
    }

    /// Feed bytes from the transport.
    ///
    /// Returns the complete reply, including its opening and closing bytes,
    /// once the terminating ETX has been seen.
    ///
    /// # Errors
    ///
    /// Returns `Error::FrameTooLarge` if the reply grows past the size bound
    /// without a terminator.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Option<Bytes>> {
        for &byte in bytes {
            match self.state {
                AccumulatorState::WaitingStart => {
                    if byte == LINE_FEED || byte == START_BYTE {
                        self.state = AccumulatorState::Collecting;
                        self.buffer.extend_from_slice(&[byte]);
                    } else {
                        self.discarded += 1;
                    }
                }
                AccumulatorState::Collecting => {
                    if self.buffer.len() >= self.max_size {
                        self.buffer.clear();
                        self.state = AccumulatorState::WaitingStart;
                        return Err(Error::FrameTooLarge { max: self.max_size });
                    }
                    self.buffer.extend_from_slice(&[byte]);
                    if byte == END_BYTE {
                        if self.discarded > 0 {
                            trace!(discarded = self.discarded, "Skipped bytes before reply");
                        }
                        self.state = AccumulatorState::WaitingStart;
                        return Ok(Some(self.buffer.split().freeze()));
                    }
                }
            }
        }
        Ok(None)
    }

    pub fn state(&self) -> AccumulatorState {
        self.state
    }

    /// Bytes buffered towards an incomplete reply.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// True if any byte at all has been fed, kept or discarded.
    pub fn has_received(&self) -> bool {
        self.discarded > 0 || !self.buffer.is_empty()
    }
}

impl Default for FrameAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
