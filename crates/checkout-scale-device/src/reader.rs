//! One request/reply cycle against a scale.
//!
//! A cycle is single-shot: write the command, collect one reply within the
//! timeout, parse it. Nothing survives between cycles, and nothing is retried
//! here; retry policy belongs to whoever polls the scale.

use std::time::{Duration, Instant};

use bytes::Bytes;
use checkout_scale_core::{Error, WeightReading, WeightStatus, constants::*};
use checkout_scale_protocol::{FrameAccumulator, FrameParser, ParseOutcome};
use tracing::{debug, trace, warn};

use crate::error::{DeviceError, Result};
use crate::transport::SerialTransport;

/// Reads weights from a scale over a [`SerialTransport`].
#[derive(Debug)]
pub struct ScaleReader<T> {
    transport: T,
    parser: FrameParser,
    timeout: Duration,
}

impl<T: SerialTransport> ScaleReader<T> {
    /// Create a reader with the default reply layout.
    pub fn new(transport: T, timeout: Duration) -> Self {
        Self::with_parser(transport, FrameParser::default(), timeout)
    }

    /// Create a reader for a scale model with its own reply layout.
    pub fn with_parser(transport: T, parser: FrameParser, timeout: Duration) -> Self {
        Self {
            transport,
            parser,
            timeout,
        }
    }

    /// Request and decode the current weight.
    ///
    /// Returns `Ok(None)` while the scale is at zero or settling; callers
    /// should simply poll again.
    ///
    /// # Errors
    ///
    /// - transport errors (`Timeout`, `Disconnected`, ...) if the scale could
    ///   not be reached
    /// - `Error::InvalidFrame` and other protocol errors if the reply was
    ///   unintelligible or incomplete
    /// - `Error::ScaleFault` if the scale reported a fault or a weight outside
    ///   its range
    pub fn read_weight(&mut self) -> Result<Option<WeightReading>> {
        let frame = self.exchange(WEIGH_COMMAND)?;

        match self.parser.parse(&frame) {
            Ok(ParseOutcome::Reading(reading)) => {
                debug!(port = self.transport.port_name(), %reading, "Weight read");
                Ok(Some(reading))
            }
            Ok(ParseOutcome::NoReading(status)) => {
                debug!(port = self.transport.port_name(), %status, "No stable weight yet");
                Ok(None)
            }
            Err(err) => {
                warn!(port = self.transport.port_name(), error = %err, frame = ?frame, "Weigh reply rejected");
                Err(err.into())
            }
        }
    }

    /// Request the scale's status bytes.
    ///
    /// Fault statuses are returned as values here, not errors.
    ///
    /// # Errors
    ///
    /// Transport errors, or protocol errors for a malformed status reply.
    pub fn read_status(&mut self) -> Result<WeightStatus> {
        let frame = self.exchange(STATUS_COMMAND)?;
        Ok(self.parser.parse_status(&frame)?)
    }

    /// Write a command and collect one complete reply.
    ///
    /// Each read is bounded by the time left until the cycle's deadline, so
    /// the whole exchange never blocks longer than the configured timeout.
    fn exchange(&mut self, command: &[u8]) -> Result<Bytes> {
        self.transport.clear_input()?;
        self.transport.write_all(command)?;

        let deadline = Instant::now() + self.timeout;
        let mut acc = FrameAccumulator::new();
        let mut buf = [0u8; MAX_FRAME_SIZE];

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(self.expired(&acc));
            }
            self.transport.set_timeout(remaining)?;

            match self.transport.read(&mut buf) {
                Ok(n) => {
                    trace!(port = self.transport.port_name(), bytes = n, "Read chunk");
                    if let Some(frame) = acc.feed(&buf[..n])? {
                        return Ok(frame);
                    }
                }
                Err(DeviceError::Timeout { .. }) => return Err(self.expired(&acc)),
                Err(err) => return Err(err),
            }
        }
    }

    /// Error for a cycle that ran out of time.
    fn expired(&self, acc: &FrameAccumulator) -> DeviceError {
        if acc.has_received() {
            incomplete(acc)
        } else {
            DeviceError::timeout(duration_ms(self.timeout))
        }
    }
}

/// The scale started talking but never finished a reply.
fn incomplete(acc: &FrameAccumulator) -> DeviceError {
    Error::InvalidFrame(format!(
        "Incomplete reply: {} bytes without terminator",
        acc.pending()
    ))
    .into()
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
