//! Common helpers for protocol integration tests.
//!
//! The canned replies mirror what a checkout scale sends for the situations
//! the driver must handle. Use them instead of hand-writing byte strings so
//! every test agrees on the wire format.

#![allow(dead_code)]

use checkout_scale_core::{WeightReading, WeightStatus};
use checkout_scale_protocol::{FrameAccumulator, FrameBuilder, FrameParser, ParseOutcome};

/// Stable 2.494 LB reading.
pub const STABLE_LB: &[u8] = b"\n02.494LB\r\nS00\r\x03";

/// Scale settled at zero.
pub const AT_ZERO: &[u8] = b"\nS20\r\x03";

/// Platter in motion.
pub const IN_MOTION: &[u8] = b"\nS10\r\x03";

/// Weight above capacity.
pub const OVER_CAPACITY: &[u8] = b"\nS02\r\x03";

/// OK status with garbled weight digits.
pub const GARBLED_WEIGHT: &[u8] = b"\n0?.4?4LB\r\nS00\r\x03";

/// Status line with bytes outside the status range.
pub const GARBLED_STATUS: &[u8] = b"\n02.494LB\r\nS?Z\r\x03";

/// Build a reply with the default layout.
pub fn reply(status: WeightStatus, total: f64, units: &str) -> Vec<u8> {
    FrameBuilder::default()
        .weight_reply(status, total, units)
        .expect("Failed to build reply")
        .to_vec()
}

/// Feed `bytes` in chunks of `chunk` bytes and return the first complete reply.
pub fn accumulate(bytes: &[u8], chunk: usize) -> Vec<u8> {
    let mut acc = FrameAccumulator::new();
    for piece in bytes.chunks(chunk.max(1)) {
        if let Some(frame) = acc.feed(piece).expect("Accumulator overflow") {
            return frame.to_vec();
        }
    }
    panic!("No complete reply in {bytes:?}");
}

/// Parse with the default layout.
pub fn parse(bytes: &[u8]) -> checkout_scale_core::Result<ParseOutcome> {
    FrameParser::default().parse(bytes)
}

/// Assert a reply parses to a stable reading.
pub fn assert_reading(bytes: &[u8], total: f64, units: &str) {
    let expected = WeightReading::ok(total, units).expect("Invalid expected reading");
    match parse(bytes) {
        Ok(ParseOutcome::Reading(reading)) => assert_eq!(reading, expected),
        other => panic!("Expected reading {expected}, got {other:?}"),
    }
}
