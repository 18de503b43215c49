//! Mock scale implementation for testing and development.
//!
//! This module provides a simulated scale that answers host commands with
//! scripted replies, without requiring a serial port.

pub mod scale;

// Re-export commonly used types
pub use scale::{MockOpener, MockResponse, MockScale, MockScaleHandle};
