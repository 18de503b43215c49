//! Core constants for the checkout scale serial protocol.
//!
//! The scale speaks a terse ASCII protocol compatible with the NCR/Toledo
//! 8217 "weigh" command set. The host sends a single-letter command followed
//! by a carriage return, and the scale answers with one frame:
//!
//! ```text
//! stable:     <LF>02.494LB<CR><LF>S00<CR><ETX>
//! not stable: <LF>S20<CR><ETX>
//! ```
//!
//! Where:
//! - `<LF>` - Line feed opening each line (0x0A)
//! - `02.494` - Fixed-width weight field
//! - `LB` - Unit field (passed through verbatim)
//! - `S` - Status line marker
//! - `00` - Two status bytes, each `0x30 | bits`
//! - `<ETX>` - End of text marker (0x03)
//!
//! # Usage
//!
//! ```
//! use checkout_scale_core::constants::*;
//!
//! assert_eq!(WEIGH_COMMAND, b"W\r");
//! assert_eq!(STATUS_BYTE_BASE & STATUS_MOTION, 0);
//! ```

// ============================================================================
// Framing
// ============================================================================

/// Start of text marker. Some scale firmwares open the frame with it.
pub const START_BYTE: u8 = 0x02;

/// End of text marker closing every scale reply.
pub const END_BYTE: u8 = 0x03;

/// Carriage return, terminates each line and each host command.
pub const CARRIAGE_RETURN: u8 = b'\r';

/// Line feed, opens each line of a scale reply.
pub const LINE_FEED: u8 = b'\n';

/// Marker opening the status line.
pub const STATUS_MARKER: u8 = b'S';

/// Upper bound on a single reply. Anything longer is line noise.
pub const MAX_FRAME_SIZE: usize = 256;

// ============================================================================
// Host Commands
// ============================================================================

/// Request the current weight.
pub const WEIGH_COMMAND: &[u8] = b"W\r";

/// Request the status bytes only.
pub const STATUS_COMMAND: &[u8] = b"S\r";

// ============================================================================
// Status Bits
// ============================================================================

/// Every status byte has these high bits set so it stays printable ASCII.
pub const STATUS_BYTE_BASE: u8 = 0x30;

/// Mask for the four meaningful bits of a status byte.
pub const STATUS_BITS_MASK: u8 = 0x0F;

/// Byte 1, bit 0: platter in motion.
pub const STATUS_MOTION: u8 = 0x01;

/// Byte 1, bit 1: scale at zero.
pub const STATUS_AT_ZERO: u8 = 0x02;

/// Byte 1, bit 2: RAM error.
pub const STATUS_RAM_ERROR: u8 = 0x04;

/// Byte 1, bit 3: EEPROM error.
pub const STATUS_EEPROM_ERROR: u8 = 0x08;

/// Byte 2, bit 0: under capacity.
pub const STATUS_UNDER_CAPACITY: u8 = 0x01;

/// Byte 2, bit 1: over capacity.
pub const STATUS_OVER_CAPACITY: u8 = 0x02;

/// Byte 2, bit 2: ROM error.
pub const STATUS_ROM_ERROR: u8 = 0x04;

/// Byte 2, bit 3: faulty calibration.
pub const STATUS_CALIBRATION_ERROR: u8 = 0x08;

// ============================================================================
// Default Frame Layout
// ============================================================================

/// Width of the weight field on the weight line (`NN.NNN`).
pub const WEIGHT_FIELD_WIDTH: usize = 6;

/// Digits after the decimal point in the weight field.
pub const WEIGHT_DECIMALS: usize = 3;

/// Width of the unit field following the weight.
pub const UNIT_FIELD_WIDTH: usize = 2;

/// Number of status bytes after the status marker.
pub const STATUS_FIELD_WIDTH: usize = 2;

// ============================================================================
// Configuration Keys
// ============================================================================

/// Baud rate of the serial line.
pub const CONFIG_BAUD_RATE: &str = "BaudRate";

/// Data bits per character (5-8).
pub const CONFIG_DATA_BITS: &str = "DataBits";

/// Stop bits per character (1-2).
pub const CONFIG_STOP_BITS: &str = "StopBits";

/// Minimum number of bytes a single transport read asks for.
pub const CONFIG_MINIMUM_READ_SIZE: &str = "MinimumReadSize";

/// Parity mode: 0 none, 1 odd, 2 even.
pub const CONFIG_PARITY_MODE: &str = "ParityMode";

/// Read timeout in milliseconds.
pub const CONFIG_TIMEOUT_MILLI: &str = "TimeOutMilli";

// ============================================================================
// Configuration Defaults
// ============================================================================

/// Default baud rate.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default data bits. The 8217 protocol runs 7E1.
pub const DEFAULT_DATA_BITS: u8 = 7;

/// Default stop bits.
pub const DEFAULT_STOP_BITS: u8 = 1;

/// Default minimum read size in bytes.
pub const DEFAULT_MINIMUM_READ_SIZE: usize = 1;

/// Default parity mode (even).
pub const DEFAULT_PARITY_MODE: u8 = 2;

/// Default read timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MILLI: u64 = 500;

/// Largest accepted minimum read size.
pub const MAX_MINIMUM_READ_SIZE: usize = MAX_FRAME_SIZE;
