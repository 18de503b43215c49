//! Scale reply parser.
//!
//! Turns one complete reply into a [`ParseOutcome`] or an error.
//!
//! # Reply Format
//!
//! ```text
//! <LF>02.494LB<CR><LF>S00<CR><ETX>     stable weight
//! <LF>S20<CR><ETX>                     no weight (zero, motion, faults)
//! ```
//!
//! The parser first strips framing (`STX`, `ETX`, surrounding whitespace),
//! splits the remainder into lines, and reads the status from the last line.
//! Only an OK status goes on to read the weight line.
//!
//! # Outcomes
//!
//! | Frame | Result |
//! |-------|--------|
//! | OK, parseable weight | `Ok(Reading { Ok, weight, units })` |
//! | OK, garbled weight digits | `Ok(Reading { Ok, 0.0, units })` |
//! | zero or motion | `Ok(NoReading(status))` |
//! | under/over capacity, hardware fault | `Err(Error::ScaleFault)` |
//! | too short, no marker, bad status bytes | `Err(Error::InvalidFrame)` and friends |
//!
//! A garbled weight under an OK status is not treated as an error: the scale
//! itself reported no fault, and failing the call would make a polling service
//! flap on line noise.
//!
//! # Examples
//!
//! ```
//! use checkout_scale_protocol::{FrameParser, ParseOutcome};
//! use checkout_scale_core::WeightStatus;
//!
//! let parser = FrameParser::default();
//!
//! let outcome = parser.parse(b"\n02.494LB\r\nS00\r\x03").unwrap();
//! let reading = outcome.into_reading().unwrap();
//! assert_eq!(reading.total, 2.494);
//! assert_eq!(reading.units, "LB");
//!
//! let outcome = parser.parse(b"\nS20\r\x03").unwrap();
//! assert_eq!(outcome, ParseOutcome::NoReading(WeightStatus::Zero));
//!
//! assert!(parser.parse(b"\x03").is_err());
//! ```

use checkout_scale_core::{Error, Result, WeightReading, WeightStatus, constants::*};
use tracing::debug;

use crate::{layout::FrameLayout, status::StatusFlags};

/// Result of parsing a well-formed reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Stable, fully populated reading.
    Reading(WeightReading),

    /// The scale is in a transient state with no stable weight yet.
    NoReading(WeightStatus),
}

impl ParseOutcome {
    /// The reading, if any.
    pub fn into_reading(self) -> Option<WeightReading> {
        match self {
            Self::Reading(reading) => Some(reading),
            Self::NoReading(_) => None,
        }
    }

    /// Status reported by the scale for this reply.
    pub fn status(&self) -> WeightStatus {
        match self {
            Self::Reading(reading) => reading.status,
            Self::NoReading(status) => *status,
        }
    }
}

/// Parser for scale replies laid out by a [`FrameLayout`].
#[derive(Debug, Clone, Default)]
pub struct FrameParser {
    layout: FrameLayout,
}

impl FrameParser {
    /// Create a parser for a validated layout.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the layout is inconsistent.
    pub fn new(layout: FrameLayout) -> Result<Self> {
        layout.validate()?;
        Ok(Self { layout })
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    /// Parse a reply to the weigh command.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidFrame` if the frame is not ASCII, has no lines, or
    ///   has more lines than a weigh reply can carry
    /// - `Error::MissingField` if the status bytes, the weight line, or the
    ///   unit field are missing
    /// - `Error::InvalidStatus` if the status line is malformed
    /// - `Error::ScaleFault` if the scale reports a fault or a weight out of
    ///   its range
    pub fn parse(&self, raw: &[u8]) -> Result<ParseOutcome> {
        let lines = split_lines(raw)?;
        let (status_line, rest) = lines
            .split_last()
            .ok_or_else(|| Error::InvalidFrame("Empty frame".to_string()))?;

        let status = self.decode_status_line(status_line)?;

        if status.is_fault() {
            return Err(Error::ScaleFault { status });
        }
        if status.is_transient() {
            return Ok(ParseOutcome::NoReading(status));
        }

        let weight_line = match rest {
            [] => return Err(Error::MissingField("weight line".to_string())),
            [line] => *line,
            _ => {
                return Err(Error::InvalidFrame(format!(
                    "Expected at most 2 lines, got {}",
                    lines.len()
                )));
            }
        };

        // Scales that trim trailing padding may end the line inside the unit field.
        let units_end = self.layout.units.end.min(weight_line.len());
        let units = weight_line
            .get(self.layout.units.start..units_end)
            .map(str::trim)
            .filter(|units| !units.is_empty())
            .ok_or_else(|| Error::MissingField("units".to_string()))?;

        let field = weight_line.get(self.layout.weight.clone()).unwrap_or("");
        let total = parse_weight_field(field).unwrap_or_else(|| {
            debug!(field, "Unparseable weight under OK status, reporting zero");
            0.0
        });

        WeightReading::new(status, total, units).map(ParseOutcome::Reading)
    }

    /// Parse a reply to the status command, or the status line of any reply.
    ///
    /// # Errors
    ///
    /// Same framing and status errors as [`FrameParser::parse`]. Fault
    /// statuses are returned as values, not errors.
    pub fn parse_status(&self, raw: &[u8]) -> Result<WeightStatus> {
        let lines = split_lines(raw)?;
        let status_line = lines
            .last()
            .ok_or_else(|| Error::InvalidFrame("Empty frame".to_string()))?;
        self.decode_status_line(status_line)
    }

    fn decode_status_line(&self, line: &str) -> Result<WeightStatus> {
        if line.as_bytes().first() != Some(&self.layout.status_marker) {
            return Err(Error::InvalidStatus(format!(
                "Status line must start with '{}': {line:?}",
                self.layout.status_marker as char
            )));
        }

        let bytes = line
            .as_bytes()
            .get(self.layout.status.clone())
            .ok_or_else(|| Error::MissingField("status bytes".to_string()))?;

        Ok(StatusFlags::from_bytes(bytes)?.classify())
    }
}

/// Strip framing and split a reply into its non-blank lines.
fn split_lines(raw: &[u8]) -> Result<Vec<&str>> {
    if !raw.is_ascii() {
        return Err(Error::InvalidFrame("Frame contains non-ASCII bytes".to_string()));
    }
    // ASCII is always valid UTF-8
    let text = std::str::from_utf8(raw).map_err(|e| Error::InvalidFrame(e.to_string()))?;

    let is_framing = |c: char| c == START_BYTE as char || c == END_BYTE as char;
    let lines: Vec<&str> = text
        .split([CARRIAGE_RETURN as char, LINE_FEED as char])
        .map(|line| line.trim_matches(is_framing))
        .filter(|line| !line.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(Error::InvalidFrame("Frame has no content".to_string()));
    }
    Ok(lines)
}

/// Parse a fixed-width weight field such as `02.494` or ` 2.494`.
///
/// Returns `None` for anything other than an optionally signed decimal number.
fn parse_weight_field(field: &str) -> Option<f64> {
    let field = field.trim();
    let digits = field.strip_prefix(['+', '-']).unwrap_or(field);
    if digits.is_empty()
        || !digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        || !digits.chars().any(|c| c.is_ascii_digit())
        || digits.matches('.').count() > 1
    {
        return None;
    }
    field.parse::<f64>().ok().filter(|total| total.is_finite())
}
