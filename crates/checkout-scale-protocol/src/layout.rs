//! Positional layout of a scale reply.
//!
//! Scale firmwares agree on the overall shape of a reply (an optional weight
//! line followed by a status line) but not on the columns each field occupies.
//! [`FrameLayout`] carries those columns so a new scale model only needs a new
//! layout value, never a new parser.

use std::ops::Range;

use checkout_scale_core::{Error, Result, constants::*};

/// Column ranges of the fields inside the weight and status lines.
///
/// Ranges are byte offsets into a line after the line terminators have been
/// removed. The status marker always sits in column 0 of the status line.
///
/// # Example
///
/// ```
/// use checkout_scale_protocol::FrameLayout;
///
/// let layout = FrameLayout::default();
/// assert_eq!(layout.weight, 0..6);
/// assert_eq!(layout.units, 6..8);
/// assert_eq!(layout.status, 1..3);
/// assert!(layout.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLayout {
    /// Columns of the numeric weight field on the weight line.
    pub weight: Range<usize>,

    /// Columns of the unit field on the weight line.
    pub units: Range<usize>,

    /// Columns of the status bytes on the status line.
    pub status: Range<usize>,

    /// Byte that opens the status line.
    pub status_marker: u8,

    /// Digits after the decimal point when formatting a weight.
    pub decimals: usize,
}

impl Default for FrameLayout {
    /// NCR/Toledo 8217 layout: `NN.NNNUU` and `SXY`.
    fn default() -> Self {
        Self {
            weight: 0..WEIGHT_FIELD_WIDTH,
            units: WEIGHT_FIELD_WIDTH..WEIGHT_FIELD_WIDTH + UNIT_FIELD_WIDTH,
            status: 1..1 + STATUS_FIELD_WIDTH,
            status_marker: STATUS_MARKER,
            decimals: WEIGHT_DECIMALS,
        }
    }
}

impl FrameLayout {
    /// Check that the layout describes fields a parser can extract.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if any field is empty, if the weight and unit
    /// fields overlap, if the status bytes overlap the marker column, or if
    /// the decimals do not fit in the weight field.
    pub fn validate(&self) -> Result<()> {
        if self.weight.is_empty() || self.units.is_empty() || self.status.is_empty() {
            return Err(Error::Config("Frame layout fields must not be empty".to_string()));
        }

        if self.weight.start < self.units.end && self.units.start < self.weight.end {
            return Err(Error::Config(format!(
                "Weight field {:?} overlaps unit field {:?}",
                self.weight, self.units
            )));
        }

        if self.status.start == 0 {
            return Err(Error::Config(
                "Status bytes overlap the status marker column".to_string(),
            ));
        }

        // integer digit + point + decimals
        if self.decimals > 0 && self.decimals + 2 > self.weight.len() {
            return Err(Error::Config(format!(
                "{} decimals do not fit a {}-column weight field",
                self.decimals,
                self.weight.len()
            )));
        }

        Ok(())
    }

    /// Length of a weight line laid out with this layout.
    #[must_use]
    pub fn weight_line_len(&self) -> usize {
        self.weight.end.max(self.units.end)
    }

    /// Length of a status line laid out with this layout.
    #[must_use]
    pub fn status_line_len(&self) -> usize {
        self.status.end
    }

    /// Width of the weight field.
    #[must_use]
    pub fn weight_width(&self) -> usize {
        self.weight.len()
    }

    /// Width of the unit field.
    #[must_use]
    pub fn units_width(&self) -> usize {
        self.units.len()
    }
}
