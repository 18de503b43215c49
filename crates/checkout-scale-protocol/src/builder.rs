use bytes::{BufMut, Bytes, BytesMut};
use checkout_scale_core::{Error, Result, WeightStatus, constants::*};

use crate::{layout::FrameLayout, status::StatusFlags};

/// Builds replies the way a scale would send them.
///
/// Used by the mock scale and by tests to produce frames for a given
/// `(status, total, units)` triple. Only an OK status carries a weight line;
/// every other status produces a bare status line, as the firmware does.
///
/// # Example
/// ```
/// use checkout_scale_protocol::{FrameBuilder, FrameParser};
/// use checkout_scale_core::WeightStatus;
///
/// let builder = FrameBuilder::default();
/// let frame = builder.weight_reply(WeightStatus::Ok, 2.494, "LB").unwrap();
/// assert_eq!(&frame[..], b"\n02.494LB\r\nS00\r\x03");
///
/// let reading = FrameParser::default().parse(&frame).unwrap().into_reading().unwrap();
/// assert_eq!(reading.total, 2.494);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FrameBuilder {
    layout: FrameLayout,
}

impl FrameBuilder {
    /// Create a builder for a validated layout.
    ///
    /// # Errors
    /// Returns `Error::Config` if the layout is inconsistent.
    pub fn new(layout: FrameLayout) -> Result<Self> {
        layout.validate()?;
        Ok(Self { layout })
    }

    /// Reply to the weigh command.
    ///
    /// # Errors
    /// Returns `Error::InvalidFrame` if the formatted weight or the units do
    /// not fit their fields, or if `units` is blank.
    pub fn weight_reply(&self, status: WeightStatus, total: f64, units: &str) -> Result<Bytes> {
        if status != WeightStatus::Ok {
            return Ok(self.status_reply(status));
        }
        let line = self.weight_line(&self.format_weight(total)?, units)?;
        Ok(self.frame(Some(&line), status))
    }

    /// Reply to the weigh command with an arbitrary weight field.
    ///
    /// The field is written as-is (padded or truncated to the field width),
    /// which makes it possible to produce garbled digits.
    ///
    /// # Errors
    /// Returns `Error::InvalidFrame` if the field is not ASCII or the units do
    /// not fit their field.
    pub fn raw_weight_reply(&self, weight_field: &str, units: &str) -> Result<Bytes> {
        if !weight_field.is_ascii() {
            return Err(Error::InvalidFrame(format!(
                "Weight field {weight_field:?} is not ASCII"
            )));
        }
        let width = self.layout.weight_width();
        let field: String = format!("{weight_field:>width$}").chars().take(width).collect();
        let line = self.weight_line(&field, units)?;
        Ok(self.frame(Some(&line), WeightStatus::Ok))
    }

    /// Reply to the status command.
    pub fn status_reply(&self, status: WeightStatus) -> Bytes {
        self.frame(None, status)
    }

    fn format_weight(&self, total: f64) -> Result<String> {
        if !total.is_finite() {
            return Err(Error::InvalidFrame(format!("Weight is not finite: {total}")));
        }
        let width = self.layout.weight_width();
        let decimals = self.layout.decimals;
        let field = format!("{total:0width$.decimals$}");
        if field.len() > width {
            return Err(Error::InvalidFrame(format!(
                "Weight {total} does not fit a {width}-column field"
            )));
        }
        Ok(field)
    }

    fn weight_line(&self, weight_field: &str, units: &str) -> Result<Vec<u8>> {
        let width = self.layout.units_width();
        if units.trim().is_empty() || units.len() > width || !units.is_ascii() {
            return Err(Error::InvalidFrame(format!(
                "Units {units:?} do not fit a {width}-column field"
            )));
        }

        let mut line = vec![b' '; self.layout.weight_line_len()];
        line[self.layout.weight.clone()].copy_from_slice(weight_field.as_bytes());
        line[self.layout.units.start..self.layout.units.start + units.len()]
            .copy_from_slice(units.as_bytes());
        Ok(line)
    }

    fn status_line(&self, status: WeightStatus) -> Vec<u8> {
        let mut line = vec![b' '; self.layout.status_line_len()];
        line[0] = self.layout.status_marker;

        let field = &mut line[self.layout.status.clone()];
        field.fill(STATUS_BYTE_BASE);
        let bytes = StatusFlags::from_status(status).to_bytes();
        let n = field.len().min(bytes.len());
        field[..n].copy_from_slice(&bytes[..n]);
        line
    }

    fn frame(&self, weight_line: Option<&[u8]>, status: WeightStatus) -> Bytes {
        let status_line = self.status_line(status);
        let capacity = weight_line.map_or(0, |line| line.len() + 2) + status_line.len() + 3;

        let mut buf = BytesMut::with_capacity(capacity);
        if let Some(line) = weight_line {
            buf.put_u8(LINE_FEED);
            buf.put_slice(line);
            buf.put_u8(CARRIAGE_RETURN);
        }
        buf.put_u8(LINE_FEED);
        buf.put_slice(&status_line);
        buf.put_u8(CARRIAGE_RETURN);
        buf.put_u8(END_BYTE);
        buf.freeze()
    }
}
