//! Status byte decoding.
//!
//! The scale reports its condition in two ASCII bytes following the status
//! marker. Each byte is `0x30 | bits`, keeping the line printable:
//!
//! | Byte | Bit 0 | Bit 1 | Bit 2 | Bit 3 |
//! |------|-------|-------|-------|-------|
//! | 1 | motion | at zero | RAM error | EEPROM error |
//! | 2 | under capacity | over capacity | ROM error | faulty calibration |
//!
//! Some firmwares append further status bytes. They must be well formed but
//! carry nothing the driver acts on.

use checkout_scale_core::{Error, Result, WeightStatus, constants::*};

/// Decoded status bytes.
///
/// # Example
///
/// ```
/// use checkout_scale_protocol::StatusFlags;
/// use checkout_scale_core::WeightStatus;
///
/// let flags = StatusFlags::from_bytes(b"20").unwrap();
/// assert!(flags.at_zero());
/// assert_eq!(flags.classify(), WeightStatus::Zero);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusFlags {
    primary: u8,
    secondary: u8,
}

impl StatusFlags {
    /// Decode status bytes as they appear on the wire.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStatus` if no bytes are given or if any byte
    /// lies outside `0x30..=0x3F`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::InvalidStatus("No status bytes".to_string()));
        }

        let mut bits = bytes.iter().map(|&b| decode_byte(b));
        let primary = bits.next().unwrap_or(Ok(0))?;
        let secondary = bits.next().unwrap_or(Ok(0))?;
        for extra in bits {
            extra?;
        }

        Ok(Self { primary, secondary })
    }

    /// Flags a scale would send for the given status.
    #[must_use]
    pub fn from_status(status: WeightStatus) -> Self {
        let (primary, secondary) = match status {
            WeightStatus::Ok => (0, 0),
            WeightStatus::Zero => (STATUS_AT_ZERO, 0),
            WeightStatus::Motion => (STATUS_MOTION, 0),
            WeightStatus::UnderCapacity => (0, STATUS_UNDER_CAPACITY),
            WeightStatus::OverCapacity => (0, STATUS_OVER_CAPACITY),
            WeightStatus::Fault => (0, STATUS_CALIBRATION_ERROR),
        };
        Self { primary, secondary }
    }

    /// Encode back to the two wire bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 2] {
        [
            STATUS_BYTE_BASE | self.primary,
            STATUS_BYTE_BASE | self.secondary,
        ]
    }

    pub fn motion(&self) -> bool {
        self.primary & STATUS_MOTION != 0
    }

    pub fn at_zero(&self) -> bool {
        self.primary & STATUS_AT_ZERO != 0
    }

    pub fn under_capacity(&self) -> bool {
        self.secondary & STATUS_UNDER_CAPACITY != 0
    }

    pub fn over_capacity(&self) -> bool {
        self.secondary & STATUS_OVER_CAPACITY != 0
    }

    /// Any RAM, EEPROM, ROM or calibration error bit.
    pub fn hardware_fault(&self) -> bool {
        self.primary & (STATUS_RAM_ERROR | STATUS_EEPROM_ERROR) != 0
            || self.secondary & (STATUS_ROM_ERROR | STATUS_CALIBRATION_ERROR) != 0
    }

    /// Collapse the flags into a single status.
    ///
    /// Several bits can be set at once. Precedence, highest first: hardware
    /// fault, over capacity, under capacity, motion, at zero.
    #[must_use]
    pub fn classify(&self) -> WeightStatus {
        if self.hardware_fault() {
            WeightStatus::Fault
        } else if self.over_capacity() {
            WeightStatus::OverCapacity
        } else if self.under_capacity() {
            WeightStatus::UnderCapacity
        } else if self.motion() {
            WeightStatus::Motion
        } else if self.at_zero() {
            WeightStatus::Zero
        } else {
            WeightStatus::Ok
        }
    }
}

fn decode_byte(byte: u8) -> Result<u8> {
    if byte & !STATUS_BITS_MASK != STATUS_BYTE_BASE {
        return Err(Error::InvalidStatus(format!(
            "Status byte 0x{byte:02X} outside 0x30-0x3F"
        )));
    }
    Ok(byte & STATUS_BITS_MASK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"00", WeightStatus::Ok)]
    #[case(b"20", WeightStatus::Zero)]
    #[case(b"10", WeightStatus::Motion)]
    #[case(b"30", WeightStatus::Motion)]
    #[case(b"01", WeightStatus::UnderCapacity)]
    #[case(b"02", WeightStatus::OverCapacity)]
    #[case(b"40", WeightStatus::Fault)]
    #[case(b"80", WeightStatus::Fault)]
    #[case(b"04", WeightStatus::Fault)]
    #[case(b"08", WeightStatus::Fault)]
    #[case(b"12", WeightStatus::OverCapacity)]
    #[case(b"0", WeightStatus::Ok)]
    #[case(b"000", WeightStatus::Ok)]
    fn test_classify(#[case] bytes: &[u8], #[case] expected: WeightStatus) {
        let flags = StatusFlags::from_bytes(bytes).unwrap();
        assert_eq!(flags.classify(), expected);
    }

    #[rstest]
    #[case(b"")]
    #[case(b"?A")]
    #[case(b"0@")]
    #[case(b" 0")]
    #[case(b"00!")]
    fn test_invalid_bytes(#[case] bytes: &[u8]) {
        assert!(matches!(
            StatusFlags::from_bytes(bytes),
            Err(Error::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_from_status_roundtrip() {
        for status in [
            WeightStatus::Ok,
            WeightStatus::Zero,
            WeightStatus::Motion,
            WeightStatus::UnderCapacity,
            WeightStatus::OverCapacity,
            WeightStatus::Fault,
        ] {
            let bytes = StatusFlags::from_status(status).to_bytes();
            let decoded = StatusFlags::from_bytes(&bytes).unwrap();
            assert_eq!(decoded.classify(), status);
        }
    }

    #[test]
    fn test_ok_encodes_as_ascii_zeros() {
        assert_eq!(StatusFlags::from_status(WeightStatus::Ok).to_bytes(), *b"00");
    }
}
