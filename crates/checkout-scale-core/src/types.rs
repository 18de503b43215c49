use crate::{Result, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Condition the scale reports alongside (or instead of) a weight.
///
/// Serializes as the upper-case wire name used by the event-reporting
/// boundary (`"OK"`, `"ZERO"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightStatus {
    /// Stable weight on the platter.
    #[serde(rename = "OK")]
    Ok,
    /// Platter empty, scale settled at zero.
    #[serde(rename = "ZERO")]
    Zero,
    /// Platter still settling.
    #[serde(rename = "MOTION")]
    Motion,
    /// Weight below zero (platter lifted or tare drift).
    #[serde(rename = "UNDER")]
    UnderCapacity,
    /// Weight above the scale's rated capacity.
    #[serde(rename = "OVER")]
    OverCapacity,
    /// RAM, ROM, EEPROM or calibration fault.
    #[serde(rename = "ERROR")]
    Fault,
}

impl WeightStatus {
    /// Wire name of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Zero => "ZERO",
            Self::Motion => "MOTION",
            Self::UnderCapacity => "UNDER",
            Self::OverCapacity => "OVER",
            Self::Fault => "ERROR",
        }
    }

    /// Non-error states where no stable weight exists yet.
    ///
    /// Polling callers should simply try again.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Zero | Self::Motion)
    }

    /// States the scale itself flags as a problem.
    #[must_use]
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            Self::UnderCapacity | Self::OverCapacity | Self::Fault
        )
    }
}

impl fmt::Display for WeightStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WeightStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OK" => Ok(Self::Ok),
            "ZERO" => Ok(Self::Zero),
            "MOTION" => Ok(Self::Motion),
            "UNDER" => Ok(Self::UnderCapacity),
            "OVER" => Ok(Self::OverCapacity),
            "ERROR" => Ok(Self::Fault),
            other => Err(Error::InvalidStatus(other.to_string())),
        }
    }
}

/// One weight measurement.
///
/// Always fully populated: a read cycle either produces one of these or
/// nothing at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightReading {
    pub status: WeightStatus,
    pub total: f64,
    pub units: String,
}

impl WeightReading {
    /// Create a reading with validation.
    ///
    /// # Errors
    /// Returns `Error::MissingField` if `units` is blank, and
    /// `Error::InvalidFrame` if `total` is not a finite number.
    pub fn new(status: WeightStatus, total: f64, units: impl Into<String>) -> Result<Self> {
        let units = units.into();
        if units.trim().is_empty() {
            return Err(Error::MissingField("units".to_string()));
        }
        if !total.is_finite() {
            return Err(Error::InvalidFrame(format!("Weight is not finite: {total}")));
        }
        Ok(Self {
            status,
            total,
            units,
        })
    }

    /// Stable reading with `WeightStatus::Ok`.
    ///
    /// # Errors
    /// Same as [`WeightReading::new`].
    pub fn ok(total: f64, units: impl Into<String>) -> Result<Self> {
        Self::new(WeightStatus::Ok, total, units)
    }

    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.status == WeightStatus::Ok
    }
}

impl fmt::Display for WeightReading {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} ({})", self.total, self.units, self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(WeightStatus::Ok, "OK")]
    #[case(WeightStatus::Zero, "ZERO")]
    #[case(WeightStatus::Motion, "MOTION")]
    #[case(WeightStatus::UnderCapacity, "UNDER")]
    #[case(WeightStatus::OverCapacity, "OVER")]
    #[case(WeightStatus::Fault, "ERROR")]
    fn test_status_wire_names(#[case] status: WeightStatus, #[case] name: &str) {
        assert_eq!(status.as_str(), name);
        assert_eq!(status.to_string(), name);
        assert_eq!(name.parse::<WeightStatus>().unwrap(), status);
        assert_eq!(
            serde_json::to_value(status).unwrap(),
            serde_json::Value::String(name.to_string())
        );
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(" zero ".parse::<WeightStatus>().unwrap(), WeightStatus::Zero);
        assert!("SETTLING".parse::<WeightStatus>().is_err());
    }

    #[test]
    fn test_status_classes_are_disjoint() {
        for status in [
            WeightStatus::Ok,
            WeightStatus::Zero,
            WeightStatus::Motion,
            WeightStatus::UnderCapacity,
            WeightStatus::OverCapacity,
            WeightStatus::Fault,
        ] {
            assert!(!(status.is_transient() && status.is_fault()));
        }
        assert!(!WeightStatus::Ok.is_transient());
        assert!(!WeightStatus::Ok.is_fault());
    }

    #[test]
    fn test_reading_new() {
        let reading = WeightReading::ok(2.494, "LB").unwrap();
        assert_eq!(reading.status, WeightStatus::Ok);
        assert_eq!(reading.total, 2.494);
        assert_eq!(reading.units, "LB");
        assert!(reading.is_stable());
        assert_eq!(reading.to_string(), "2.494 LB (OK)");
    }

    #[test]
    fn test_reading_rejects_blank_units() {
        assert!(matches!(
            WeightReading::ok(1.0, "  "),
            Err(Error::MissingField(_))
        ));
    }

    #[test]
    fn test_reading_rejects_nan() {
        assert!(WeightReading::ok(f64::NAN, "KG").is_err());
    }

    #[test]
    fn test_reading_serialization() {
        let reading = WeightReading::ok(2.494, "LB").unwrap();
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "OK", "total": 2.494, "units": "LB"})
        );
        let back: WeightReading = serde_json::from_value(json).unwrap();
        assert_eq!(back, reading);
    }
}
