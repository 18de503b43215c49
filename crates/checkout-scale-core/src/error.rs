use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Protocol errors
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Invalid status code: {0}")]
    InvalidStatus(String),

    #[error("Missing frame field: {0}")]
    MissingField(String),

    #[error("Frame exceeds maximum size of {max} bytes")]
    FrameTooLarge { max: usize },

    // Scale-reported conditions
    #[error("Scale reported {status}")]
    ScaleFault { status: crate::WeightStatus },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid value for configuration key {key}: {value:?}")]
    InvalidConfigValue { key: String, value: String },

    #[error("Missing configuration key: {0}")]
    MissingConfig(String),
}

impl Error {
    /// True for errors raised because the bytes from the scale could not be understood.
    #[must_use]
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            Self::InvalidFrame(_)
                | Self::InvalidStatus(_)
                | Self::MissingField(_)
                | Self::FrameTooLarge { .. }
        )
    }

    /// True for construction-time configuration failures.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::InvalidConfigValue { .. } | Self::MissingConfig(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WeightStatus;

    #[test]
    fn test_protocol_classification() {
        assert!(Error::InvalidFrame("short".into()).is_protocol());
        assert!(Error::InvalidStatus("S?".into()).is_protocol());
        assert!(Error::FrameTooLarge { max: 256 }.is_protocol());
        assert!(!Error::Config("bad".into()).is_protocol());
        assert!(
            !Error::ScaleFault {
                status: WeightStatus::OverCapacity
            }
            .is_protocol()
        );
    }

    #[test]
    fn test_config_classification() {
        let err = Error::InvalidConfigValue {
            key: "BaudRate".into(),
            value: "fast".into(),
        };
        assert!(err.is_config());
        assert_eq!(
            err.to_string(),
            "Invalid value for configuration key BaudRate: \"fast\""
        );
    }

    #[test]
    fn test_scale_fault_display() {
        let err = Error::ScaleFault {
            status: WeightStatus::OverCapacity,
        };
        assert_eq!(err.to_string(), "Scale reported OVER");
    }
}
