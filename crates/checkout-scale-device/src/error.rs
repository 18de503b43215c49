//! Error types for device operations.
//!
//! [`DeviceError`] separates the failures a caller of `read_weight` must tell
//! apart: the scale could not be reached ([`DeviceError::is_transport`]), the
//! scale sent something unintelligible ([`DeviceError::is_protocol`]), or the
//! scale reported a problem of its own ([`DeviceError::is_scale_fault`]).

use checkout_scale_core::Error as CoreError;

/// Result type alias for device operations.
pub type Result<T> = std::result::Result<T, DeviceError>;

/// Errors that can occur while talking to a scale.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// Serial port is gone or the mock's feeder was dropped.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// No reply within the configured timeout.
    #[error("Operation timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Serial line error other than a timeout or disconnect.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// The port could not be opened.
    #[error("Initialization failed: {message}")]
    InitializationFailed { message: String },

    /// Protocol, status or configuration error from the core crates.
    #[error(transparent)]
    Scale(#[from] CoreError),
}

impl DeviceError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    /// Create a new initialization failed error.
    pub fn initialization_failed(message: impl Into<String>) -> Self {
        Self::InitializationFailed {
            message: message.into(),
        }
    }

    /// The scale could not be reached: timeout, disconnect or line error.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Disconnected { .. }
                | Self::Timeout { .. }
                | Self::CommunicationError { .. }
        )
    }

    /// The scale answered but the reply could not be understood.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Scale(err) if err.is_protocol())
    }

    /// The scale reported over/under capacity or a hardware fault.
    pub fn is_scale_fault(&self) -> bool {
        matches!(self, Self::Scale(CoreError::ScaleFault { .. }))
    }

    /// The device configuration was rejected.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Scale(err) if err.is_config())
    }
}
