//! Scale driver entry point.
//!
//! [`SerialScaleDriver`] is what the device framework instantiates. Given a
//! port and a configuration map it validates the settings, opens the port and
//! hands back a ready [`ScaleDevice`], or `None` with the reason logged.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::DriverConfig;
use crate::device::ScaleDevice;
use crate::traits::ScaleDriver;
use crate::transport::TransportOpener;

#[cfg(feature = "hardware-serial")]
use crate::transport::SerialPortOpener;

/// Creates scale devices on ports opened by `O`.
#[cfg(feature = "hardware-serial")]
#[derive(Debug, Default)]
pub struct SerialScaleDriver<O = SerialPortOpener> {
    opener: O,
}

/// Creates scale devices on ports opened by `O`.
#[cfg(not(feature = "hardware-serial"))]
#[derive(Debug, Default)]
pub struct SerialScaleDriver<O> {
    opener: O,
}

#[cfg(feature = "hardware-serial")]
impl SerialScaleDriver {
    /// Driver for real serial ports.
    pub fn new() -> Self {
        Self::with_opener(SerialPortOpener)
    }
}

impl<O: TransportOpener> SerialScaleDriver<O> {
    /// Driver opening its ports through a custom opener.
    pub fn with_opener(opener: O) -> Self {
        Self { opener }
    }
}

impl<O: TransportOpener> ScaleDriver for SerialScaleDriver<O> {
    type Device = ScaleDevice<O::Transport>;

    fn new_device(
        &mut self,
        port: &str,
        config: Option<&HashMap<String, String>>,
    ) -> Option<Self::Device> {
        let Some(map) = config else {
            warn!(port, "No configuration supplied; scale not created");
            return None;
        };

        let config = match DriverConfig::from_map(port, map) {
            Ok(config) => config,
            Err(e) => {
                warn!(port, error = %e, "Invalid scale configuration");
                return None;
            }
        };
        debug!(port, ?config, "Scale configuration accepted");

        match ScaleDevice::open(config, &mut self.opener) {
            Ok(device) => Some(device),
            Err(e) => {
                warn!(port, error = %e, "Failed to open scale");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockOpener, MockScale};
    use crate::traits::WeighingDevice;

    fn driver() -> SerialScaleDriver<MockOpener> {
        SerialScaleDriver::with_opener(MockOpener::new(MockScale::new().0))
    }

    #[test]
    fn test_absent_config_yields_none() {
        assert!(driver().new_device("testSerialPort", None).is_none());
    }

    #[test]
    fn test_empty_config_takes_defaults() {
        let device = driver()
            .new_device("testSerialPort", Some(&HashMap::new()))
            .unwrap();
        assert_eq!(device.port_name(), "testSerialPort");
        assert_eq!(device.config().baud_rate, 9600);
    }

    #[test]
    fn test_invalid_value_yields_none() {
        let map = HashMap::from([("TimeOutMilli".to_string(), "soon".to_string())]);
        assert!(driver().new_device("COM1", Some(&map)).is_none());
    }

    #[test]
    fn test_blank_port_yields_none() {
        assert!(driver().new_device(" ", Some(&HashMap::new())).is_none());
    }

    #[test]
    fn test_busy_port_yields_none() {
        let mut driver = SerialScaleDriver::with_opener(MockOpener::unavailable());
        assert!(driver.new_device("COM1", Some(&HashMap::new())).is_none());
    }
}
