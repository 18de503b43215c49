//! Scale device adapter.

use checkout_scale_core::{WeightReading, WeightStatus};
use checkout_scale_protocol::FrameParser;
use tracing::info;

use crate::config::DriverConfig;
use crate::error::Result;
use crate::reader::ScaleReader;
use crate::traits::WeighingDevice;
use crate::transport::{SerialTransport, TransportOpener};

/// A configured scale on an open transport.
#[derive(Debug)]
pub struct ScaleDevice<T> {
    config: DriverConfig,
    reader: ScaleReader<T>,
}

impl<T: SerialTransport> ScaleDevice<T> {
    /// Wrap an already open transport.
    pub fn with_transport(config: DriverConfig, transport: T) -> Self {
        Self::with_parser(config, transport, FrameParser::default())
    }

    /// Wrap an open transport for a scale with a non-default reply layout.
    pub fn with_parser(config: DriverConfig, transport: T, parser: FrameParser) -> Self {
        let reader = ScaleReader::with_parser(transport, parser, config.timeout);
        Self { config, reader }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }
}

impl<T> ScaleDevice<T> {
    /// Open the configured port through `opener`.
    ///
    /// # Errors
    ///
    /// Returns the opener's error, typically `DeviceError::InitializationFailed`.
    pub fn open<O>(config: DriverConfig, opener: &mut O) -> Result<Self>
    where
        O: TransportOpener<Transport = T>,
        T: SerialTransport,
    {
        let transport = opener.open(&config)?;
        info!(port = %config.port_name, timeout_ms = config.timeout_ms(), "Scale device ready");
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: SerialTransport> WeighingDevice for ScaleDevice<T> {
    fn port_name(&self) -> &str {
        &self.config.port_name
    }

    fn read_weight(&mut self) -> Result<Option<WeightReading>> {
        self.reader.read_weight()
    }

    fn read_status(&mut self) -> Result<WeightStatus> {
        self.reader.read_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockOpener, MockScale};
    use serde_json::json;

    #[test]
    fn test_open_uses_config_port() {
        let (scale, handle) = MockScale::new();
        let mut opener = MockOpener::new(scale);
        let mut device = ScaleDevice::open(DriverConfig::new("COM7"), &mut opener).unwrap();

        assert_eq!(device.port_name(), "COM7");
        handle.send_reading(WeightStatus::Ok, 2.494, "LB").unwrap();
        let event = device.read_weight_event().unwrap().unwrap();
        assert_eq!(
            serde_json::Value::Object(event),
            json!({"status": "OK", "total": 2.494, "units": "LB"})
        );
    }

    #[test]
    fn test_event_none_while_settling() {
        let (scale, handle) = MockScale::new();
        let mut device = ScaleDevice::with_transport(DriverConfig::new("COM7"), scale);
        handle.send_reading(WeightStatus::Motion, 0.0, "LB").unwrap();
        assert!(device.read_weight_event().unwrap().is_none());
    }

    #[test]
    fn test_open_failure_propagates() {
        let mut opener = MockOpener::unavailable();
        let result = ScaleDevice::open(DriverConfig::new("COM7"), &mut opener);
        assert!(result.is_err());
    }
}
