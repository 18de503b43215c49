//! Serial transport abstraction.
//!
//! The reader only needs blocking byte-level I/O with a timeout. Hiding the
//! port behind [`SerialTransport`] lets the same reader run against a real
//! port ([`SerialPortTransport`]) or the scripted [`MockScale`].
//!
//! [`MockScale`]: crate::mock::MockScale

use std::time::Duration;

use crate::config::DriverConfig;
use crate::error::Result;

/// Blocking byte stream to a scale.
///
/// Implementations own the connection. One read or write at a time;
/// `&mut self` makes interleaved frames impossible.
pub trait SerialTransport: Send {
    /// Name of the port, for logs and errors.
    fn port_name(&self) -> &str;

    /// Read at least the configured minimum number of bytes, or whatever
    /// arrived before the timeout if that is at least one byte.
    ///
    /// # Errors
    ///
    /// - `DeviceError::Timeout` if nothing arrived within the timeout
    /// - `DeviceError::Disconnected` if the port went away
    /// - `DeviceError::CommunicationError` for other line errors
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write all bytes and flush them to the line.
    ///
    /// # Errors
    ///
    /// Same transport errors as [`SerialTransport::read`].
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;

    /// Bound how long the next [`SerialTransport::read`] may block.
    ///
    /// The reader calls this before every read with the time left in the
    /// current cycle.
    ///
    /// # Errors
    ///
    /// Same transport errors as [`SerialTransport::read`].
    fn set_timeout(&mut self, timeout: Duration) -> Result<()>;

    /// Discard bytes received but not yet read, such as the tail of a reply
    /// that arrived after a previous timeout.
    ///
    /// # Errors
    ///
    /// Same transport errors as [`SerialTransport::read`].
    fn clear_input(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Opens transports for validated configurations.
pub trait TransportOpener {
    type Transport: SerialTransport;

    /// Open the port named in `config` with its line settings.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InitializationFailed` if the port cannot be opened.
    fn open(&mut self, config: &DriverConfig) -> Result<Self::Transport>;
}

#[cfg(feature = "hardware-serial")]
pub use serial::{SerialPortOpener, SerialPortTransport};

#[cfg(feature = "hardware-serial")]
mod serial {
    use std::io::{ErrorKind, Read, Write};
    use std::time::{Duration, Instant};

    use serialport::SerialPort;
    use tracing::{debug, info};

    use super::{SerialTransport, TransportOpener};
    use crate::config::{DataBits, DriverConfig, Parity, StopBits};
    use crate::error::{DeviceError, Result};

    /// Transport over a real serial port.
    pub struct SerialPortTransport {
        port: Box<dyn SerialPort>,
        name: String,
        minimum_read_size: usize,
        timeout: Duration,
    }

    impl std::fmt::Debug for SerialPortTransport {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("SerialPortTransport")
                .field("name", &self.name)
                .field("minimum_read_size", &self.minimum_read_size)
                .field("timeout", &self.timeout)
                .finish()
        }
    }

    impl SerialPortTransport {
        /// Open the port described by `config`.
        ///
        /// # Errors
        ///
        /// Returns `DeviceError::InitializationFailed` if the port does not
        /// exist, is busy, or rejects the line settings.
        pub fn open(config: &DriverConfig) -> Result<Self> {
            info!(
                port = %config.port_name,
                baud = config.baud_rate,
                data_bits = config.data_bits.count(),
                parity = config.parity.mode(),
                stop_bits = config.stop_bits.count(),
                "Opening serial port"
            );

            let port = serialport::new(config.port_name.as_str(), config.baud_rate)
                .data_bits(data_bits(config.data_bits))
                .stop_bits(stop_bits(config.stop_bits))
                .parity(parity(config.parity))
                .flow_control(serialport::FlowControl::None)
                .timeout(config.timeout)
                .open()
                .map_err(|e| {
                    DeviceError::initialization_failed(format!("{}: {e}", config.port_name))
                })?;

            Ok(Self {
                port,
                name: config.port_name.clone(),
                minimum_read_size: config.minimum_read_size,
                timeout: config.timeout,
            })
        }

        fn map_io(&self, err: std::io::Error) -> DeviceError {
            match err.kind() {
                ErrorKind::TimedOut | ErrorKind::WouldBlock => {
                    DeviceError::timeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX))
                }
                ErrorKind::BrokenPipe
                | ErrorKind::NotConnected
                | ErrorKind::UnexpectedEof
                | ErrorKind::NotFound => DeviceError::disconnected(self.name.clone()),
                _ => DeviceError::communication(format!("{}: {err}", self.name)),
            }
        }
    }

    impl SerialTransport for SerialPortTransport {
        fn port_name(&self) -> &str {
            &self.name
        }

        fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
            let wanted = self.minimum_read_size.clamp(1, buf.len().max(1));
            let deadline = Instant::now() + self.timeout;
            let mut filled = 0;

            while filled < wanted {
                if filled > 0 {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        break;
                    }
                    self.port
                        .set_timeout(remaining)
                        .map_err(|e| DeviceError::communication(format!("{}: {e}", self.name)))?;
                }
                match self.port.read(&mut buf[filled..]) {
                    Ok(0) => return Err(DeviceError::disconnected(self.name.clone())),
                    Ok(n) => filled += n,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    // Short read: hand over what arrived before the timeout.
                    Err(e) if filled > 0 && e.kind() == ErrorKind::TimedOut => break,
                    Err(e) => return Err(self.map_io(e)),
                }
            }

            Ok(filled)
        }

        fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
            self.port
                .write_all(bytes)
                .and_then(|()| self.port.flush())
                .map_err(|e| self.map_io(e))
        }

        fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
            self.port
                .set_timeout(timeout)
                .map_err(|e| DeviceError::communication(format!("{}: {e}", self.name)))?;
            self.timeout = timeout;
            Ok(())
        }

        fn clear_input(&mut self) -> Result<()> {
            self.port
                .clear(serialport::ClearBuffer::Input)
                .map_err(|e| DeviceError::communication(format!("{}: {e}", self.name)))?;
            debug!(port = %self.name, "Cleared input buffer");
            Ok(())
        }
    }

    /// Opens [`SerialPortTransport`]s through the `serialport` crate.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SerialPortOpener;

    impl TransportOpener for SerialPortOpener {
        type Transport = SerialPortTransport;

        fn open(&mut self, config: &DriverConfig) -> Result<SerialPortTransport> {
            SerialPortTransport::open(config)
        }
    }

    fn data_bits(bits: DataBits) -> serialport::DataBits {
        match bits {
            DataBits::Five => serialport::DataBits::Five,
            DataBits::Six => serialport::DataBits::Six,
            DataBits::Seven => serialport::DataBits::Seven,
            DataBits::Eight => serialport::DataBits::Eight,
        }
    }

    fn stop_bits(bits: StopBits) -> serialport::StopBits {
        match bits {
            StopBits::One => serialport::StopBits::One,
            StopBits::Two => serialport::StopBits::Two,
        }
    }

    fn parity(parity: Parity) -> serialport::Parity {
        match parity {
            Parity::None => serialport::Parity::None,
            Parity::Odd => serialport::Parity::Odd,
            Parity::Even => serialport::Parity::Even,
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_line_setting_conversions() {
            assert_eq!(data_bits(DataBits::Seven), serialport::DataBits::Seven);
            assert_eq!(stop_bits(StopBits::Two), serialport::StopBits::Two);
            assert_eq!(parity(Parity::Even), serialport::Parity::Even);
        }

        #[test]
        fn test_open_missing_port_fails() {
            let config = DriverConfig::new("/dev/checkout-scale-does-not-exist");
            let err = SerialPortTransport::open(&config).unwrap_err();
            assert!(matches!(err, DeviceError::InitializationFailed { .. }));
        }
    }
}
