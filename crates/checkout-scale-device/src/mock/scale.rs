//! Mock scale transport.
//!
//! [`MockScale`] plays the scale's side of the serial line. Each command the
//! host writes consumes the next scripted [`MockResponse`]; the reply bytes
//! are then handed out by `read` in chunks, the way a serial port delivers
//! them. Nothing scripted means the host sees a timeout.

use std::time::Duration;

use bytes::{Buf, Bytes, BytesMut};
use checkout_scale_core::WeightStatus;
use checkout_scale_protocol::FrameBuilder;
use tokio::sync::mpsc;

use crate::config::DriverConfig;
use crate::error::{DeviceError, Result};
use crate::transport::{SerialTransport, TransportOpener};

/// Timeout the mock reports when nothing is scripted.
const MOCK_TIMEOUT_MS: u64 = 500;

/// What the mock scale does in answer to the next command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// Send these bytes.
    Reply(Bytes),

    /// Stay silent; the host's read times out.
    Silence,

    /// Drop off the line; every later call fails with `Disconnected`.
    Disconnect,
}

/// Mock scale for testing and development.
///
/// # Examples
///
/// ```
/// use checkout_scale_core::WeightStatus;
/// use checkout_scale_device::mock::MockScale;
/// use checkout_scale_device::transport::SerialTransport;
///
/// let (mut scale, handle) = MockScale::new();
/// handle.send_reading(WeightStatus::Ok, 2.494, "LB").unwrap();
///
/// scale.write_all(b"W\r").unwrap();
/// let mut buf = [0u8; 64];
/// let n = scale.read(&mut buf).unwrap();
/// assert_eq!(&buf[..n], b"\n02.494LB\r\nS00\r\x03");
/// ```
#[derive(Debug)]
pub struct MockScale {
    /// Scripted responses, one per command
    responses: mpsc::UnboundedReceiver<MockResponse>,

    /// Commands written by the host
    commands: mpsc::UnboundedSender<Bytes>,

    /// Reply bytes not yet read
    pending: BytesMut,

    /// Largest number of bytes one read returns
    chunk_size: usize,

    name: String,
    connected: bool,
}

impl MockScale {
    /// Create a new mock scale with the default name.
    ///
    /// Returns the scale and a handle for scripting its replies.
    pub fn new() -> (Self, MockScaleHandle) {
        Self::with_name("Mock Scale".to_string())
    }

    /// Create a new mock scale with a custom port name.
    pub fn with_name(name: String) -> (Self, MockScaleHandle) {
        let (response_tx, responses) = mpsc::unbounded_channel();
        let (commands, command_rx) = mpsc::unbounded_channel();

        let scale = Self {
            responses,
            commands,
            pending: BytesMut::new(),
            chunk_size: usize::MAX,
            name: name.clone(),
            connected: true,
        };

        let handle = MockScaleHandle {
            response_tx,
            command_rx,
            builder: FrameBuilder::default(),
            name,
        };

        (scale, handle)
    }

    /// Deliver replies at most `chunk_size` bytes per read.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected {
            Ok(())
        } else {
            Err(DeviceError::disconnected(self.name.clone()))
        }
    }
}

impl Default for MockScale {
    fn default() -> Self {
        Self::new().0
    }
}

impl SerialTransport for MockScale {
    fn port_name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.ensure_connected()?;
        if self.pending.is_empty() {
            return Err(DeviceError::timeout(MOCK_TIMEOUT_MS));
        }

        let n = self.pending.len().min(buf.len()).min(self.chunk_size);
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.advance(n);
        Ok(n)
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_connected()?;
        // The handle may already be gone; nobody is watching commands then.
        let _ = self.commands.send(Bytes::copy_from_slice(bytes));

        match self.responses.try_recv() {
            Ok(MockResponse::Reply(reply)) => self.pending.extend_from_slice(&reply),
            Ok(MockResponse::Silence) | Err(_) => {}
            Ok(MockResponse::Disconnect) => {
                self.connected = false;
                return Err(DeviceError::disconnected(self.name.clone()));
            }
        }
        Ok(())
    }

    fn set_timeout(&mut self, _timeout: Duration) -> Result<()> {
        self.ensure_connected()
    }

    fn clear_input(&mut self) -> Result<()> {
        self.ensure_connected()?;
        self.pending.clear();
        Ok(())
    }
}

/// Handle for scripting a mock scale.
///
/// # Examples
///
/// ```
/// use checkout_scale_core::WeightStatus;
/// use checkout_scale_device::mock::MockScale;
///
/// let (_scale, handle) = MockScale::new();
/// handle.send_reading(WeightStatus::Zero, 0.0, "LB").unwrap();
/// handle.send_silence().unwrap();
/// ```
#[derive(Debug)]
pub struct MockScaleHandle {
    response_tx: mpsc::UnboundedSender<MockResponse>,
    command_rx: mpsc::UnboundedReceiver<Bytes>,
    builder: FrameBuilder,
    name: String,
}

impl MockScaleHandle {
    /// Queue a raw response.
    ///
    /// # Errors
    ///
    /// Returns an error if the mock scale has been dropped.
    pub fn send(&self, response: MockResponse) -> Result<()> {
        self.response_tx
            .send(response)
            .map_err(|_| DeviceError::disconnected(self.name.clone()))
    }

    /// Queue reply bytes verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the mock scale has been dropped.
    pub fn send_bytes(&self, bytes: impl Into<Bytes>) -> Result<()> {
        self.send(MockResponse::Reply(bytes.into()))
    }

    /// Queue the reply a scale would send for this reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the reading does not fit the reply layout or the
    /// mock scale has been dropped.
    pub fn send_reading(&self, status: WeightStatus, total: f64, units: &str) -> Result<()> {
        let reply = self.builder.weight_reply(status, total, units)?;
        self.send(MockResponse::Reply(reply))
    }

    /// Queue an OK reply whose weight digits are garbled.
    ///
    /// # Errors
    ///
    /// Returns an error if the mock scale has been dropped.
    pub fn send_garbled_weight(&self, units: &str) -> Result<()> {
        let reply = self.builder.raw_weight_reply("0?.4?4", units)?;
        self.send(MockResponse::Reply(reply))
    }

    /// Queue a status-only reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the mock scale has been dropped.
    pub fn send_status(&self, status: WeightStatus) -> Result<()> {
        self.send(MockResponse::Reply(self.builder.status_reply(status)))
    }

    /// Make the next command go unanswered.
    ///
    /// # Errors
    ///
    /// Returns an error if the mock scale has been dropped.
    pub fn send_silence(&self) -> Result<()> {
        self.send(MockResponse::Silence)
    }

    /// Make the scale drop off the line at the next command.
    ///
    /// # Errors
    ///
    /// Returns an error if the mock scale has been dropped.
    pub fn disconnect(&self) -> Result<()> {
        self.send(MockResponse::Disconnect)
    }

    /// Commands the host has written since the last call.
    pub fn take_commands(&mut self) -> Vec<Bytes> {
        let mut commands = Vec::new();
        while let Ok(command) = self.command_rx.try_recv() {
            commands.push(command);
        }
        commands
    }
}

/// Hands a prepared [`MockScale`] to the driver, once.
#[derive(Debug, Default)]
pub struct MockOpener {
    scale: Option<MockScale>,
}

impl MockOpener {
    pub fn new(scale: MockScale) -> Self {
        Self { scale: Some(scale) }
    }

    /// An opener whose port is always busy.
    pub fn unavailable() -> Self {
        Self { scale: None }
    }
}

impl TransportOpener for MockOpener {
    type Transport = MockScale;

    fn open(&mut self, config: &DriverConfig) -> Result<MockScale> {
        let mut scale = self.scale.take().ok_or_else(|| {
            DeviceError::initialization_failed(format!("{}: port busy", config.port_name))
        })?;
        scale.name = config.port_name.clone();
        Ok(scale)
    }
}
