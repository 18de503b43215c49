//! Serial scale driver for checkout lanes.
//!
//! This crate connects the wire protocol in `checkout-scale-protocol` to a
//! serial port and to the point-of-sale device framework. It is synchronous:
//! one weigh cycle is a blocking write followed by reads bounded by the
//! configured timeout.
//!
//! # Layers
//!
//! - [`transport`]: byte I/O over a real port (`hardware-serial` feature) or
//!   the scripted [`mock::MockScale`]
//! - [`reader`]: one request/reply cycle and its error classification
//! - [`device`] and [`driver`]: the framework-facing adapter built from a
//!   string configuration map
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use checkout_scale_core::WeightStatus;
//! use checkout_scale_device::mock::{MockOpener, MockScale};
//! use checkout_scale_device::{ScaleDriver, SerialScaleDriver, WeighingDevice};
//!
//! let (scale, handle) = MockScale::new();
//! let mut driver = SerialScaleDriver::with_opener(MockOpener::new(scale));
//! let mut device = driver
//!     .new_device("/dev/ttyUSB0", Some(&HashMap::new()))
//!     .expect("valid configuration");
//!
//! handle.send_reading(WeightStatus::Ok, 2.494, "LB").unwrap();
//! let reading = device.read_weight().unwrap().unwrap();
//! assert_eq!(reading.units, "LB");
//! ```

pub mod config;
pub mod device;
pub mod driver;
pub mod error;
pub mod mock;
pub mod reader;
pub mod traits;
pub mod transport;

pub use config::DriverConfig;
pub use device::ScaleDevice;
pub use driver::SerialScaleDriver;
pub use error::{DeviceError, Result};
pub use reader::ScaleReader;
pub use traits::{ScaleDriver, WeighingDevice, WeightEvent, weight_event};
pub use transport::{SerialTransport, TransportOpener};

#[cfg(feature = "hardware-serial")]
pub use transport::{SerialPortOpener, SerialPortTransport};
