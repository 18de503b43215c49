//! Device framework trait definitions.
//!
//! These traits are the contract between the point-of-sale device framework
//! and a scale driver. The framework asks a [`ScaleDriver`] for a device by
//! port name and configuration, then polls the [`WeighingDevice`] it gets back.

use std::collections::HashMap;

use checkout_scale_core::{WeightReading, WeightStatus};
use serde_json::{Map, Value};

use crate::error::Result;

/// An event payload reported to the framework, keyed `status`, `total` and
/// `units`.
pub type WeightEvent = Map<String, Value>;

/// Creates scale devices.
pub trait ScaleDriver {
    type Device: WeighingDevice;

    /// Create a device for `port` from the framework's configuration map.
    ///
    /// Returns `None` if the configuration is absent or invalid, or the port
    /// cannot be opened. Failures are logged, not returned; the framework
    /// only needs to know whether a device exists.
    fn new_device(
        &mut self,
        port: &str,
        config: Option<&HashMap<String, String>>,
    ) -> Option<Self::Device>;
}

/// A scale the framework can poll for weights.
///
/// # Examples
///
/// ```
/// use checkout_scale_device::error::Result;
/// use checkout_scale_device::traits::WeighingDevice;
///
/// fn poll<D: WeighingDevice>(device: &mut D) -> Result<String> {
///     Ok(match device.read_weight()? {
///         Some(reading) => reading.to_string(),
///         None => "not ready".to_string(),
///     })
/// }
/// ```
pub trait WeighingDevice {
    /// Port this device talks through.
    fn port_name(&self) -> &str;

    /// Perform one weigh cycle.
    ///
    /// # Errors
    ///
    /// Transport, protocol or scale-fault errors; see
    /// [`DeviceError`](crate::error::DeviceError).
    fn read_weight(&mut self) -> Result<Option<WeightReading>>;

    /// Query the scale's status without weighing.
    ///
    /// # Errors
    ///
    /// Transport or protocol errors.
    fn read_status(&mut self) -> Result<WeightStatus>;

    /// Perform one weigh cycle and shape the result as a framework event.
    ///
    /// # Errors
    ///
    /// Same as [`WeighingDevice::read_weight`].
    fn read_weight_event(&mut self) -> Result<Option<WeightEvent>> {
        Ok(self.read_weight()?.map(|reading| weight_event(&reading)))
    }
}

/// Shape a reading as the event map the framework consumes.
///
/// # Examples
///
/// ```
/// use checkout_scale_core::WeightReading;
/// use checkout_scale_device::traits::weight_event;
/// use serde_json::json;
///
/// let event = weight_event(&WeightReading::ok(2.494, "LB").unwrap());
/// assert_eq!(event["status"], json!("OK"));
/// assert_eq!(event["total"], json!(2.494));
/// assert_eq!(event["units"], json!("LB"));
/// ```
pub fn weight_event(reading: &WeightReading) -> WeightEvent {
    let mut event = Map::new();
    event.insert("status".to_string(), Value::from(reading.status.as_str()));
    event.insert("total".to_string(), Value::from(reading.total));
    event.insert("units".to_string(), Value::from(reading.units.clone()));
    event
}
