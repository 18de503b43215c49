//! Driver configuration.
//!
//! The device framework hands the driver a loosely typed string map. This
//! module turns it into a [`DriverConfig`] in one validating step, so nothing
//! downstream ever sees a half-checked setting.
//!
//! # Keys and Defaults
//!
//! | Key | Meaning | Default | Accepted |
//! |-----|---------|---------|----------|
//! | `BaudRate` | line speed | 9600 | > 0 |
//! | `DataBits` | bits per character | 7 | 5-8 |
//! | `StopBits` | stop bits | 1 | 1-2 |
//! | `MinimumReadSize` | bytes one read waits for | 1 | 1-256 |
//! | `ParityMode` | 0 none, 1 odd, 2 even | 2 | 0-2 |
//! | `TimeOutMilli` | read timeout in ms | 500 | > 0 |
//!
//! A missing key takes its default. A key that is present but does not parse
//! or is out of range rejects the whole configuration. Unknown keys are
//! ignored; the framework stores unrelated settings in the same map.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use checkout_scale_core::{Error, Result, constants::*};

/// Parity checking on the serial line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Odd,
    Even,
}

impl Parity {
    /// Decode the numeric `ParityMode` setting.
    ///
    /// # Errors
    /// Returns `Error::InvalidConfigValue` for modes other than 0, 1 or 2.
    pub fn from_mode(mode: u8) -> Result<Self> {
        match mode {
            0 => Ok(Self::None),
            1 => Ok(Self::Odd),
            2 => Ok(Self::Even),
            other => Err(invalid(CONFIG_PARITY_MODE, other)),
        }
    }

    pub fn mode(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Odd => 1,
            Self::Even => 2,
        }
    }
}

/// Data bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl DataBits {
    /// # Errors
    /// Returns `Error::InvalidConfigValue` outside 5-8.
    pub fn from_count(count: u8) -> Result<Self> {
        match count {
            5 => Ok(Self::Five),
            6 => Ok(Self::Six),
            7 => Ok(Self::Seven),
            8 => Ok(Self::Eight),
            other => Err(invalid(CONFIG_DATA_BITS, other)),
        }
    }

    pub fn count(&self) -> u8 {
        match self {
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
        }
    }
}

/// Stop bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

impl StopBits {
    /// # Errors
    /// Returns `Error::InvalidConfigValue` outside 1-2.
    pub fn from_count(count: u8) -> Result<Self> {
        match count {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(invalid(CONFIG_STOP_BITS, other)),
        }
    }

    pub fn count(&self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

/// Validated settings for one scale.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use std::time::Duration;
/// use checkout_scale_device::config::{DriverConfig, Parity};
///
/// let map = HashMap::from([
///     ("BaudRate".to_string(), "19200".to_string()),
///     ("ParityMode".to_string(), "0".to_string()),
/// ]);
/// let config = DriverConfig::from_map("/dev/ttyUSB0", &map).unwrap();
///
/// assert_eq!(config.baud_rate, 19200);
/// assert_eq!(config.parity, Parity::None);
/// assert_eq!(config.timeout, Duration::from_millis(500)); // default
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    pub port_name: String,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    pub parity: Parity,
    pub minimum_read_size: usize,
    pub timeout: Duration,
}

impl DriverConfig {
    /// Configuration with every setting at its default.
    pub fn new(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DataBits::Seven,
            stop_bits: StopBits::One,
            parity: Parity::Even,
            minimum_read_size: DEFAULT_MINIMUM_READ_SIZE,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MILLI),
        }
    }

    /// Parse and validate the framework's configuration map.
    ///
    /// # Errors
    ///
    /// - `Error::MissingConfig` if the port name is blank
    /// - `Error::InvalidConfigValue` if a present key does not parse or is
    ///   out of range
    pub fn from_map(port_name: &str, map: &HashMap<String, String>) -> Result<Self> {
        let mut config = Self::new(port_name.trim());

        if let Some(baud_rate) = setting::<u32>(map, CONFIG_BAUD_RATE)? {
            config.baud_rate = baud_rate;
        }
        if let Some(count) = setting::<u8>(map, CONFIG_DATA_BITS)? {
            config.data_bits = DataBits::from_count(count)?;
        }
        if let Some(count) = setting::<u8>(map, CONFIG_STOP_BITS)? {
            config.stop_bits = StopBits::from_count(count)?;
        }
        if let Some(size) = setting::<usize>(map, CONFIG_MINIMUM_READ_SIZE)? {
            config.minimum_read_size = size;
        }
        if let Some(mode) = setting::<u8>(map, CONFIG_PARITY_MODE)? {
            config.parity = Parity::from_mode(mode)?;
        }
        if let Some(millis) = setting::<u64>(map, CONFIG_TIMEOUT_MILLI)? {
            config.timeout = Duration::from_millis(millis);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the range constraints that the enums do not already enforce.
    ///
    /// # Errors
    /// See [`DriverConfig::from_map`].
    pub fn validate(&self) -> Result<()> {
        if self.port_name.trim().is_empty() {
            return Err(Error::MissingConfig("port name".to_string()));
        }
        if self.baud_rate == 0 {
            return Err(invalid(CONFIG_BAUD_RATE, self.baud_rate));
        }
        if !(1..=MAX_MINIMUM_READ_SIZE).contains(&self.minimum_read_size) {
            return Err(invalid(CONFIG_MINIMUM_READ_SIZE, self.minimum_read_size));
        }
        if self.timeout.is_zero() {
            return Err(invalid(CONFIG_TIMEOUT_MILLI, self.timeout_ms()));
        }
        Ok(())
    }

    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    pub fn with_minimum_read_size(mut self, size: usize) -> Self {
        self.minimum_read_size = size;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn setting<T: FromStr>(map: &HashMap<String, String>, key: &str) -> Result<Option<T>> {
    match map.get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::InvalidConfigValue {
                key: key.to_string(),
                value: raw.clone(),
            }),
    }
}

fn invalid(key: &str, value: impl ToString) -> Error {
    Error::InvalidConfigValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_map() -> HashMap<String, String> {
        map(&[
            ("BaudRate", "9600"),
            ("DataBits", "7"),
            ("StopBits", "1"),
            ("MinimumReadSize", "1"),
            ("ParityMode", "2"),
            ("TimeOutMilli", "500"),
        ])
    }

    #[test]
    fn test_full_map() {
        let config = DriverConfig::from_map("/dev/ttyS0", &full_map()).unwrap();
        assert_eq!(config, DriverConfig::new("/dev/ttyS0"));
    }

    #[test]
    fn test_empty_map_takes_defaults() {
        let config = DriverConfig::from_map("COM3", &HashMap::new()).unwrap();
        assert_eq!(config.baud_rate, DEFAULT_BAUD_RATE);
        assert_eq!(config.data_bits.count(), DEFAULT_DATA_BITS);
        assert_eq!(config.stop_bits.count(), DEFAULT_STOP_BITS);
        assert_eq!(config.parity.mode(), DEFAULT_PARITY_MODE);
        assert_eq!(config.minimum_read_size, DEFAULT_MINIMUM_READ_SIZE);
        assert_eq!(config.timeout_ms(), DEFAULT_TIMEOUT_MILLI);
    }

    #[test]
    fn test_unrelated_keys_ignored() {
        let config = DriverConfig::from_map(
            "testSerialPort",
            &map(&[("SimulatorPort", "8081"), ("ScaleID", "123"), ("LaneID", "123")]),
        )
        .unwrap();
        assert_eq!(config.timeout_ms(), DEFAULT_TIMEOUT_MILLI);
    }

    #[test]
    fn test_values_are_trimmed() {
        let config = DriverConfig::from_map("COM3", &map(&[("BaudRate", " 4800 ")])).unwrap();
        assert_eq!(config.baud_rate, 4800);
    }

    #[rstest]
    #[case("BaudRate", "fast")]
    #[case("BaudRate", "0")]
    #[case("BaudRate", "-9600")]
    #[case("DataBits", "9")]
    #[case("DataBits", "")]
    #[case("StopBits", "3")]
    #[case("MinimumReadSize", "0")]
    #[case("MinimumReadSize", "100000")]
    #[case("ParityMode", "3")]
    #[case("TimeOutMilli", "0")]
    #[case("TimeOutMilli", "1.5")]
    fn test_invalid_values_rejected(#[case] key: &str, #[case] value: &str) {
        let mut settings = full_map();
        settings.insert(key.to_string(), value.to_string());
        let err = DriverConfig::from_map("COM3", &settings).unwrap_err();
        assert!(err.is_config());
        assert!(matches!(err, Error::InvalidConfigValue { key: k, .. } if k == key));
    }

    #[test]
    fn test_blank_port_rejected() {
        let err = DriverConfig::from_map("  ", &full_map()).unwrap_err();
        assert!(matches!(err, Error::MissingConfig(_)));
    }

    #[test]
    fn test_builder_setters() {
        let config = DriverConfig::new("COM1")
            .with_baud_rate(2400)
            .with_parity(Parity::Odd)
            .with_minimum_read_size(4)
            .with_timeout(Duration::from_millis(50));
        assert!(config.validate().is_ok());
        assert_eq!(config.baud_rate, 2400);
        assert_eq!(config.parity, Parity::Odd);
        assert_eq!(config.minimum_read_size, 4);
        assert_eq!(config.timeout_ms(), 50);
    }

    #[test]
    fn test_enum_roundtrips() {
        for mode in 0..=2 {
            assert_eq!(Parity::from_mode(mode).unwrap().mode(), mode);
        }
        for count in 5..=8 {
            assert_eq!(DataBits::from_count(count).unwrap().count(), count);
        }
        for count in 1..=2 {
            assert_eq!(StopBits::from_count(count).unwrap().count(), count);
        }
    }
}
