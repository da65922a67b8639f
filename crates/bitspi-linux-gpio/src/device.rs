//! Linux GPIO connection setup
//!
//! This module turns a [`LinuxGpioConfig`] into a ready
//! [`Connection`](bitspi_core::Connection) whose lines are requested from the
//! GPIO character device.

use std::time::Duration;

use crate::error::{LinuxGpioError, Result};
use crate::line::{GpioInput, GpioOutput};

use bitspi_core::{BitOrder, Connection, Line, StdDelay, DEFAULT_DWELL};
use gpiocdev::line::Offset;

/// Connection driving Linux GPIO lines
pub type LinuxGpioConnection = Connection<GpioOutput, GpioOutput, GpioOutput, GpioInput, StdDelay>;

/// Configuration for opening a Linux GPIO connection
#[derive(Debug, Clone)]
pub struct LinuxGpioConfig {
    /// Device path (e.g., "/dev/gpiochip0")
    pub device: String,
    /// Clock (SCK) line offset
    pub clock: Offset,
    /// Slave-select (SS) line offset
    pub select: Offset,
    /// Data-out (MOSI) line offset, if wired
    pub data_out: Option<Offset>,
    /// Data-in (MISO) line offset, if wired
    pub data_in: Option<Offset>,
    /// Bit order for multi-bit transfers
    pub bit_order: BitOrder,
    /// Time the clock is held high on each pulse
    pub dwell: Duration,
}

impl Default for LinuxGpioConfig {
    fn default() -> Self {
        Self {
            device: String::new(),
            clock: 0,
            select: 0,
            data_out: None,
            data_in: None,
            bit_order: BitOrder::default(),
            dwell: DEFAULT_DWELL,
        }
    }
}

impl LinuxGpioConfig {
    /// Create a new configuration with the given device path and mandatory lines
    pub fn new(device: impl Into<String>, clock: Offset, select: Offset) -> Self {
        Self {
            device: device.into(),
            clock,
            select,
            ..Default::default()
        }
    }

    /// Wire a data-out (MOSI) line
    pub fn with_data_out(mut self, offset: Offset) -> Self {
        self.data_out = Some(offset);
        self
    }

    /// Wire a data-in (MISO) line
    pub fn with_data_in(mut self, offset: Offset) -> Self {
        self.data_in = Some(offset);
        self
    }

    /// Set the bit order
    pub fn with_bit_order(mut self, bit_order: BitOrder) -> Self {
        self.bit_order = bit_order;
        self
    }

    /// Set the clock high time
    pub fn with_dwell(mut self, dwell: Duration) -> Self {
        self.dwell = dwell;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.device.is_empty() {
            return Err(LinuxGpioError::NoDevice);
        }

        let mut used: Vec<Offset> = vec![self.clock, self.select];
        used.extend(self.data_out);
        used.extend(self.data_in);
        for (i, offset) in used.iter().enumerate() {
            if used[..i].contains(offset) {
                return Err(LinuxGpioError::DuplicateLine(*offset));
            }
        }
        Ok(())
    }
}

/// Request every configured line and build the connection
///
/// Lines start at their idle levels: clock low, select high, data-out low.
pub fn open(config: &LinuxGpioConfig) -> Result<LinuxGpioConnection> {
    config.validate()?;

    log::debug!("linux_gpio: Opening device {}", config.device);

    let clock = GpioOutput::open(&config.device, Line::Clock, config.clock, false)?;
    let select = GpioOutput::open(&config.device, Line::Select, config.select, true)?;
    let data_out = config
        .data_out
        .map(|offset| GpioOutput::open(&config.device, Line::DataOut, offset, false))
        .transpose()?;
    let data_in = config
        .data_in
        .map(|offset| GpioInput::open(&config.device, offset))
        .transpose()?;

    log::info!(
        "linux_gpio: Opened {} (clk={}, ss={}, mosi={}, miso={}, {})",
        config.device,
        config.clock,
        config.select,
        describe(config.data_out),
        describe(config.data_in),
        config.bit_order
    );

    Ok(Connection::new(clock, select, data_in, data_out, config.bit_order, StdDelay)
        .with_dwell(config.dwell))
}

fn describe(offset: Option<Offset>) -> String {
    offset.map_or_else(|| "none".to_string(), |o| o.to_string())
}

fn parse_offset(name: &'static str, value: &str) -> Result<Offset> {
    value.parse().map_err(|_| LinuxGpioError::InvalidLineNumber {
        name,
        value: value.to_string(),
    })
}

/// Parse connection options from a list of key-value pairs
///
/// # Supported Options
///
/// - `dev=/dev/gpiochipN` - GPIO chip device path (required, or use gpiochip)
/// - `gpiochip=N` - GPIO chip number (alternative to dev)
/// - `clk=N` or `sck=N` - clock line offset (required)
/// - `ss=N` or `cs=N` - slave-select line offset (required)
/// - `mosi=N` - data-out line offset (optional)
/// - `miso=N` - data-in line offset (optional)
/// - `order=msb|lsb` - bit order (optional, default msb)
/// - `dwell=N` - clock high time in microseconds (optional, default 1000)
pub fn parse_options(options: &[(&str, &str)]) -> Result<LinuxGpioConfig> {
    let mut config = LinuxGpioConfig::default();
    let mut clock = None;
    let mut select = None;
    let mut gpiochip: Option<u32> = None;

    for (key, value) in options {
        match *key {
            "dev" => {
                config.device = value.to_string();
            }
            "gpiochip" => {
                gpiochip = Some(value.parse().map_err(|_| {
                    LinuxGpioError::InvalidParameter(format!("gpiochip={}", value))
                })?);
            }
            "clk" | "sck" => clock = Some(parse_offset("clk", value)?),
            "ss" | "cs" => select = Some(parse_offset("ss", value)?),
            "mosi" => config.data_out = Some(parse_offset("mosi", value)?),
            "miso" => config.data_in = Some(parse_offset("miso", value)?),
            "order" => {
                config.bit_order = BitOrder::from_name(value).ok_or_else(|| {
                    LinuxGpioError::InvalidParameter(format!("order={} (use msb or lsb)", value))
                })?;
            }
            "dwell" => {
                let us: u64 = value.parse().map_err(|_| {
                    LinuxGpioError::InvalidParameter(format!("dwell={}", value))
                })?;
                config.dwell = Duration::from_micros(us);
            }
            _ => {
                log::warn!("linux_gpio: Unknown option: {}={}", key, value);
            }
        }
    }

    // Handle dev vs gpiochip
    if config.device.is_empty() {
        let n = gpiochip.ok_or(LinuxGpioError::NoDevice)?;
        config.device = format!("/dev/gpiochip{}", n);
    } else if gpiochip.is_some() {
        return Err(LinuxGpioError::ConflictingDevice);
    }

    config.clock = clock.ok_or(LinuxGpioError::MissingParameter("clk"))?;
    config.select = select.ok_or(LinuxGpioError::MissingParameter("ss"))?;

    if config.data_out.is_none() && config.data_in.is_none() {
        log::warn!("linux_gpio: neither mosi nor miso given, only clock pulses are possible");
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        let config = parse_options(&[
            ("dev", "/dev/gpiochip1"),
            ("clk", "11"),
            ("ss", "8"),
            ("mosi", "10"),
            ("miso", "9"),
            ("order", "lsb"),
            ("dwell", "5"),
        ])
        .unwrap();

        assert_eq!(config.device, "/dev/gpiochip1");
        assert_eq!(config.clock, 11);
        assert_eq!(config.select, 8);
        assert_eq!(config.data_out, Some(10));
        assert_eq!(config.data_in, Some(9));
        assert_eq!(config.bit_order, BitOrder::LeastSignificantFirst);
        assert_eq!(config.dwell, Duration::from_micros(5));
    }

    #[test]
    fn test_parse_aliases_and_defaults() {
        let config = parse_options(&[("gpiochip", "0"), ("sck", "3"), ("cs", "4")]).unwrap();
        assert_eq!(config.device, "/dev/gpiochip0");
        assert_eq!(config.clock, 3);
        assert_eq!(config.select, 4);
        assert_eq!(config.data_out, None);
        assert_eq!(config.data_in, None);
        assert_eq!(config.bit_order, BitOrder::MostSignificantFirst);
        assert_eq!(config.dwell, DEFAULT_DWELL);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_options(&[("clk", "1"), ("ss", "2")]),
            Err(LinuxGpioError::NoDevice)
        ));
        assert!(matches!(
            parse_options(&[("dev", "/dev/gpiochip0"), ("gpiochip", "0"), ("clk", "1"), ("ss", "2")]),
            Err(LinuxGpioError::ConflictingDevice)
        ));
        assert!(matches!(
            parse_options(&[("gpiochip", "0"), ("ss", "2")]),
            Err(LinuxGpioError::MissingParameter("clk"))
        ));
        assert!(matches!(
            parse_options(&[("gpiochip", "0"), ("clk", "x"), ("ss", "2")]),
            Err(LinuxGpioError::InvalidLineNumber { name: "clk", .. })
        ));
        assert!(matches!(
            parse_options(&[("gpiochip", "0"), ("clk", "1"), ("ss", "2"), ("order", "big")]),
            Err(LinuxGpioError::InvalidParameter(_))
        ));
        assert!(matches!(
            parse_options(&[("gpiochip", "0"), ("clk", "1"), ("ss", "2"), ("miso", "1")]),
            Err(LinuxGpioError::DuplicateLine(1))
        ));
    }

    #[test]
    fn test_config_builder() {
        let config = LinuxGpioConfig::new("/dev/gpiochip0", 11, 8)
            .with_data_out(10)
            .with_bit_order(BitOrder::LeastSignificantFirst)
            .with_dwell(Duration::from_micros(50));
        assert_eq!(config.data_out, Some(10));
        assert_eq!(config.data_in, None);
        assert!(config.validate().is_ok());
    }
}
