//! Programmer registration and dispatch
//!
//! This module maps programmer strings (`name:key=value,...`) onto opened
//! connections, with support for feature-gated inclusion and dynamic help
//! text generation.

use std::collections::HashSet;

#[cfg(feature = "dummy")]
use bitspi_dummy::{DummyBus, DummyConnection};
#[cfg(feature = "linux-gpio")]
use bitspi_linux_gpio::LinuxGpioConnection;

/// Information about a programmer
pub struct ProgrammerInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Get information about all available programmers (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_programmers() -> Vec<ProgrammerInfo> {
    let mut programmers = Vec::new();

    #[cfg(feature = "dummy")]
    programmers.push(ProgrammerInfo {
        name: "dummy",
        aliases: &["echo"],
        description: "In-memory echo peripheral for testing (order=<msb|lsb>,dwell=<us>)",
    });

    #[cfg(feature = "linux-gpio")]
    programmers.push(ProgrammerInfo {
        name: "linux_gpio",
        aliases: &["linux-gpio", "gpio"],
        description: "Linux GPIO bitbang (dev=/dev/gpiochipN,clk=N,ss=N,mosi=N,miso=N,order=<msb|lsb>,dwell=<us>)",
    });

    programmers
}

/// Generate a short list of programmer names for CLI help
pub fn programmer_names_short() -> String {
    let programmers = available_programmers();
    let names: Vec<&str> = programmers.iter().map(|p| p.name).collect();
    names.join(", ")
}

/// Parsed programmer string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgrammerParams {
    /// Programmer name
    pub name: String,
    /// Options in the order given
    pub options: Vec<(String, String)>,
}

impl ProgrammerParams {
    /// Options as borrowed pairs, the form backends parse
    pub fn option_pairs(&self) -> Vec<(&str, &str)> {
        self.options
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

/// Parse a programmer string of the form `name:key=value,key=value`
pub fn parse_programmer_params(s: &str) -> Result<ProgrammerParams, Box<dyn std::error::Error>> {
    let (name, opts_str) = s.split_once(':').unwrap_or((s, ""));

    let mut options = Vec::new();
    let mut seen = HashSet::new();
    if !opts_str.is_empty() {
        for opt in opts_str.split(',') {
            let Some((key, value)) = opt.split_once('=') else {
                return Err(
                    format!("Invalid parameter format: '{}' (expected key=value)", opt).into(),
                );
            };
            if !seen.insert(key) {
                return Err(format!("Parameter '{}' given more than once", key).into());
            }
            options.push((key.to_string(), value.to_string()));
        }
    }

    Ok(ProgrammerParams {
        name: name.to_string(),
        options,
    })
}

/// An opened connection, one variant per backend
pub enum OpenConnection {
    /// In-memory bus; the handle is kept for reporting
    #[cfg(feature = "dummy")]
    Dummy(DummyConnection, DummyBus),
    /// Linux GPIO character device
    #[cfg(feature = "linux-gpio")]
    LinuxGpio(LinuxGpioConnection),
}

/// Open the connection described by a programmer string
pub fn open_connection(programmer: &str) -> Result<OpenConnection, Box<dyn std::error::Error>> {
    let params = parse_programmer_params(programmer)?;
    #[allow(unused_variables)]
    let options = params.option_pairs();

    match params.name.as_str() {
        #[cfg(feature = "dummy")]
        "dummy" | "echo" => open_dummy(&options),

        #[cfg(feature = "linux-gpio")]
        "linux_gpio" | "linux-gpio" | "gpio" => Ok(OpenConnection::LinuxGpio(
            bitspi_linux_gpio::open_linux_gpio(&options)?,
        )),

        _ => Err(format!(
            "Unknown programmer: {} [available: {}]",
            params.name,
            programmer_names_short()
        )
        .into()),
    }
}

#[cfg(feature = "dummy")]
fn open_dummy(options: &[(&str, &str)]) -> Result<OpenConnection, Box<dyn std::error::Error>> {
    let mut order = bitspi_core::BitOrder::default();
    let mut dwell = std::time::Duration::ZERO;

    for (key, value) in options {
        match *key {
            "order" => {
                order = bitspi_core::BitOrder::from_name(value)
                    .ok_or_else(|| format!("Invalid order: {} (use msb or lsb)", value))?;
            }
            "dwell" => {
                let us: u64 = value
                    .parse()
                    .map_err(|_| format!("Invalid dwell value: {}", value))?;
                dwell = std::time::Duration::from_micros(us);
            }
            _ => log::warn!("dummy: Unknown option: {}={}", key, value),
        }
    }

    let bus = DummyBus::echo();
    let conn = bus.connect(order).with_dwell(dwell);
    Ok(OpenConnection::Dummy(conn, bus))
}
