//! bitspi-linux-gpio - Linux GPIO lines for bitspi
//!
//! This crate provides [`OutputLine`](bitspi_core::OutputLine) and
//! [`InputLine`](bitspi_core::InputLine) implementations on top of the Linux
//! GPIO character device, using the gpiocdev crate.
//!
//! # Example
//!
//! ```no_run
//! use bitspi_linux_gpio::{open, LinuxGpioConfig};
//!
//! let config = LinuxGpioConfig::new("/dev/gpiochip0", 11, 8)
//! //                                  device          CLK SS
//!     .with_data_out(10)
//!     .with_data_in(9);
//!
//! let mut conn = open(&config)?;
//! {
//!     let mut slave = conn.select_slave()?;
//!     slave.write(0x9Fu8, 8)?;
//!     println!("ID: {:06X}", slave.read(24)?);
//! }
//! conn.close();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Usage with bitspi CLI
//!
//! ```bash
//! bitspi write -p linux_gpio:gpiochip=0,clk=11,ss=8,mosi=10 --bits 8 0xA5
//! bitspi read -p linux_gpio:dev=/dev/gpiochip0,clk=11,ss=8,miso=9,order=lsb --bits 16
//! ```
//!
//! # System Requirements
//!
//! - Linux kernel 4.8+ with GPIO character device support (kernel 5.5+ for v2 API)
//! - Access to `/dev/gpiochipN` devices (may require root or udev rules)

pub mod device;
pub mod error;
pub mod line;

// Re-exports
pub use device::{open, parse_options, LinuxGpioConfig, LinuxGpioConnection};
pub use error::{LinuxGpioError, Result};
pub use line::{GpioInput, GpioOutput};

/// Parse options and open a connection in one step
///
/// This is a convenience function for use in the CLI programmer dispatch.
pub fn open_linux_gpio(options: &[(&str, &str)]) -> Result<LinuxGpioConnection> {
    let config = parse_options(options)?;
    open(&config)
}
