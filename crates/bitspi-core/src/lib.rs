//! bitspi-core - Bit-banged SPI master over discrete lines
//!
//! This crate drives an SPI peripheral from plain GPIO lines when no SPI
//! controller is available. A [`Connection`] owns a clock line, an active-low
//! slave-select line and optional data-out / data-in lines, and moves integer
//! values across them one clock pulse per bit.
//!
//! The crate does not know how a line reaches hardware. Backends implement
//! [`OutputLine`], [`InputLine`] and [`Delay`] (see `bitspi-linux-gpio` for the
//! Linux character device, or `bitspi-dummy` for an in-memory test double).
//!
//! # Features
//!
//! - `std` - Enable [`StdDelay`] and `std::error::Error` for [`Error`]
//!
//! # Example
//!
//! ```ignore
//! use bitspi_core::{BitOrder, Connection};
//!
//! let mut conn = Connection::new(clk, ss, Some(miso), Some(mosi), BitOrder::MostSignificantFirst, delay);
//! {
//!     let mut slave = conn.select_slave()?;
//!     slave.write(0x9Fu8, 8)?;
//!     let id = slave.read(24)?;
//! } // slave deselected here
//! conn.close();
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod bit_order;
pub mod connection;
pub mod error;
pub mod line;
pub mod selection;
pub mod word;

pub use bit_order::BitOrder;
pub use connection::{Connection, DEFAULT_DWELL};
pub use error::{Error, Result};
#[cfg(feature = "std")]
pub use line::StdDelay;
pub use line::{Delay, InputLine, Line, NoLine, OutputLine};
pub use selection::SlaveSelection;
pub use word::Word;
