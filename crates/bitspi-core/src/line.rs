//! Line and delay capabilities consumed by the transfer engine
//!
//! These traits are the only seam between the engine and the hardware. Line
//! operations are infallible; a backend that fails to drive or sample a line
//! reports it through `log` and carries on.

use core::fmt;
use core::time::Duration;

/// Logical lines of a bit-banged SPI connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    /// Serial clock
    Clock,
    /// Active-low slave select
    Select,
    /// Data from master to slave
    DataOut,
    /// Data from slave to master
    DataIn,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clock => write!(f, "clock (SCK)"),
            Self::Select => write!(f, "slave-select (SS)"),
            Self::DataOut => write!(f, "data-out (MOSI)"),
            Self::DataIn => write!(f, "data-in (MISO)"),
        }
    }
}

/// A line the master drives
pub trait OutputLine {
    /// Drive the line high (`true`) or low (`false`)
    fn set(&mut self, high: bool);

    /// Give up the underlying resource
    ///
    /// Default implementation drops the line.
    fn release(self)
    where
        Self: Sized,
    {
    }
}

/// A line the master samples
pub trait InputLine {
    /// Sample the current line level
    fn get(&mut self) -> bool;

    /// Give up the underlying resource
    ///
    /// Default implementation drops the line.
    fn release(self)
    where
        Self: Sized,
    {
    }
}

/// Blocking delay used to hold the clock high
pub trait Delay {
    /// Block the caller for at least `duration`
    fn sleep(&mut self, duration: Duration);
}

/// Placeholder type for a data line that is never provided
///
/// Uninhabited, so only `None::<NoLine>` can be passed where it is used.
#[derive(Debug)]
pub enum NoLine {}

impl OutputLine for NoLine {
    fn set(&mut self, _high: bool) {
        match *self {}
    }
}

impl InputLine for NoLine {
    fn get(&mut self) -> bool {
        match *self {}
    }
}

/// Delay backed by `std::thread::sleep`
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl Delay for StdDelay {
    fn sleep(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}
