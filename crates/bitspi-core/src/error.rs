//! Error types for bitspi-core
//!
//! Every error is raised before any line is toggled for the offending call,
//! so a [`Connection`](crate::Connection) stays usable after a failure.

use core::fmt;

use crate::line::Line;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A transfer needs a data line that was not provided at construction
    UnsupportedOperation(Line),
    /// Requested bit count does not fit the chosen integer width
    InvalidArgument {
        /// Number of bits requested
        bit_count: u32,
        /// Width of the integer carrying the bits
        capacity: u32,
    },
    /// The slave is already selected by a live [`SlaveSelection`](crate::SlaveSelection)
    SlaveAlreadySelected,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedOperation(line) => {
                write!(f, "no {} line has been provided", line)
            }
            Self::InvalidArgument {
                bit_count,
                capacity,
            } => write!(
                f,
                "{}-bit data cannot contain {} bits",
                capacity, bit_count
            ),
            Self::SlaveAlreadySelected => write!(f, "slave is already selected"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;

/// Reject a bit count larger than the word that has to carry it
pub(crate) fn check_width(bit_count: u32, capacity: u32) -> Result<()> {
    if bit_count > capacity {
        return Err(Error::InvalidArgument {
            bit_count,
            capacity,
        });
    }
    Ok(())
}
