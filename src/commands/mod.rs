//! CLI command implementations
//!
//! Every command runs generically over a [`Connection`], so the same code
//! drives the in-memory dummy bus and real GPIO lines. Each command holds
//! the slave selected for its whole duration.

mod list;
pub mod read;
pub mod transfer;
pub mod write;

use bitspi_core::{Connection, Delay, InputLine, OutputLine};

pub use list::list_programmers;
pub use read::run_read;
pub use transfer::run_transfer;
pub use write::run_write;

/// Number of values above which a progress bar is shown, based on how long
/// one value takes on the wire (about one second of transfer)
pub fn progress_threshold<C, S, O, I, D>(conn: &Connection<C, S, O, I, D>, bits: u32) -> usize
where
    C: OutputLine,
    S: OutputLine,
    O: OutputLine,
    I: InputLine,
    D: Delay,
{
    let per_value = conn.dwell().as_micros() * u128::from(bits.max(1));
    if per_value == 0 {
        return usize::MAX;
    }
    usize::try_from(1_000_000 / per_value).unwrap_or(usize::MAX).max(1)
}

/// Format a value as zero-padded hex sized to its bit count
pub fn format_value(value: u64, bits: u32) -> String {
    let digits = bits.div_ceil(4).max(1) as usize;
    format!("0x{:0width$X}", value, width = digits)
}
