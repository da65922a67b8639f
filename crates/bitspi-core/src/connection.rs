//! Bit-banged SPI connection
//!
//! A [`Connection`] owns every line it drives. Transfers proceed one clock
//! pulse per bit, in ascending pulse order:
//!
//! - **write**: data-out is set, then the clock is pulsed
//! - **read**: the clock is pulsed, then data-in is sampled
//!
//! At rest the clock is low, slave-select is high and data-out is low.

use core::time::Duration;

use crate::bit_order::BitOrder;
use crate::error::{check_width, Error, Result};
use crate::line::{Delay, InputLine, Line, OutputLine};
use crate::selection::SlaveSelection;
use crate::word::Word;

/// Default time the clock is held high on each pulse
pub const DEFAULT_DWELL: Duration = Duration::from_millis(1);

/// Bit-banged SPI master over discrete lines
///
/// `C` and `S` drive the clock and slave-select, `O` and `I` are the optional
/// data-out and data-in lines, `D` provides the clock dwell. Use
/// [`NoLine`](crate::NoLine) as `O` or `I` for a line that is never present.
pub struct Connection<C, S, O, I, D>
where
    C: OutputLine,
    S: OutputLine,
    O: OutputLine,
    I: InputLine,
    D: Delay,
{
    clock: C,
    select: S,
    data_out: Option<O>,
    data_in: Option<I>,
    delay: D,
    bit_order: BitOrder,
    dwell: Duration,
    selected: bool,
}

impl<C, S, O, I, D> Connection<C, S, O, I, D>
where
    C: OutputLine,
    S: OutputLine,
    O: OutputLine,
    I: InputLine,
    D: Delay,
{
    /// Take ownership of the lines and drive them to their idle levels
    ///
    /// A connection without data lines is legal; it can only pulse the clock
    /// and select the slave.
    pub fn new(
        clock: C,
        select: S,
        data_in: Option<I>,
        data_out: Option<O>,
        bit_order: BitOrder,
        delay: D,
    ) -> Self {
        let mut connection = Self {
            clock,
            select,
            data_out,
            data_in,
            delay,
            bit_order,
            dwell: DEFAULT_DWELL,
            selected: false,
        };

        connection.clock.set(false);
        connection.select.set(true);
        if let Some(data_out) = connection.data_out.as_mut() {
            data_out.set(false);
        }

        log::debug!(
            "bitspi: connection ready ({}, data_out={}, data_in={})",
            bit_order,
            connection.has_data_out(),
            connection.has_data_in()
        );

        connection
    }

    /// Set the time the clock is held high on each pulse
    pub fn with_dwell(mut self, dwell: Duration) -> Self {
        self.dwell = dwell;
        self
    }

    /// Bit order fixed at construction
    pub fn bit_order(&self) -> BitOrder {
        self.bit_order
    }

    /// Time the clock is held high on each pulse
    pub fn dwell(&self) -> Duration {
        self.dwell
    }

    /// Whether a data-out line was provided
    pub fn has_data_out(&self) -> bool {
        self.data_out.is_some()
    }

    /// Whether a data-in line was provided
    pub fn has_data_in(&self) -> bool {
        self.data_in.is_some()
    }

    /// Whether a [`SlaveSelection`] is currently live
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Release every line: clock, select, data-out, data-in
    pub fn close(self) {
        let Self {
            clock,
            select,
            data_out,
            data_in,
            ..
        } = self;

        clock.release();
        select.release();
        if let Some(data_out) = data_out {
            data_out.release();
        }
        if let Some(data_in) = data_in {
            data_in.release();
        }

        log::debug!("bitspi: connection closed");
    }

    /// Assert slave-select and return a guard that deasserts it on drop
    ///
    /// Fails with [`Error::SlaveAlreadySelected`] while another guard is live.
    pub fn select_slave(&mut self) -> Result<SlaveSelection<'_, C, S, O, I, D>> {
        if self.selected {
            return Err(Error::SlaveAlreadySelected);
        }

        self.select.set(false);
        self.selected = true;
        log::trace!("bitspi: slave selected");

        Ok(SlaveSelection::new(self))
    }

    pub(crate) fn deselect_slave(&mut self) {
        self.select.set(true);
        self.selected = false;
        log::trace!("bitspi: slave deselected");
    }

    /// Emit one clock pulse: high, hold for the dwell, low
    pub fn synchronize(&mut self) {
        self.clock.set(true);
        self.delay.sleep(self.dwell);
        self.clock.set(false);
    }

    /// Present one bit on data-out and clock it
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        let data_out = self
            .data_out
            .as_mut()
            .ok_or(Error::UnsupportedOperation(Line::DataOut))?;

        data_out.set(bit);
        self.synchronize();
        Ok(())
    }

    /// Write the low `bit_count` bits of `value`
    ///
    /// Fails with [`Error::InvalidArgument`] if `bit_count` exceeds the width
    /// of `W`.
    pub fn write<W: Word>(&mut self, value: W, bit_count: u32) -> Result<()> {
        check_width(bit_count, W::BITS)?;
        self.write_bits(value.into_u64(), bit_count)
    }

    fn write_bits(&mut self, value: u64, bit_count: u32) -> Result<()> {
        log::trace!(
            "bitspi: write 0x{:X} ({} bits, {})",
            value,
            bit_count,
            self.bit_order
        );

        for pulse in 0..bit_count {
            let index = self.bit_order.bit_index(pulse, bit_count);
            self.write_bit((value >> index) & 1 != 0)?;
        }
        Ok(())
    }

    /// Clock once and sample data-in
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.data_in.is_none() {
            return Err(Error::UnsupportedOperation(Line::DataIn));
        }

        self.synchronize();
        Ok(self.data_in.as_mut().is_some_and(|line| line.get()))
    }

    /// Read `bit_count` bits into the low bits of a `u64`
    ///
    /// Fails with [`Error::InvalidArgument`] if `bit_count` exceeds 64.
    pub fn read(&mut self, bit_count: u32) -> Result<u64> {
        check_width(bit_count, u64::BITS)?;

        let mut value = 0u64;
        for pulse in 0..bit_count {
            let index = self.bit_order.bit_index(pulse, bit_count);
            if self.read_bit()? {
                value |= 1 << index;
            }
        }

        log::trace!(
            "bitspi: read 0x{:X} ({} bits, {})",
            value,
            bit_count,
            self.bit_order
        );
        Ok(value)
    }

    /// Write each byte as an 8-bit transfer, in slice order
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        for &byte in bytes {
            self.write(byte, 8)?;
        }
        Ok(())
    }

    /// Fill `buf` with 8-bit transfers, in slice order
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        for byte in buf.iter_mut() {
            *byte = self.read(8)? as u8;
        }
        Ok(())
    }
}
