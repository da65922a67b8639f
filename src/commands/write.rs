//! Write command implementation

use bitspi_core::{Connection, Delay, InputLine, OutputLine};

/// Run the write command
///
/// All values are written within a single selection.
pub fn run_write<C, S, O, I, D>(
    conn: &mut Connection<C, S, O, I, D>,
    bits: u32,
    values: &[u64],
) -> Result<(), Box<dyn std::error::Error>>
where
    C: OutputLine,
    S: OutputLine,
    O: OutputLine,
    I: InputLine,
    D: Delay,
{
    for value in values {
        if bits < u64::BITS && value >> bits != 0 {
            log::warn!(
                "0x{:X} does not fit in {} bits, upper bits are dropped",
                value,
                bits
            );
        }
    }

    let mut slave = conn.select_slave()?;
    for &value in values {
        slave.write(value, bits)?;
    }
    slave.release();

    println!("Wrote {} value(s) of {} bits", values.len(), bits);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitspi_core::BitOrder;
    use bitspi_dummy::DummyBus;

    #[test]
    fn test_run_write() {
        let bus = DummyBus::default();
        let mut conn = bus.connect(BitOrder::MostSignificantFirst);
        bus.clear_events();

        run_write(&mut conn, 4, &[0b0001, 0b1000]).unwrap();
        assert_eq!(
            bus.clocked_out(),
            vec![true, false, false, false, false, false, false, true]
        );
        assert_eq!(bus.select_level(), Some(true));
    }

    #[test]
    fn test_run_write_without_data_out() {
        let bus = DummyBus::default();
        let mut conn: Connection<_, _, bitspi_core::NoLine, _, _> = Connection::new(
            bus.clock(),
            bus.select(),
            Some(bus.data_in()),
            None,
            BitOrder::MostSignificantFirst,
            bus.delay(),
        );
        assert!(run_write(&mut conn, 8, &[0xFF]).is_err());
        assert_eq!(bus.select_level(), Some(true));
    }
}
