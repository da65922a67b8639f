//! Transfer command implementation

use bitspi_core::{Connection, Delay, InputLine, OutputLine};

use super::format_value;

/// Write `value`, then read `read_bits` bits, without releasing the slave
pub fn run_transfer<C, S, O, I, D>(
    conn: &mut Connection<C, S, O, I, D>,
    bits: u32,
    read_bits: u32,
    value: u64,
) -> Result<u64, Box<dyn std::error::Error>>
where
    C: OutputLine,
    S: OutputLine,
    O: OutputLine,
    I: InputLine,
    D: Delay,
{
    let reply = {
        let mut slave = conn.select_slave()?;
        slave.write(value, bits)?;
        slave.read(read_bits)?
    };

    println!(
        "{} -> {}",
        format_value(value, bits),
        format_value(reply, read_bits)
    );
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitspi_core::BitOrder;
    use bitspi_dummy::DummyBus;

    #[test]
    fn test_run_transfer_echo() {
        for order in [BitOrder::MostSignificantFirst, BitOrder::LeastSignificantFirst] {
            let bus = DummyBus::echo();
            let mut conn = bus.connect(order);
            assert_eq!(run_transfer(&mut conn, 12, 12, 0xABC).unwrap(), 0xABC);
            assert_eq!(bus.pulses(), 24);
            assert_eq!(bus.select_level(), Some(true));
        }
    }
}
