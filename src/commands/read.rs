//! Read command implementation

use bitspi_core::{Connection, Delay, InputLine, OutputLine};
use indicatif::{ProgressBar, ProgressStyle};

use super::{format_value, progress_threshold};

/// Run the read command
///
/// Reads `count` values of `bits` bits each within a single selection.
pub fn run_read<C, S, O, I, D>(
    conn: &mut Connection<C, S, O, I, D>,
    bits: u32,
    count: usize,
) -> Result<Vec<u64>, Box<dyn std::error::Error>>
where
    C: OutputLine,
    S: OutputLine,
    O: OutputLine,
    I: InputLine,
    D: Delay,
{
    let pb = (count >= progress_threshold(conn, bits)).then(|| new_progress(count));

    let mut values = Vec::with_capacity(count);
    let mut slave = conn.select_slave()?;
    for _ in 0..count {
        let value = slave.read(bits)?;
        values.push(value);
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }
    slave.release();

    if let Some(pb) = pb {
        pb.finish_with_message("Read complete");
    }

    for value in &values {
        println!("{}", format_value(*value, bits));
    }

    Ok(values)
}

fn new_progress(count: usize) -> ProgressBar {
    let pb = ProgressBar::new(count as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} values ({eta})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}
