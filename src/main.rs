//! bitspi - Bit-banged SPI master over GPIO lines
//!
//! Exchanges fixed-width values with an SPI peripheral by toggling plain GPIO
//! lines, for boards without a usable SPI controller.
//!
//! # Architecture
//!
//! - `bitspi-core` holds the transfer engine (`Connection`, `SlaveSelection`)
//! - backend crates provide the lines: `bitspi-linux-gpio` for real hardware,
//!   `bitspi-dummy` for an in-memory echo peripheral
//!
//! Commands are generic over the connection type, so the same implementation
//! runs against every backend.

mod cli;
mod commands;
mod programmers;

use bitspi_core::{Connection, Delay, InputLine, OutputLine};
use clap::Parser;
use cli::{Cli, Commands};
use programmers::{open_connection, OpenConnection};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let programmer = match &cli.command {
        Commands::Write { programmer, .. }
        | Commands::Read { programmer, .. }
        | Commands::Transfer { programmer, .. } => programmer,
        Commands::ListProgrammers => {
            commands::list_programmers();
            return Ok(());
        }
    };

    match open_connection(programmer)? {
        #[cfg(feature = "dummy")]
        OpenConnection::Dummy(conn, bus) => {
            let result = run(conn, &cli.command);
            log::info!("dummy: {} clock pulses", bus.pulses());
            result
        }
        #[cfg(feature = "linux-gpio")]
        OpenConnection::LinuxGpio(conn) => run(conn, &cli.command),
    }
}

/// Run a transfer command and close the connection, whatever the outcome
fn run<C, S, O, I, D>(
    mut conn: Connection<C, S, O, I, D>,
    command: &Commands,
) -> Result<(), Box<dyn std::error::Error>>
where
    C: OutputLine,
    S: OutputLine,
    O: OutputLine,
    I: InputLine,
    D: Delay,
{
    let result = match command {
        Commands::Write { bits, values, .. } => commands::run_write(&mut conn, *bits, values),
        Commands::Read { bits, count, .. } => {
            commands::run_read(&mut conn, *bits, *count).map(|_| ())
        }
        Commands::Transfer {
            bits,
            read_bits,
            value,
            ..
        } => commands::run_transfer(&mut conn, *bits, read_bits.unwrap_or(*bits), *value)
            .map(|_| ()),
        Commands::ListProgrammers => Ok(()),
    };

    conn.close();
    result
}
