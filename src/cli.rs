//! CLI argument parsing

use crate::programmers;
use clap::{Parser, Subcommand};

/// Parse a string as a hex or decimal u64
pub fn parse_hex_u64(s: &str) -> Result<u64, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else if let Some(bin) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        u64::from_str_radix(bin, 2).map_err(|e| format!("Invalid binary value: {}", e))
    } else {
        s.parse::<u64>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Parse a bit count in 1..=64
fn parse_bit_count(s: &str) -> Result<u32, String> {
    let bits: u32 = s.parse().map_err(|e| format!("Invalid bit count: {}", e))?;
    if bits == 0 || bits > 64 {
        return Err(format!("Bit count must be between 1 and 64, got {}", bits));
    }
    Ok(bits)
}

/// Generate dynamic help text for the programmer argument
fn programmer_help() -> String {
    format!(
        "Programmer to use [available: {}]",
        programmers::programmer_names_short()
    )
}

#[derive(Parser)]
#[command(name = "bitspi")]
#[command(author, version, about = "Bit-banged SPI master over GPIO lines", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select the slave and write values
    Write {
        /// Programmer to use
        #[arg(short, long, help = programmer_help())]
        programmer: String,

        /// Bits per value
        #[arg(short, long, default_value = "8", value_parser = parse_bit_count)]
        bits: u32,

        /// Values to write (decimal, 0x hex or 0b binary)
        #[arg(required = true, value_parser = parse_hex_u64)]
        values: Vec<u64>,
    },

    /// Select the slave and read values
    Read {
        /// Programmer to use
        #[arg(short, long, help = programmer_help())]
        programmer: String,

        /// Bits per value
        #[arg(short, long, default_value = "8", value_parser = parse_bit_count)]
        bits: u32,

        /// Number of values to read
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },

    /// Write a value, then read a reply, within one selection
    Transfer {
        /// Programmer to use
        #[arg(short, long, help = programmer_help())]
        programmer: String,

        /// Bits to write
        #[arg(short, long, default_value = "8", value_parser = parse_bit_count)]
        bits: u32,

        /// Bits to read back (defaults to --bits)
        #[arg(short, long, value_parser = parse_bit_count)]
        read_bits: Option<u32>,

        /// Value to write (decimal, 0x hex or 0b binary)
        #[arg(value_parser = parse_hex_u64)]
        value: u64,
    },

    /// List available programmers
    ListProgrammers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_u64() {
        assert_eq!(parse_hex_u64("0xA5"), Ok(0xA5));
        assert_eq!(parse_hex_u64("0XFFFF"), Ok(0xFFFF));
        assert_eq!(parse_hex_u64("0b101"), Ok(5));
        assert_eq!(parse_hex_u64("42"), Ok(42));
        assert!(parse_hex_u64("0xZZ").is_err());
        assert!(parse_hex_u64("-1").is_err());
    }

    #[test]
    fn test_parse_bit_count() {
        assert_eq!(parse_bit_count("1"), Ok(1));
        assert_eq!(parse_bit_count("64"), Ok(64));
        assert!(parse_bit_count("0").is_err());
        assert!(parse_bit_count("65").is_err());
    }

    #[test]
    fn test_cli_parses_write() {
        let cli = Cli::try_parse_from(["bitspi", "write", "-p", "dummy", "-b", "16", "0xBEEF", "7"])
            .unwrap();
        match cli.command {
            Commands::Write {
                programmer,
                bits,
                values,
            } => {
                assert_eq!(programmer, "dummy");
                assert_eq!(bits, 16);
                assert_eq!(values, vec![0xBEEF, 7]);
            }
            _ => panic!("expected write"),
        }
    }

    #[test]
    fn test_cli_verify() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
