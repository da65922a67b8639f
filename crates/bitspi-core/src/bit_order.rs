//! Mapping between clock pulses and value bits

use core::fmt;

/// Order in which the bits of a value are put on (or taken off) the wire
///
/// Pulses always run `0..bit_count`. The order only decides which bit of the
/// value travels on pulse `i`:
///
/// | Order                   | Bit on pulse `i`      |
/// |-------------------------|-----------------------|
/// | `MostSignificantFirst`  | `i`                   |
/// | `LeastSignificantFirst` | `bit_count - 1 - i`   |
///
/// Note that `MostSignificantFirst` sends value bit 0 on the first pulse.
/// Existing peripherals rely on this mapping; do not swap it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitOrder {
    /// Pulse `i` carries value bit `i`
    #[default]
    MostSignificantFirst,
    /// Pulse `i` carries value bit `bit_count - 1 - i`
    LeastSignificantFirst,
}

impl BitOrder {
    /// Bit of the value carried by pulse `pulse` of a `bit_count`-bit transfer
    #[inline]
    pub const fn bit_index(self, pulse: u32, bit_count: u32) -> u32 {
        match self {
            Self::MostSignificantFirst => pulse,
            Self::LeastSignificantFirst => bit_count - 1 - pulse,
        }
    }

    /// Parse a bit order from its short name (`msb` / `lsb`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "msb" | "msb-first" => Some(Self::MostSignificantFirst),
            "lsb" | "lsb-first" => Some(Self::LeastSignificantFirst),
            _ => None,
        }
    }
}

impl fmt::Display for BitOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MostSignificantFirst => write!(f, "msb-first"),
            Self::LeastSignificantFirst => write!(f, "lsb-first"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_index() {
        let msb = BitOrder::MostSignificantFirst;
        let lsb = BitOrder::LeastSignificantFirst;
        assert_eq!(msb.bit_index(0, 8), 0);
        assert_eq!(msb.bit_index(7, 8), 7);
        assert_eq!(lsb.bit_index(0, 8), 7);
        assert_eq!(lsb.bit_index(7, 8), 0);
        assert_eq!(lsb.bit_index(0, 64), 63);
        assert_eq!(lsb.bit_index(0, 1), 0);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            BitOrder::from_name("msb"),
            Some(BitOrder::MostSignificantFirst)
        );
        assert_eq!(
            BitOrder::from_name("lsb-first"),
            Some(BitOrder::LeastSignificantFirst)
        );
        assert_eq!(BitOrder::from_name("big"), None);
    }
}
