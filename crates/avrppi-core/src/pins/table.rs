//! Physical pin table
//!
//! Maps the 17 signal pins of a DB-25 parallel port connector onto the
//! port registers. Pins 18-25 are ground and have no entry.

use crate::error::{Error, Result};
use crate::programmer::{PortBits, Register};
use core::fmt;
use core::str::FromStr;

/// Number of signal pins on the port
pub const NUM_PINS: u8 = 17;

/// Location and polarity of one physical pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinEntry {
    /// Connector pin number (1-17)
    pub pin: u8,
    /// Register holding the pin
    pub register: Register,
    /// Single bit of the pin within the register
    pub bit: PortBits,
    /// The port hardware inverts this line
    pub inverted: bool,
}

const fn entry(pin: u8, register: Register, bit: u8, inverted: bool) -> PinEntry {
    PinEntry {
        pin,
        register,
        bit: PortBits::from_bits_retain(bit),
        inverted,
    }
}

/// Pin table, indexed by `pin - 1`
pub static PIN_TABLE: [PinEntry; NUM_PINS as usize] = [
    entry(1, Register::Control, 0x01, true), // STROBE
    entry(2, Register::Data, 0x01, false),
    entry(3, Register::Data, 0x02, false),
    entry(4, Register::Data, 0x04, false),
    entry(5, Register::Data, 0x08, false),
    entry(6, Register::Data, 0x10, false),
    entry(7, Register::Data, 0x20, false),
    entry(8, Register::Data, 0x40, false),
    entry(9, Register::Data, 0x80, false),
    entry(10, Register::Status, 0x40, false), // ACK
    entry(11, Register::Status, 0x80, true),  // BUSY
    entry(12, Register::Status, 0x20, false), // PAPER OUT
    entry(13, Register::Status, 0x10, false), // SELECT
    entry(14, Register::Control, 0x02, true), // AUTOFEED
    entry(15, Register::Status, 0x08, false), // ERROR
    entry(16, Register::Control, 0x04, false), // INIT
    entry(17, Register::Control, 0x08, true), // SELECT IN
];

/// Look up the table entry for a connector pin number
///
/// Returns [`Error::PinOutOfRange`] for anything outside 1-17, including
/// 0, which configurations use for "not wired".
pub fn lookup(pin: u8) -> Result<&'static PinEntry> {
    if !(1..=NUM_PINS).contains(&pin) {
        return Err(Error::PinOutOfRange(pin));
    }
    Ok(&PIN_TABLE[(pin - 1) as usize])
}

/// Raw register bit of a pin, not adjusted for polarity
///
/// Callers OR several of these together to build a mask for signals that
/// are driven through more than one pin.
pub fn pin_mask(pin: PinRef) -> Result<PortBits> {
    lookup(pin.number).map(|entry| entry.bit)
}

/// A reference to a connector pin as used in a pin role table
///
/// `polarity` overrides the table: `Some(true)` treats the line as
/// inverted, `Some(false)` as non-inverted. Number 0 means unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PinRef {
    /// Connector pin number
    pub number: u8,
    /// Polarity override
    pub polarity: Option<bool>,
}

impl PinRef {
    /// A signal that is not wired to any pin
    pub const UNUSED: PinRef = PinRef {
        number: 0,
        polarity: None,
    };

    /// Pin with the polarity from the table
    pub const fn new(number: u8) -> Self {
        Self {
            number,
            polarity: None,
        }
    }

    /// Pin forced to inverted polarity
    pub const fn inverted(number: u8) -> Self {
        Self {
            number,
            polarity: Some(true),
        }
    }

    /// Pin forced to non-inverted polarity
    pub const fn non_inverted(number: u8) -> Self {
        Self {
            number,
            polarity: Some(false),
        }
    }

    /// Whether the signal is wired at all
    pub const fn is_used(self) -> bool {
        self.number != 0
    }
}

impl fmt::Display for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.polarity {
            Some(true) => write!(f, "~{}", self.number),
            Some(false) => write!(f, "^{}", self.number),
            None => write!(f, "{}", self.number),
        }
    }
}

/// Parse `N`, `~N` (force inverted) or `^N` (force non-inverted)
impl FromStr for PinRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (polarity, digits) = if let Some(rest) = s.strip_prefix('~') {
            (Some(true), rest)
        } else if let Some(rest) = s.strip_prefix('^') {
            (Some(false), rest)
        } else {
            (None, s)
        };

        let number: u8 = digits.parse().map_err(|_| Error::InvalidPin)?;
        if number > NUM_PINS || (number == 0 && polarity.is_some()) {
            return Err(Error::PinOutOfRange(number));
        }

        Ok(Self { number, polarity })
    }
}
