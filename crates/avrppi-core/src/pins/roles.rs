//! Programming signal to pin assignment
//!
//! A cable wires the AVR programming signals to arbitrary port pins. The
//! single-pin signals are [`PinRef`]s; VCC and the buffer enable are
//! groups of DATA lines driven together, stored as [`PortBits`] on the
//! DATA register.

use super::table::PinRef;
use crate::error::{Error, Result};
use crate::programmer::PortBits;
use core::fmt;
use core::str::FromStr;

/// First connector pin on the DATA register (bit 0)
const FIRST_DATA_PIN: u8 = 2;

/// Assignment of programming signals to port pins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PinRoles {
    /// Target RESET line
    pub reset: PinRef,
    /// Serial clock
    pub sck: PinRef,
    /// Data to the target
    pub mosi: PinRef,
    /// Data from the target
    pub miso: PinRef,
    /// Error LED
    pub led_err: PinRef,
    /// Ready LED
    pub led_rdy: PinRef,
    /// Programming LED
    pub led_pgm: PinRef,
    /// Verify LED
    pub led_vfy: PinRef,
    /// DATA lines supplying target VCC
    pub vcc: PortBits,
    /// DATA lines enabling the cable's buffer (active low)
    pub buff: PortBits,
}

/// Names accepted by [`PinRoles::preset`]
pub const PRESET_NAMES: &[&str] = &["bsd", "stk200", "dt006", "dapa"];

impl PinRoles {
    /// Pin assignment of a well-known parallel port cable
    ///
    /// - `bsd` - Brian Dean's programmer, target powered from pins 2-5
    /// - `stk200` - STK200/STK300 dongle with a 74HC244 buffer on pins 4, 5
    /// - `dt006` - Dontronics DT006
    /// - `dapa` - Direct AVR Parallel Access cable
    pub fn preset(name: &str) -> Result<Self> {
        let roles = match name {
            "bsd" => Self {
                vcc: PortBits::BIT0 | PortBits::BIT1 | PortBits::BIT2 | PortBits::BIT3,
                reset: PinRef::new(7),
                sck: PinRef::new(8),
                mosi: PinRef::new(9),
                miso: PinRef::new(10),
                ..Self::default()
            },
            "stk200" => Self {
                buff: PortBits::BIT2 | PortBits::BIT3,
                sck: PinRef::new(6),
                mosi: PinRef::new(7),
                reset: PinRef::new(9),
                miso: PinRef::new(10),
                ..Self::default()
            },
            "dt006" => Self {
                reset: PinRef::new(4),
                sck: PinRef::new(5),
                mosi: PinRef::new(2),
                miso: PinRef::new(11),
                ..Self::default()
            },
            "dapa" => Self {
                reset: PinRef::new(16),
                sck: PinRef::new(1),
                mosi: PinRef::new(2),
                miso: PinRef::new(11),
                ..Self::default()
            },
            _ => return Err(Error::UnknownPreset),
        };
        Ok(roles)
    }

    /// Render the assignment for diagnostics, each line starting with `prefix`
    pub fn display<'a>(&'a self, prefix: &'a str) -> RoleDisplay<'a> {
        RoleDisplay {
            roles: self,
            prefix,
        }
    }
}

/// DATA register pin group, printed as a comma-separated pin list
///
/// Parses from `+`-separated data pins (`2+3+4+5`), a hex mask (`0x0f`),
/// or `0` for no pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PinList(pub PortBits);

impl PinList {
    /// Connector pins (2-9) of the group, ascending
    pub fn data_pins(&self) -> heapless::Vec<u8, 8> {
        let mut pins = heapless::Vec::new();
        for bit in 0..8u8 {
            if self.0.bits() & (1 << bit) != 0 {
                // Capacity is exactly the number of bits
                let _ = pins.push(FIRST_DATA_PIN + bit);
            }
        }
        pins
    }
}

impl fmt::Display for PinList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pin) in self.data_pins().iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", pin)?;
        }
        Ok(())
    }
}

impl FromStr for PinList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            let mask = u8::from_str_radix(hex, 16).map_err(|_| Error::InvalidPinGroup)?;
            return Ok(Self(PortBits::from_bits_retain(mask)));
        }
        if s == "0" {
            return Ok(Self(PortBits::empty()));
        }

        let mut bits = PortBits::empty();
        for part in s.split('+') {
            let pin: u8 = part.parse().map_err(|_| Error::InvalidPinGroup)?;
            if !(FIRST_DATA_PIN..FIRST_DATA_PIN + 8).contains(&pin) {
                return Err(Error::InvalidPinGroup);
            }
            bits |= PortBits::from_bits_retain(1 << (pin - FIRST_DATA_PIN));
        }
        Ok(Self(bits))
    }
}

/// Multi-line description of a [`PinRoles`], see [`PinRoles::display`]
pub struct RoleDisplay<'a> {
    roles: &'a PinRoles,
    prefix: &'a str,
}

impl RoleDisplay<'_> {
    fn group(&self, f: &mut fmt::Formatter<'_>, name: &str, bits: PortBits) -> fmt::Result {
        write!(f, "{}  {:<8}= 0x{:02x}", self.prefix, name, bits.bits())?;
        if bits.is_empty() {
            writeln!(f, " (not used)")
        } else {
            writeln!(f, " = pins {}", PinList(bits))
        }
    }

    fn pin(&self, f: &mut fmt::Formatter<'_>, name: &str, pin: PinRef) -> fmt::Result {
        writeln!(f, "{}  {:<8}= {}", self.prefix, name, pin)
    }
}

impl fmt::Display for RoleDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.roles;
        self.group(f, "VCC", r.vcc)?;
        self.group(f, "BUFF", r.buff)?;
        self.pin(f, "RESET", r.reset)?;
        self.pin(f, "SCK", r.sck)?;
        self.pin(f, "MOSI", r.mosi)?;
        self.pin(f, "MISO", r.miso)?;
        self.pin(f, "ERR LED", r.led_err)?;
        self.pin(f, "RDY LED", r.led_rdy)?;
        self.pin(f, "PGM LED", r.led_pgm)?;
        self.pin(f, "VFY LED", r.led_vfy)
    }
}
