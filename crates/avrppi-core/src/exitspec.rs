//! Exit spec parsing
//!
//! An exit spec names the state the RESET and VCC lines should be left in
//! when a programming session ends, e.g. `reset,vcc` to keep the target
//! held in reset but powered. Directives are comma-separated and
//! case-sensitive:
//!
//! | Directive | Effect                              |
//! |-----------|-------------------------------------|
//! | `reset`   | RESET pin bit goes into the clear mask |
//! | `noreset` | RESET pin bit goes into the set mask   |
//! | `vcc`     | VCC group goes into the set mask       |
//! | `novcc`   | VCC group goes into the clear mask     |
//!
//! The RESET bit is the raw register bit, not adjusted for polarity. With
//! no VCC group configured, `vcc` and `novcc` contribute nothing.

use crate::error::{Error, Result};
use crate::pins::{pin_mask, PinRoles};
use crate::programmer::PortBits;

/// Bits to force set and force clear at session end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExitSpecMasks {
    /// Bits to set
    pub set: PortBits,
    /// Bits to clear
    pub clear: PortBits,
}

impl ExitSpecMasks {
    /// True when the spec changes nothing
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.clear.is_empty()
    }

    /// Apply the masks to a register value: clear first, then set
    pub fn apply(&self, value: u8) -> u8 {
        (value & !self.clear.bits()) | self.set.bits()
    }
}

/// Cursor over the comma-separated directives of an exit spec
///
/// Yields each non-empty directive with its byte offset in the input.
/// Consecutive commas produce no empty directive.
#[derive(Debug, Clone)]
pub struct ExitSpecTokens<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> ExitSpecTokens<'a> {
    /// Start at the beginning of `input`
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Byte offset of the next unread character
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for ExitSpecTokens<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos] == b',' {
            self.pos += 1;
        }
        if self.pos >= bytes.len() {
            return None;
        }

        let start = self.pos;
        let end = self.input[start..]
            .find(',')
            .map_or(self.input.len(), |i| start + i);
        self.pos = end;
        Some((start, &self.input[start..end]))
    }
}

/// Parse an exit spec against a pin assignment
///
/// Fails with [`Error::InvalidExitSpec`] on the first unknown directive;
/// nothing accumulated before it is returned. `reset`/`noreset` with no
/// usable RESET pin fail with [`Error::PinOutOfRange`]. An empty spec is
/// valid and yields empty masks.
pub fn parse_exit_specs(spec: &str, roles: &PinRoles) -> Result<ExitSpecMasks> {
    let mut masks = ExitSpecMasks::default();

    for (offset, token) in ExitSpecTokens::new(spec) {
        match token {
            "reset" => masks.clear |= pin_mask(roles.reset)?,
            "noreset" => masks.set |= pin_mask(roles.reset)?,
            "vcc" => masks.set |= roles.vcc,
            "novcc" => masks.clear |= roles.vcc,
            _ => {
                log::debug!("exit spec: unknown directive '{}' at {}", token, offset);
                return Err(Error::InvalidExitSpec { offset });
            }
        }
    }

    Ok(masks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins::PinRef;
    use std::vec::Vec;

    fn roles(reset: u8, vcc: u8) -> PinRoles {
        PinRoles {
            reset: PinRef::new(reset),
            vcc: PortBits::from_bits_retain(vcc),
            ..PinRoles::default()
        }
    }

    #[test]
    fn test_tokens() {
        let tokens: Vec<_> = ExitSpecTokens::new("reset,vcc").collect();
        assert_eq!(tokens, [(0, "reset"), (6, "vcc")]);

        let tokens: Vec<_> = ExitSpecTokens::new(",,novcc,,noreset,").collect();
        assert_eq!(tokens, [(2, "novcc"), (9, "noreset")]);

        assert_eq!(ExitSpecTokens::new("").next(), None);
        assert_eq!(ExitSpecTokens::new(",,,").next(), None);
    }

    #[test]
    fn test_tokens_keep_cursor() {
        let mut tokens = ExitSpecTokens::new("a,b");
        assert_eq!(tokens.next(), Some((0, "a")));
        assert_eq!(tokens.position(), 1);
        assert_eq!(tokens.next(), Some((2, "b")));
        assert_eq!(tokens.next(), None);
        assert_eq!(tokens.next(), None);
    }

    #[test]
    fn test_reset() {
        let masks = parse_exit_specs("reset", &roles(1, 0)).unwrap();
        assert_eq!(masks.clear.bits(), 0x01);
        assert!(masks.set.is_empty());
    }

    #[test]
    fn test_noreset_vcc() {
        let masks = parse_exit_specs("noreset,vcc", &roles(1, 0x18)).unwrap();
        assert_eq!(masks.set.bits(), 0x01 | 0x18);
        assert!(masks.clear.is_empty());
    }

    #[test]
    fn test_reset_mask_is_raw_bit() {
        // Pin 17 is inverted by the hardware; the raw bit is still used
        let masks = parse_exit_specs("reset", &roles(17, 0)).unwrap();
        assert_eq!(masks.clear.bits(), 0x08);
        // Polarity overrides are ignored as well
        let r = PinRoles {
            reset: PinRef::inverted(9),
            ..PinRoles::default()
        };
        assert_eq!(parse_exit_specs("noreset", &r).unwrap().set.bits(), 0x80);
    }

    #[test]
    fn test_novcc() {
        let masks = parse_exit_specs("novcc", &roles(7, 0x0f)).unwrap();
        assert_eq!(masks.clear.bits(), 0x0f);
        assert!(masks.set.is_empty());
    }

    #[test]
    fn test_vcc_without_group_is_noop() {
        let masks = parse_exit_specs("vcc,novcc", &roles(7, 0)).unwrap();
        assert!(masks.is_empty());
    }

    #[test]
    fn test_masks_accumulate_and_may_overlap() {
        let masks = parse_exit_specs("reset,noreset,vcc,novcc", &roles(2, 0x30)).unwrap();
        assert_eq!(masks.set.bits(), 0x31);
        assert_eq!(masks.clear.bits(), 0x31);
    }

    #[test]
    fn test_syntax_error() {
        assert_eq!(
            parse_exit_specs("reset,bogus", &roles(1, 0)),
            Err(Error::InvalidExitSpec { offset: 6 })
        );
        assert_eq!(
            parse_exit_specs("Reset", &roles(1, 0)),
            Err(Error::InvalidExitSpec { offset: 0 })
        );
        assert_eq!(
            parse_exit_specs("reset, vcc", &roles(1, 0)),
            Err(Error::InvalidExitSpec { offset: 6 })
        );
    }

    #[test]
    fn test_empty_spec() {
        assert_eq!(parse_exit_specs("", &roles(1, 0x18)), Ok(ExitSpecMasks::default()));
        assert_eq!(parse_exit_specs(",", &roles(1, 0x18)), Ok(ExitSpecMasks::default()));
    }

    #[test]
    fn test_reset_without_reset_pin() {
        assert_eq!(
            parse_exit_specs("vcc,reset", &roles(0, 0x18)),
            Err(Error::PinOutOfRange(0))
        );
    }

    #[test]
    fn test_apply() {
        let masks = ExitSpecMasks {
            set: PortBits::from_bits_retain(0x18),
            clear: PortBits::from_bits_retain(0x21),
        };
        assert_eq!(masks.apply(0xff), 0xde);
        assert_eq!(masks.apply(0x00), 0x18);
    }
}
