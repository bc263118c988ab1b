//! Pin level operations
//!
//! [`set_pin`] and [`get_pin`] work in logical levels: a pin whose line is
//! inverted by the port hardware (or by a polarity override) has its level
//! flipped on the way out and on the way back in, so a value written is the
//! value read. [`high_pulse_pin`] works on the raw register bit instead.
//!
//! Every operation validates the pin first and performs no register I/O
//! for an out-of-range pin.

use super::table::{lookup, PinEntry, PinRef};
use crate::error::Result;
use crate::programmer::ParallelPort;

/// Delay after a pulse when built with `slow-toggle`
#[cfg(feature = "slow-toggle")]
const SLOW_TOGGLE_DELAY_US: u32 = 1000;

#[inline]
fn is_inverted(pin: PinRef, entry: &PinEntry) -> bool {
    pin.polarity.unwrap_or(entry.inverted)
}

/// Drive a pin to a logical level
pub fn set_pin<P: ParallelPort + ?Sized>(port: &mut P, pin: PinRef, level: bool) -> Result<()> {
    let entry = lookup(pin.number)?;

    if level != is_inverted(pin, entry) {
        port.set_bits(entry.register, entry.bit);
    } else {
        port.clear_bits(entry.register, entry.bit);
    }

    Ok(())
}

/// Read the logical level of a pin
pub fn get_pin<P: ParallelPort + ?Sized>(port: &mut P, pin: PinRef) -> Result<bool> {
    let entry = lookup(pin.number)?;
    let high = !port.get_bits(entry.register, entry.bit).is_empty();
    Ok(high != is_inverted(pin, entry))
}

/// Pulse a pin's register bit: set, then immediately clear
///
/// Polarity is ignored, for both the table and the override, so an
/// inverted pin sees a low-going pulse on the wire.
pub fn high_pulse_pin<P: ParallelPort + ?Sized>(port: &mut P, pin: PinRef) -> Result<()> {
    let entry = lookup(pin.number)?;

    port.set_bits(entry.register, entry.bit);
    port.clear_bits(entry.register, entry.bit);

    #[cfg(feature = "slow-toggle")]
    port.delay_us(SLOW_TOGGLE_DELAY_US);

    Ok(())
}
