//! Single pin commands
//!
//! These work on the port directly, without a session, so the pin keeps
//! its state after the command exits.

use avrppi_core::pins::{self, PinRef};
use avrppi_core::programmer::ParallelPort;

/// Drive a pin to a level
pub fn cmd_set(
    port: &mut dyn ParallelPort,
    pin: &str,
    level: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pin: PinRef = pin.parse()?;
    pins::set_pin(port, pin, level)?;
    println!("pin {} = {}", pin, level as u8);
    Ok(())
}

/// Print a pin's level
pub fn cmd_get(port: &mut dyn ParallelPort, pin: &str) -> Result<(), Box<dyn std::error::Error>> {
    let pin: PinRef = pin.parse()?;
    let level = pins::get_pin(port, pin)?;
    println!("pin {} = {}", pin, level as u8);
    Ok(())
}

/// Pulse a pin's register bit
pub fn cmd_pulse(port: &mut dyn ParallelPort, pin: &str) -> Result<(), Box<dyn std::error::Error>> {
    let pin: PinRef = pin.parse()?;
    pins::high_pulse_pin(port, pin)?;
    log::info!("Pulsed pin {}", pin.number);
    Ok(())
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use avrppi_core::programmer::Register;
    use avrppi_dummy::DummyPort;

    #[test]
    fn test_set_then_get() {
        let mut port = DummyPort::new_default();
        cmd_set(&mut port, "17", true).unwrap();
        // SELECT IN is inverted by the port: high clears the bit
        assert_eq!(port.register(Register::Control), 0x00);
        cmd_set(&mut port, "17", false).unwrap();
        assert_eq!(port.register(Register::Control), 0x08);
        cmd_get(&mut port, "17").unwrap();
    }

    #[test]
    fn test_bad_pins() {
        let mut port = DummyPort::new_default();
        assert!(cmd_set(&mut port, "0", true).is_err());
        assert!(cmd_get(&mut port, "18").is_err());
        assert!(cmd_pulse(&mut port, "x").is_err());
        assert_eq!(port.io_count(), 0);
    }
}
