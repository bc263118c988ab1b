//! Programming session on a parallel port
//!
//! A session owns the port for the duration of programming. Opening it
//! saves the DATA and CONTROL registers; closing it writes them back, with
//! any exit spec masks applied to the saved DATA value, so the cable is
//! left the way it was found (or the way the exit spec asks).

use super::traits::{ParallelPort, PortBits, Register};
use crate::error::Result;
use crate::exitspec::ExitSpecMasks;
use crate::pins::{self, PinRef, PinRoles};

/// Register values captured when the session was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedRegisters {
    /// DATA register
    pub data: u8,
    /// CONTROL register
    pub control: u8,
}

/// An open programming session
pub struct ParSession<P: ParallelPort> {
    port: P,
    roles: PinRoles,
    saved: SavedRegisters,
}

impl<P: ParallelPort> ParSession<P> {
    /// Take over a port, saving its register state
    ///
    /// The cable buffer is disabled until [`enable`](Self::enable).
    pub fn open(mut port: P, roles: PinRoles) -> Self {
        let saved = SavedRegisters {
            data: port.read_register(Register::Data),
            control: port.read_register(Register::Control),
        };
        log::debug!(
            "par: saved DATA=0x{:02x} CONTROL=0x{:02x}",
            saved.data,
            saved.control
        );

        let mut session = Self { port, roles, saved };
        session.disable();
        session
    }

    /// Pin assignment in use
    pub fn roles(&self) -> &PinRoles {
        &self.roles
    }

    /// Register values that will be restored on close
    pub fn saved(&self) -> SavedRegisters {
        self.saved
    }

    /// Direct access to the port
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Fold exit spec masks into the DATA value restored on close
    pub fn apply_exit_specs(&mut self, masks: &ExitSpecMasks) {
        self.saved.data = masks.apply(self.saved.data);
        log::debug!("par: DATA on exit will be 0x{:02x}", self.saved.data);
    }

    /// Drive a pin to a logical level
    pub fn set_pin(&mut self, pin: PinRef, level: bool) -> Result<()> {
        pins::set_pin(&mut self.port, pin, level)
    }

    /// Read a pin's logical level
    pub fn get_pin(&mut self, pin: PinRef) -> Result<bool> {
        pins::get_pin(&mut self.port, pin)
    }

    /// Pulse a pin's register bit high
    pub fn high_pulse_pin(&mut self, pin: PinRef) -> Result<()> {
        pins::high_pulse_pin(&mut self.port, pin)
    }

    /// Switch target power on through the VCC group
    pub fn powerup(&mut self) {
        self.data_group(self.roles.vcc, true);
    }

    /// Switch target power off
    pub fn powerdown(&mut self) {
        self.data_group(self.roles.vcc, false);
    }

    /// Enable the cable buffer (active low)
    pub fn enable(&mut self) {
        self.data_group(self.roles.buff, false);
    }

    /// Disable the cable buffer
    pub fn disable(&mut self) {
        self.data_group(self.roles.buff, true);
    }

    fn data_group(&mut self, bits: PortBits, high: bool) {
        if bits.is_empty() {
            return;
        }
        if high {
            self.port.set_bits(Register::Data, bits);
        } else {
            self.port.clear_bits(Register::Data, bits);
        }
    }

    /// Error LED
    pub fn err_led(&mut self, on: bool) -> Result<()> {
        self.led(self.roles.led_err, on)
    }

    /// Ready LED
    pub fn rdy_led(&mut self, on: bool) -> Result<()> {
        self.led(self.roles.led_rdy, on)
    }

    /// Programming LED
    pub fn pgm_led(&mut self, on: bool) -> Result<()> {
        self.led(self.roles.led_pgm, on)
    }

    /// Verify LED
    pub fn vfy_led(&mut self, on: bool) -> Result<()> {
        self.led(self.roles.led_vfy, on)
    }

    // LEDs sink current into the port: low is on
    fn led(&mut self, pin: PinRef, on: bool) -> Result<()> {
        if !pin.is_used() {
            return Ok(());
        }
        self.set_pin(pin, !on)
    }

    /// Wait for the given number of microseconds
    pub fn delay_us(&mut self, us: u32) {
        self.port.delay_us(us);
    }

    /// Restore the saved registers and hand the port back
    pub fn close(mut self) -> P {
        log::debug!(
            "par: restoring DATA=0x{:02x} CONTROL=0x{:02x}",
            self.saved.data,
            self.saved.control
        );
        self.port.write_register(Register::Data, self.saved.data);
        self.port.write_register(Register::Control, self.saved.control);
        self.port
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::exitspec::parse_exit_specs;
    use crate::programmer::mock::MockPort;

    fn bsd() -> PinRoles {
        PinRoles::preset("bsd").unwrap()
    }

    #[test]
    fn test_open_saves_and_close_restores() {
        let port = MockPort::with_regs(0x5a, 0x00, 0x0c);
        let mut session = ParSession::open(port, bsd());
        assert_eq!(
            session.saved(),
            SavedRegisters {
                data: 0x5a,
                control: 0x0c
            }
        );

        session.set_pin(PinRef::new(7), true).unwrap();
        session.set_pin(PinRef::new(17), true).unwrap();
        session.powerup();

        let port = session.close();
        assert_eq!(port.reg(Register::Data), 0x5a);
        assert_eq!(port.reg(Register::Control), 0x0c);
    }

    #[test]
    fn test_exit_specs_applied_to_saved_data() {
        let roles = bsd();
        let masks = parse_exit_specs("reset,vcc", &roles).unwrap();

        let mut session = ParSession::open(MockPort::with_regs(0x20, 0, 0), roles);
        session.apply_exit_specs(&masks);
        let port = session.close();

        // RESET (pin 7, bit 0x20) cleared, VCC (pins 2-5) set
        assert_eq!(port.reg(Register::Data), 0x0f);
    }

    #[test]
    fn test_power_and_buffer_groups() {
        let roles = PinRoles {
            vcc: PortBits::from_bits_retain(0x18),
            buff: PortBits::from_bits_retain(0x03),
            ..PinRoles::default()
        };
        let mut session = ParSession::open(MockPort::new(), roles);
        // Opening disables the buffer
        assert_eq!(session.port_mut().reg(Register::Data), 0x03);

        session.enable();
        session.powerup();
        assert_eq!(session.port_mut().reg(Register::Data), 0x18);

        session.powerdown();
        session.disable();
        assert_eq!(session.port_mut().reg(Register::Data), 0x03);
    }

    #[test]
    fn test_empty_groups_do_no_io() {
        let mut session = ParSession::open(MockPort::new(), PinRoles::default());
        let before = session.port_mut().io_count();
        session.powerup();
        session.enable();
        assert_eq!(session.port_mut().io_count(), before);
    }

    #[test]
    fn test_leds_are_active_low() {
        let roles = PinRoles {
            led_rdy: PinRef::new(6),
            led_err: PinRef::new(1),
            ..PinRoles::default()
        };
        let mut session = ParSession::open(MockPort::with_regs(0xff, 0, 0), roles);

        session.rdy_led(true).unwrap();
        assert_eq!(session.get_pin(PinRef::new(6)), Ok(false));
        session.rdy_led(false).unwrap();
        assert_eq!(session.get_pin(PinRef::new(6)), Ok(true));

        // Pin 1 is hardware inverted; the logical level is still low when on
        session.err_led(true).unwrap();
        assert_eq!(session.get_pin(PinRef::new(1)), Ok(false));
    }

    #[test]
    fn test_unused_led_is_silent() {
        let mut session = ParSession::open(MockPort::new(), PinRoles::default());
        let before = session.port_mut().io_count();
        assert_eq!(session.pgm_led(true), Ok(()));
        assert_eq!(session.vfy_led(true), Ok(()));
        assert_eq!(session.port_mut().io_count(), before);
    }

    #[test]
    fn test_pin_errors_pass_through() {
        let mut session = ParSession::open(MockPort::new(), PinRoles::default());
        assert_eq!(
            session.set_pin(PinRef::new(20), true),
            Err(Error::PinOutOfRange(20))
        );
        assert_eq!(
            session.high_pulse_pin(PinRef::UNUSED),
            Err(Error::PinOutOfRange(0))
        );
    }
}
