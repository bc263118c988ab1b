//! Bit-bang AVR serial programming
//!
//! AVR in-system programming is a four-byte SPI exchange clocked entirely
//! in software. This module splits it the usual bitbang way:
//!
//! - [`IspBitbang`] - the handful of line operations a driver needs
//! - [`isp`] - the protocol, as free functions over any [`IspBitbang`]
//!
//! [`ParSession`] implements [`IspBitbang`] using its pin assignment, so
//! any parallel port cable can be driven by [`isp`].

use super::session::ParSession;
use super::traits::ParallelPort;
use crate::error::Result;

/// Line-level operations for bitbanging the AVR serial programming interface
pub trait IspBitbang {
    /// Drive RESET to a logical level
    fn set_reset(&mut self, level: bool) -> Result<()>;

    /// Drive the clock line
    fn set_sck(&mut self, high: bool) -> Result<()>;

    /// Drive the data line towards the target
    fn set_mosi(&mut self, high: bool) -> Result<()>;

    /// Sample the data line from the target
    fn get_miso(&mut self) -> Result<bool>;

    /// Pulse the RESET register bit
    fn pulse_reset(&mut self) -> Result<()>;

    /// Pulse the clock register bit, used to slip one bit when out of sync
    fn pulse_sck(&mut self) -> Result<()>;

    /// Switch target power on, if the cable supplies it
    fn power_on(&mut self);

    /// Wait for the given number of milliseconds
    fn delay_ms(&mut self, ms: u32);
}

impl<P: ParallelPort> IspBitbang for ParSession<P> {
    fn set_reset(&mut self, level: bool) -> Result<()> {
        let pin = self.roles().reset;
        self.set_pin(pin, level)
    }

    fn set_sck(&mut self, high: bool) -> Result<()> {
        let pin = self.roles().sck;
        self.set_pin(pin, high)
    }

    fn set_mosi(&mut self, high: bool) -> Result<()> {
        let pin = self.roles().mosi;
        self.set_pin(pin, high)
    }

    fn get_miso(&mut self) -> Result<bool> {
        let pin = self.roles().miso;
        self.get_pin(pin)
    }

    fn pulse_reset(&mut self) -> Result<()> {
        let pin = self.roles().reset;
        self.high_pulse_pin(pin)
    }

    fn pulse_sck(&mut self) -> Result<()> {
        let pin = self.roles().sck;
        self.high_pulse_pin(pin)
    }

    fn power_on(&mut self) {
        self.powerup();
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay_us(ms.saturating_mul(1000));
    }
}

/// AVR serial programming protocol
pub mod isp {
    use super::IspBitbang;
    use crate::error::{Error, Result};

    /// Programming Enable: `AC 53 00 00`
    pub const PROGRAM_ENABLE: [u8; 4] = [0xac, 0x53, 0x00, 0x00];
    /// Chip Erase: `AC 80 00 00`
    pub const CHIP_ERASE: [u8; 4] = [0xac, 0x80, 0x00, 0x00];
    /// Read Signature Byte opcode
    pub const READ_SIGNATURE: u8 = 0x30;

    /// Attempts at entering programming mode before giving up
    pub const MAX_SYNC_TRIES: usize = 32;
    /// Settle time around the reset pulse
    pub const RESET_DELAY_MS: u32 = 20;
    /// Time allowed for a chip erase to complete
    pub const CHIP_ERASE_DELAY_MS: u32 = 20;

    /// Exchange one byte, MSB first
    ///
    /// MISO is sampled while SCK is high.
    pub fn txrx<M: IspBitbang + ?Sized>(master: &mut M, byte: u8) -> Result<u8> {
        let mut rbyte = 0u8;
        for i in (0..8).rev() {
            master.set_mosi((byte >> i) & 1 != 0)?;
            master.set_sck(true)?;
            if master.get_miso()? {
                rbyte |= 1 << i;
            }
            master.set_sck(false)?;
        }
        Ok(rbyte)
    }

    /// Send a four-byte instruction, returning the four bytes clocked back
    pub fn cmd<M: IspBitbang + ?Sized>(master: &mut M, cmd: [u8; 4]) -> Result<[u8; 4]> {
        let mut res = [0u8; 4];
        for (r, &c) in res.iter_mut().zip(cmd.iter()) {
            *r = txrx(master, c)?;
        }
        log::trace!(
            "isp: {:02x} {:02x} {:02x} {:02x} -> {:02x} {:02x} {:02x} {:02x}",
            cmd[0],
            cmd[1],
            cmd[2],
            cmd[3],
            res[0],
            res[1],
            res[2],
            res[3]
        );
        Ok(res)
    }

    /// Issue Programming Enable; an in-sync target echoes `0x53` in byte 3
    pub fn program_enable<M: IspBitbang + ?Sized>(master: &mut M) -> Result<()> {
        let res = cmd(master, PROGRAM_ENABLE)?;
        if res[2] != PROGRAM_ENABLE[1] {
            return Err(Error::ProgramEnableFailed);
        }
        Ok(())
    }

    /// Power the target, reset it and bring it into programming mode
    ///
    /// Programming Enable is retried up to [`MAX_SYNC_TRIES`] times with
    /// an extra SCK pulse in between, to get back in step with a target
    /// that lost a clock edge.
    pub fn initialize<M: IspBitbang + ?Sized>(master: &mut M) -> Result<()> {
        master.power_on();
        master.delay_ms(RESET_DELAY_MS);

        master.set_sck(false)?;
        master.set_reset(false)?;
        master.delay_ms(RESET_DELAY_MS);

        master.pulse_reset()?;
        master.delay_ms(RESET_DELAY_MS);

        for attempt in 1..=MAX_SYNC_TRIES {
            match program_enable(master) {
                Ok(()) => {
                    log::debug!("isp: in programming mode after {} attempt(s)", attempt);
                    return Ok(());
                }
                Err(Error::ProgramEnableFailed) => master.pulse_sck()?,
                Err(e) => return Err(e),
            }
        }

        log::error!("isp: AVR device not responding");
        Err(Error::ProgramEnableFailed)
    }

    /// Erase flash and EEPROM, then re-enter programming mode
    pub fn chip_erase<M: IspBitbang + ?Sized>(master: &mut M) -> Result<()> {
        cmd(master, CHIP_ERASE)?;
        master.delay_ms(CHIP_ERASE_DELAY_MS);
        initialize(master)
    }

    /// Read the three device signature bytes
    pub fn read_signature<M: IspBitbang + ?Sized>(master: &mut M) -> Result<[u8; 3]> {
        let mut sig = [0u8; 3];
        for (i, byte) in sig.iter_mut().enumerate() {
            *byte = cmd(master, [READ_SIGNATURE, 0x00, i as u8, 0x00])?[3];
        }
        Ok(sig)
    }
}

#[cfg(test)]
mod tests {
    use super::isp;
    use super::*;
    use crate::error::Error;
    use crate::pins::{PinRef, PinRoles};
    use crate::programmer::mock::MockPort;
    use crate::programmer::Register;
    use std::vec::Vec;

    /// Serial programming slave of an ATmega8-like part
    struct AvrTarget {
        signature: [u8; 3],
        sck: bool,
        mosi: bool,
        miso: bool,
        shift_in: u8,
        shift_out: u8,
        bit: u8,
        frame: [u8; 4],
        index: usize,
        /// Extra SCK pulses needed before the target is in step
        pulses_to_sync: u32,
        mute: bool,
        frames: Vec<[u8; 4]>,
        delays: Vec<u32>,
        powered: bool,
    }

    impl AvrTarget {
        fn new() -> Self {
            Self {
                signature: [0x1e, 0x93, 0x07],
                sck: false,
                mosi: false,
                miso: false,
                shift_in: 0,
                shift_out: 0,
                bit: 0,
                frame: [0; 4],
                index: 0,
                pulses_to_sync: 0,
                mute: false,
                frames: Vec::new(),
                delays: Vec::new(),
                powered: false,
            }
        }

        fn in_sync(&self) -> bool {
            self.pulses_to_sync == 0 && !self.mute
        }

        fn rising_edge(&mut self) {
            self.miso = self.shift_out & (0x80 >> self.bit) != 0;
            self.shift_in = (self.shift_in << 1) | self.mosi as u8;
            self.bit += 1;
            if self.bit < 8 {
                return;
            }

            self.bit = 0;
            self.frame[self.index] = self.shift_in;
            self.index += 1;
            self.shift_out = match self.index {
                1 | 2 => self.frame[self.index - 1],
                3 if self.frame[0] == isp::READ_SIGNATURE => {
                    self.signature[(self.frame[2] & 3) as usize % 3]
                }
                _ => 0,
            };
            if self.index == 4 {
                self.frames.push(self.frame);
                self.index = 0;
            }
            if !self.in_sync() {
                self.shift_out = 0xff;
            }
        }
    }

    impl IspBitbang for AvrTarget {
        fn set_reset(&mut self, _level: bool) -> Result<()> {
            Ok(())
        }

        fn set_sck(&mut self, high: bool) -> Result<()> {
            if high && !self.sck {
                self.rising_edge();
            }
            self.sck = high;
            Ok(())
        }

        fn set_mosi(&mut self, high: bool) -> Result<()> {
            self.mosi = high;
            Ok(())
        }

        fn get_miso(&mut self) -> Result<bool> {
            Ok(self.miso)
        }

        fn pulse_reset(&mut self) -> Result<()> {
            self.bit = 0;
            self.index = 0;
            self.shift_out = 0;
            Ok(())
        }

        fn pulse_sck(&mut self) -> Result<()> {
            self.pulses_to_sync = self.pulses_to_sync.saturating_sub(1);
            Ok(())
        }

        fn power_on(&mut self) {
            self.powered = true;
        }

        fn delay_ms(&mut self, ms: u32) {
            self.delays.push(ms);
        }
    }

    #[test]
    fn test_txrx_shifts_msb_first() {
        let mut target = AvrTarget::new();
        isp::txrx(&mut target, 0xa5).unwrap();
        assert_eq!(target.frame[0], 0xa5);
        assert_eq!(target.index, 1);
    }

    #[test]
    fn test_cmd_echo() {
        let mut target = AvrTarget::new();
        let res = isp::cmd(&mut target, [0xac, 0x53, 0x00, 0x00]).unwrap();
        assert_eq!(res, [0x00, 0xac, 0x53, 0x00]);
        assert_eq!(target.frames, [[0xac, 0x53, 0x00, 0x00]]);
    }

    #[test]
    fn test_program_enable() {
        let mut target = AvrTarget::new();
        assert_eq!(isp::program_enable(&mut target), Ok(()));

        target.mute = true;
        assert_eq!(
            isp::program_enable(&mut target),
            Err(Error::ProgramEnableFailed)
        );
    }

    #[test]
    fn test_initialize_first_try() {
        let mut target = AvrTarget::new();
        isp::initialize(&mut target).unwrap();
        assert!(target.powered);
        assert_eq!(target.frames.len(), 1);
        assert_eq!(target.delays, [20, 20, 20]);
    }

    #[test]
    fn test_initialize_resyncs() {
        let mut target = AvrTarget::new();
        target.pulses_to_sync = 3;
        isp::initialize(&mut target).unwrap();
        assert_eq!(target.frames.len(), 4);
    }

    #[test]
    fn test_initialize_gives_up() {
        let mut target = AvrTarget::new();
        target.mute = true;
        assert_eq!(
            isp::initialize(&mut target),
            Err(Error::ProgramEnableFailed)
        );
        assert_eq!(target.frames.len(), isp::MAX_SYNC_TRIES);
    }

    #[test]
    fn test_read_signature() {
        let mut target = AvrTarget::new();
        isp::initialize(&mut target).unwrap();
        assert_eq!(isp::read_signature(&mut target), Ok([0x1e, 0x93, 0x07]));
    }

    #[test]
    fn test_chip_erase_reinitializes() {
        let mut target = AvrTarget::new();
        isp::chip_erase(&mut target).unwrap();
        assert_eq!(target.frames[0], isp::CHIP_ERASE);
        assert_eq!(target.frames[1], isp::PROGRAM_ENABLE);
    }

    #[test]
    fn test_session_drives_configured_pins() {
        // dt006: reset 4, sck 5, mosi 2, miso 11
        let roles = PinRoles::preset("dt006").unwrap();
        let mut session = ParSession::open(MockPort::new(), roles);

        session.set_mosi(true).unwrap();
        session.set_sck(true).unwrap();
        session.set_reset(true).unwrap();
        assert_eq!(session.port_mut().reg(Register::Data), 0x01 | 0x08 | 0x04);

        // MISO on BUSY (pin 11) is inverted: status bit clear reads high
        assert_eq!(session.get_miso(), Ok(true));
        session.port_mut().regs[Register::Status.offset()] = 0x80;
        assert_eq!(session.get_miso(), Ok(false));
    }

    #[test]
    fn test_session_txrx_reads_miso() {
        let roles = PinRoles::preset("bsd").unwrap();
        // MISO on ACK (pin 10, bit 0x40) held high
        let port = MockPort::with_regs(0, 0x40, 0);
        let mut session = ParSession::open(port, roles);
        assert_eq!(isp::txrx(&mut session, 0x00), Ok(0xff));
        // SCK (pin 8) is left low
        assert_eq!(session.get_pin(PinRef::new(8)), Ok(false));
    }

    #[test]
    fn test_session_unwired_signal_errors() {
        let roles = PinRoles {
            sck: PinRef::new(6),
            ..PinRoles::default()
        };
        let mut session = ParSession::open(MockPort::new(), roles);
        assert_eq!(isp::txrx(&mut session, 0x55), Err(Error::PinOutOfRange(0)));
    }

    #[test]
    fn test_session_delay_in_microseconds() {
        let mut session = ParSession::open(MockPort::new(), PinRoles::default());
        IspBitbang::delay_ms(&mut session, 20);
        assert_eq!(session.port_mut().delays, [20_000]);
    }
}
