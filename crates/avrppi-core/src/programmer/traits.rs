//! Parallel port register access
//!
//! A PC parallel port exposes three 8-bit registers. Backends implement
//! [`ParallelPort`] to read and modify them; everything above this layer
//! works in terms of a register and a set of bits within it.

use bitflags::bitflags;
use core::fmt;

/// One of the three parallel port registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// Data register (pins 2-9), read/write
    Data,
    /// Status register (pins 10-13, 15), read-only on real hardware
    Status,
    /// Control register (pins 1, 14, 16, 17), read/write
    Control,
}

impl Register {
    /// All registers, in port address order
    pub const ALL: [Register; 3] = [Register::Data, Register::Status, Register::Control];

    /// Offset of the register from the port base address
    pub const fn offset(self) -> usize {
        match self {
            Register::Data => 0,
            Register::Status => 1,
            Register::Control => 2,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Register::Data => "DATA",
            Register::Status => "STATUS",
            Register::Control => "CONTROL",
        })
    }
}

bitflags! {
    /// A set of bits within one 8-bit port register
    ///
    /// Used for single pin masks as well as pin groups, where several
    /// data lines are driven together to carry one signal.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PortBits: u8 {
        /// Bit 0 (pin 2 on the data register)
        const BIT0 = 1 << 0;
        /// Bit 1
        const BIT1 = 1 << 1;
        /// Bit 2
        const BIT2 = 1 << 2;
        /// Bit 3
        const BIT3 = 1 << 3;
        /// Bit 4
        const BIT4 = 1 << 4;
        /// Bit 5
        const BIT5 = 1 << 5;
        /// Bit 6
        const BIT6 = 1 << 6;
        /// Bit 7 (pin 9 on the data register)
        const BIT7 = 1 << 7;
    }
}

/// Register level access to a parallel port
///
/// Register I/O is assumed to complete immediately. Implementations that
/// can fail (e.g. an ioctl on a vanished device) log the failure rather
/// than report it, the same way bitbang line setters do.
pub trait ParallelPort {
    /// Read the full value of a register
    fn read_register(&mut self, reg: Register) -> u8;

    /// Write the full value of a register
    fn write_register(&mut self, reg: Register, value: u8);

    /// Set `bits` in `reg`, leaving the other bits untouched
    ///
    /// Default implementation is a read-modify-write.
    fn set_bits(&mut self, reg: Register, bits: PortBits) {
        let value = self.read_register(reg);
        self.write_register(reg, value | bits.bits());
    }

    /// Clear `bits` in `reg`, leaving the other bits untouched
    ///
    /// Default implementation is a read-modify-write.
    fn clear_bits(&mut self, reg: Register, bits: PortBits) {
        let value = self.read_register(reg);
        self.write_register(reg, value & !bits.bits());
    }

    /// Return which of `bits` are currently set in `reg`
    fn get_bits(&mut self, reg: Register, bits: PortBits) -> PortBits {
        PortBits::from_bits_retain(self.read_register(reg)) & bits
    }

    /// Busy-wait or sleep for the given number of microseconds
    fn delay_us(&mut self, us: u32);
}

impl<P: ParallelPort + ?Sized> ParallelPort for &mut P {
    fn read_register(&mut self, reg: Register) -> u8 {
        (**self).read_register(reg)
    }

    fn write_register(&mut self, reg: Register, value: u8) {
        (**self).write_register(reg, value)
    }

    fn set_bits(&mut self, reg: Register, bits: PortBits) {
        (**self).set_bits(reg, bits)
    }

    fn clear_bits(&mut self, reg: Register, bits: PortBits) {
        (**self).clear_bits(reg, bits)
    }

    fn get_bits(&mut self, reg: Register, bits: PortBits) -> PortBits {
        (**self).get_bits(reg, bits)
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }
}
