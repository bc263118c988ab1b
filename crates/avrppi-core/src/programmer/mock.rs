//! In-crate register latch used by unit tests

use super::{ParallelPort, Register};
use std::vec::Vec;

/// Registers are plain latches; every access is recorded
#[derive(Debug, Default)]
pub(crate) struct MockPort {
    pub regs: [u8; 3],
    pub reads: usize,
    pub writes: Vec<(Register, u8)>,
    pub delays: Vec<u32>,
}

impl MockPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_regs(data: u8, status: u8, control: u8) -> Self {
        Self {
            regs: [data, status, control],
            ..Self::default()
        }
    }

    pub fn reg(&self, reg: Register) -> u8 {
        self.regs[reg.offset()]
    }

    pub fn io_count(&self) -> usize {
        self.reads + self.writes.len()
    }
}

impl ParallelPort for MockPort {
    fn read_register(&mut self, reg: Register) -> u8 {
        self.reads += 1;
        self.regs[reg.offset()]
    }

    fn write_register(&mut self, reg: Register, value: u8) {
        self.writes.push((reg, value));
        self.regs[reg.offset()] = value;
    }

    fn delay_us(&mut self, us: u32) {
        self.delays.push(us);
    }
}
