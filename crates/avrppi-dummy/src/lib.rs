//! avrppi-dummy - In-memory parallel port for testing
//!
//! This crate provides a parallel port whose registers are plain memory.
//! Every register access is logged, which makes it useful for tests and
//! for dry runs of the CLI without a port attached.
//!
//! Unlike real hardware the STATUS register accepts writes, so input pins
//! can be driven from a test.

use avrppi_core::programmer::{ParallelPort, Register};

/// One recorded register access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortOp {
    /// Register read, with the value returned
    Read(Register, u8),
    /// Register write, with the value written
    Write(Register, u8),
    /// Delay request in microseconds
    Delay(u32),
}

/// Configuration for the dummy port
#[derive(Debug, Clone, Default)]
pub struct DummyConfig {
    /// Initial DATA register value
    pub data: u8,
    /// Initial STATUS register value
    pub status: u8,
    /// Initial CONTROL register value
    pub control: u8,
}

/// In-memory parallel port
#[derive(Debug, Default)]
pub struct DummyPort {
    regs: [u8; 3],
    ops: Vec<PortOp>,
}

impl DummyPort {
    /// Create a port with the given initial register values
    pub fn new(config: DummyConfig) -> Self {
        Self {
            regs: [config.data, config.status, config.control],
            ops: Vec::new(),
        }
    }

    /// Create a port with all registers zero
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Current register value, without logging an access
    pub fn register(&self, reg: Register) -> u8 {
        self.regs[reg.offset()]
    }

    /// Accesses so far, oldest first
    pub fn ops(&self) -> &[PortOp] {
        &self.ops
    }

    /// Number of register reads and writes so far
    pub fn io_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| !matches!(op, PortOp::Delay(_)))
            .count()
    }
}

impl ParallelPort for DummyPort {
    fn read_register(&mut self, reg: Register) -> u8 {
        let value = self.regs[reg.offset()];
        self.ops.push(PortOp::Read(reg, value));
        value
    }

    fn write_register(&mut self, reg: Register, value: u8) {
        log::trace!("dummy: {} <- 0x{:02x}", reg, value);
        self.ops.push(PortOp::Write(reg, value));
        self.regs[reg.offset()] = value;
    }

    fn delay_us(&mut self, us: u32) {
        // No delay needed for in-memory registers
        self.ops.push(PortOp::Delay(us));
    }
}

fn parse_register(key: &str, value: &str) -> Result<u8, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|_| format!("Invalid {} value: {}", key, value))
}

/// Parse programmer options from a list of key-value pairs
///
/// # Supported Options
///
/// - `data=N` - initial DATA register (decimal or 0x hex)
/// - `status=N` - initial STATUS register, i.e. the input pin levels
/// - `control=N` - initial CONTROL register
///
/// Other keys are ignored; the CLI handles pin assignment options itself.
pub fn parse_options(options: &[(&str, &str)]) -> Result<DummyConfig, String> {
    let mut config = DummyConfig::default();

    for (key, value) in options {
        match *key {
            "data" => config.data = parse_register(key, value)?,
            "status" => config.status = parse_register(key, value)?,
            "control" => config.control = parse_register(key, value)?,
            _ => log::debug!("dummy: Ignoring option: {}={}", key, value),
        }
    }

    Ok(config)
}

/// Create a dummy port from programmer options and return it boxed
pub fn open_dummy(
    options: &[(&str, &str)],
) -> Result<Box<dyn ParallelPort>, Box<dyn std::error::Error>> {
    let config = parse_options(options)?;
    log::info!(
        "dummy: DATA=0x{:02x} STATUS=0x{:02x} CONTROL=0x{:02x}",
        config.data,
        config.status,
        config.control
    );
    Ok(Box::new(DummyPort::new(config)))
}
