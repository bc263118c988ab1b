//! Linux ppdev device implementation
//!
//! This module provides the `LinuxPpdev` struct that implements the
//! `ParallelPort` trait using the ppdev ioctl interface.

use crate::error::{PpdevError, Result};

use avrppi_core::programmer::{ParallelPort, Register};

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;

/// Linux ppdev ioctl constants
mod ioctl {
    use nix::{ioctl_none, ioctl_read, ioctl_write_ptr};

    // ppdev ioctl magic number
    const PP_IOCTL: u8 = b'p';

    // ppdev ioctl type numbers
    const PP_TYPE_RSTATUS: u8 = 0x81;
    const PP_TYPE_RCONTROL: u8 = 0x83;
    const PP_TYPE_WCONTROL: u8 = 0x84;
    const PP_TYPE_RDATA: u8 = 0x85;
    const PP_TYPE_WDATA: u8 = 0x86;
    const PP_TYPE_CLAIM: u8 = 0x8b;
    const PP_TYPE_RELEASE: u8 = 0x8c;
    const PP_TYPE_DATADIR: u8 = 0x90;

    // Generate ioctl functions
    ioctl_read!(pp_rstatus, PP_IOCTL, PP_TYPE_RSTATUS, u8);
    ioctl_read!(pp_rcontrol, PP_IOCTL, PP_TYPE_RCONTROL, u8);
    ioctl_write_ptr!(pp_wcontrol, PP_IOCTL, PP_TYPE_WCONTROL, u8);
    ioctl_read!(pp_rdata, PP_IOCTL, PP_TYPE_RDATA, u8);
    ioctl_write_ptr!(pp_wdata, PP_IOCTL, PP_TYPE_WDATA, u8);
    ioctl_none!(pp_claim, PP_IOCTL, PP_TYPE_CLAIM);
    ioctl_none!(pp_release, PP_IOCTL, PP_TYPE_RELEASE);
    ioctl_write_ptr!(pp_datadir, PP_IOCTL, PP_TYPE_DATADIR, libc::c_int);
}

/// Configuration for opening a ppdev port
#[derive(Debug, Clone, Default)]
pub struct LinuxPpdevConfig {
    /// Device path (e.g., "/dev/parport0")
    pub device: String,
}

impl LinuxPpdevConfig {
    /// Create a new configuration with the given device path
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
        }
    }
}

/// Parallel port accessed through Linux ppdev
///
/// The port is claimed on open and released when dropped.
pub struct LinuxPpdev {
    /// File handle for the ppdev device
    file: File,
    /// Device path, for diagnostics
    path: String,
}

impl LinuxPpdev {
    /// Open and claim a ppdev port
    pub fn open(config: &LinuxPpdevConfig) -> Result<Self> {
        if config.device.is_empty() {
            return Err(PpdevError::NoDevice);
        }

        log::debug!("ppdev: Opening device {}", config.device);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&config.device)
            .map_err(|e| PpdevError::OpenFailed {
                path: config.device.clone(),
                source: e,
            })?;

        let fd = file.as_raw_fd();

        unsafe {
            ioctl::pp_claim(fd).map_err(|e| PpdevError::ClaimFailed {
                path: config.device.clone(),
                source: std::io::Error::from_raw_os_error(e as i32),
            })?;
        }

        let port = Self {
            file,
            path: config.device.clone(),
        };

        // Drive the data lines (forward direction)
        let forward: libc::c_int = 0;
        unsafe {
            ioctl::pp_datadir(fd, &forward).map_err(|e| {
                PpdevError::DataDirFailed(std::io::Error::from_raw_os_error(e as i32))
            })?;
        }

        log::info!("ppdev: Opened {}", port.path);

        Ok(port)
    }

    /// Read a register
    pub fn read(&self, reg: Register) -> Result<u8> {
        let fd = self.file.as_raw_fd();
        let mut value = 0u8;
        let res = unsafe {
            match reg {
                Register::Data => ioctl::pp_rdata(fd, &mut value),
                Register::Status => ioctl::pp_rstatus(fd, &mut value),
                Register::Control => ioctl::pp_rcontrol(fd, &mut value),
            }
        };
        res.map_err(|e| PpdevError::ReadFailed {
            register: reg,
            source: std::io::Error::from_raw_os_error(e as i32),
        })?;
        Ok(value)
    }

    /// Write a register
    ///
    /// STATUS is input-only on the port; writing it is a no-op.
    pub fn write(&self, reg: Register, value: u8) -> Result<()> {
        let fd = self.file.as_raw_fd();
        let res = unsafe {
            match reg {
                Register::Data => ioctl::pp_wdata(fd, &value),
                Register::Control => ioctl::pp_wcontrol(fd, &value),
                Register::Status => {
                    log::warn!("ppdev: STATUS register is read-only, ignoring write");
                    return Ok(());
                }
            }
        };
        res.map_err(|e| PpdevError::WriteFailed {
            register: reg,
            source: std::io::Error::from_raw_os_error(e as i32),
        })?;
        Ok(())
    }
}

impl ParallelPort for LinuxPpdev {
    fn read_register(&mut self, reg: Register) -> u8 {
        match self.read(reg) {
            Ok(value) => value,
            Err(e) => {
                log::error!("ppdev: {}", e);
                0
            }
        }
    }

    fn write_register(&mut self, reg: Register, value: u8) {
        if let Err(e) = self.write(reg, value) {
            log::error!("ppdev: {}", e);
        }
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(std::time::Duration::from_micros(us as u64));
    }
}

impl Drop for LinuxPpdev {
    fn drop(&mut self) {
        let fd = self.file.as_raw_fd();
        if let Err(e) = unsafe { ioctl::pp_release(fd) } {
            log::warn!("ppdev: Failed to release {}: {}", self.path, e);
        } else {
            log::debug!("ppdev: Released {}", self.path);
        }
    }
}

/// Parse programmer options from a list of key-value pairs
///
/// # Supported Options
///
/// - `dev=/dev/parportN` - device path (required, or use parport)
/// - `parport=N` - port number (alternative to dev)
///
/// Other keys are ignored; the CLI handles pin assignment options itself.
pub fn parse_options(options: &[(&str, &str)]) -> std::result::Result<LinuxPpdevConfig, String> {
    let mut config = LinuxPpdevConfig::default();
    let mut parport: Option<u32> = None;

    for (key, value) in options {
        match *key {
            "dev" => {
                config.device = value.to_string();
            }
            "parport" => {
                parport = Some(
                    value
                        .parse()
                        .map_err(|_| format!("Invalid parport value: {}", value))?,
                );
            }
            _ => {
                log::debug!("ppdev: Ignoring option: {}={}", key, value);
            }
        }
    }

    if config.device.is_empty() {
        if let Some(n) = parport {
            config.device = format!("/dev/parport{}", n);
        } else {
            return Err("Either 'dev' or 'parport' must be specified.\n\
                 e.g. ppdev:dev=/dev/parport0,preset=stk200"
                .to_string());
        }
    } else if parport.is_some() {
        return Err("Only one of 'dev' or 'parport' can be specified".to_string());
    }

    Ok(config)
}
