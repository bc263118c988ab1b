//! avrppi-linux-ppdev - Linux ppdev parallel port support
//!
//! This crate drives a PC parallel port through the Linux `ppdev` driver
//! and its `/dev/parportN` character devices.
//!
//! # Overview
//!
//! `ppdev` gives user space register level access to a parallel port
//! without `ioperm()` or root, as long as the device node is accessible.
//! The port is claimed for exclusive use on open and released on drop.
//!
//! # Example
//!
//! ```no_run
//! use avrppi_linux_ppdev::{LinuxPpdev, LinuxPpdevConfig};
//! use avrppi_core::pins::{self, PinRef};
//!
//! let mut port = LinuxPpdev::open(&LinuxPpdevConfig::new("/dev/parport0"))?;
//!
//! // Drive pin 2 (D0) high and read BUSY back
//! pins::set_pin(&mut port, PinRef::new(2), true)?;
//! let busy = pins::get_pin(&mut port, PinRef::new(11))?;
//! println!("BUSY: {}", busy);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Usage with avrppi CLI
//!
//! ```bash
//! # STK200 dongle on the first port
//! avrppi signature -p ppdev:dev=/dev/parport0,preset=stk200
//!
//! # Custom wiring, RESET forced inverted
//! avrppi display -p ppdev:parport=0,reset=~9,sck=6,mosi=7,miso=10,vcc=2+3
//! ```
//!
//! # System Requirements
//!
//! - Linux kernel with `CONFIG_PPDEV` (module `ppdev`) and a parport driver
//!   such as `parport_pc`
//! - Read/write access to `/dev/parportN` (usually the `lp` group)

pub mod device;
pub mod error;

// Re-exports
pub use device::{parse_options, LinuxPpdev, LinuxPpdevConfig};
pub use error::{PpdevError, Result};

/// Open a ppdev port and return it as a boxed ParallelPort
///
/// This is a convenience function for use in the CLI programmer dispatch.
///
/// # Example Options
///
/// - `dev=/dev/parport0` - device path
/// - `parport=0` - port number (alternative to dev)
pub fn open_linux_ppdev(
    options: &[(&str, &str)],
) -> std::result::Result<
    Box<dyn avrppi_core::programmer::ParallelPort>,
    Box<dyn std::error::Error>,
> {
    let config = parse_options(options)?;
    let port = LinuxPpdev::open(&config)?;
    Ok(Box::new(port))
}
