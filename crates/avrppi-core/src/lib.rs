//! avrppi-core - Parallel port pin control for AVR in-system programming
//!
//! This crate maps the 17 physical pins of a PC parallel port onto the
//! three 8-bit port registers (DATA, CONTROL, STATUS) and provides the
//! polarity-aware pin operations an AVR serial programmer is built from.
//! It is `no_std` compatible; the actual register I/O is supplied by a
//! [`programmer::ParallelPort`] implementation.
//!
//! # Features
//!
//! - `std` - Implement `std::error::Error` for [`Error`]
//! - `slow-toggle` - Delay 1 ms after each high pulse
//!
//! # Example
//!
//! ```ignore
//! use avrppi_core::pins::{self, PinRef};
//! use avrppi_core::programmer::ParallelPort;
//!
//! fn blink<P: ParallelPort>(port: &mut P) -> avrppi_core::Result<()> {
//!     pins::set_pin(port, PinRef::new(2), true)?;
//!     let level = pins::get_pin(port, PinRef::new(2))?;
//!     println!("pin 2 is {}", if level { "high" } else { "low" });
//!     Ok(())
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod error;
pub mod exitspec;
pub mod pins;
pub mod programmer;

pub use error::{Error, Result};
pub use exitspec::{parse_exit_specs, ExitSpecMasks};
