//! Error types for avrppi-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Pin errors
    /// Pin number is outside 1..=17 (0 means the signal is not wired)
    PinOutOfRange(u8),
    /// Pin reference could not be parsed
    InvalidPin,
    /// Pin group is not a list of data pins 2..=9 or a mask
    InvalidPinGroup,
    /// No pin role preset with that name
    UnknownPreset,

    // Exit spec errors
    /// Unrecognized exit spec directive
    InvalidExitSpec {
        /// Byte offset of the offending directive in the input
        offset: usize,
    },

    // Programming errors
    /// Target did not answer the programming enable command
    ProgramEnableFailed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PinOutOfRange(pin) => write!(f, "pin {} out of range (1-17)", pin),
            Self::InvalidPin => write!(f, "invalid pin reference"),
            Self::InvalidPinGroup => write!(f, "invalid pin group"),
            Self::UnknownPreset => write!(f, "unknown pin preset"),
            Self::InvalidExitSpec { offset } => {
                write!(f, "invalid exit spec directive at offset {}", offset)
            }
            Self::ProgramEnableFailed => write!(f, "target did not enter programming mode"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
