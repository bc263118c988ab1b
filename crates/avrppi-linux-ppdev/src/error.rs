//! Error types for Linux ppdev operations

use avrppi_core::programmer::Register;
use thiserror::Error;

/// Linux ppdev specific errors
#[derive(Debug, Error)]
pub enum PpdevError {
    /// Failed to open device
    #[error("Failed to open parallel port \"{path}\": {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Another driver or process holds the port
    #[error("Failed to claim parallel port \"{path}\": {source}")]
    ClaimFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to switch the data lines to output
    #[error("Failed to set data direction: {0}")]
    DataDirFailed(#[source] std::io::Error),

    /// Register read failed
    #[error("Failed to read {register} register: {source}")]
    ReadFailed {
        register: Register,
        #[source]
        source: std::io::Error,
    },

    /// Register write failed
    #[error("Failed to write {register} register: {source}")]
    WriteFailed {
        register: Register,
        #[source]
        source: std::io::Error,
    },

    /// Device not specified
    #[error("No device specified. Use dev=/dev/parportN or parport=N")]
    NoDevice,
}

/// Result type for Linux ppdev operations
pub type Result<T> = std::result::Result<T, PpdevError>;
