//! Programmer traits and abstractions
//!
//! This module defines the register access trait that port backends
//! implement, the programming session built on top of it, and the
//! bit-bang AVR serial programming driver.

pub mod bitbang;
#[cfg(test)]
pub(crate) mod mock;
pub mod session;
mod traits;

pub use bitbang::IspBitbang;
pub use session::ParSession;
pub use traits::*;
