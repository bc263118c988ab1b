//! CLI command implementations
//!
//! - `isp` - commands that run a programming session on the target
//! - `pins` - single pin access, without a session
//! - `exitspec` - exit spec checking and error reporting
//! - `list` - static information: programmers, presets, pin table

pub mod exitspec;
pub mod isp;
mod list;
pub mod pins;

pub use list::{list_programmers, print_pin_table, show_roles};
