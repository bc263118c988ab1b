//! Parallel port pin mapping
//!
//! - [`table`] - fixed pin number to register/bit/polarity table
//! - [`control`] - polarity-aware set, get and pulse operations
//! - [`roles`] - which pin carries which programming signal

pub mod control;
pub mod roles;
pub mod table;

pub use control::{get_pin, high_pulse_pin, set_pin};
pub use roles::{PinList, PinRoles, RoleDisplay};
pub use table::{lookup, pin_mask, PinEntry, PinRef, NUM_PINS, PIN_TABLE};
