//! List commands implementation

use avrppi_core::pins::roles::PRESET_NAMES;
use avrppi_core::pins::{PinRoles, PIN_TABLE};

use crate::programmers::available_programmers;

/// List compiled-in programmers and the cable presets
pub fn list_programmers() {
    println!("Supported programmers:");
    println!();
    for info in available_programmers() {
        let name = if info.aliases.is_empty() {
            info.name.to_string()
        } else {
            format!("{} ({})", info.name, info.aliases.join(", "))
        };
        println!("  {:<24} - {}", name, info.description);
    }

    println!();
    println!("Pin presets (preset=NAME):");
    println!();
    for name in PRESET_NAMES {
        println!("  {}", name);
    }
}

/// Print the 17-pin connector map
pub fn print_pin_table() {
    println!("{:>3}  {:<8} {:>3}  {}", "Pin", "Register", "Bit", "Inverted");
    println!("{}", "-".repeat(28));

    for entry in PIN_TABLE.iter() {
        // Table entries hold exactly one bit
        let bit = entry.bit.bits().trailing_zeros();
        println!(
            "{:>3}  {:<8} {:>3}  {}",
            entry.pin,
            entry.register,
            bit,
            if entry.inverted { "yes" } else { "" }
        );
    }
}

/// Show a programmer's pin assignment
pub fn show_roles(roles: &PinRoles) {
    println!("Programmer Type : PPI");
    print!("{}", roles.display(""));
}
