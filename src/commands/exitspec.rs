//! Exit spec command and parsing helper

use avrppi_core::exitspec::ExitSpecTokens;
use avrppi_core::pins::{self, PinList, PinRoles};
use avrppi_core::programmer::{PortBits, Register};
use avrppi_core::{parse_exit_specs, Error, ExitSpecMasks};

/// Parse an exit spec, turning errors into messages that name the directive
///
/// Exit masks are restored into the DATA register, so `reset`/`noreset`
/// are refused when RESET is wired to another register.
pub fn parse(spec: &str, roles: &PinRoles) -> Result<ExitSpecMasks, Box<dyn std::error::Error>> {
    let masks = parse_exit_specs(spec, roles).map_err(|e| -> Box<dyn std::error::Error> {
        match e {
            Error::InvalidExitSpec { offset } => {
                let directive = spec[offset..].split(',').next().unwrap_or_default();
                format!(
                    "Invalid exit spec directive '{}' in \"{}\" (expected reset, noreset, vcc or novcc)",
                    directive, spec
                )
                .into()
            }
            Error::PinOutOfRange(_) => {
                format!("Exit spec \"{}\" needs a RESET pin: {}", spec, e).into()
            }
            e => Box::new(e),
        }
    })?;

    let names_reset = ExitSpecTokens::new(spec).any(|(_, t)| t == "reset" || t == "noreset");
    if names_reset {
        let entry = pins::lookup(roles.reset.number)?;
        if entry.register != Register::Data {
            return Err(format!(
                "Exit spec \"{}\": RESET is pin {} on the {} register, only DATA pins can be set on exit",
                spec, entry.pin, entry.register
            )
            .into());
        }
    }

    Ok(masks)
}

fn describe(bits: PortBits) -> String {
    if bits.is_empty() {
        "0x00".to_string()
    } else {
        format!("0x{:02x} (data pins {})", bits.bits(), PinList(bits))
    }
}

/// Check an exit spec and print the masks it produces
pub fn cmd_check(spec: &str, roles: &PinRoles) -> Result<(), Box<dyn std::error::Error>> {
    let masks = parse(spec, roles)?;

    println!("Exit spec \"{}\":", spec);
    if masks.is_empty() {
        println!("  no change to the port on exit");
        return Ok(());
    }
    println!("  set   = {}", describe(masks.set));
    println!("  clear = {}", describe(masks.clear));

    let both = masks.set & masks.clear;
    if !both.is_empty() {
        log::warn!(
            "Bits 0x{:02x} are both set and cleared; set wins",
            both.bits()
        );
    }

    Ok(())
}
