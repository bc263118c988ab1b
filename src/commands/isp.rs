//! Commands that talk to an AVR target over the serial programming interface

use avrppi_core::pins::PinRoles;
use avrppi_core::programmer::bitbang::isp;
use avrppi_core::programmer::{ParSession, ParallelPort};

use super::exitspec;

/// Run `f` inside a session, restoring the port whatever `f` returns
///
/// The exit spec is parsed before the port is touched, so a bad spec
/// leaves the port alone.
fn with_session<F>(
    port: &mut dyn ParallelPort,
    roles: PinRoles,
    exit_spec: Option<&str>,
    f: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(&mut ParSession<&mut dyn ParallelPort>) -> avrppi_core::Result<()>,
{
    let masks = match exit_spec {
        Some(spec) => Some(exitspec::parse(spec, &roles)?),
        None => None,
    };

    let mut session = ParSession::open(port, roles);
    if let Some(masks) = &masks {
        session.apply_exit_specs(masks);
    }

    session.enable();

    let result = session.rdy_led(true).and_then(|()| f(&mut session));
    if result.is_err() {
        // Best effort, the first error is what gets reported
        let _ = session.err_led(true);
    }

    session.disable();
    session.close();
    result.map_err(Into::into)
}

/// Read and print the target's signature bytes
pub fn run_signature(
    port: &mut dyn ParallelPort,
    roles: PinRoles,
    exit_spec: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    with_session(port, roles, exit_spec, |session| {
        isp::initialize(session)?;
        let sig = isp::read_signature(session)?;
        println!(
            "Device signature = 0x{:02x}{:02x}{:02x}",
            sig[0], sig[1], sig[2]
        );
        Ok(())
    })
}

/// Erase the target's flash and EEPROM
pub fn run_erase(
    port: &mut dyn ParallelPort,
    roles: PinRoles,
    exit_spec: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    with_session(port, roles, exit_spec, |session| {
        isp::initialize(session)?;
        session.pgm_led(true)?;
        log::info!("Erasing chip...");
        isp::chip_erase(session)?;
        session.pgm_led(false)?;
        println!("Chip erased");
        Ok(())
    })
}
