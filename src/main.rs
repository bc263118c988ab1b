//! avrppi - AVR programmer for parallel port cables
//!
//! Drives the AVR serial programming interface by bitbanging the pins of
//! a PC parallel port. Cable wiring is described by a pin assignment
//! (a preset such as `stk200`, optionally with per-signal overrides).
//!
//! # Architecture
//!
//! - `avrppi-core` - pin table, pin control, exit specs, session and ISP
//!   protocol, all in terms of the `ParallelPort` trait
//! - backends - crates implementing `ParallelPort` (ppdev, dummy)
//! - this binary - programmer string parsing and the commands

mod cli;
mod commands;
mod programmers;

use clap::Parser;
use cli::{Cli, Commands};
use programmers::{open_port, ProgrammerSpec};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    match cli.command {
        Commands::Signature {
            programmer,
            exit_spec,
        } => {
            let spec = ProgrammerSpec::parse(&programmer)?;
            let roles = spec.roles()?;
            let mut port = open_port(&spec)?;
            commands::isp::run_signature(port.as_mut(), roles, exit_spec.as_deref())
        }
        Commands::Erase {
            programmer,
            exit_spec,
        } => {
            let spec = ProgrammerSpec::parse(&programmer)?;
            let roles = spec.roles()?;
            let mut port = open_port(&spec)?;
            commands::isp::run_erase(port.as_mut(), roles, exit_spec.as_deref())
        }
        Commands::Display { programmer } => {
            // Display doesn't touch the port
            let spec = ProgrammerSpec::parse(&programmer)?;
            commands::show_roles(&spec.roles()?);
            Ok(())
        }
        Commands::ExitSpec { programmer, spec } => {
            let programmer = ProgrammerSpec::parse(&programmer)?;
            commands::exitspec::cmd_check(&spec, &programmer.roles()?)
        }
        Commands::Set {
            programmer,
            pin,
            level,
        } => {
            let spec = ProgrammerSpec::parse(&programmer)?;
            let mut port = open_port(&spec)?;
            commands::pins::cmd_set(port.as_mut(), &pin, level)
        }
        Commands::Get { programmer, pin } => {
            let spec = ProgrammerSpec::parse(&programmer)?;
            let mut port = open_port(&spec)?;
            commands::pins::cmd_get(port.as_mut(), &pin)
        }
        Commands::Pulse { programmer, pin } => {
            let spec = ProgrammerSpec::parse(&programmer)?;
            let mut port = open_port(&spec)?;
            commands::pins::cmd_pulse(port.as_mut(), &pin)
        }
        Commands::Pins => {
            commands::print_pin_table();
            Ok(())
        }
        Commands::ListProgrammers => {
            commands::list_programmers();
            Ok(())
        }
    }
}
