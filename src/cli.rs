//! CLI argument parsing

use clap::{Parser, Subcommand};

const PROGRAMMER_HELP: &str = "Programmer to use, e.g. ppdev:dev=/dev/parport0,preset=stk200 \
     [pin keys: preset, reset, sck, mosi, miso, err, rdy, pgm, vfy, vcc, buff]";

const EXIT_SPEC_HELP: &str =
    "Pin state to leave on exit: comma-separated reset, noreset, vcc, novcc";

/// Parse a pin level: 1/0, high/low, on/off
fn parse_level(s: &str) -> Result<bool, String> {
    match s {
        "1" | "high" | "on" => Ok(true),
        "0" | "low" | "off" => Ok(false),
        _ => Err(format!("Invalid level: {} (expected 1/0, high/low, on/off)", s)),
    }
}

#[derive(Parser)]
#[command(name = "avrppi")]
#[command(author, version, about = "AVR programmer for parallel port cables", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read the device signature of the target
    Signature {
        /// Programmer to use
        #[arg(short, long, help = PROGRAMMER_HELP)]
        programmer: String,

        /// Exit spec
        #[arg(short = 'E', long, help = EXIT_SPEC_HELP)]
        exit_spec: Option<String>,
    },

    /// Erase flash and EEPROM of the target
    Erase {
        /// Programmer to use
        #[arg(short, long, help = PROGRAMMER_HELP)]
        programmer: String,

        /// Exit spec
        #[arg(short = 'E', long, help = EXIT_SPEC_HELP)]
        exit_spec: Option<String>,
    },

    /// Show the pin assignment of a programmer
    Display {
        /// Programmer to use
        #[arg(short, long, help = PROGRAMMER_HELP)]
        programmer: String,
    },

    /// Check an exit spec and show the resulting masks
    ExitSpec {
        /// Programmer to use
        #[arg(short, long, help = PROGRAMMER_HELP)]
        programmer: String,

        /// Exit spec to check
        #[arg(help = EXIT_SPEC_HELP)]
        spec: String,
    },

    /// Drive a port pin to a level
    Set {
        /// Programmer to use
        #[arg(short, long, help = PROGRAMMER_HELP)]
        programmer: String,

        /// Pin (1-17, ~N forces inverted, ^N non-inverted)
        pin: String,

        /// Level (1/0, high/low, on/off)
        #[arg(value_parser = parse_level, action = clap::ArgAction::Set)]
        level: bool,
    },

    /// Read the level of a port pin
    Get {
        /// Programmer to use
        #[arg(short, long, help = PROGRAMMER_HELP)]
        programmer: String,

        /// Pin (1-17, ~N forces inverted, ^N non-inverted)
        pin: String,
    },

    /// Pulse a port pin's register bit high
    Pulse {
        /// Programmer to use
        #[arg(short, long, help = PROGRAMMER_HELP)]
        programmer: String,

        /// Pin (1-17)
        pin: String,
    },

    /// Show the parallel port pin table
    Pins,

    /// List supported programmers and pin presets
    ListProgrammers,
}
