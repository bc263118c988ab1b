//! Programmer registration and dispatch
//!
//! A programmer is selected with a string of the form
//! `name[:key=value,...]`. Pin assignment keys are handled here for every
//! backend; the remaining keys are passed to the backend's own option
//! parser.

use avrppi_core::pins::{PinList, PinRef, PinRoles};
use avrppi_core::programmer::ParallelPort;
use thiserror::Error;

/// Information about a programmer
pub struct ProgrammerInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Errors in a programmer string
#[derive(Debug, Error)]
pub enum ProgrammerSpecError {
    /// Option without `=`
    #[error("Invalid parameter format: '{0}' (expected key=value)")]
    InvalidParameter(String),

    /// No backend with that name was compiled in
    #[error("Unknown programmer: {0}")]
    UnknownProgrammer(String),

    /// Pin or pin group option could not be parsed
    #[error("Invalid value for '{key}': {value} ({source})")]
    InvalidPin {
        key: String,
        value: String,
        #[source]
        source: avrppi_core::Error,
    },
}

/// Keys consumed by [`ProgrammerSpec::roles`]
const ROLE_KEYS: &[&str] = &[
    "preset", "reset", "sck", "mosi", "miso", "err", "rdy", "pgm", "vfy", "vcc", "buff",
];

/// Get information about all available programmers (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_programmers() -> Vec<ProgrammerInfo> {
    let mut programmers = Vec::new();

    #[cfg(feature = "dummy")]
    programmers.push(ProgrammerInfo {
        name: "dummy",
        aliases: &[],
        description: "In-memory port for dry runs (data=,status=,control=)",
    });

    #[cfg(all(feature = "ppdev", target_os = "linux"))]
    programmers.push(ProgrammerInfo {
        name: "ppdev",
        aliases: &["par", "parport"],
        description: "Linux ppdev parallel port (dev=/dev/parportN or parport=N)",
    });

    programmers
}

/// Parsed programmer string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgrammerSpec {
    /// Programmer name as given
    pub name: String,
    /// Key-value options, in order of appearance
    pub options: Vec<(String, String)>,
}

impl ProgrammerSpec {
    /// Parse `name` or `name:key1=value1,key2=value2`
    pub fn parse(s: &str) -> Result<Self, ProgrammerSpecError> {
        let (name, opts_str) = s.split_once(':').unwrap_or((s, ""));

        let mut options = Vec::new();
        if !opts_str.is_empty() {
            for opt in opts_str.split(',') {
                let (key, value) = opt
                    .split_once('=')
                    .ok_or_else(|| ProgrammerSpecError::InvalidParameter(opt.to_string()))?;
                options.push((key.to_string(), value.to_string()));
            }
        }

        Ok(Self {
            name: name.to_string(),
            options,
        })
    }

    /// Pin assignment from `preset=` plus individual overrides
    ///
    /// Later options win, so `preset=stk200,reset=~9` starts from the
    /// STK200 layout and forces RESET inverted.
    pub fn roles(&self) -> Result<PinRoles, ProgrammerSpecError> {
        let mut roles = PinRoles::default();

        for (key, value) in &self.options {
            let invalid = |source| ProgrammerSpecError::InvalidPin {
                key: key.clone(),
                value: value.clone(),
                source,
            };
            let pin = || value.parse::<PinRef>().map_err(invalid);
            let group = || value.parse::<PinList>().map(|l| l.0).map_err(invalid);

            match key.as_str() {
                "preset" => roles = PinRoles::preset(value).map_err(invalid)?,
                "reset" => roles.reset = pin()?,
                "sck" => roles.sck = pin()?,
                "mosi" => roles.mosi = pin()?,
                "miso" => roles.miso = pin()?,
                "err" => roles.led_err = pin()?,
                "rdy" => roles.led_rdy = pin()?,
                "pgm" => roles.led_pgm = pin()?,
                "vfy" => roles.led_vfy = pin()?,
                "vcc" => roles.vcc = group()?,
                "buff" => roles.buff = group()?,
                _ => {}
            }
        }

        Ok(roles)
    }

    /// Options not related to pin assignment, for the backend
    pub fn backend_options(&self) -> Vec<(&str, &str)> {
        self.options
            .iter()
            .filter(|(k, _)| !ROLE_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

/// Open the port named by a programmer string
pub fn open_port(
    spec: &ProgrammerSpec,
) -> Result<Box<dyn ParallelPort>, Box<dyn std::error::Error>> {
    #[allow(unused_variables)]
    let options = spec.backend_options();

    match spec.name.as_str() {
        #[cfg(feature = "dummy")]
        "dummy" => avrppi_dummy::open_dummy(&options),

        #[cfg(all(feature = "ppdev", target_os = "linux"))]
        "ppdev" | "par" | "parport" => avrppi_linux_ppdev::open_linux_ppdev(&options),

        _ => Err(ProgrammerSpecError::UnknownProgrammer(spec.name.clone()).into()),
    }
}
