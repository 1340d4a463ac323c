//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: simulation error (bad dimensions, solver failure)
//! - 11: I/O error (snapshot write)
//! - 12: input error (bad JSON params, out-of-range config)
//! - 13: serialization error

use fluid_engine_core::FluidError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
pub enum CliError {
    /// A solver-level error (bad dimensions, step failure).
    Sim(FluidError),
    /// An I/O error (snapshot write).
    Io(String),
    /// A user input error (bad JSON params, out-of-range config value).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Sim(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Sim(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "{msg}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<FluidError> for CliError {
    fn from(e: FluidError) -> Self {
        match e {
            FluidError::Io(msg) => CliError::Io(msg),
            FluidError::InvalidConfig(msg) => CliError::Input(msg),
            other => CliError::Sim(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_error_exit_code_is_10() {
        let err = CliError::Sim(FluidError::InvalidDimensions);
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn io_error_exit_code_is_11() {
        let err = CliError::Io("write failed".into());
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn input_error_exit_code_is_12() {
        let err = CliError::Input("bad params".into());
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn serialization_error_exit_code_is_13() {
        let err = CliError::Serialization("json fail".into());
        assert_eq!(err.exit_code(), 13);
    }

    #[test]
    fn from_fluid_error_io_routes_to_cli_io() {
        let cli_err = CliError::from(FluidError::Io("disk full".into()));
        assert_eq!(cli_err.exit_code(), 11);
        assert!(cli_err.to_string().contains("disk full"));
    }

    #[test]
    fn from_fluid_error_config_routes_to_input() {
        let cli_err = CliError::from(FluidError::InvalidConfig("splat_radius".into()));
        assert_eq!(cli_err.exit_code(), 12);
        assert!(cli_err.to_string().contains("splat_radius"));
    }

    #[test]
    fn from_fluid_error_other_routes_to_sim() {
        let cli_err = CliError::from(FluidError::InvalidDimensions);
        assert_eq!(cli_err.exit_code(), 10);
    }

    #[test]
    fn from_serde_json_error_routes_to_serialization() {
        let bad = serde_json::from_str::<serde_json::Value>("{invalid");
        let cli_err = CliError::from(bad.unwrap_err());
        assert_eq!(cli_err.exit_code(), 13);
    }
}
