//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use ifmon::config::{ConfigError, field};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - invalid args, missing required fields, etc.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Runtime error (exit code 2) - subscription failure, unsupported platform, etc.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Returns a hint for common configuration errors, if one applies.
pub fn config_hint(error: &ConfigError) -> Option<&'static str> {
    const INIT_HINT: &str = "Run 'ifmon init' to generate a configuration template.";

    match error {
        ConfigError::MissingRequired { field: f, .. }
            if *f == field::INTERFACE || *f == field::FAMILY =>
        {
            Some(INIT_HINT)
        }
        ConfigError::FileRead { .. } => Some(INIT_HINT),
        _ => None,
    }
}

/// Prints helpful hints for common configuration errors.
pub fn print_config_hint(error: &ConfigError) {
    if let Some(hint) = config_hint(error) {
        eprintln!("\n{hint}");
    }
}

/// Sets up the tracing subscriber for logging.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_interface_suggests_init() {
        let error = ConfigError::missing(field::INTERFACE, "Use --interface");

        assert_eq!(
            config_hint(&error),
            Some("Run 'ifmon init' to generate a configuration template.")
        );
    }

    #[test]
    fn missing_config_file_suggests_init() {
        let error = ConfigError::FileRead {
            path: "ifmon.toml".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };

        assert!(config_hint(&error).is_some());
    }

    #[test]
    fn invalid_value_has_no_hint() {
        let error = ConfigError::InvalidFamily {
            value: "ipx".to_string(),
        };

        assert_eq!(config_hint(&error), None);
    }
}
