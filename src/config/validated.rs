//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::monitor::RetryPolicy;
use crate::network::AddressFamily;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Friendly name of the monitored interface (required)
    pub interface: String,

    /// Address family to monitor (required)
    pub family: AddressFamily,

    /// Link-local retry policy
    pub retry_policy: RetryPolicy,

    /// Print events as JSON lines
    pub json: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ interface: {}, family: {}, retry: {}x/{}ms, output: {} }}",
            self.interface,
            self.family,
            self.retry_policy.max_retries(),
            self.retry_policy.interval().as_millis(),
            if self.json { "json" } else { "text" },
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required fields are missing (`interface`, `family`)
    /// - The interface name is blank
    /// - The family is not recognized
    /// - The retry interval is zero
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let interface = Self::resolve_interface(cli, toml)?;
        let family = Self::resolve_family(cli, toml)?;
        let retry_policy = Self::build_retry_policy(cli, toml)?;

        // Flags only enable
        let json = cli.json || toml.is_some_and(|t| t.output.json);

        Ok(Self {
            interface,
            family,
            retry_policy,
            json,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_interface(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        let name = cli
            .interface
            .as_deref()
            .or_else(|| toml.and_then(|t| t.monitor.interface.as_deref()))
            .ok_or_else(|| {
                ConfigError::missing(
                    field::INTERFACE,
                    "Use --interface or set monitor.interface in config file",
                )
            })?;

        if name.trim().is_empty() {
            return Err(ConfigError::BlankInterface);
        }

        Ok(name.to_string())
    }

    fn resolve_family(cli: &Cli, toml: Option<&TomlConfig>) -> Result<AddressFamily, ConfigError> {
        // CLI takes precedence
        if let Some(family) = cli.family {
            return Ok(family.into());
        }

        if let Some(family_str) = toml.and_then(|t| t.monitor.family.as_deref()) {
            return parse_family(family_str);
        }

        Err(ConfigError::missing(
            field::FAMILY,
            "Use --family or set monitor.family in config file",
        ))
    }

    fn build_retry_policy(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<RetryPolicy, ConfigError> {
        let monitor = toml.map(|t| &t.monitor);

        // Priority: CLI explicit > TOML > default
        let interval_ms = cli
            .retry_interval
            .or_else(|| monitor.and_then(|m| m.retry_interval_ms))
            .unwrap_or(defaults::RETRY_INTERVAL_MS);

        let max_retries = cli
            .max_retries
            .or_else(|| monitor.and_then(|m| m.max_retries))
            .unwrap_or(defaults::MAX_RETRIES);

        if interval_ms == 0 {
            return Err(ConfigError::InvalidRetryInterval {
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(RetryPolicy::new(
            Duration::from_millis(interval_ms),
            max_retries,
        ))
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parse_family(s: &str) -> Result<AddressFamily, ConfigError> {
    match s.to_lowercase().as_str() {
        "ipv4" | "v4" | "4" => Ok(AddressFamily::V4),
        "ipv6" | "v6" | "6" => Ok(AddressFamily::V6),
        "any" | "both" | "all" => Ok(AddressFamily::Any),
        _ => Err(ConfigError::InvalidFamily {
            value: s.to_string(),
        }),
    }
}
