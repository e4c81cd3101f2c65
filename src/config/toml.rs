//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Monitoring configuration
    #[serde(default)]
    pub monitor: MonitorSection,

    /// Output configuration
    #[serde(default)]
    pub output: OutputSection,
}

/// Monitoring configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorSection {
    /// Friendly name of the interface to monitor
    pub interface: Option<String>,

    /// Address family: "ipv4", "ipv6", or "any"
    pub family: Option<String>,

    /// Delay between link-local re-checks in milliseconds
    pub retry_interval_ms: Option<u64>,

    /// Maximum number of retry timer firings per cycle
    pub max_retries: Option<u32>,
}

/// Output configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Print events as JSON lines
    #[serde(default)]
    pub json: bool,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# ifmon Configuration File

[monitor]
# Friendly name of the interface to monitor (required)
# interface = "Ethernet"

# Address family to monitor (required)
# Accepted values: "ipv4"/"v4"/"4", "ipv6"/"v6"/"6", or "any"/"both"/"all"
# family = "ipv4"

# Delay between link-local re-checks in milliseconds (default: 500)
# retry_interval_ms = 500

# Maximum number of retry timer firings per cycle, allowing at most N-1
# re-checks, so 0 or 1 disables retrying (default: 20)
# max_retries = 20

[output]
# Print events as JSON lines instead of text
# json = false
"#
    .to_string()
}
