//! Default values for configuration options.
//!
//! Mirrors the monitor's built-in retry policy so the CLI, the config
//! template, and the library agree.

use crate::monitor::RetryPolicy;

/// Default delay between link-local re-checks, in milliseconds.
pub const RETRY_INTERVAL_MS: u64 = 500;

/// Default number of retry timer firings before giving up.
pub const MAX_RETRIES: u32 = RetryPolicy::DEFAULT_MAX_RETRIES;

/// Default configuration file written by `ifmon init`.
pub const CONFIG_FILE: &str = "ifmon.toml";
