//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::network::AddressFamily;

use super::defaults;

/// ifmon: network interface IP monitor
///
/// Watches one network interface and reports when its IP address is
/// assigned, changed, or removed.
#[derive(Debug, Parser)]
#[command(name = "ifmon")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Friendly name of the interface to monitor (required)
    #[arg(long, short, global = true)]
    pub interface: Option<String>,

    /// Address family to monitor (required)
    #[arg(long, value_enum, global = true)]
    pub family: Option<FamilyArg>,

    /// Delay between link-local re-checks in milliseconds
    #[arg(long = "retry-interval", value_name = "MS")]
    pub retry_interval: Option<u64>,

    /// Maximum number of retry timer firings per cycle (at most N-1 re-checks)
    #[arg(long = "max-retries", value_name = "N")]
    pub max_retries: Option<u32>,

    /// Print events as JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for ifmon
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::CONFIG_FILE)]
        output: PathBuf,
    },
    /// Resolve the interface once, print its addresses, and exit
    Show,
}

/// Address family argument for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FamilyArg {
    /// Monitor IPv4 addresses only
    #[value(name = "ipv4")]
    V4,
    /// Monitor IPv6 addresses only
    #[value(name = "ipv6")]
    V6,
    /// Monitor both IPv4 and IPv6 addresses
    #[value(name = "any")]
    Any,
}

impl From<FamilyArg> for AddressFamily {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::V4 => Self::V4,
            FamilyArg::V6 => Self::V6,
            FamilyArg::Any => Self::Any,
        }
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the show command.
    #[must_use]
    pub const fn is_show(&self) -> bool {
        matches!(self.command, Some(Command::Show))
    }
}
