//! ifmon: network interface IP monitor
//!
//! A library for watching one named network interface and reporting when
//! its IP address is assigned, changed, or removed.
//!
//! - [`network`] resolves an interface's addresses and classifies link-local ones.
//! - [`monitor`] turns native change notifications into semantic events.
//! - [`config`] merges CLI arguments and a TOML file for the `ifmon` binary.

pub mod config;
pub mod monitor;
pub mod network;
