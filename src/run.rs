//! Application execution logic.
//!
//! This module contains the monitoring session: build the monitor, print
//! every event, and keep it running until a shutdown signal arrives.

// Only the Windows backend drives the session outside of tests.
#![cfg_attr(not(windows), allow(dead_code))]

use std::future::Future;

use thiserror::Error;

use ifmon::config::ValidatedConfig;
use ifmon::monitor::{ChangeSubscriber, EventType, InterfaceMonitor};
use ifmon::network::{AddressLister, AddressSet, resolve};

#[cfg(windows)]
use ifmon::network::platform::PlatformLister;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// No native monitoring backend exists for this platform.
    #[error("No native interface monitoring backend is available on this platform")]
    Unsupported,

    /// The monitor could not subscribe to change notifications.
    #[error("Failed to start monitoring interface '{interface}'")]
    Start {
        /// The monitored interface
        interface: String,
    },

    /// The monitor could not cancel its subscription on shutdown.
    #[error("Failed to stop monitoring interface '{interface}'")]
    Stop {
        /// The monitored interface
        interface: String,
    },

    /// Installing the shutdown signal handler failed.
    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(#[source] std::io::Error),
}

/// How events are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `event=<name> address=<addresses>`
    Text,
    /// One JSON object per line.
    Json,
}

impl From<&ValidatedConfig> for OutputFormat {
    fn from(config: &ValidatedConfig) -> Self {
        if config.json { Self::Json } else { Self::Text }
    }
}

/// Executes the monitoring session with the native platform backend.
///
/// # Errors
///
/// Returns an error if the monitor fails to start or stop, or if the
/// shutdown signal cannot be installed.
///
/// # Coverage Note
///
/// Excluded from coverage: requires Windows APIs and signal handling.
#[cfg(not(tarpaulin_include))]
#[cfg(windows)]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let format = OutputFormat::from(&config);
    let interface = config.interface.clone();

    let mut monitor = InterfaceMonitor::platform(config.interface, config.family)
        .with_retry_policy(config.retry_policy)
        .with_callback(move |address, event| {
            println!("{}", format_event(format, &interface, address, event));
        });

    run_session(&mut monitor, shutdown_signal()).await
}

/// Non-Windows stub: there is no native backend to run.
#[cfg(not(windows))]
#[allow(clippy::unused_async)] // Matches the Windows signature
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    tracing::error!(interface = %config.interface, "Interface monitoring is only supported on Windows");
    Err(RunError::Unsupported)
}

/// Resolves the configured interface once and prints its addresses.
///
/// # Errors
///
/// Returns [`RunError::Unsupported`] on platforms without a native backend.
#[cfg(windows)]
pub fn show(config: &ValidatedConfig) -> Result<(), RunError> {
    println!("{}", describe(&PlatformLister::new(), config));
    Ok(())
}

/// Non-Windows stub: there is no native backend to query.
#[cfg(not(windows))]
pub fn show(config: &ValidatedConfig) -> Result<(), RunError> {
    tracing::error!(interface = %config.interface, "Interface lookup is only supported on Windows");
    Err(RunError::Unsupported)
}

/// Runs a started monitor until `shutdown` completes, then stops it.
///
/// The monitor is stopped even when the shutdown future reports an error.
pub async fn run_session<L, S, F>(
    monitor: &mut InterfaceMonitor<L, S>,
    shutdown: F,
) -> Result<(), RunError>
where
    L: AddressLister + 'static,
    S: ChangeSubscriber,
    F: Future<Output = std::io::Result<()>>,
{
    if !monitor.start() {
        return Err(RunError::Start {
            interface: monitor.interface().to_string(),
        });
    }

    tracing::info!(
        interface = %monitor.interface(),
        "Monitoring, press Ctrl+C to stop"
    );

    let signal_result = shutdown.await;
    match &signal_result {
        Ok(()) => tracing::info!("Shutdown signal received, stopping..."),
        Err(e) => tracing::error!("Shutdown signal handler failed: {e}"),
    }

    if !monitor.stop() {
        return Err(RunError::Stop {
            interface: monitor.interface().to_string(),
        });
    }

    signal_result.map_err(RunError::Signal)
}

/// Resolves `config.interface` (link-local included) and formats it as an
/// initial event.
fn describe<L: AddressLister>(lister: &L, config: &ValidatedConfig) -> String {
    let resolution = resolve(lister, &config.interface, config.family, true);
    format_event(
        OutputFormat::from(config),
        &config.interface,
        resolution.address.as_ref(),
        EventType::Initial,
    )
}

/// Formats one event as a single output line.
fn format_event(
    format: OutputFormat,
    interface: &str,
    address: Option<&AddressSet>,
    event: EventType,
) -> String {
    match format {
        OutputFormat::Text => match address {
            Some(address) => format!("event={event} address={address}"),
            None => format!("event={event} address=none"),
        },
        OutputFormat::Json => serde_json::json!({
            "event": event.label(),
            "code": event.as_u8(),
            "interface": interface,
            "address": address,
        })
        .to_string(),
    }
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
#[cfg(windows)]
async fn shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
