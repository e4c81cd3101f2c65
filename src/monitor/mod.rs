//! Monitor layer for watching a single interface.
//!
//! This module provides types and functions for:
//! - Event classification ([`EventType`], [`classify`])
//! - The link-local retry policy ([`RetryPolicy`])
//! - Native change subscriptions ([`ChangeSubscriber`], [`platform`])
//! - Error handling ([`ApiError`], [`UnsubscribeError`])
//! - The monitor itself ([`InterfaceMonitor`], [`MonitorGuard`])

mod error;
mod event;
mod interface;
pub mod platform;
mod retry;
mod subscriber;

#[cfg(test)]
mod test_fixtures;

pub use error::{ApiError, UnsubscribeError};
pub use event::{EventCallback, EventType, classify};
pub use interface::{InterfaceMonitor, MonitorGuard};
pub use retry::RetryPolicy;
pub use subscriber::{ChangeHandler, ChangeSubscriber};
