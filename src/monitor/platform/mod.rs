//! Platform-specific interface change subscription.
//!
//! # Platform Support
//!
//! - **Windows**: Uses `NotifyIpInterfaceChange` via the `windows` crate.
//! - **Linux / macOS**: No native backend yet; supply a
//!   [`ChangeSubscriber`](crate::monitor::ChangeSubscriber) of your own.

#[cfg(windows)]
mod windows;


#[cfg(windows)]
pub use windows::{WindowsSubscriber, WindowsSubscription};

// Re-export platform-specific subscriber as PlatformSubscriber for convenience
#[cfg(windows)]
pub use windows::WindowsSubscriber as PlatformSubscriber;
