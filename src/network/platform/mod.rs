//! Platform-specific address enumeration.
//!
//! # Platform Support
//!
//! - **Windows**: Uses `GetAdaptersAddresses` via the `windows` crate.
//! - **Linux / macOS**: No native backend yet; supply an [`AddressLister`]
//!   implementation of your own.
//!
//! [`AddressLister`]: crate::network::AddressLister

#[cfg(windows)]
mod windows;

#[cfg(windows)]
pub use windows::WindowsLister;

// Re-export platform-specific lister as PlatformLister for convenience
#[cfg(windows)]
pub use windows::WindowsLister as PlatformLister;
