//! Address enumeration trait and error types.

use std::net::IpAddr;

use thiserror::Error;

/// Error type for address enumeration.
///
/// Describes what went wrong without dictating recovery strategy.
/// The resolver treats every variant as "no addresses right now".
#[derive(Debug, Error)]
pub enum ListError {
    /// Windows API call failed.
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApi(#[from] windows::core::Error),

    /// Platform-specific error with a generic message.
    #[error("Platform error: {message}")]
    Platform {
        /// Error message describing the platform-specific failure.
        message: String,
    },
}

/// Trait for listing the addresses bound to a named interface.
///
/// # Design
///
/// - The host enumeration API is an external collaborator behind this trait
/// - Enables dependency injection for testing with scripted implementations
/// - Platform-specific implementations provided in [`super::platform`]
///
/// # Example
///
/// ```
/// use ifmon::network::{AddressLister, ListError};
/// use std::net::IpAddr;
///
/// struct Fixed(Vec<IpAddr>);
///
/// impl AddressLister for Fixed {
///     fn list_addresses(&self, interface: &str) -> Result<Vec<IpAddr>, ListError> {
///         Ok(if interface == "eth0" { self.0.clone() } else { vec![] })
///     }
/// }
///
/// let lister = Fixed(vec!["192.168.1.10".parse().unwrap()]);
/// assert_eq!(lister.list_addresses("eth0").unwrap().len(), 1);
/// assert!(lister.list_addresses("missing").unwrap().is_empty());
/// ```
pub trait AddressLister: Send + Sync {
    /// Returns every unicast address currently bound to `interface`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError`] when the platform query itself fails.
    ///
    /// # Implementation Notes
    ///
    /// - Unknown interface names are not an error; return an empty vector
    /// - Address order should be stable across calls
    /// - Must be callable at any time, from any thread
    fn list_addresses(&self, interface: &str) -> Result<Vec<IpAddr>, ListError>;
}

impl<T: AddressLister + ?Sized> AddressLister for std::sync::Arc<T> {
    fn list_addresses(&self, interface: &str) -> Result<Vec<IpAddr>, ListError> {
        (**self).list_addresses(interface)
    }
}
