//! Error types for the monitor layer.

use std::fmt;

use thiserror::Error;

/// Error type for the native change subscription.
#[derive(Debug, Error)]
pub enum ApiError {
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

/// A failed cancellation, handing the subscription handle back to the caller.
///
/// The handle stays valid and the cancellation can be retried with it.
#[derive(Debug, Error)]
#[error("Failed to cancel interface change subscription: {source}")]
pub struct UnsubscribeError<H: fmt::Debug> {
    /// The subscription that is still active.
    pub handle: H,
    /// Why cancellation failed.
    #[source]
    pub source: ApiError,
}

impl<H: fmt::Debug> UnsubscribeError<H> {
    /// Creates an error returning `handle` to the caller.
    #[must_use]
    pub const fn new(handle: H, source: ApiError) -> Self {
        Self { handle, source }
    }
}
