//! Native interface-change subscription trait.
//!
//! This module provides the [`ChangeSubscriber`] trait that abstracts the
//! platform mechanism delivering "something changed on an interface" signals.

use std::fmt;
use std::sync::Arc;

use super::{ApiError, UnsubscribeError};
use crate::network::AddressFamily;

/// Handler invoked by the native layer whenever an interface change might
/// have happened.
///
/// May be called from any thread, any number of times, in any order.
pub type ChangeHandler = Arc<dyn Fn() + Send + Sync + 'static>;

/// Trait for platform interface-change notification APIs.
///
/// Implementations wrap APIs like Windows `NotifyIpInterfaceChange`. The
/// signal carries no trusted payload: a call to the handler only means
/// "re-check", so handlers re-resolve the interface from scratch.
///
/// # Handle Ownership
///
/// [`subscribe`](Self::subscribe) returns an opaque handle that owns the
/// native registration. [`unsubscribe`](Self::unsubscribe) consumes it on
/// success and hands it back inside [`UnsubscribeError`] on failure, so a
/// registration can never be silently dropped.
///
/// # Example
///
/// ```
/// use ifmon::monitor::{ApiError, ChangeHandler, ChangeSubscriber, UnsubscribeError};
/// use ifmon::network::AddressFamily;
/// use std::sync::Mutex;
///
/// #[derive(Default)]
/// struct Manual {
///     handler: Mutex<Option<ChangeHandler>>,
/// }
///
/// impl ChangeSubscriber for Manual {
///     type Handle = ();
///
///     fn subscribe(&self, _: AddressFamily, on_change: ChangeHandler) -> Result<(), ApiError> {
///         *self.handler.lock().unwrap() = Some(on_change);
///         Ok(())
///     }
///
///     fn unsubscribe(&self, _: ()) -> Result<(), UnsubscribeError<()>> {
///         self.handler.lock().unwrap().take();
///         Ok(())
///     }
/// }
/// ```
pub trait ChangeSubscriber: Send + Sync {
    /// Opaque token for an active registration.
    type Handle: fmt::Debug + Send;

    /// Registers `on_change` for changes affecting `family`.
    ///
    /// [`AddressFamily::Any`] maps to the platform's "any family" option.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the native registration fails.
    fn subscribe(&self, family: AddressFamily, on_change: ChangeHandler)
    -> Result<Self::Handle, ApiError>;

    /// Cancels a registration created by [`subscribe`](Self::subscribe).
    ///
    /// After `Ok(())` the handler is never invoked again.
    ///
    /// # Errors
    ///
    /// Returns [`UnsubscribeError`] carrying the still-valid handle when
    /// cancellation fails.
    fn unsubscribe(&self, handle: Self::Handle) -> Result<(), UnsubscribeError<Self::Handle>>;
}
