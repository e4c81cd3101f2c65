//! Windows interface change subscription using `NotifyIpInterfaceChange`.

use crate::monitor::{ApiError, ChangeHandler, ChangeSubscriber, UnsubscribeError};
use crate::network::AddressFamily;
use std::panic::{AssertUnwindSafe, catch_unwind};
use windows::Win32::Foundation::{HANDLE, NO_ERROR, WIN32_ERROR};
use windows::Win32::NetworkManagement::IpHelper::{
    CancelMibChangeNotify2, MIB_IPINTERFACE_ROW, MIB_NOTIFICATION_TYPE, NotifyIpInterfaceChange,
};
use windows::Win32::Networking::WinSock::{ADDRESS_FAMILY, AF_INET, AF_INET6, AF_UNSPEC};

/// Windows implementation of [`ChangeSubscriber`] using `NotifyIpInterfaceChange`.
///
/// The handler runs directly on the Windows thread pool. Row and notification
/// type are ignored: any callback means "re-check the interface".
///
/// # Example
///
/// ```no_run
/// use ifmon::monitor::ChangeSubscriber;
/// use ifmon::monitor::platform::WindowsSubscriber;
/// use ifmon::network::AddressFamily;
/// use std::sync::Arc;
///
/// let subscriber = WindowsSubscriber::new();
/// let handle = subscriber
///     .subscribe(AddressFamily::Any, Arc::new(|| println!("interface changed")))
///     .expect("registration failed");
/// // ...
/// subscriber.unsubscribe(handle).expect("cancellation failed");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsSubscriber {
    _private: (),
}

impl WindowsSubscriber {
    /// Creates a new Windows subscriber.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

/// An active `NotifyIpInterfaceChange` registration.
///
/// Owns the callback context handed to Windows; the context is reclaimed
/// only after `CancelMibChangeNotify2` succeeds.
pub struct WindowsSubscription {
    handle: HANDLE,
    context_ptr: *mut CallbackContext,
}

impl std::fmt::Debug for WindowsSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowsSubscription")
            .field("handle", &self.handle.0)
            .finish_non_exhaustive()
    }
}

// SAFETY: CancelMibChangeNotify2 can be called from any thread, and the
// context is only touched by the callback (through a shared reference) and
// by the single owner reclaiming it after cancellation.
unsafe impl Send for WindowsSubscription {}

/// Context passed to the Windows callback.
struct CallbackContext {
    on_change: ChangeHandler,
}

impl ChangeSubscriber for WindowsSubscriber {
    type Handle = WindowsSubscription;

    fn subscribe(
        &self,
        family: AddressFamily,
        on_change: ChangeHandler,
    ) -> Result<Self::Handle, ApiError> {
        register_notification(native_family(family), on_change)
    }

    fn unsubscribe(&self, subscription: Self::Handle) -> Result<(), UnsubscribeError<Self::Handle>> {
        // SAFETY: The handle was returned by NotifyIpInterfaceChange and has not
        // been cancelled yet (ownership of the subscription guarantees that).
        let result = unsafe { CancelMibChangeNotify2(subscription.handle) };

        if result != NO_ERROR {
            let error = windows::core::Error::from(WIN32_ERROR(result.0)).into();
            return Err(UnsubscribeError::new(subscription, error));
        }

        // SAFETY: After CancelMibChangeNotify2 returns, Windows guarantees the
        // callback won't fire again, so the context can be reclaimed.
        drop(unsafe { Box::from_raw(subscription.context_ptr) });
        Ok(())
    }
}

/// Maps the monitored family to the native notification filter.
const fn native_family(family: AddressFamily) -> ADDRESS_FAMILY {
    match family {
        AddressFamily::V4 => AF_INET,
        AddressFamily::V6 => AF_INET6,
        AddressFamily::Any => AF_UNSPEC,
    }
}

/// Registers for IP interface change notifications.
///
/// # Safety
///
/// The callback context is leaked intentionally and reclaimed by
/// [`WindowsSubscriber::unsubscribe`] after cancellation.
///
/// # Coverage Note
///
/// Excluded from coverage: requires actual Windows API interaction.
#[cfg(not(tarpaulin_include))]
fn register_notification(
    family: ADDRESS_FAMILY,
    on_change: ChangeHandler,
) -> Result<WindowsSubscription, ApiError> {
    let context_ptr = Box::into_raw(Box::new(CallbackContext { on_change }));
    let void_ptr = context_ptr.cast::<std::ffi::c_void>();

    let mut handle = HANDLE::default();

    // SAFETY: We provide a valid callback and context. The callback will be
    // called from the Windows thread pool when IP interface changes occur.
    let result = unsafe {
        NotifyIpInterfaceChange(
            family,
            Some(ip_interface_change_callback),
            Some(void_ptr),
            false, // InitialNotification
            &raw mut handle,
        )
    };

    if result != NO_ERROR {
        // SAFETY: Registration failed, so Windows won't call the callback
        drop(unsafe { Box::from_raw(context_ptr) });
        return Err(windows::core::Error::from(WIN32_ERROR(result.0)).into());
    }

    Ok(WindowsSubscription {
        handle,
        context_ptr,
    })
}

/// Callback function for `NotifyIpInterfaceChange`.
///
/// # Safety
///
/// - `caller_context` must be a valid pointer to `CallbackContext`
/// - `row` may be null and is not used
///
/// # Coverage Note
///
/// Excluded from coverage: only called by Windows.
#[cfg(not(tarpaulin_include))]
unsafe extern "system" fn ip_interface_change_callback(
    caller_context: *const std::ffi::c_void,
    _row: *const MIB_IPINTERFACE_ROW,
    _notification_type: MIB_NOTIFICATION_TYPE,
) {
    if caller_context.is_null() {
        return;
    }

    // SAFETY: caller_context was set in register_notification and stays valid
    // until the registration is cancelled.
    let context = unsafe { &*(caller_context.cast::<CallbackContext>()) };

    // Unwinding into the Windows thread pool would abort the process.
    if catch_unwind(AssertUnwindSafe(|| (context.on_change)())).is_err() {
        tracing::error!("Interface change handler panicked");
    }
}
