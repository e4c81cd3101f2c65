//! Interface monitor: lifecycle, change detection, and the link-local retry timer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle as RuntimeHandle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::event::{EventCallback, EventType, classify};
use super::{ChangeHandler, ChangeSubscriber, RetryPolicy};
use crate::network::{AddressFamily, AddressLister, AddressSet, Resolution, resolve};

#[cfg(windows)]
use super::platform::PlatformSubscriber;
#[cfg(windows)]
use crate::network::platform::PlatformLister;

/// Watches one named interface and reports address events through a callback.
///
/// # Lifecycle
///
/// A monitor starts inert. [`start`](Self::start) resolves the interface
/// (link-local addresses included), fires [`EventType::Initial`], and
/// subscribes to native change notifications. [`stop`](Self::stop) clears
/// the callback, cancels any pending retry, and cancels the subscription.
/// Both are idempotent and the monitor can be restarted after stopping.
///
/// Prefer [`start_scoped`](Self::start_scoped), which stops on every exit
/// path. Dropping a running monitor logs a warning and stops it as a last
/// resort.
///
/// # Classification
///
/// Each notification re-resolves the interface without link-local addresses
/// and compares the result against the last known [`AddressSet`]; see
/// [`classify`](super::classify). When only a link-local address is present
/// and nothing was known before, no event fires; instead a one-shot retry
/// timer re-checks the interface per the [`RetryPolicy`], since the
/// notification for the routable address that usually follows is not
/// reliably delivered.
///
/// # Threading
///
/// Notifications arrive on platform threads and retry timers run on the
/// tokio runtime that was current when `start()` was called. Detection is
/// serialized by a per-monitor lock, so callback invocations never overlap.
/// Without a tokio runtime the monitor still works, but link-local retries
/// are skipped.
///
/// # Example
///
/// ```ignore
/// use ifmon::monitor::InterfaceMonitor;
/// use ifmon::network::AddressFamily;
///
/// let mut monitor = InterfaceMonitor::platform("Ethernet", AddressFamily::V4)
///     .with_callback(|address, event| println!("{event}: {address:?}"));
///
/// if let Some(_running) = monitor.start_scoped() {
///     // ... events are delivered until `_running` goes out of scope
/// }
/// ```
pub struct InterfaceMonitor<L, S>
where
    L: AddressLister + 'static,
    S: ChangeSubscriber,
{
    shared: Arc<Shared<L>>,
    subscriber: S,
    /// Present exactly while a native subscription is active.
    handle: Option<S::Handle>,
}

/// State reachable from native notification threads and timer tasks.
struct Shared<L> {
    interface: String,
    family: AddressFamily,
    lister: L,
    /// Lock order: `state` before `callback`.
    state: Mutex<MonitorState>,
    callback: Mutex<Option<EventCallback>>,
}

#[derive(Default)]
struct MonitorState {
    current: Option<AddressSet>,
    policy: RetryPolicy,
    retry: RetryTimer,
    runtime: Option<RuntimeHandle>,
}

#[derive(Default)]
struct RetryTimer {
    pending: Option<PendingRetry>,
    attempts: u32,
    next_id: u64,
}

struct PendingRetry {
    id: u64,
    task: JoinHandle<()>,
}

impl RetryTimer {
    const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn is_current(&self, id: u64) -> bool {
        self.pending.as_ref().is_some_and(|pending| pending.id == id)
    }

    fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
        }
        self.attempts = 0;
    }
}

impl<L, S> InterfaceMonitor<L, S>
where
    L: AddressLister + 'static,
    S: ChangeSubscriber,
{
    /// Creates an inert monitor for `interface` without a callback.
    #[must_use]
    pub fn new(interface: impl Into<String>, family: AddressFamily, lister: L, subscriber: S) -> Self {
        Self {
            shared: Arc::new(Shared {
                interface: interface.into(),
                family,
                lister,
                state: Mutex::new(MonitorState::default()),
                callback: Mutex::new(None),
            }),
            subscriber,
            handle: None,
        }
    }

    /// Registers the client callback.
    #[must_use]
    pub fn with_callback<F>(self, callback: F) -> Self
    where
        F: FnMut(Option<&AddressSet>, EventType) + Send + 'static,
    {
        self.set_callback(callback);
        self
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry_policy(self, policy: RetryPolicy) -> Self {
        self.shared.lock_state().policy = policy;
        self
    }

    /// Registers or replaces the client callback.
    ///
    /// [`stop`](Self::stop) clears the callback; call this again before
    /// restarting if events are still wanted.
    pub fn set_callback<F>(&self, callback: F)
    where
        F: FnMut(Option<&AddressSet>, EventType) + Send + 'static,
    {
        *self.shared.lock_callback() = Some(Box::new(callback));
    }

    /// Sets the delay between link-local re-checks; applies to the next armed timer.
    pub fn set_retry_interval(&self, interval: Duration) {
        let mut state = self.shared.lock_state();
        state.policy = state.policy.with_interval(interval);
    }

    /// Sets the retry budget; applies from the next timer firing.
    pub fn set_max_retries(&self, max_retries: u32) {
        let mut state = self.shared.lock_state();
        state.policy = state.policy.with_max_retries(max_retries);
    }

    /// Returns the current retry policy.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        self.shared.lock_state().policy
    }

    /// Returns the monitored interface name.
    #[must_use]
    pub fn interface(&self) -> &str {
        &self.shared.interface
    }

    /// Returns the monitored address family.
    #[must_use]
    pub fn family(&self) -> AddressFamily {
        self.shared.family
    }

    /// Returns true while a native subscription is active.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Returns the last known address set.
    #[must_use]
    pub fn current_address(&self) -> Option<AddressSet> {
        self.shared.lock_state().current
    }

    /// Starts monitoring.
    ///
    /// Fires [`EventType::Initial`] synchronously before subscribing. Returns
    /// `true` if the monitor is running afterwards, including when it already
    /// was. On `false` the initial state is kept but no subscription exists;
    /// calling `start()` again retries.
    pub fn start(&mut self) -> bool {
        if self.handle.is_some() {
            debug!(interface = %self.shared.interface, "Monitor already running");
            return true;
        }

        self.shared.initialize();

        let weak = Arc::downgrade(&self.shared);
        let on_change: ChangeHandler = Arc::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.on_native_notification();
            }
        });

        match self.subscriber.subscribe(self.shared.family, on_change) {
            Ok(handle) => {
                info!(
                    interface = %self.shared.interface,
                    family = %self.shared.family,
                    "Interface monitor started"
                );
                self.handle = Some(handle);
                true
            }
            Err(e) => {
                warn!(
                    interface = %self.shared.interface,
                    "Failed to subscribe to interface changes: {e}"
                );
                false
            }
        }
    }

    /// Stops monitoring.
    ///
    /// The callback is cleared first, so no invocation happens after this
    /// returns, even from a notification or timer already in flight. Returns
    /// `true` once no subscription is active. On `false` the subscription is
    /// kept and `stop()` can be retried.
    pub fn stop(&mut self) -> bool {
        self.shared.lock_callback().take();
        self.shared.lock_state().retry.cancel();

        let Some(handle) = self.handle.take() else {
            return true;
        };

        match self.subscriber.unsubscribe(handle) {
            Ok(()) => {
                info!(interface = %self.shared.interface, "Interface monitor stopped");
                true
            }
            Err(e) => {
                warn!(
                    interface = %self.shared.interface,
                    "Failed to cancel interface change subscription: {}",
                    e.source
                );
                self.handle = Some(e.handle);
                false
            }
        }
    }

    /// Starts monitoring and returns a guard that stops it when dropped.
    ///
    /// Returns `None` if [`start`](Self::start) failed. If the monitor was
    /// already running, the guard still stops it on drop.
    pub fn start_scoped(&mut self) -> Option<MonitorGuard<'_, L, S>> {
        if self.start() {
            Some(MonitorGuard { monitor: self })
        } else {
            None
        }
    }

    #[cfg(test)]
    pub(crate) fn retry_pending(&self) -> bool {
        self.shared.lock_state().retry.is_pending()
    }

    #[cfg(test)]
    pub(crate) fn retry_attempts(&self) -> u32 {
        self.shared.lock_state().retry.attempts
    }
}

#[cfg(windows)]
impl InterfaceMonitor<PlatformLister, PlatformSubscriber> {
    /// Creates an inert monitor backed by the native platform APIs.
    #[must_use]
    pub fn platform(interface: impl Into<String>, family: AddressFamily) -> Self {
        Self::new(
            interface,
            family,
            PlatformLister::new(),
            PlatformSubscriber::new(),
        )
    }
}

impl<L, S> std::fmt::Debug for InterfaceMonitor<L, S>
where
    L: AddressLister + 'static,
    S: ChangeSubscriber,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterfaceMonitor")
            .field("interface", &self.shared.interface)
            .field("family", &self.shared.family)
            .field("running", &self.handle.is_some())
            .finish_non_exhaustive()
    }
}

impl<L, S> Drop for InterfaceMonitor<L, S>
where
    L: AddressLister + 'static,
    S: ChangeSubscriber,
{
    fn drop(&mut self) {
        if self.handle.is_none() {
            return;
        }

        warn!(
            interface = %self.shared.interface,
            "Interface monitor dropped while running; call stop() before dropping it"
        );
        if !self.stop() {
            error!(
                interface = %self.shared.interface,
                "Could not cancel the subscription of a dropped monitor"
            );
        }
    }
}

/// Keeps an [`InterfaceMonitor`] running until dropped.
///
/// Returned by [`InterfaceMonitor::start_scoped`].
#[must_use = "the monitor stops as soon as the guard is dropped"]
pub struct MonitorGuard<'a, L, S>
where
    L: AddressLister + 'static,
    S: ChangeSubscriber,
{
    monitor: &'a mut InterfaceMonitor<L, S>,
}

impl<L, S> MonitorGuard<'_, L, S>
where
    L: AddressLister + 'static,
    S: ChangeSubscriber,
{
    /// Returns the running monitor.
    #[must_use]
    pub const fn monitor(&self) -> &InterfaceMonitor<L, S> {
        self.monitor
    }
}

impl<L, S> Drop for MonitorGuard<'_, L, S>
where
    L: AddressLister + 'static,
    S: ChangeSubscriber,
{
    fn drop(&mut self) {
        if !self.monitor.stop() {
            warn!(
                interface = %self.monitor.interface(),
                "Monitor guard could not stop the monitor; it is still running"
            );
        }
    }
}

impl<L: AddressLister + 'static> Shared<L> {
    fn lock_state(&self) -> MutexGuard<'_, MonitorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_callback(&self) -> MutexGuard<'_, Option<EventCallback>> {
        self.callback.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, address: Option<&AddressSet>, event: EventType) {
        if let Some(callback) = self.lock_callback().as_mut() {
            callback(address, event);
        }
    }

    /// Records the link-local inclusive state and fires [`EventType::Initial`].
    fn initialize(&self) {
        let mut state = self.lock_state();
        state.runtime = RuntimeHandle::try_current().ok();
        state.retry.cancel();

        let resolution = resolve(&self.lister, &self.interface, self.family, true);
        state.current = resolution.address;

        debug!(
            interface = %self.interface,
            address = ?state.current,
            "Initial interface state resolved"
        );
        self.emit(state.current.as_ref(), EventType::Initial);
    }

    /// The native signal carries no trusted payload; always re-resolve.
    fn on_native_notification(self: &Arc<Self>) {
        debug!(interface = %self.interface, "Interface change notification received");
        let mut state = self.lock_state();
        self.detect_change(&mut state);
    }

    fn detect_change(self: &Arc<Self>, state: &mut MonitorState) {
        let Resolution {
            address,
            link_local,
        } = resolve(&self.lister, &self.interface, self.family, false);

        let event = classify(state.current.as_ref(), address.as_ref());

        if address.is_some() {
            if state.retry.is_pending() {
                debug!(interface = %self.interface, "Routable address found, retry timer cancelled");
            }
            state.retry.cancel();
        } else if event.is_none()
            && link_local.any_in(self.family)
            && !state.retry.is_pending()
            && self.lock_callback().is_some()
        {
            // A stopped monitor has no callback; a late notification must not arm.
            self.arm_retry_timer(state);
        }

        state.current = address;

        if let Some(event) = event {
            info!(
                interface = %self.interface,
                %event,
                address = ?state.current,
                "Interface address event"
            );
            self.emit(state.current.as_ref(), event);
        }
    }

    fn arm_retry_timer(self: &Arc<Self>, state: &mut MonitorState) {
        let Some(runtime) = state.runtime.clone() else {
            warn!(
                interface = %self.interface,
                "Only a link-local address is present but no tokio runtime is available to retry"
            );
            return;
        };

        state.retry.next_id = state.retry.next_id.wrapping_add(1);
        let id = state.retry.next_id;
        let delay = state.policy.interval();
        let weak = Arc::downgrade(self);

        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(shared) = weak.upgrade() {
                shared.on_retry_timer(id);
            }
        });

        debug!(
            interface = %self.interface,
            attempt = state.retry.attempts + 1,
            ?delay,
            "Only a link-local address present, retry timer armed"
        );
        state.retry.pending = Some(PendingRetry { id, task });
    }

    fn on_retry_timer(self: &Arc<Self>, id: u64) {
        let mut state = self.lock_state();

        // Cancelled or superseded after this task already woke up.
        if !state.retry.is_current(id) {
            return;
        }
        state.retry.pending = None;
        state.retry.attempts += 1;

        if state.retry.attempts >= state.policy.max_retries() {
            debug!(
                interface = %self.interface,
                attempts = state.retry.attempts,
                "Retry budget exhausted, waiting for the next notification"
            );
            state.retry.attempts = 0;
            return;
        }

        if self.lock_callback().is_none() {
            state.retry.attempts = 0;
            return;
        }

        self.detect_change(&mut state);
        if !state.retry.is_pending() {
            state.retry.attempts = 0;
        }
    }
}

#[cfg(test)]
#[path = "interface_tests.rs"]
mod tests;
