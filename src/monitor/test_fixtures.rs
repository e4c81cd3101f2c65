//! Shared test fixtures for monitor tests.

use crate::monitor::{ApiError, ChangeHandler, ChangeSubscriber, EventType, UnsubscribeError};
use crate::network::{AddressFamily, AddressLister, AddressSet, ListError};
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Lister whose answer the test rewrites between notifications.
#[derive(Clone, Default)]
pub struct ScriptedLister {
    addresses: Arc<Mutex<Vec<IpAddr>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedLister {
    pub fn with(addresses: &[&str]) -> Self {
        let lister = Self::default();
        lister.set(addresses);
        lister
    }

    /// Replaces what the interface currently holds.
    pub fn set(&self, addresses: &[&str]) {
        *self.addresses.lock().unwrap() = addresses.iter().map(|s| s.parse().unwrap()).collect();
    }

    /// Number of enumeration queries so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AddressLister for ScriptedLister {
    fn list_addresses(&self, _interface: &str) -> Result<Vec<IpAddr>, ListError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.addresses.lock().unwrap().clone())
    }
}

#[derive(Debug)]
pub struct MockHandle(pub u32);

#[derive(Default)]
struct SubscriberState {
    handler: Mutex<Option<ChangeHandler>>,
    family: Mutex<Option<AddressFamily>>,
    subscribes: AtomicUsize,
    unsubscribe_attempts: AtomicUsize,
    fail_subscribe: AtomicBool,
    fail_unsubscribe: AtomicBool,
    next_handle: AtomicU32,
}

/// Subscriber that records registrations and lets tests fire notifications.
#[derive(Clone, Default)]
pub struct RecordingSubscriber {
    state: Arc<SubscriberState>,
}

impl RecordingSubscriber {
    /// Delivers a notification like the native layer would.
    ///
    /// Returns false if no registration is active.
    pub fn notify(&self) -> bool {
        let handler = self.handler();
        handler.map(|handler| handler()).is_some()
    }

    /// The currently registered handler, for delivering "late" notifications.
    pub fn handler(&self) -> Option<ChangeHandler> {
        self.state.handler.lock().unwrap().clone()
    }

    pub fn is_active(&self) -> bool {
        self.state.handler.lock().unwrap().is_some()
    }

    pub fn subscribed_family(&self) -> Option<AddressFamily> {
        *self.state.family.lock().unwrap()
    }

    pub fn subscribe_count(&self) -> usize {
        self.state.subscribes.load(Ordering::SeqCst)
    }

    pub fn unsubscribe_attempts(&self) -> usize {
        self.state.unsubscribe_attempts.load(Ordering::SeqCst)
    }

    pub fn fail_subscribe(&self, fail: bool) {
        self.state.fail_subscribe.store(fail, Ordering::SeqCst);
    }

    pub fn fail_unsubscribe(&self, fail: bool) {
        self.state.fail_unsubscribe.store(fail, Ordering::SeqCst);
    }
}

impl ChangeSubscriber for RecordingSubscriber {
    type Handle = MockHandle;

    fn subscribe(
        &self,
        family: AddressFamily,
        on_change: ChangeHandler,
    ) -> Result<Self::Handle, ApiError> {
        if self.state.fail_subscribe.load(Ordering::SeqCst) {
            return Err(ApiError::Platform {
                message: "registration refused".to_string(),
            });
        }

        self.state.subscribes.fetch_add(1, Ordering::SeqCst);
        *self.state.family.lock().unwrap() = Some(family);
        *self.state.handler.lock().unwrap() = Some(on_change);
        Ok(MockHandle(self.state.next_handle.fetch_add(1, Ordering::SeqCst)))
    }

    fn unsubscribe(&self, handle: Self::Handle) -> Result<(), UnsubscribeError<Self::Handle>> {
        self.state.unsubscribe_attempts.fetch_add(1, Ordering::SeqCst);

        if self.state.fail_unsubscribe.load(Ordering::SeqCst) {
            return Err(UnsubscribeError::new(
                handle,
                ApiError::Platform {
                    message: "cancellation refused".to_string(),
                },
            ));
        }

        self.state.handler.lock().unwrap().take();
        Ok(())
    }
}

pub type RecordedEvent = (Option<AddressSet>, EventType);

/// Records every callback invocation.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl EventLog {
    pub fn callback(&self) -> impl FnMut(Option<&AddressSet>, EventType) + Send + 'static {
        let events = Arc::clone(&self.events);
        move |address, event| events.lock().unwrap().push((address.copied(), event))
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn types(&self) -> Vec<EventType> {
        self.events().into_iter().map(|(_, event)| event).collect()
    }
}

/// Parses an IPv4-only address set.
pub fn set_v4(address: &str) -> AddressSet {
    AddressSet::from_v4(address.parse().unwrap())
}

/// Parses a dual-stack address set.
pub fn set_dual(v4: &str, v6: &str) -> AddressSet {
    AddressSet::new(Some(v4.parse().unwrap()), Some(v6.parse().unwrap())).unwrap()
}
