//! Semantic interface events reported to clients.

use std::fmt;

use serde::Serialize;

use crate::network::{AddressSet, IpFamily};

/// The kind of event reported through the monitor callback.
///
/// The numeric values are stable and part of the public contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum EventType {
    /// Fired once by `start()` with the current (link-local inclusive) state.
    Initial = 0,
    /// The address of at least one family changed.
    IpChanged = 1,
    /// The interface went from no address to having one.
    IpAssigned = 2,
    /// The interface went from having an address to none.
    IpRemoved = 3,
}

impl EventType {
    /// Returns the stable numeric code of this event.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns a short lowercase label for logs and text output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::IpChanged => "ip-changed",
            Self::IpAssigned => "ip-assigned",
            Self::IpRemoved => "ip-removed",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<u8> for EventType {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Initial),
            1 => Ok(Self::IpChanged),
            2 => Ok(Self::IpAssigned),
            3 => Ok(Self::IpRemoved),
            other => Err(other),
        }
    }
}

/// Client callback invoked with the current address and the event type.
///
/// Invoked synchronously from `start()`, from native notification threads,
/// and from the retry timer task; invocations never overlap for one monitor.
/// The callback must not call back into the monitor that invoked it.
pub type EventCallback = Box<dyn FnMut(Option<&AddressSet>, EventType) + Send + 'static>;

/// Classifies the transition from `previous` to `current`.
///
/// | previous | current | event |
/// |----------|---------|-------|
/// | `None` | `None` | none |
/// | `None` | `Some` | [`EventType::IpAssigned`] |
/// | `Some` | `None` | [`EventType::IpRemoved`] |
/// | `Some` | `Some`, any family differs | [`EventType::IpChanged`] |
/// | `Some` | `Some`, identical | none |
///
/// Only whole-set presence drives [`EventType::IpAssigned`] and
/// [`EventType::IpRemoved`]. Losing one family while another still holds an
/// address is reported as [`EventType::IpChanged`], never as a removal.
#[must_use]
pub fn classify(previous: Option<&AddressSet>, current: Option<&AddressSet>) -> Option<EventType> {
    match (previous, current) {
        (None, None) => None,
        (None, Some(_)) => Some(EventType::IpAssigned),
        (Some(_), None) => Some(EventType::IpRemoved),
        (Some(previous), Some(current)) => [IpFamily::V4, IpFamily::V6]
            .into_iter()
            .any(|family| previous.get(family) != current.get(family))
            .then_some(EventType::IpChanged),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn v4(s: &str) -> AddressSet {
        AddressSet::from_v4(s.parse().unwrap())
    }

    fn dual(v4: &str, v6: &str) -> AddressSet {
        AddressSet::new(
            Some(v4.parse::<Ipv4Addr>().unwrap()),
            Some(v6.parse::<Ipv6Addr>().unwrap()),
        )
        .unwrap()
    }

    mod event_type {
        use super::*;

        #[test]
        fn numeric_codes_are_stable() {
            assert_eq!(EventType::Initial.as_u8(), 0);
            assert_eq!(EventType::IpChanged.as_u8(), 1);
            assert_eq!(EventType::IpAssigned.as_u8(), 2);
            assert_eq!(EventType::IpRemoved.as_u8(), 3);
        }

        #[test]
        fn try_from_accepts_known_codes() {
            for event in [
                EventType::Initial,
                EventType::IpChanged,
                EventType::IpAssigned,
                EventType::IpRemoved,
            ] {
                assert_eq!(EventType::try_from(event.as_u8()), Ok(event));
            }
        }

        #[test]
        fn try_from_rejects_unknown_code() {
            assert_eq!(EventType::try_from(4), Err(4));
        }

        #[test]
        fn display_uses_label() {
            assert_eq!(EventType::IpAssigned.to_string(), "ip-assigned");
            assert_eq!(EventType::Initial.to_string(), "initial");
        }
    }

    mod classify_fn {
        use super::*;

        #[test]
        fn none_to_none_is_silent() {
            assert_eq!(classify(None, None), None);
        }

        #[test]
        fn none_to_some_is_assigned() {
            assert_eq!(
                classify(None, Some(&v4("192.168.0.10"))),
                Some(EventType::IpAssigned)
            );
        }

        #[test]
        fn some_to_none_is_removed() {
            assert_eq!(
                classify(Some(&v4("192.168.0.10")), None),
                Some(EventType::IpRemoved)
            );
        }

        #[test]
        fn differing_family_is_changed() {
            assert_eq!(
                classify(Some(&v4("10.0.0.1")), Some(&v4("10.0.0.2"))),
                Some(EventType::IpChanged)
            );
        }

        #[test]
        fn identical_sets_are_silent() {
            assert_eq!(classify(Some(&v4("10.0.0.1")), Some(&v4("10.0.0.1"))), None);
        }

        #[test]
        fn one_family_changing_in_dual_set_is_changed() {
            let previous = dual("10.0.0.1", "2001:db8::1");
            let current = dual("10.0.0.2", "2001:db8::1");

            assert_eq!(
                classify(Some(&previous), Some(&current)),
                Some(EventType::IpChanged)
            );
        }

        #[test]
        fn family_gained_alongside_existing_is_changed() {
            let previous = v4("10.0.0.1");
            let current = dual("10.0.0.1", "2001:db8::1");

            assert_eq!(
                classify(Some(&previous), Some(&current)),
                Some(EventType::IpChanged)
            );
        }

        // Known asymmetry: losing IPv6 while IPv4 survives is a change,
        // not a per-family removal.
        #[test]
        fn partial_family_loss_is_changed_not_removed() {
            let previous = dual("10.0.0.1", "2001:db8::1");
            let current = v4("10.0.0.1");

            assert_eq!(
                classify(Some(&previous), Some(&current)),
                Some(EventType::IpChanged)
            );
        }

        #[test]
        fn partial_family_loss_with_other_change_is_changed() {
            let previous = dual("10.0.0.1", "2001:db8::1");
            let current = v4("10.0.0.9");

            assert_eq!(
                classify(Some(&previous), Some(&current)),
                Some(EventType::IpChanged)
            );
        }
    }
}
