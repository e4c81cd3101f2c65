//! Point-in-time address resolution for a single interface.
//!
//! [`resolve`] turns the raw address list of an interface into an
//! [`AddressSet`] (at most one address per family) plus [`LinkLocalFlags`],
//! deciding per call whether link-local addresses count as "having an address".

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::Serialize;

use super::{AddressFamily, AddressLister, IpFamily};

/// The addresses an interface currently holds, at most one per family.
///
/// An `AddressSet` is never empty: "no address" is expressed as
/// `Option::<AddressSet>::None`, which keeps "the interface has nothing"
/// distinct from a set that lacks one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AddressSet {
    #[serde(rename = "IPv4", skip_serializing_if = "Option::is_none")]
    v4: Option<Ipv4Addr>,
    #[serde(rename = "IPv6", skip_serializing_if = "Option::is_none")]
    v6: Option<Ipv6Addr>,
}

impl AddressSet {
    /// Creates a set from per-family addresses.
    ///
    /// Returns `None` when both families are absent.
    #[must_use]
    pub const fn new(v4: Option<Ipv4Addr>, v6: Option<Ipv6Addr>) -> Option<Self> {
        if v4.is_none() && v6.is_none() {
            None
        } else {
            Some(Self { v4, v6 })
        }
    }

    /// Creates a set holding only an IPv4 address.
    #[must_use]
    pub const fn from_v4(address: Ipv4Addr) -> Self {
        Self {
            v4: Some(address),
            v6: None,
        }
    }

    /// Creates a set holding only an IPv6 address.
    #[must_use]
    pub const fn from_v6(address: Ipv6Addr) -> Self {
        Self {
            v4: None,
            v6: Some(address),
        }
    }

    /// Returns the IPv4 address, if any.
    #[must_use]
    pub const fn v4(&self) -> Option<Ipv4Addr> {
        self.v4
    }

    /// Returns the IPv6 address, if any.
    #[must_use]
    pub const fn v6(&self) -> Option<Ipv6Addr> {
        self.v6
    }

    /// Returns the address held for `family`, if any.
    #[must_use]
    pub fn get(&self, family: IpFamily) -> Option<IpAddr> {
        match family {
            IpFamily::V4 => self.v4.map(IpAddr::V4),
            IpFamily::V6 => self.v6.map(IpAddr::V6),
        }
    }

    /// Iterates the families present in this set, IPv4 first.
    pub fn iter(&self) -> impl Iterator<Item = (IpFamily, IpAddr)> + '_ {
        [IpFamily::V4, IpFamily::V6]
            .into_iter()
            .filter_map(|family| self.get(family).map(|address| (family, address)))
    }
}

impl fmt::Display for AddressSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (family, address) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{family}={address}")?;
            first = false;
        }
        Ok(())
    }
}

/// Which families currently carry a link-local address.
///
/// Reported whether or not the link-local address made it into the
/// [`AddressSet`], and independent of any routable address in that family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkLocalFlags {
    /// An IPv4 link-local (`169.254.0.0/16`) address is present.
    pub v4: bool,
    /// An IPv6 link-local (`fe80::/10`) address is present.
    pub v6: bool,
}

impl LinkLocalFlags {
    /// Returns the flag for `family`.
    #[must_use]
    pub const fn get(self, family: IpFamily) -> bool {
        match family {
            IpFamily::V4 => self.v4,
            IpFamily::V6 => self.v6,
        }
    }

    /// Returns true if any family covered by `filter` has a link-local address.
    #[must_use]
    pub const fn any_in(self, filter: AddressFamily) -> bool {
        (filter.includes_v4() && self.v4) || (filter.includes_v6() && self.v6)
    }

    const fn set(&mut self, family: IpFamily) {
        match family {
            IpFamily::V4 => self.v4 = true,
            IpFamily::V6 => self.v6 = true,
        }
    }
}

/// Result of a single [`resolve`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// The selected addresses, or `None` if no family yielded one.
    pub address: Option<AddressSet>,
    /// Link-local presence per family.
    pub link_local: LinkLocalFlags,
}

/// Returns true if `address` is link-local.
///
/// IPv4 link-local is `169.254.0.0/16`; IPv6 link-local is `fe80::/10`
/// (`fe80::` through `febf::`).
#[must_use]
pub const fn is_link_local(address: &IpAddr) -> bool {
    match address {
        IpAddr::V4(v4) => v4.is_link_local(),
        IpAddr::V6(v6) => (v6.segments()[0] & 0xffc0) == 0xfe80,
    }
}

/// Resolves the current addresses of `interface`.
///
/// For every address whose family is covered by `family`, link-local
/// addresses are flagged; they enter the result only when
/// `allow_link_local` is set. Per family, the first routable address wins;
/// a link-local address is only chosen when the family has no routable one.
///
/// Unknown interfaces and enumeration failures both resolve to "no address";
/// failures are logged at `warn`.
pub fn resolve<L>(
    lister: &L,
    interface: &str,
    family: AddressFamily,
    allow_link_local: bool,
) -> Resolution
where
    L: AddressLister + ?Sized,
{
    let addresses = match lister.list_addresses(interface) {
        Ok(addresses) => addresses,
        Err(e) => {
            tracing::warn!(interface, "Address enumeration failed, treating as no address: {e}");
            Vec::new()
        }
    };

    let mut link_local = LinkLocalFlags::default();
    let mut routable = Selection::default();
    let mut fallback = Selection::default();

    for address in addresses {
        let ip_family = IpFamily::of(&address);
        if !family.covers(ip_family) {
            continue;
        }

        if is_link_local(&address) {
            link_local.set(ip_family);
            if allow_link_local {
                fallback.offer(address);
            }
        } else {
            routable.offer(address);
        }
    }

    let address = AddressSet::new(
        routable.v4.or(fallback.v4),
        routable.v6.or(fallback.v6),
    );

    Resolution {
        address,
        link_local,
    }
}

/// First address seen per family.
#[derive(Default)]
struct Selection {
    v4: Option<Ipv4Addr>,
    v6: Option<Ipv6Addr>,
}

impl Selection {
    fn offer(&mut self, address: IpAddr) {
        match address {
            IpAddr::V4(v4) => {
                self.v4.get_or_insert(v4);
            }
            IpAddr::V6(v6) => {
                self.v6.get_or_insert(v6);
            }
        }
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
