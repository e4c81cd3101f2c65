//! Address family types.

use std::fmt;
use std::net::IpAddr;

use serde::Serialize;

/// Address family to monitor (explicit specification required, no default).
///
/// # Design Decision
///
/// This enum requires explicit configuration to avoid hidden behavior.
/// Users must consciously choose which family (or both) to watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    /// Monitor IPv4 addresses only.
    V4,
    /// Monitor IPv6 addresses only.
    V6,
    /// Monitor both IPv4 and IPv6 addresses.
    Any,
}

impl AddressFamily {
    /// Returns true if this family includes IPv4.
    #[must_use]
    pub const fn includes_v4(self) -> bool {
        matches!(self, Self::V4 | Self::Any)
    }

    /// Returns true if this family includes IPv6.
    #[must_use]
    pub const fn includes_v6(self) -> bool {
        matches!(self, Self::V6 | Self::Any)
    }

    /// Returns true if addresses of `family` are covered by this filter.
    #[must_use]
    pub const fn covers(self, family: IpFamily) -> bool {
        match family {
            IpFamily::V4 => self.includes_v4(),
            IpFamily::V6 => self.includes_v6(),
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => write!(f, "IPv4"),
            Self::V6 => write!(f, "IPv6"),
            Self::Any => write!(f, "Any"),
        }
    }
}

/// The family of a single address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum IpFamily {
    /// IPv4.
    #[serde(rename = "IPv4")]
    V4,
    /// IPv6.
    #[serde(rename = "IPv6")]
    V6,
}

impl IpFamily {
    /// Returns the family of `address`.
    #[must_use]
    pub const fn of(address: &IpAddr) -> Self {
        match address {
            IpAddr::V4(_) => Self::V4,
            IpAddr::V6(_) => Self::V6,
        }
    }
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => write!(f, "IPv4"),
            Self::V6 => write!(f, "IPv6"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod address_family {
        use super::*;

        #[test]
        fn v4_includes_only_v4() {
            assert!(AddressFamily::V4.includes_v4());
            assert!(!AddressFamily::V4.includes_v6());
        }

        #[test]
        fn v6_includes_only_v6() {
            assert!(!AddressFamily::V6.includes_v4());
            assert!(AddressFamily::V6.includes_v6());
        }

        #[test]
        fn any_includes_both() {
            assert!(AddressFamily::Any.includes_v4());
            assert!(AddressFamily::Any.includes_v6());
        }

        #[test]
        fn covers_matches_includes() {
            assert!(AddressFamily::V4.covers(IpFamily::V4));
            assert!(!AddressFamily::V4.covers(IpFamily::V6));
            assert!(AddressFamily::Any.covers(IpFamily::V6));
        }

        #[test]
        fn display_formats_correctly() {
            assert_eq!(AddressFamily::V4.to_string(), "IPv4");
            assert_eq!(AddressFamily::V6.to_string(), "IPv6");
            assert_eq!(AddressFamily::Any.to_string(), "Any");
        }
    }

    mod ip_family {
        use super::*;

        #[test]
        fn of_detects_family() {
            assert_eq!(IpFamily::of(&"10.0.0.1".parse().unwrap()), IpFamily::V4);
            assert_eq!(IpFamily::of(&"2001:db8::1".parse().unwrap()), IpFamily::V6);
        }

        #[test]
        fn serializes_as_family_tag() {
            assert_eq!(serde_json::to_string(&IpFamily::V4).unwrap(), "\"IPv4\"");
            assert_eq!(serde_json::to_string(&IpFamily::V6).unwrap(), "\"IPv6\"");
        }
    }
}
