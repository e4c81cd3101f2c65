//! Network layer: address families, enumeration, and resolution.
//!
//! This module provides types and functions for:
//! - Address family selection ([`AddressFamily`], [`IpFamily`])
//! - Listing the addresses of a named interface ([`AddressLister`])
//! - Resolving a point-in-time snapshot ([`resolve`], [`AddressSet`], [`LinkLocalFlags`])
//! - Platform-specific implementations ([`platform`])

mod family;
mod lister;
pub mod platform;
mod resolver;

pub use family::{AddressFamily, IpFamily};
pub use lister::{AddressLister, ListError};
pub use resolver::{AddressSet, LinkLocalFlags, Resolution, is_link_local, resolve};
