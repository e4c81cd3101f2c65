//! Windows-specific address enumeration using `GetAdaptersAddresses`.

use crate::network::{AddressLister, ListError};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use windows::Win32::Foundation::WIN32_ERROR;
use windows::Win32::NetworkManagement::IpHelper::{
    GAA_FLAG_SKIP_ANYCAST, GAA_FLAG_SKIP_DNS_SERVER, GAA_FLAG_SKIP_MULTICAST,
    GET_ADAPTERS_ADDRESSES_FLAGS, GetAdaptersAddresses, IP_ADAPTER_ADDRESSES_LH,
};
use windows::Win32::Networking::WinSock::{AF_INET, AF_INET6, AF_UNSPEC, SOCKADDR_IN, SOCKADDR_IN6};

/// Buffer size hint for `GetAdaptersAddresses`.
/// The API will tell us the actual required size if this is insufficient.
const INITIAL_BUFFER_SIZE: u32 = 16384;

/// Windows implementation of [`AddressLister`] using `GetAdaptersAddresses`.
///
/// Interfaces are matched by their friendly name (e.g. "Ethernet", "Wi-Fi").
///
/// # Example
///
/// ```no_run
/// use ifmon::network::{AddressLister, platform::WindowsLister};
///
/// let lister = WindowsLister::new();
/// for address in lister.list_addresses("Ethernet").expect("enumeration failed") {
///     println!("{address}");
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsLister {
    _private: (),
}

impl WindowsLister {
    /// Creates a new Windows address lister.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl AddressLister for WindowsLister {
    fn list_addresses(&self, interface: &str) -> Result<Vec<IpAddr>, ListError> {
        let raw_adapters = get_adapter_addresses()?;

        // SAFETY: GetAdaptersAddresses returns a properly aligned buffer for IP_ADAPTER_ADDRESSES_LH.
        #[allow(clippy::cast_ptr_alignment)]
        let mut current = raw_adapters.as_ptr().cast::<IP_ADAPTER_ADDRESSES_LH>();

        // SAFETY: We walk the linked list returned by GetAdaptersAddresses.
        // The list is valid as long as the buffer (`raw_adapters`) is alive.
        while !current.is_null() {
            let adapter = unsafe { &*current };

            if friendly_name(adapter).as_deref() == Some(interface) {
                return Ok(collect_addresses(adapter));
            }

            current = adapter.Next;
        }

        Ok(Vec::new())
    }
}

/// Calls `GetAdaptersAddresses` and returns the raw buffer containing adapter data.
///
/// Handles the two-call pattern: estimated buffer first, exact size on overflow.
fn get_adapter_addresses() -> Result<Vec<u8>, ListError> {
    let flags = GAA_FLAG_SKIP_ANYCAST | GAA_FLAG_SKIP_MULTICAST | GAA_FLAG_SKIP_DNS_SERVER;
    let family = u32::from(AF_UNSPEC.0);

    let mut buffer: Vec<u8> = vec![0u8; INITIAL_BUFFER_SIZE as usize];
    let mut size = INITIAL_BUFFER_SIZE;

    // SAFETY: We provide a valid buffer and size. The function writes adapter
    // information to the buffer and updates `size` with the required length.
    let result = unsafe {
        GetAdaptersAddresses(
            family,
            flags,
            None,
            Some(buffer.as_mut_ptr().cast()),
            &raw mut size,
        )
    };

    retry_on_overflow(result, &mut buffer, &mut size, flags, family)?;

    Ok(buffer)
}

/// Retries `GetAdaptersAddresses` with the size it asked for, if the first call overflowed.
///
/// # Coverage Note
///
/// Excluded from coverage: the overflow path needs more than 16KB of adapter
/// data and the error paths need real API failures.
#[cfg(not(tarpaulin_include))]
fn retry_on_overflow(
    result: u32,
    buffer: &mut Vec<u8>,
    size: &mut u32,
    flags: GET_ADAPTERS_ADDRESSES_FLAGS,
    family: u32,
) -> Result<(), ListError> {
    use windows::Win32::Foundation::{ERROR_BUFFER_OVERFLOW, NO_ERROR};

    let result = if result == ERROR_BUFFER_OVERFLOW.0 {
        buffer.resize(*size as usize, 0);

        // SAFETY: Same as above, but with correctly sized buffer
        unsafe {
            GetAdaptersAddresses(
                family,
                flags,
                None,
                Some(buffer.as_mut_ptr().cast()),
                &raw mut *size,
            )
        }
    } else {
        result
    };

    if result != NO_ERROR.0 {
        return Err(windows::core::Error::from(WIN32_ERROR(result)).into());
    }

    Ok(())
}

/// Reads the adapter's friendly name, or `None` if it is not valid UTF-16.
fn friendly_name(adapter: &IP_ADAPTER_ADDRESSES_LH) -> Option<String> {
    // SAFETY: FriendlyName is a NUL-terminated wide string owned by the adapter buffer.
    unsafe { adapter.FriendlyName.to_string().ok() }
}

/// Collects the IPv4 and IPv6 unicast addresses of an adapter, in API order.
///
/// # Safety Note
///
/// The pointer casts to `SOCKADDR_IN` and `SOCKADDR_IN6` are allowed despite alignment
/// concerns because Windows guarantees proper alignment of these structures.
#[allow(clippy::cast_ptr_alignment)]
fn collect_addresses(adapter: &IP_ADAPTER_ADDRESSES_LH) -> Vec<IpAddr> {
    let mut addresses = Vec::new();
    let mut unicast = adapter.FirstUnicastAddress;

    // SAFETY: Each unicast entry is valid as long as the parent adapter buffer is alive.
    while !unicast.is_null() {
        let entry = unsafe { &*unicast };

        // SAFETY: Address points to either SOCKADDR_IN or SOCKADDR_IN6, told apart by family.
        if let Some(sockaddr) = unsafe { entry.Address.lpSockaddr.as_ref() } {
            match sockaddr.sa_family {
                f if f == AF_INET => {
                    let sockaddr_in =
                        unsafe { &*(std::ptr::from_ref(sockaddr).cast::<SOCKADDR_IN>()) };
                    let octets = unsafe { sockaddr_in.sin_addr.S_un.S_un_b };
                    addresses.push(IpAddr::V4(Ipv4Addr::new(
                        octets.s_b1,
                        octets.s_b2,
                        octets.s_b3,
                        octets.s_b4,
                    )));
                }
                f if f == AF_INET6 => {
                    let sockaddr_in6 =
                        unsafe { &*(std::ptr::from_ref(sockaddr).cast::<SOCKADDR_IN6>()) };
                    let octets = unsafe { sockaddr_in6.sin6_addr.u.Byte };
                    addresses.push(IpAddr::V6(Ipv6Addr::from(octets)));
                }
                _ => {}
            }
        }

        unicast = entry.Next;
    }

    addresses
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_interface_returns_empty() {
        let lister = WindowsLister::new();

        let addresses = lister
            .list_addresses("ifmon-no-such-interface-0000")
            .expect("list_addresses() failed");

        assert!(addresses.is_empty());
    }

    #[test]
    fn loopback_pseudo_interface_lists_loopback() {
        let lister = WindowsLister::new();

        let addresses = lister
            .list_addresses("Loopback Pseudo-Interface 1")
            .expect("list_addresses() failed");

        // Present on every Windows host with the IPv4/IPv6 stack enabled
        if !addresses.is_empty() {
            assert!(addresses.iter().all(IpAddr::is_loopback), "{addresses:?}");
        }
    }
}
