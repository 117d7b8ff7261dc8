//! The address-resolution seam used when synthesising A and AAAA records.

use std::net::{IpAddr, ToSocketAddrs};

use shared::error::Result;
use shared::ifaces;

/// Resolves a host name to its IP addresses.
///
/// The responder calls this when it needs address records for a service's
/// target host. Implementations may block on I/O.
pub trait AddressResolver: Send + Sync {
    /// Returns the IPv4 and IPv6 addresses of `host`. The host name is in
    /// presentation form with a trailing dot.
    fn lookup_ip_addr(&self, host: &str) -> Result<Vec<IpAddr>>;
}

/// Resolves host names through the operating system's resolver.
#[derive(Default, Debug, Clone, Copy)]
pub struct SystemResolver;

impl AddressResolver for SystemResolver {
    fn lookup_ip_addr(&self, host: &str) -> Result<Vec<IpAddr>> {
        let host = host.strip_suffix('.').unwrap_or(host);
        let addrs = (host, 0)
            .to_socket_addrs()?
            .map(|sa| sa.ip())
            .collect::<Vec<_>>();
        Ok(addrs)
    }
}

/// Resolves any host name to the addresses of one local interface.
///
/// Used for hosts under the domain the responder itself advertises in:
/// answers to a query carry the addresses of the interface the question
/// arrived on, not the machine's primary address.
#[derive(Debug, Clone, Copy)]
pub struct LocalResolver {
    /// OS index of the interface whose addresses are returned.
    pub interface_index: u32,
}

impl AddressResolver for LocalResolver {
    fn lookup_ip_addr(&self, _host: &str) -> Result<Vec<IpAddr>> {
        let iface = ifaces::interface_by_index(self.interface_index)?;
        Ok(iface.addrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_resolver_strips_trailing_dot() {
        // "localhost." must be looked up as "localhost", which always
        // resolves, to loopback addresses only.
        let addrs = SystemResolver.lookup_ip_addr("localhost.").unwrap();
        assert!(!addrs.is_empty());
        assert!(addrs.iter().all(|a| a.is_loopback()));
    }

    #[test]
    fn test_local_resolver_returns_interface_addrs() {
        // Whatever the host name says, the local resolver answers with
        // the addresses of its interface.
        let Ok(ifaces) = ifaces::interfaces() else {
            return;
        };
        let Some(iface) = ifaces.into_iter().next() else {
            return;
        };

        let resolver = LocalResolver {
            interface_index: iface.index,
        };
        let addrs = resolver.lookup_ip_addr("anything.local.").unwrap();
        assert_eq!(addrs, iface.addrs);
    }

    #[test]
    fn test_local_resolver_unknown_interface_fails() {
        // No OS hands out this interface index.
        let resolver = LocalResolver {
            interface_index: u32::MAX,
        };
        assert!(resolver.lookup_ip_addr("host.local.").is_err());
    }
}
