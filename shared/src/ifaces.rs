//! Network-interface enumeration helpers.
//!
//! Wraps the `if-addrs` crate into a per-interface view (one entry per
//! interface, carrying all of its addresses) and provides the lookups the
//! mDNS responder needs: multicast-capable interfaces, lookup by OS index,
//! and detection of the interface used to reach the internet.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};

use crate::error::{Error, Result};

/// A network interface and the IP addresses assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetInterface {
    /// OS interface name, e.g. `eth0` or `en0`.
    pub name: String,
    /// OS interface index, as used in IPv6 scope ids and multicast joins.
    pub index: u32,
    /// All addresses assigned to the interface.
    pub addrs: Vec<IpAddr>,
}

impl NetInterface {
    /// Returns the interface's IPv4 addresses.
    pub fn ipv4_addrs(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.addrs.iter().filter_map(|a| match a {
            IpAddr::V4(v4) => Some(*v4),
            IpAddr::V6(_) => None,
        })
    }

    /// Returns true if any of the interface's addresses equals `ip`.
    pub fn has_addr(&self, ip: IpAddr) -> bool {
        self.addrs.contains(&ip)
    }
}

/// Returns all non-loopback interfaces that carry at least one address,
/// grouped by interface name.
pub fn interfaces() -> Result<Vec<NetInterface>> {
    let mut out: Vec<NetInterface> = Vec::new();

    for entry in if_addrs::get_if_addrs()? {
        if entry.is_loopback() {
            continue;
        }

        let ip = entry.ip();
        let index = entry.index.unwrap_or(0);

        if let Some(pos) = out.iter().position(|i| i.name == entry.name) {
            out[pos].addrs.push(ip);
        } else {
            out.push(NetInterface {
                name: entry.name,
                index,
                addrs: vec![ip],
            });
        }
    }

    Ok(out)
}

/// Returns the interfaces that can take part in multicast.
///
/// `if-addrs` does not expose interface flags, so any non-loopback
/// interface with an assigned address is considered a candidate.
pub fn multicast_interfaces() -> Result<Vec<NetInterface>> {
    let ifaces = interfaces()?;
    if ifaces.is_empty() {
        return Err(Error::ErrNoInterface);
    }
    Ok(ifaces)
}

/// Returns the interface with the given OS index, if any.
pub fn interface_by_index(index: u32) -> Result<NetInterface> {
    interfaces()?
        .into_iter()
        .find(|i| i.index == index)
        .ok_or(Error::ErrNoInterface)
}

/// Returns the network interface that is used to connect to the internet.
///
/// This is a fairly naive solution that assumes whatever interface is used
/// to reach Google's public DNS server is the appropriate one. No packets
/// are sent; connecting a UDP socket only selects a route.
pub fn internet_interface() -> Result<NetInterface> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect("8.8.8.8:53")?;
    let local: SocketAddr = socket.local_addr()?;

    interfaces()?
        .into_iter()
        .find(|i| i.has_addr(local.ip()))
        .ok_or(Error::ErrNoInternetInterface)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interfaces_are_grouped_by_name() {
        // Not all CI environments have a non-loopback interface, so only
        // check the grouping invariant when there is something to group.
        if let Ok(ifaces) = interfaces() {
            let mut names: Vec<&str> = ifaces.iter().map(|i| i.name.as_str()).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), ifaces.len());
        }
    }

    #[test]
    fn test_interface_addrs_not_empty() {
        if let Ok(ifaces) = interfaces() {
            for iface in ifaces {
                assert!(!iface.addrs.is_empty());
            }
        }
    }
}
