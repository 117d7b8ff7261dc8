//! UDP multicast transports, one per address family.
//!
//! Each transport binds the mDNS port, joins the multicast group on the
//! selected interfaces, and pins its egress to the responder's interface
//! so replies leave on the link the query arrived on. Inbound packets
//! lease a buffer from a shared [`BufferPool`] and carry the source
//! endpoint, including the interface index the transport listens on.

mod buffer_pool;

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;

use bytes::Bytes;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;

pub use buffer_pool::{BUFFER_SIZE, BufferPool, PooledBuffer};

use crate::message::Message;
use shared::error::{Error, Result};
use shared::ifaces::NetInterface;

/// The mDNS port number.
pub const MDNS_PORT: u16 = 5353;

/// The multicast group used for mDNS over IPv4 (RFC 6762 section 3).
pub const MDNS_GROUP_V4: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 251);

/// The multicast group used for mDNS over IPv6 (RFC 6762 section 3).
pub const MDNS_GROUP_V6: Ipv6Addr = Ipv6Addr::new(0xFF02, 0, 0, 0, 0, 0, 0, 0xFB);

/// An address family a transport can operate over.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Family {
    Ipv4,
    Ipv6,
}

impl Family {
    fn listen_addr(&self) -> SocketAddr {
        match self {
            Family::Ipv4 => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), MDNS_PORT),
            Family::Ipv6 => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), MDNS_PORT),
        }
    }

    fn group_addr(&self) -> SocketAddr {
        match self {
            Family::Ipv4 => SocketAddr::new(IpAddr::V4(MDNS_GROUP_V4), MDNS_PORT),
            Family::Ipv6 => SocketAddr::new(IpAddr::V6(MDNS_GROUP_V6), MDNS_PORT),
        }
    }
}

/// The origin or destination of a packet.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// OS index of the interface the packet arrived on or should leave by.
    pub interface_index: u32,
    /// The peer address.
    pub address: SocketAddr,
}

impl Endpoint {
    /// Returns true if this endpoint is a "legacy" querier.
    ///
    /// If the source UDP port in a received Multicast DNS query is not
    /// port 5353, the querier is a simple one-shot resolver that does not
    /// fully implement mDNS and expects a conventional unicast response
    /// (RFC 6762 section 6.7).
    pub fn is_legacy(&self) -> bool {
        self.address.port() != MDNS_PORT
    }
}

/// A UDP packet received from a transport.
///
/// The data buffer is leased from the transport's pool and returned when
/// the packet is dropped.
pub struct InboundPacket {
    pub transport: Arc<UdpTransport>,
    pub source: Endpoint,
    pub data: PooledBuffer,
}

impl InboundPacket {
    /// Parses the DNS message contained in the packet.
    pub fn message(&self) -> Result<Message> {
        let mut m = Message::default();
        m.unpack(&self.data)?;
        Ok(m)
    }
}

/// A UDP packet to be sent by a transport.
pub struct OutboundPacket {
    pub destination: Endpoint,
    pub data: Bytes,
}

impl OutboundPacket {
    /// Packs `m` into a new outbound packet for `destination`.
    pub fn new(destination: Endpoint, m: &mut Message) -> Result<Self> {
        Ok(OutboundPacket {
            destination,
            data: Bytes::from(m.pack()?),
        })
    }
}

/// A multicast UDP transport for one address family.
pub struct UdpTransport {
    family: Family,
    socket: UdpSocket,
    interface_index: u32,
    joined: Vec<String>,
    pool: BufferPool,
    shutdown: CancellationToken,
}

impl UdpTransport {
    /// Binds the mDNS port for `family` and joins the multicast group on
    /// each of the given interfaces.
    ///
    /// Binding failure is fatal. Failing to join the group on some of the
    /// interfaces is logged and tolerated; failing to join on all of them
    /// is an error. Must be called from within a tokio runtime.
    pub fn bind(family: Family, ifaces: &[NetInterface], pool: BufferPool) -> Result<Arc<Self>> {
        let domain = match family {
            Family::Ipv4 => Domain::IPV4,
            Family::Ipv6 => Domain::IPV6,
        };

        let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_reuse_address(true)?;
        #[cfg(all(unix, not(target_os = "solaris"), not(target_os = "illumos")))]
        socket.set_reuse_port(true)?;
        if family == Family::Ipv6 {
            socket.set_only_v6(true)?;
        }
        socket.set_nonblocking(true)?;

        let listen_addr = family.listen_addr();
        if let Err(err) = socket.bind(&listen_addr.into()) {
            log::error!("unable to listen for mDNS requests on {listen_addr}: {err}");
            return Err(err.into());
        }

        // Join the group on every selected interface, remembering which
        // ones succeeded.
        let mut joined = Vec::with_capacity(ifaces.len());
        for iface in ifaces {
            let result = match family {
                Family::Ipv4 => match iface.ipv4_addrs().next() {
                    Some(addr) => socket.join_multicast_v4(&MDNS_GROUP_V4, &addr),
                    None => continue,
                },
                Family::Ipv6 => socket.join_multicast_v6(&MDNS_GROUP_V6, iface.index),
            };

            match result {
                Ok(()) => joined.push(iface.name.clone()),
                Err(err) => log::debug!(
                    "unable to join the mDNS multicast group on the '{}' interface: {err}",
                    iface.name,
                ),
            }
        }

        if joined.is_empty() {
            return Err(Error::ErrGroupJoinFailed);
        }

        // Pin multicast egress to the responder's interface so responses
        // leave on the link the query arrived on.
        let interface_index = ifaces[0].index;
        match family {
            Family::Ipv4 => {
                if let Some(addr) = ifaces[0].ipv4_addrs().next() {
                    socket.set_multicast_if_v4(&addr)?;
                }
            }
            Family::Ipv6 => socket.set_multicast_if_v6(interface_index)?,
        }

        let socket = UdpSocket::from_std(socket.into())?;

        log::debug!(
            "listening for mDNS requests on {listen_addr} ({})",
            joined.join(", "),
        );

        Ok(Arc::new(UdpTransport {
            family,
            socket,
            interface_index,
            joined,
            pool,
            shutdown: CancellationToken::new(),
        }))
    }

    /// Reads the next packet from the transport.
    ///
    /// Blocks until a datagram arrives or the transport is closed.
    pub async fn recv(self: &Arc<Self>) -> Result<InboundPacket> {
        let mut buf = self.pool.get();

        tokio::select! {
            _ = self.shutdown.cancelled() => Err(Error::ErrTransportClosed),
            result = self.socket.recv_from(buf.as_mut_slice()) => {
                let (n, address) = result.map_err(|err| {
                    log::warn!("unable to read mDNS packet via {}: {err}", self.group());
                    Error::from(err)
                })?;
                buf.set_len(n);

                Ok(InboundPacket {
                    transport: Arc::clone(self),
                    source: Endpoint {
                        interface_index: self.interface_index,
                        address,
                    },
                    data: buf,
                })
            }
        }
    }

    /// Sends a packet via the transport.
    pub async fn send(&self, p: &OutboundPacket) -> Result<()> {
        if self.shutdown.is_cancelled() {
            return Err(Error::ErrTransportClosed);
        }

        if let Err(err) = self.socket.send_to(&p.data, p.destination.address).await {
            log::warn!(
                "unable to send mDNS packet to {} via {}: {err}",
                p.destination.address,
                self.group(),
            );
            return Err(err.into());
        }

        Ok(())
    }

    /// Returns the multicast group address for this transport.
    pub fn group(&self) -> SocketAddr {
        self.family.group_addr()
    }

    /// Returns the names of the interfaces the group was joined on.
    pub fn joined_interfaces(&self) -> &[String] {
        &self.joined
    }

    /// Closes the transport, unblocking any parked [`recv`](Self::recv).
    /// Closing is idempotent.
    pub fn close(&self) {
        self.shutdown.cancel();
    }
}

/// Sends a DNS message as a response to an inbound packet.
///
/// Empty responses are not transmitted; returns true if a datagram was
/// actually sent.
pub async fn send_response(packet: &InboundPacket, to: SocketAddr, m: &mut Message) -> Result<bool> {
    if m.is_empty() {
        return Ok(false);
    }

    let out = OutboundPacket::new(
        Endpoint {
            interface_index: packet.source.interface_index,
            address: to,
        },
        m,
    )?;

    packet.transport.send(&out).await?;
    Ok(true)
}

/// Sends a DNS message as a unicast response to an inbound packet.
pub async fn send_unicast_response(packet: &InboundPacket, m: &mut Message) -> Result<bool> {
    send_response(packet, packet.source.address, m).await
}

/// Sends a DNS message as a multicast response to an inbound packet.
pub async fn send_multicast_response(packet: &InboundPacket, m: &mut Message) -> Result<bool> {
    send_response(packet, packet.transport.group(), m).await
}
