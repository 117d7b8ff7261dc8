//! The multicast DNS responder loop.
//!
//! A [`Responder`] owns one network interface and serves mDNS queries on
//! it: per enabled address family a receive task reads and parses packets
//! from a [`UdpTransport`] and hands them to the main task over a command
//! channel; the main task answers each question through the registered
//! [`Answerer`] and dispatches at most one unicast and one multicast
//! datagram per query.
//!
//! The channel between the receive tasks and the main task is effectively
//! unbuffered: a slow main loop rate-limits reads, and mDNS has no flow
//! control anyway — a datagram the kernel drops is simply lost.


use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::answer::{Answer, Answerer, Question};
use crate::message::Message;
use crate::query::{validate_query, wants_unicast_response};
use crate::response::new_response;
use crate::transport::{
    BufferPool, Endpoint, Family, InboundPacket, UdpTransport, send_multicast_response,
    send_unicast_response,
};
use shared::error::{Error, Result};
use shared::ifaces::{self, NetInterface};

// A unit of work performed within the responder's main loop.
enum Command {
    Query {
        packet: InboundPacket,
        message: Message,
    },
    Response {
        packet: InboundPacket,
        message: Message,
    },
}

/// Configuration for a [`Responder`].
#[derive(Default, Clone)]
pub struct ResponderConfig {
    interface: Option<NetInterface>,
    disable_ipv4: bool,
    disable_ipv6: bool,
}

impl ResponderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the responder to a specific network interface.
    ///
    /// If not set, the responder uses the interface through which the
    /// internet is reached.
    pub fn with_interface(mut self, interface: NetInterface) -> Self {
        self.interface = Some(interface);
        self
    }

    /// Prevents the responder from listening for IPv4 messages.
    pub fn with_ipv4_disabled(mut self) -> Self {
        self.disable_ipv4 = true;
        self
    }

    /// Prevents the responder from listening for IPv6 messages.
    pub fn with_ipv6_disabled(mut self) -> Self {
        self.disable_ipv6 = true;
        self
    }
}

/// A multicast DNS responder for a single network interface.
pub struct Responder {
    answerer: Arc<dyn Answerer>,
    interface: NetInterface,
    disable_ipv4: bool,
    disable_ipv6: bool,
}

impl Responder {
    /// Creates a new responder that consults `answerer` for every
    /// question it receives.
    ///
    /// If the configuration does not name an interface, the interface
    /// used to reach the internet is auto-detected.
    pub fn new(answerer: Arc<dyn Answerer>, config: ResponderConfig) -> Result<Self> {
        let interface = match config.interface {
            Some(interface) => interface,
            None => ifaces::internet_interface()?,
        };

        Ok(Responder {
            answerer,
            interface,
            disable_ipv4: config.disable_ipv4,
            disable_ipv6: config.disable_ipv6,
        })
    }

    /// The interface the responder serves.
    pub fn interface(&self) -> &NetInterface {
        &self.interface
    }

    /// Responds to mDNS messages until `shutdown` is cancelled or a fatal
    /// error occurs. Binding or group-join failure is fatal; anything
    /// that goes wrong with an individual packet is not.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<()> {
        if self.disable_ipv4 && self.disable_ipv6 {
            return Err(Error::ErrNoTransportEnabled);
        }

        let shutdown = shutdown.child_token();
        let pool = BufferPool::new();
        let selected = std::slice::from_ref(&self.interface);

        let mut transports = Vec::new();
        if !self.disable_ipv4 {
            transports.push(UdpTransport::bind(Family::Ipv4, selected, pool.clone())?);
        }
        if !self.disable_ipv6 {
            transports.push(UdpTransport::bind(Family::Ipv6, selected, pool.clone())?);
        }

        let (commands_tx, mut commands_rx) = mpsc::channel::<Command>(1);

        let mut receivers = JoinSet::new();
        for transport in &transports {
            receivers.spawn(receive_loop(
                Arc::clone(transport),
                commands_tx.clone(),
                shutdown.clone(),
            ));
        }
        drop(commands_tx);

        let mut result = self.main_loop(&mut commands_rx, &shutdown).await;

        // Wind down: closing the transports unblocks any parked reads.
        shutdown.cancel();
        for transport in &transports {
            transport.close();
        }
        commands_rx.close();

        while let Some(joined) = receivers.join_next().await {
            if let Ok(Err(err)) = joined {
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }

        result
    }

    // The responder's main loop: waits out the startup jitter, then
    // executes commands until shutdown.
    async fn main_loop(
        &self,
        commands: &mut mpsc::Receiver<Command>,
        shutdown: &CancellationToken,
    ) -> Result<()> {
        // When ready to send its first packets a host should wait for a
        // short random delay, uniformly distributed in the range 0-250 ms,
        // to avoid synchronised bursts from devices powered on together
        // (RFC 6762 section 8.1).
        let jitter = Duration::from_millis(rand::random::<u64>() % 250);
        tokio::select! {
            _ = shutdown.cancelled() => return Ok(()),
            _ = tokio::time::sleep(jitter) => {}
        }

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => return Ok(()),
                command = commands.recv() => match command {
                    None => return Ok(()),
                    Some(Command::Query { packet, message }) => {
                        if let Err(err) = self.handle_query(&packet, &message).await {
                            log::debug!(
                                "ignoring mDNS query from {}: {err}",
                                packet.source.address,
                            );
                        }
                    }
                    Some(Command::Response { .. }) => {
                        // Defence of unique records against conflicting
                        // responses (RFC 6762 section 9) is not
                        // implemented; inbound responses are discarded.
                    }
                },
            }
        }
    }

    // Answers a single query and dispatches the resulting frames.
    async fn handle_query(&self, packet: &InboundPacket, message: &Message) -> Result<()> {
        let (mut unicast_response, mut multicast_response) =
            answer_query(self.answerer.as_ref(), message, &packet.source)?;

        // UDP is best-effort; a failed send is logged and forgotten.
        if let Err(err) = send_unicast_response(packet, &mut unicast_response).await {
            log::warn!("unable to send unicast mDNS response: {err}");
        }
        if let Err(err) = send_multicast_response(packet, &mut multicast_response).await {
            log::warn!("unable to send multicast mDNS response: {err}");
        }

        Ok(())
    }
}

/// Builds the responses to a single mDNS query.
///
/// Returns the unicast frame and the multicast frame, either or both of
/// which may be empty. Questions the answerer fails on contribute no
/// records; an invalid query (non-zero OPCODE or RCODE) is an error.
pub fn answer_query(
    answerer: &dyn Answerer,
    query: &Message,
    source: &Endpoint,
) -> Result<(Message, Message)> {
    validate_query(query)?;

    let legacy = source.is_legacy();
    let mut unicast_response = new_response(query, true);
    let mut multicast_response = new_response(query, false);

    for raw_question in &query.questions {
        let (unicast, dns_question) = wants_unicast_response(raw_question);

        let question = Question {
            question: &dns_question,
            query,
            interface_index: source.interface_index,
        };
        let mut answer = Answer::default();

        if let Err(err) = answerer.answer(&question, &mut answer) {
            log::debug!("unable to answer question for '{}': {err}", dns_question.name);
            continue;
        }

        if unicast || legacy {
            answer.append_to_message(&mut unicast_response, legacy);
        } else {
            answer.append_to_message(&mut multicast_response, false);
        }
    }

    Ok((unicast_response, multicast_response))
}

// Pipes packets received from a transport into the command channel.
async fn receive_loop(
    transport: Arc<UdpTransport>,
    commands: mpsc::Sender<Command>,
    shutdown: CancellationToken,
) -> Result<()> {
    loop {
        let packet = match transport.recv().await {
            Ok(packet) => packet,
            Err(Error::ErrTransportClosed) => return Ok(()),
            Err(_) if shutdown.is_cancelled() => return Ok(()),
            Err(err) => return Err(err),
        };

        let message = match packet.message() {
            Ok(message) => message,
            Err(err) => {
                log::warn!("error parsing mDNS message: {err}");
                continue;
            }
        };

        if message.header.truncated {
            // In query messages a set TC bit means additional known-answer
            // records may follow shortly (RFC 6762 section 18.5). Waiting
            // for them is not supported; the request is served anyway.
            log::debug!("received mDNS message with non-zero TC flag");
        }

        let command = if message.header.response {
            Command::Response { packet, message }
        } else {
            Command::Query { packet, message }
        };

        tokio::select! {
            _ = shutdown.cancelled() => return Ok(()),
            sent = commands.send(command) => {
                if sent.is_err() {
                    return Ok(());
                }
            }
        }
    }
}
