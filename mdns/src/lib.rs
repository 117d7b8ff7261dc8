//! # mdns
//!
//! A multicast DNS (mDNS, RFC 6762) responder engine.
//!
//! Hosts on a link discover services by sending DNS queries to the mDNS
//! multicast groups (224.0.0.251 and ff02::fb, port 5353). This crate
//! receives those queries, consults a pluggable [`Answerer`] for each
//! question, and sends the answers back — unicast or multicast as the
//! protocol dictates.
//!
//! ## What's here
//!
//! - [`message`]: a DNS wire codec for the record types service discovery
//!   uses (A, AAAA, PTR, SRV, TXT), with name compression and DNS-SD
//!   instance-label escaping.
//! - [`query`] / [`response`]: mDNS message shaping — header flag policy,
//!   the unicast-response bit, the cache-flush bit.
//! - [`transport`]: per-family multicast UDP transports with a pooled
//!   receive buffer.
//! - [`responder`]: the receive/answer/dispatch loop.
//! - [`resolver`]: the seam through which target-host addresses are
//!   resolved when synthesising A/AAAA records.
//!
//! The DNS-SD record rules (RFC 6763) live in the companion `dnssd`
//! crate, which implements [`Answerer`] on top of this engine.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mdns::responder::{Responder, ResponderConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run(answerer: Arc<dyn mdns::Answerer>) -> shared::error::Result<()> {
//! let responder = Responder::new(answerer, ResponderConfig::new())?;
//!
//! let shutdown = CancellationToken::new();
//! tokio::spawn({
//!     let shutdown = shutdown.clone();
//!     async move {
//!         tokio::signal::ctrl_c().await.ok();
//!         shutdown.cancel();
//!     }
//! });
//!
//! responder.run(shutdown).await
//! # }
//! ```
//!
//! ## Scope
//!
//! The responder answers queries for the records its answerer publishes.
//! Probing and announcing of unique record sets (RFC 6762 section 8) and
//! defence against conflicting responses (section 9) are not implemented:
//! registered records are not conflict-checked.

#![warn(rust_2018_idioms)]
#![allow(dead_code)]

pub mod answer;
pub mod message;
pub mod query;
pub mod resolver;
pub mod responder;
pub mod response;
pub mod transport;

pub use answer::{Answer, Answerer, Question, ResponseSections, UnionAnswerer};
pub use query::{UNICAST_RESPONSE_BIT, new_query, set_unicast_response, validate_query};
pub use resolver::{AddressResolver, LocalResolver, SystemResolver};
pub use responder::{Responder, ResponderConfig, answer_query};
pub use response::{CACHE_FLUSH_BIT, is_unique_record, new_response, set_unique_record};
pub use transport::{MDNS_GROUP_V4, MDNS_GROUP_V6, MDNS_PORT};
