//! # dnssd
//!
//! DNS-Based Service Discovery (DNS-SD, RFC 6763) on top of the `mdns`
//! responder engine — the publication side of "Bonjour"/"zeroconf"
//! networking.
//!
//! A service instance is registered into a [`Catalog`], which synthesises
//! the PTR, SRV, TXT, A and AAAA records that advertise it and answers
//! the four kinds of question DNS-SD defines:
//!
//! - service type enumeration (`_services._dns-sd._udp.<domain>`),
//! - instance enumeration, a.k.a. browsing (`<type>.<domain>`),
//! - instance resolution (`<instance>.<type>.<domain>`),
//! - target host address lookup (`<host>.<domain>`).
//!
//! ## Example
//!
//! ```rust
//! use dnssd::{Catalog, Instance};
//!
//! # fn main() -> shared::error::Result<()> {
//! let catalog = Catalog::new();
//!
//! let mut instance = Instance::new(
//!     "Living Room Printer",
//!     "_ipp._tcp",
//!     "local.",
//!     "printer.local.",
//!     631,
//! )?;
//! instance.text.set("rp", "ipp/print")?;
//!
//! catalog.add_instance(instance)?;
//! # Ok(())
//! # }
//! ```
//!
//! Handing the catalog to an `mdns::Responder` serves it on the network:
//!
//! ```rust,ignore
//! let responder = mdns::Responder::new(Arc::new(catalog), ResponderConfig::new())?;
//! responder.run(shutdown).await?;
//! ```

#![warn(rust_2018_idioms)]
#![allow(dead_code)]

pub mod catalog;
pub mod domain;
pub mod enumeration;
pub mod instance;
pub mod instance_name;
pub mod names;
pub mod service;
pub mod service_type;
pub mod text;

pub use catalog::Catalog;
pub use domain::Domain;
pub use enumeration::{instance_enum_fqdn, subtype_enum_fqdn, type_enum_fqdn};
pub use instance::{DEFAULT_TTL, Instance};
pub use instance_name::{InstanceName, split_instance_name};
pub use names::{Fqdn, Label, Name, Relative};
pub use service::Service;
pub use service_type::ServiceType;
pub use text::Text;
