//! Advertise a DNS-SD service instance over mDNS.
//!
//! Registers one service instance in a catalog and serves it until
//! interrupted:
//!
//! ```text
//! cargo run --package dnssd --example advertise -- \
//!     --name "My Web Server" --service-type _http._tcp --port 8080 \
//!     --txt path=/index.html
//! ```
//!
//! Then browse for it from another machine on the link, e.g.
//! `dns-sd -B _http._tcp` (macOS) or `avahi-browse _http._tcp` (Linux).

use std::sync::Arc;

use clap::Parser;
use dnssd::{Catalog, Instance};
use mdns::responder::{Responder, ResponderConfig};
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "advertise")]
#[command(about = "Advertise a DNS-SD service instance over mDNS")]
struct Args {
    /// Human-readable instance name
    #[arg(long, default_value = "Demo Service")]
    name: String,

    /// DNS-SD service type
    #[arg(long, default_value = "_http._tcp")]
    service_type: String,

    /// Domain to advertise within
    #[arg(long, default_value = "local.")]
    domain: String,

    /// Target host; defaults to the machine's hostname within the domain
    #[arg(long)]
    host: Option<String>,

    /// Port the service listens on
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// TXT attributes, as key=value or bare key
    #[arg(long)]
    txt: Vec<String>,

    /// Do not listen for IPv4 queries
    #[arg(long)]
    disable_ipv4: bool,

    /// Do not listen for IPv6 queries
    #[arg(long)]
    disable_ipv6: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let host = match &args.host {
        Some(host) => host.clone(),
        None => hostname_label(),
    };

    let mut instance = Instance::new(&args.name, &args.service_type, &args.domain, &host, args.port)?;
    for pair in &args.txt {
        match pair.split_once('=') {
            Some((k, v)) => instance.text.set(k, v)?,
            None => instance.text.set_bool(pair, true)?,
        }
    }

    let catalog = Catalog::new();
    log::info!(
        "advertising '{}' as {} on port {}",
        args.name,
        instance.fqdn(),
        args.port,
    );
    catalog.add_instance(instance)?;

    let mut config = ResponderConfig::new();
    if args.disable_ipv4 {
        config = config.with_ipv4_disabled();
    }
    if args.disable_ipv6 {
        config = config.with_ipv6_disabled();
    }

    let responder = Responder::new(Arc::new(catalog), config)?;
    log::info!("serving mDNS on interface '{}'", responder.interface().name);

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            tokio::signal::ctrl_c().await.ok();
            log::info!("received ctrl-c, shutting down");
            shutdown.cancel();
        }
    });

    responder.run(shutdown).await?;
    Ok(())
}

// The machine's hostname as a single label, falling back to a fixed name.
fn hostname_label() -> String {
    std::fs::read_to_string("/etc/hostname")
        .ok()
        .map(|s| s.trim().split('.').next().unwrap_or("").to_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "mdns-host".to_owned())
}
