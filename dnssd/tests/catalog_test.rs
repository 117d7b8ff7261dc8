//! Integration tests for the service catalog: registry index invariants
//! and the DNS-SD answer rules, driven through the public mDNS answering
//! path without any network I/O.

use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use dnssd::{Catalog, Fqdn, Instance, InstanceName, ServiceType};
use mdns::answer::{Answer, Answerer, Question};
use mdns::message::{
    AResource, AaaaResource, DNSCLASS_INET, DnsType, Name as WireName, PtrResource, Question as DnsQuestion,
    Resource, SrvResource, TxtResource,
};
use mdns::query::new_query;
use mdns::resolver::AddressResolver;
use shared::error::Result;

// A resolver that always returns the same addresses, standing in for the
// system resolver when target hosts live outside the advertised domain.
struct StaticResolver(Vec<IpAddr>);

impl AddressResolver for StaticResolver {
    fn lookup_ip_addr(&self, _host: &str) -> Result<Vec<IpAddr>> {
        Ok(self.0.clone())
    }
}

fn catalog_with_addrs(addrs: &[&str]) -> Catalog {
    Catalog::with_resolver(Arc::new(StaticResolver(
        addrs.iter().map(|a| a.parse().unwrap()).collect(),
    )))
}

// A resolver that remembers whether it was consulted at all, for
// asserting that local target hosts never reach the injected resolver.
struct RecordingResolver {
    called: AtomicBool,
    addrs: Vec<IpAddr>,
}

impl RecordingResolver {
    fn new(addrs: &[&str]) -> Arc<Self> {
        Arc::new(RecordingResolver {
            called: AtomicBool::new(false),
            addrs: addrs.iter().map(|a| a.parse().unwrap()).collect(),
        })
    }

    fn was_called(&self) -> bool {
        self.called.load(Ordering::SeqCst)
    }
}

impl AddressResolver for RecordingResolver {
    fn lookup_ip_addr(&self, _host: &str) -> Result<Vec<IpAddr>> {
        self.called.store(true, Ordering::SeqCst);
        Ok(self.addrs.clone())
    }
}

// Registers "svc" with a target host outside "local." so address
// resolution goes through the injected resolver.
fn external_instance() -> Instance {
    Instance::new("svc", "_http._tcp", "local.", "svc.example.com.", 80).unwrap()
}

fn ask(catalog: &Catalog, name: &str, typ: DnsType) -> Answer {
    ask_on_interface(catalog, name, typ, 0)
}

fn ask_on_interface(catalog: &Catalog, name: &str, typ: DnsType, interface_index: u32) -> Answer {
    let query = new_query(
        false,
        vec![DnsQuestion {
            name: WireName::new(name).unwrap(),
            typ,
            class: DNSCLASS_INET,
        }],
    );

    let mut answer = Answer::default();
    catalog
        .answer(
            &Question {
                question: &query.questions[0],
                query: &query,
                interface_index,
            },
            &mut answer,
        )
        .unwrap();
    answer
}

fn record_addr(record: &Resource) -> IpAddr {
    let body = record.body.as_ref().unwrap().as_any();
    if let Some(a) = body.downcast_ref::<AResource>() {
        IpAddr::V4(a.addr())
    } else if let Some(aaaa) = body.downcast_ref::<AaaaResource>() {
        IpAddr::V6(aaaa.addr())
    } else {
        panic!("not an address record");
    }
}

fn ptr_target(record: &Resource) -> String {
    record
        .body
        .as_ref()
        .unwrap()
        .as_any()
        .downcast_ref::<PtrResource>()
        .unwrap()
        .ptr
        .data
        .clone()
}

#[test]
fn test_index_holds_exactly_four_entries_per_instance() {
    let catalog = catalog_with_addrs(&["192.0.2.1"]);
    catalog.add_instance(external_instance()).unwrap();

    assert_eq!(catalog.index_len(), 4);
    for name in [
        "_services._dns-sd._udp.local.",
        "_http._tcp.local.",
        "svc._http._tcp.local.",
        "svc.example.com.",
    ] {
        assert!(
            catalog.has_answerer_for(&Fqdn::new(name).unwrap()),
            "missing index entry for {name}"
        );
    }

    // A second instance of the same service shares the enumeration
    // entries: four entries become six, not eight.
    let second = Instance::new("other", "_http._tcp", "local.", "other.example.com.", 80).unwrap();
    catalog.add_instance(second).unwrap();
    assert_eq!(catalog.index_len(), 6);
}

#[test]
fn test_remove_prunes_empty_services_and_domains() {
    let catalog = catalog_with_addrs(&[]);
    catalog.add_instance(external_instance()).unwrap();
    assert_eq!(catalog.index_len(), 4);

    catalog.remove_instance(
        &InstanceName::new("svc").unwrap(),
        &ServiceType::new("_http._tcp").unwrap(),
        &Fqdn::new("local.").unwrap(),
    );

    assert_eq!(catalog.index_len(), 0);
    assert!(catalog.is_empty());

    // Removing again is a no-op.
    catalog.remove_instance(
        &InstanceName::new("svc").unwrap(),
        &ServiceType::new("_http._tcp").unwrap(),
        &Fqdn::new("local.").unwrap(),
    );
    assert_eq!(catalog.index_len(), 0);
}

#[test]
fn test_replacing_instance_unregisters_previous_target_host() {
    let catalog = catalog_with_addrs(&[]);
    catalog.add_instance(external_instance()).unwrap();
    assert!(catalog.has_answerer_for(&Fqdn::new("svc.example.com.").unwrap()));

    let moved = Instance::new("svc", "_http._tcp", "local.", "elsewhere.example.com.", 81).unwrap();
    catalog.add_instance(moved).unwrap();

    assert!(!catalog.has_answerer_for(&Fqdn::new("svc.example.com.").unwrap()));
    assert!(catalog.has_answerer_for(&Fqdn::new("elsewhere.example.com.").unwrap()));
    assert_eq!(catalog.index_len(), 4);

    let got = catalog
        .instance(
            &InstanceName::new("svc").unwrap(),
            &ServiceType::new("_http._tcp").unwrap(),
            &Fqdn::new("local.").unwrap(),
        )
        .unwrap();
    assert_eq!(got.target_port, 81);
}

#[test]
fn test_instance_enumeration_answer() {
    let catalog = catalog_with_addrs(&["192.0.2.1", "2001:db8::1"]);
    catalog.add_instance(external_instance()).unwrap();

    let answer = ask(&catalog, "_http._tcp.local.", DnsType::Ptr);

    // One shared PTR in the answer section.
    assert_eq!(answer.shared.answers.len(), 1);
    let ptr = &answer.shared.answers[0];
    assert_eq!(ptr.header.name.data, "_http._tcp.local.");
    assert_eq!(ptr.header.ttl, 120);
    assert_eq!(ptr_target(ptr), "svc._http._tcp.local.");

    // SRV, TXT and both address records as unique additionals.
    assert_eq!(answer.unique.additionals.len(), 4);

    let srv = answer.unique.additionals[0]
        .body
        .as_ref()
        .unwrap()
        .as_any()
        .downcast_ref::<SrvResource>()
        .unwrap();
    assert_eq!(srv.priority, 10);
    assert_eq!(srv.weight, 1);
    assert_eq!(srv.port, 80);
    assert_eq!(srv.target.data, "svc.example.com.");

    let txt = answer.unique.additionals[1]
        .body
        .as_ref()
        .unwrap()
        .as_any()
        .downcast_ref::<TxtResource>()
        .unwrap();
    assert!(txt.txt.is_empty());

    // Every address record's owner is the instance's target FQDN.
    let a = &answer.unique.additionals[2];
    assert_eq!(a.header.name.data, "svc.example.com.");
    assert!(a.body.as_ref().unwrap().as_any().is::<AResource>());

    let aaaa = &answer.unique.additionals[3];
    assert_eq!(aaaa.header.name.data, "svc.example.com.");
    assert!(aaaa.body.as_ref().unwrap().as_any().is::<AaaaResource>());
}

#[test]
fn test_enumeration_tolerates_resolver_failure() {
    struct FailingResolver;

    impl AddressResolver for FailingResolver {
        fn lookup_ip_addr(&self, host: &str) -> Result<Vec<IpAddr>> {
            Err(shared::error::Error::ErrHostNotFound(host.to_owned()))
        }
    }

    let catalog = Catalog::with_resolver(Arc::new(FailingResolver));
    catalog.add_instance(external_instance()).unwrap();

    let answer = ask(&catalog, "_http._tcp.local.", DnsType::Ptr);

    // The PTR, SRV and TXT records stand even without address records.
    assert_eq!(answer.shared.answers.len(), 1);
    assert_eq!(answer.unique.additionals.len(), 2);
}

#[test]
fn test_type_enumeration_lists_each_service_once() {
    let catalog = catalog_with_addrs(&[]);

    let mut a1 = Instance::new("one", "_http._tcp", "local.", "one.example.com.", 80).unwrap();
    a1.ttl = Duration::from_secs(500);
    let a2 = Instance::new("two", "_http._tcp", "local.", "two.example.com.", 80).unwrap();
    let b1 = Instance::new("three", "_ipp._tcp", "local.", "three.example.com.", 631).unwrap();

    catalog.add_instance(a1).unwrap();
    catalog.add_instance(a2).unwrap();
    catalog.add_instance(b1).unwrap();

    let answer = ask(&catalog, "_services._dns-sd._udp.local.", DnsType::Ptr);

    // Two services, two shared PTR records.
    assert_eq!(answer.shared.answers.len(), 2);
    assert!(answer.unique.is_empty());

    let mut targets = HashSet::new();
    for record in &answer.shared.answers {
        assert_eq!(record.header.name.data, "_services._dns-sd._udp.local.");
        targets.insert(ptr_target(record));

        // The TTL of a type-enumeration PTR is the maximum TTL among the
        // service's instances.
        let expected_ttl = if ptr_target(record) == "_http._tcp.local." {
            500
        } else {
            120
        };
        assert_eq!(record.header.ttl, expected_ttl);
    }

    assert_eq!(
        targets,
        HashSet::from(["_http._tcp.local.".to_owned(), "_ipp._tcp.local.".to_owned()])
    );
}

#[test]
fn test_instance_answer_any_vs_srv_vs_txt() {
    let catalog = catalog_with_addrs(&["192.0.2.1"]);
    catalog.add_instance(external_instance()).unwrap();

    // ANY: SRV and TXT in the answer section, addresses additional.
    let answer = ask(&catalog, "svc._http._tcp.local.", DnsType::All);
    assert_eq!(answer.unique.answers.len(), 2);
    assert!(answer.unique.answers[0]
        .body
        .as_ref()
        .unwrap()
        .as_any()
        .is::<SrvResource>());
    assert!(answer.unique.answers[1]
        .body
        .as_ref()
        .unwrap()
        .as_any()
        .is::<TxtResource>());
    assert_eq!(answer.unique.additionals.len(), 1);
    assert!(answer.shared.is_empty());

    // SRV: only the SRV record answers, addresses still additional.
    let answer = ask(&catalog, "svc._http._tcp.local.", DnsType::Srv);
    assert_eq!(answer.unique.answers.len(), 1);
    assert!(answer.unique.answers[0]
        .body
        .as_ref()
        .unwrap()
        .as_any()
        .is::<SrvResource>());
    assert_eq!(answer.unique.additionals.len(), 1);

    // TXT: only the TXT record, and no address logic at all.
    let answer = ask(&catalog, "svc._http._tcp.local.", DnsType::Txt);
    assert_eq!(answer.unique.answers.len(), 1);
    assert!(answer.unique.answers[0]
        .body
        .as_ref()
        .unwrap()
        .as_any()
        .is::<TxtResource>());
    assert!(answer.unique.additionals.is_empty());

    // Anything else: no records.
    let answer = ask(&catalog, "svc._http._tcp.local.", DnsType::A);
    assert!(answer.is_empty());
}

#[test]
fn test_target_host_answer_splits_by_family() {
    let catalog = catalog_with_addrs(&["192.0.2.1", "2001:db8::1"]);
    catalog.add_instance(external_instance()).unwrap();

    // ANY: both families in the answer section.
    let answer = ask(&catalog, "svc.example.com.", DnsType::All);
    assert_eq!(answer.unique.answers.len(), 2);
    assert!(answer.unique.additionals.is_empty());

    // A: v4 answers, v6 rides along as additional.
    let answer = ask(&catalog, "svc.example.com.", DnsType::A);
    assert_eq!(answer.unique.answers.len(), 1);
    assert!(answer.unique.answers[0]
        .body
        .as_ref()
        .unwrap()
        .as_any()
        .is::<AResource>());
    assert_eq!(answer.unique.additionals.len(), 1);
    assert!(answer.unique.additionals[0]
        .body
        .as_ref()
        .unwrap()
        .as_any()
        .is::<AaaaResource>());

    // AAAA: the mirror image.
    let answer = ask(&catalog, "svc.example.com.", DnsType::Aaaa);
    assert_eq!(answer.unique.answers.len(), 1);
    assert!(answer.unique.answers[0]
        .body
        .as_ref()
        .unwrap()
        .as_any()
        .is::<AaaaResource>());
    assert_eq!(answer.unique.additionals.len(), 1);

    // Other types are not for the target-host answerer.
    let answer = ask(&catalog, "svc.example.com.", DnsType::Txt);
    assert!(answer.is_empty());
}

#[test]
fn test_unknown_name_answers_nothing() {
    let catalog = catalog_with_addrs(&[]);
    catalog.add_instance(external_instance()).unwrap();

    let answer = ask(&catalog, "nobody._http._tcp.local.", DnsType::Ptr);
    assert!(answer.is_empty());
}

#[test]
fn test_escaped_instance_name_is_answerable() {
    let catalog = catalog_with_addrs(&["192.0.2.1"]);
    let instance = Instance::new("a.b\\c", "_http._tcp", "local.", "host.example.com.", 80).unwrap();
    catalog.add_instance(instance).unwrap();

    // The browse PTR names the escaped instance FQDN.
    let answer = ask(&catalog, "_http._tcp.local.", DnsType::Ptr);
    assert_eq!(ptr_target(&answer.shared.answers[0]), "a\\.b\\\\c._http._tcp.local.");

    // And a question for the escaped name reaches the instance answerer.
    let answer = ask(&catalog, "a\\.b\\\\c._http._tcp.local.", DnsType::Srv);
    assert_eq!(answer.unique.answers.len(), 1);

    // Round-tripping the escaped name recovers the raw label.
    let (raw, _) =
        dnssd::split_instance_name(&Fqdn::new("a\\.b\\\\c._http._tcp.local.").unwrap()).unwrap();
    assert_eq!(raw.as_raw_str(), "a.b\\c");
}

#[test]
fn test_local_target_host_resolves_via_inbound_interface() {
    let resolver = RecordingResolver::new(&["203.0.113.9"]);
    let catalog = Catalog::with_resolver(resolver.clone());

    // "host.local." lies within the advertised domain "local.", so its
    // addresses come from the interface the question arrived on, not
    // from the injected resolver.
    let instance = Instance::new("svc", "_http._tcp", "local.", "host.local.", 80).unwrap();
    catalog.add_instance(instance).unwrap();

    if let Some(iface) = shared::ifaces::interfaces()
        .ok()
        .and_then(|i| i.into_iter().next())
    {
        let answer = ask_on_interface(&catalog, "host.local.", DnsType::All, iface.index);

        // Exactly the inbound interface's addresses, as unique answers.
        let got: HashSet<IpAddr> = answer.unique.answers.iter().map(record_addr).collect();
        let want: HashSet<IpAddr> = iface.addrs.iter().copied().collect();
        assert_eq!(got, want);
        assert!(answer.shared.is_empty());
    }

    // Even when the inbound interface cannot be found, the failure is the
    // local resolver's: a direct host question surfaces it as an error
    // and the injected resolver is never consulted.
    let query = new_query(
        false,
        vec![DnsQuestion {
            name: WireName::new("host.local.").unwrap(),
            typ: DnsType::All,
            class: DNSCLASS_INET,
        }],
    );
    let mut answer = Answer::default();
    let result = catalog.answer(
        &Question {
            question: &query.questions[0],
            query: &query,
            interface_index: u32::MAX,
        },
        &mut answer,
    );
    assert!(result.is_err());
    assert!(answer.is_empty());
    assert!(!resolver.was_called());
}

#[test]
fn test_unqualified_target_host_resolves_locally() {
    let resolver = RecordingResolver::new(&["203.0.113.9"]);
    let catalog = Catalog::with_resolver(resolver.clone());

    // A relative target host qualifies into the advertised domain, so it
    // takes the same local path as an explicit "<host>.local.".
    let instance = Instance::new("svc", "_http._tcp", "local.", "myhost", 80).unwrap();
    catalog.add_instance(instance).unwrap();
    assert!(catalog.has_answerer_for(&Fqdn::new("myhost.local.").unwrap()));

    // Browsing on an unknown interface: the local lookup fails silently,
    // the PTR, SRV and TXT records stand, and the injected resolver
    // stays out of it.
    let answer = ask_on_interface(&catalog, "_http._tcp.local.", DnsType::Ptr, u32::MAX);
    assert_eq!(answer.shared.answers.len(), 1);
    assert_eq!(answer.unique.additionals.len(), 2);
    assert!(!resolver.was_called());

    if let Some(iface) = shared::ifaces::interfaces()
        .ok()
        .and_then(|i| i.into_iter().next())
    {
        let answer = ask_on_interface(&catalog, "_http._tcp.local.", DnsType::Ptr, iface.index);

        // SRV, TXT, plus one address record per interface address.
        assert_eq!(answer.unique.additionals.len(), 2 + iface.addrs.len());
        let got: HashSet<IpAddr> = answer.unique.additionals[2..]
            .iter()
            .map(record_addr)
            .collect();
        let want: HashSet<IpAddr> = iface.addrs.iter().copied().collect();
        assert_eq!(got, want);
        assert!(!resolver.was_called());
    }
}

#[test]
fn test_full_responder_path_sets_cache_flush_bits() {
    let catalog = catalog_with_addrs(&["192.0.2.1"]);
    catalog.add_instance(external_instance()).unwrap();

    let query = new_query(
        false,
        vec![DnsQuestion {
            name: WireName::new("_http._tcp.local.").unwrap(),
            typ: DnsType::Ptr,
            class: DNSCLASS_INET,
        }],
    );
    let source = mdns::transport::Endpoint {
        interface_index: 0,
        address: "192.168.1.20:5353".parse().unwrap(),
    };

    let (unicast, mut multicast) = mdns::answer_query(&catalog, &query, &source).unwrap();

    assert!(unicast.is_empty());
    assert_eq!(multicast.answers.len(), 1);
    assert_eq!(multicast.additionals.len(), 3);

    // The shared PTR is plain; every unique record carries the
    // cache-flush bit.
    assert!(!mdns::is_unique_record(&multicast.answers[0]));
    for record in &multicast.additionals {
        assert!(mdns::is_unique_record(record));
        assert_eq!(record.header.class.0, 0x8001);
    }

    // The frame survives a trip through the wire codec.
    let buf = multicast.pack().unwrap();
    let mut decoded = mdns::message::Message::default();
    decoded.unpack(&buf).unwrap();
    assert_eq!(decoded.answers.len(), 1);
    assert_eq!(decoded.additionals.len(), 3);
    assert_eq!(decoded.header.id, 0);
    assert!(decoded.header.authoritative);
}
