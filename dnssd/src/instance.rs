//! Service instances and the records that advertise them.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use mdns::message::{
    AResource, AaaaResource, DNSCLASS_INET, Name as WireName, PtrResource, Resource,
    ResourceHeader, SrvResource, TxtResource,
};

use crate::enumeration::instance_enum_fqdn;
use crate::instance_name::InstanceName;
use crate::names::{Fqdn, Name};
use crate::service_type::ServiceType;
use crate::text::Text;
use shared::error::{Error, Result};

/// The default TTL for all DNS records, in the absence of an explicit
/// one (RFC 6762 section 10).
pub const DEFAULT_TTL: Duration = Duration::from_secs(120);

/// A DNS-SD service instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    /// The human-readable service name.
    pub name: InstanceName,

    /// The DNS-SD service type, such as `_http._tcp`.
    pub service_type: ServiceType,

    /// The fully-qualified domain the instance is advertised within.
    /// Bonjour typically uses `local.`.
    pub domain: Fqdn,

    /// The hostname of the machine providing the service. If it is not
    /// fully qualified it is taken as relative to `domain`. It need not
    /// lie within the domain discovery is performed under.
    pub target_host: Name,

    /// The TCP/UDP port the service instance listens on.
    pub target_port: u16,

    /// SRV priority (RFC 2782).
    pub priority: u16,

    /// SRV weight (RFC 2782).
    pub weight: u16,

    /// The key/value pairs encoded in the instance's TXT record.
    pub text: Text,

    /// The TTL of the instance's DNS records. Zero means [`DEFAULT_TTL`].
    pub ttl: Duration,
}

impl Instance {
    /// Returns a new service instance with default priority, weight and
    /// TTL and an empty TXT map.
    pub fn new(
        name: &str,
        service_type: &str,
        domain: &str,
        target_host: &str,
        target_port: u16,
    ) -> Result<Instance> {
        let instance = Instance {
            name: InstanceName::new(name)?,
            service_type: ServiceType::new(service_type)?,
            domain: Fqdn::new(domain)?,
            target_host: Name::parse(target_host)?,
            target_port,
            priority: 10,
            weight: 1,
            text: Text::new(),
            ttl: Duration::ZERO,
        };

        instance.validate()?;
        Ok(instance)
    }

    /// Returns an error if the instance is configured incorrectly.
    pub fn validate(&self) -> Result<()> {
        if self.target_port == 0 {
            return Err(Error::ErrZeroTargetPort);
        }
        Ok(())
    }

    /// The fully-qualified instance name, with the instance label in its
    /// escaped form.
    pub fn fqdn(&self) -> Fqdn {
        self.name.qualify(&self.service_type.qualify(&self.domain))
    }

    /// The fully-qualified name of the target host.
    pub fn target_fqdn(&self) -> Fqdn {
        self.target_host.qualify(&self.domain)
    }

    /// The name queried to enumerate instances of this service.
    pub fn instance_enum_fqdn(&self) -> Fqdn {
        instance_enum_fqdn(&self.service_type, &self.domain)
    }

    /// The instance's record TTL in seconds, applying the default.
    pub fn ttl_secs(&self) -> u32 {
        let ttl = if self.ttl == Duration::ZERO {
            DEFAULT_TTL
        } else {
            self.ttl
        };
        ttl.as_secs() as u32
    }

    fn header(&self, owner: &Fqdn) -> ResourceHeader {
        ResourceHeader {
            name: WireName {
                data: owner.as_str().to_owned(),
            },
            class: DNSCLASS_INET,
            ttl: self.ttl_secs(),
            ..Default::default()
        }
    }

    /// The instance's enumeration PTR record.
    pub fn ptr(&self) -> Resource {
        Resource {
            header: self.header(&self.instance_enum_fqdn()),
            body: Some(Box::new(PtrResource::new(WireName {
                data: self.fqdn().as_str().to_owned(),
            }))),
        }
    }

    /// The instance's SRV record.
    pub fn srv(&self) -> Resource {
        Resource {
            header: self.header(&self.fqdn()),
            body: Some(Box::new(SrvResource {
                priority: self.priority,
                weight: self.weight,
                port: self.target_port,
                target: WireName {
                    data: self.target_fqdn().as_str().to_owned(),
                },
            })),
        }
    }

    /// The instance's TXT record.
    pub fn txt(&self) -> Resource {
        Resource {
            header: self.header(&self.fqdn()),
            body: Some(Box::new(TxtResource::new(self.text.pairs()))),
        }
    }

    /// An A record for the instance's target host.
    pub fn a(&self, ip: Ipv4Addr) -> Resource {
        Resource {
            header: self.header(&self.target_fqdn()),
            body: Some(Box::new(AResource::new(ip))),
        }
    }

    /// An AAAA record for the instance's target host.
    pub fn aaaa(&self, ip: Ipv6Addr) -> Resource {
        Resource {
            header: self.header(&self.target_fqdn()),
            body: Some(Box::new(AaaaResource::new(ip))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdns::message::DnsType;

    fn instance() -> Instance {
        Instance::new("svc", "_http._tcp", "local.", "svc.local.", 80).unwrap()
    }

    #[test]
    fn test_new_applies_defaults() {
        let i = instance();
        assert_eq!(i.priority, 10);
        assert_eq!(i.weight, 1);
        assert_eq!(i.ttl_secs(), 120);
        assert!(i.text.is_empty());
    }

    #[test]
    fn test_zero_port_is_rejected() {
        let result = Instance::new("svc", "_http._tcp", "local.", "svc.local.", 0);
        assert!(matches!(result, Err(Error::ErrZeroTargetPort)));
    }

    #[test]
    fn test_derived_names() {
        let i = instance();
        assert_eq!(i.fqdn().as_str(), "svc._http._tcp.local.");
        assert_eq!(i.target_fqdn().as_str(), "svc.local.");
        assert_eq!(i.instance_enum_fqdn().as_str(), "_http._tcp.local.");
    }

    #[test]
    fn test_relative_target_host_is_qualified() {
        let i = Instance::new("svc", "_http._tcp", "local.", "myhost", 80).unwrap();
        assert_eq!(i.target_fqdn().as_str(), "myhost.local.");
    }

    #[test]
    fn test_ptr_record() {
        let i = instance();
        let r = i.ptr();
        assert_eq!(r.header.name.data, "_http._tcp.local.");
        assert_eq!(r.header.ttl, 120);
        let body = r.body.unwrap();
        assert_eq!(body.real_type(), DnsType::Ptr);
        let ptr = body.as_any().downcast_ref::<PtrResource>().unwrap();
        assert_eq!(ptr.ptr.data, "svc._http._tcp.local.");
    }

    #[test]
    fn test_srv_record() {
        let mut i = instance();
        i.target_port = 8080;
        let r = i.srv();
        assert_eq!(r.header.name.data, "svc._http._tcp.local.");
        let srv = r
            .body
            .unwrap()
            .as_any()
            .downcast_ref::<SrvResource>()
            .unwrap()
            .clone();
        assert_eq!(srv.priority, 10);
        assert_eq!(srv.weight, 1);
        assert_eq!(srv.port, 8080);
        assert_eq!(srv.target.data, "svc.local.");
    }

    #[test]
    fn test_txt_record_pairs() {
        let mut i = instance();
        i.text.set("path", "/api").unwrap();
        let r = i.txt();
        let txt = r
            .body
            .unwrap()
            .as_any()
            .downcast_ref::<TxtResource>()
            .unwrap()
            .clone();
        assert_eq!(txt.txt, vec!["path=/api".to_owned()]);
    }

    #[test]
    fn test_address_record_owner_is_target() {
        let i = instance();
        let a = i.a("10.0.0.1".parse().unwrap());
        assert_eq!(a.header.name.data, "svc.local.");
        let aaaa = i.aaaa("fe80::1".parse().unwrap());
        assert_eq!(aaaa.header.name.data, "svc.local.");
    }

    #[test]
    fn test_escaped_instance_label_in_fqdn() {
        let i = Instance::new("a.b\\c", "_http._tcp", "local.", "host.local.", 80).unwrap();
        assert_eq!(i.fqdn().as_str(), "a\\.b\\\\c._http._tcp.local.");
    }

    #[test]
    fn test_explicit_ttl() {
        let mut i = instance();
        i.ttl = Duration::from_secs(4500);
        assert_eq!(i.ttl_secs(), 4500);
    }
}
