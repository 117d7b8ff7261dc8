//! The service catalog: the registry of advertised instances and the
//! answerers that speak for them.
//!
//! The catalog is a three-level tree (domain, service type, instance)
//! paired with an index from every answerable FQDN to a location in that
//! tree. Every mutation rebuilds the affected index entries, so that for
//! each registered instance the index holds exactly four entries: the
//! domain's type-enumeration name, the service's instance-enumeration
//! name, the instance's own name, and its target host.
//!
//! Lookups take the shared lock and never block each other; registration
//! takes the exclusive lock and never holds it across I/O.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use mdns::answer::{Answer, Answerer, Question};
use mdns::message::{DnsType, Resource};
use mdns::resolver::{AddressResolver, LocalResolver, SystemResolver};

use crate::domain::Domain;
use crate::enumeration::{instance_enum_fqdn, type_enum_fqdn};
use crate::instance::Instance;
use crate::instance_name::InstanceName;
use crate::names::Fqdn;
use crate::service::Service;
use crate::service_type::ServiceType;
use shared::error::Result;

// Where in the tree an index entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AnswerTarget {
    // Service type enumeration for a domain (RFC 6763 section 9).
    TypeEnum {
        domain: Fqdn,
    },
    // Instance enumeration ("browsing") for a service (RFC 6763 section 4).
    InstanceEnum {
        domain: Fqdn,
        service_type: ServiceType,
    },
    // The records of one instance.
    Instance {
        domain: Fqdn,
        service_type: ServiceType,
        name: InstanceName,
    },
    // The address records of one instance's target host.
    TargetHost {
        domain: Fqdn,
        service_type: ServiceType,
        name: InstanceName,
    },
}

#[derive(Default)]
struct Inner {
    domains: HashMap<Fqdn, Domain>,
    index: HashMap<Fqdn, AnswerTarget>,
}

/// A registry of DNS-SD service instances that answers mDNS questions
/// about them.
pub struct Catalog {
    resolver: Arc<dyn AddressResolver>,
    inner: RwLock<Inner>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Returns an empty catalog that resolves non-local target hosts
    /// through the operating system's resolver.
    pub fn new() -> Self {
        Self::with_resolver(Arc::new(SystemResolver))
    }

    /// Returns an empty catalog with a caller-supplied resolver for
    /// target hosts outside the advertised domain.
    pub fn with_resolver(resolver: Arc<dyn AddressResolver>) -> Self {
        Catalog {
            resolver,
            inner: RwLock::new(Inner::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Adds a service instance to the catalog, replacing any instance
    /// already registered under the same name, service type and domain.
    ///
    /// Registered records are not conflict-checked against other
    /// responders on the link; probing (RFC 6762 section 8) is not
    /// implemented.
    pub fn add_instance(&self, instance: Instance) -> Result<()> {
        instance.validate()?;

        let mut inner = self.write();
        let Inner { domains, index } = &mut *inner;

        let domain = match domains.entry(instance.domain.clone()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                index.insert(
                    type_enum_fqdn(&instance.domain),
                    AnswerTarget::TypeEnum {
                        domain: instance.domain.clone(),
                    },
                );
                e.insert(Domain::new(instance.domain.clone()))
            }
        };

        let service = match domain.services.entry(instance.service_type.clone()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                index.insert(
                    instance_enum_fqdn(&instance.service_type, &instance.domain),
                    AnswerTarget::InstanceEnum {
                        domain: instance.domain.clone(),
                        service_type: instance.service_type.clone(),
                    },
                );
                e.insert(Service::new(
                    instance.service_type.clone(),
                    instance.domain.clone(),
                ))
            }
        };

        // Replacing an instance: the previous registration's target host
        // entry goes away before the new entries are written.
        if let Some(previous) = service.instances.get(&instance.name) {
            index.remove(&previous.target_fqdn());
        }

        index.insert(
            instance.fqdn(),
            AnswerTarget::Instance {
                domain: instance.domain.clone(),
                service_type: instance.service_type.clone(),
                name: instance.name.clone(),
            },
        );
        index.insert(
            instance.target_fqdn(),
            AnswerTarget::TargetHost {
                domain: instance.domain.clone(),
                service_type: instance.service_type.clone(),
                name: instance.name.clone(),
            },
        );

        service.instances.insert(instance.name.clone(), instance);
        Ok(())
    }

    /// Removes a service instance from the catalog. Removing an instance
    /// that is not registered is a no-op.
    ///
    /// When the last instance of a service is removed the service and its
    /// enumeration entry are removed too, and likewise for the domain.
    pub fn remove_instance(&self, name: &InstanceName, service_type: &ServiceType, domain: &Fqdn) {
        let mut inner = self.write();
        let Inner { domains, index } = &mut *inner;

        let Some(d) = domains.get_mut(domain) else {
            return;
        };
        let Some(s) = d.services.get_mut(service_type) else {
            return;
        };
        let Some(instance) = s.instances.remove(name) else {
            return;
        };

        index.remove(&instance.target_fqdn());
        index.remove(&instance.fqdn());

        if s.instances.is_empty() {
            index.remove(&s.instance_enum_fqdn());
            d.services.remove(service_type);
        }

        if d.services.is_empty() {
            index.remove(&type_enum_fqdn(domain));
            domains.remove(domain);
        }
    }

    /// Returns a copy of the registered instance, if any.
    pub fn instance(
        &self,
        name: &InstanceName,
        service_type: &ServiceType,
        domain: &Fqdn,
    ) -> Option<Instance> {
        let inner = self.read();
        inner
            .domains
            .get(domain)?
            .services
            .get(service_type)?
            .instances
            .get(name)
            .cloned()
    }

    /// Returns true if the catalog has no registered instances.
    pub fn is_empty(&self) -> bool {
        self.read().domains.is_empty()
    }

    /// The number of names the catalog can answer for.
    pub fn index_len(&self) -> usize {
        self.read().index.len()
    }

    /// Returns true if the catalog can answer questions about `name`.
    pub fn has_answerer_for(&self, name: &Fqdn) -> bool {
        self.read().index.contains_key(name)
    }

    fn answer_type_enum(
        &self,
        inner: &Inner,
        domain: &Fqdn,
        question: &Question<'_>,
        answer: &mut Answer,
    ) -> Result<()> {
        if !matches!(question.question.typ, DnsType::Ptr | DnsType::All) {
            return Ok(());
        }
        let Some(domain) = inner.domains.get(domain) else {
            return Ok(());
        };

        // One shared PTR per service that has at least one instance.
        for service in domain.services.values() {
            if let Some(record) = service.ptr() {
                answer.shared.answer(record);
            }
        }
        Ok(())
    }

    fn answer_instance_enum(
        &self,
        inner: &Inner,
        domain: &Fqdn,
        service_type: &ServiceType,
        question: &Question<'_>,
        answer: &mut Answer,
    ) -> Result<()> {
        if !matches!(question.question.typ, DnsType::Ptr | DnsType::All) {
            return Ok(());
        }
        let Some(service) = inner
            .domains
            .get(domain)
            .and_then(|d| d.services.get(service_type))
        else {
            return Ok(());
        };

        for instance in service.instances.values() {
            answer.shared.answer(instance.ptr());

            // When including an enumeration PTR record in a response, the
            // responder should include the SRV and TXT records it names,
            // and the address records those name in turn (RFC 6763
            // section 12.1).
            answer.unique.additional(instance.srv());
            answer.unique.additional(instance.txt());

            match self.resolve_address_records(instance, question.interface_index) {
                Ok((v4, v6)) => {
                    for record in v4.into_iter().chain(v6) {
                        answer.unique.additional(record);
                    }
                }
                Err(err) => {
                    // Enumeration tolerates unresolvable targets; the PTR,
                    // SRV and TXT records stand on their own.
                    log::debug!(
                        "no address records for '{}': {err}",
                        instance.target_fqdn(),
                    );
                }
            }
        }
        Ok(())
    }

    fn answer_instance(
        &self,
        inner: &Inner,
        domain: &Fqdn,
        service_type: &ServiceType,
        name: &InstanceName,
        question: &Question<'_>,
        answer: &mut Answer,
    ) -> Result<()> {
        let Some(instance) = lookup_instance(inner, domain, service_type, name) else {
            return Ok(());
        };

        let mut has_srv = false;
        match question.question.typ {
            DnsType::All => {
                has_srv = true;
                answer.unique.answer(instance.srv());
                answer.unique.answer(instance.txt());
            }
            DnsType::Srv => {
                has_srv = true;
                answer.unique.answer(instance.srv());
            }
            DnsType::Txt => {
                answer.unique.answer(instance.txt());
            }
            _ => {}
        }

        // When including an SRV record in a response, the responder
        // should include the address records named in its rdata
        // (RFC 6763 section 12.2).
        if has_srv {
            match self.resolve_address_records(instance, question.interface_index) {
                Ok((v4, v6)) => {
                    for record in v4.into_iter().chain(v6) {
                        answer.unique.additional(record);
                    }
                }
                Err(err) => {
                    log::debug!(
                        "no address records for '{}': {err}",
                        instance.target_fqdn(),
                    );
                }
            }
        }
        Ok(())
    }

    fn answer_target_host(
        &self,
        inner: &Inner,
        domain: &Fqdn,
        service_type: &ServiceType,
        name: &InstanceName,
        question: &Question<'_>,
        answer: &mut Answer,
    ) -> Result<()> {
        if !matches!(
            question.question.typ,
            DnsType::A | DnsType::Aaaa | DnsType::All
        ) {
            return Ok(());
        }
        let Some(instance) = lookup_instance(inner, domain, service_type, name) else {
            return Ok(());
        };

        // Unlike the enumerators, a direct question about the host is
        // answerable only by resolving it; failure surfaces to the caller.
        let (v4, v6) = self.resolve_address_records(instance, question.interface_index)?;

        match question.question.typ {
            DnsType::All => {
                for record in v4.into_iter().chain(v6) {
                    answer.unique.answer(record);
                }
            }
            DnsType::A => {
                for record in v4 {
                    answer.unique.answer(record);
                }
                for record in v6 {
                    answer.unique.additional(record);
                }
            }
            DnsType::Aaaa => {
                for record in v6 {
                    answer.unique.answer(record);
                }
                for record in v4 {
                    answer.unique.additional(record);
                }
            }
            _ => {}
        }
        Ok(())
    }

    // Returns the A and AAAA records for the instance's target host.
    //
    // Hosts under the advertised domain resolve to the addresses of the
    // interface the question arrived on, so that every answer carries
    // addresses reachable from the querier's link. Anything else goes
    // through the injected resolver.
    fn resolve_address_records(
        &self,
        instance: &Instance,
        interface_index: u32,
    ) -> Result<(Vec<Resource>, Vec<Resource>)> {
        let host = instance.target_fqdn();

        let ips = if host.is_within(&instance.domain) {
            LocalResolver { interface_index }.lookup_ip_addr(host.as_str())?
        } else {
            self.resolver.lookup_ip_addr(host.as_str())?
        };

        let mut v4 = Vec::new();
        let mut v6 = Vec::new();
        for ip in ips {
            match ip {
                std::net::IpAddr::V4(ip) => v4.push(instance.a(ip)),
                std::net::IpAddr::V6(ip) => v6.push(instance.aaaa(ip)),
            }
        }
        Ok((v4, v6))
    }
}

fn lookup_instance<'a>(
    inner: &'a Inner,
    domain: &Fqdn,
    service_type: &ServiceType,
    name: &InstanceName,
) -> Option<&'a Instance> {
    inner
        .domains
        .get(domain)?
        .services
        .get(service_type)?
        .instances
        .get(name)
}

impl Answerer for Catalog {
    fn answer(&self, question: &Question<'_>, answer: &mut Answer) -> Result<()> {
        let inner = self.read();

        let Ok(name) = Fqdn::new(question.question.name.data.as_str()) else {
            return Ok(());
        };
        let Some(target) = inner.index.get(&name) else {
            return Ok(());
        };

        match target {
            AnswerTarget::TypeEnum { domain } => {
                self.answer_type_enum(&inner, domain, question, answer)
            }
            AnswerTarget::InstanceEnum {
                domain,
                service_type,
            } => self.answer_instance_enum(&inner, domain, service_type, question, answer),
            AnswerTarget::Instance {
                domain,
                service_type,
                name,
            } => self.answer_instance(&inner, domain, service_type, name, question, answer),
            AnswerTarget::TargetHost {
                domain,
                service_type,
                name,
            } => self.answer_target_host(&inner, domain, service_type, name, question, answer),
        }
    }
}
