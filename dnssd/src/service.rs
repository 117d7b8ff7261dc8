//! A DNS-SD service: the set of instances sharing one service type.

use std::collections::HashMap;

use mdns::message::{DNSCLASS_INET, Name as WireName, PtrResource, Resource, ResourceHeader};

use crate::enumeration::{instance_enum_fqdn, type_enum_fqdn};
use crate::instance::Instance;
use crate::instance_name::InstanceName;
use crate::names::Fqdn;
use crate::service_type::ServiceType;
use shared::error::{Error, Result};

/// A DNS-SD service: a service type within a domain, and its instances.
#[derive(Debug, Clone)]
pub struct Service {
    /// The DNS-SD service type, such as `_http._tcp`.
    pub service_type: ServiceType,

    /// The fully-qualified domain the service is advertised within.
    pub domain: Fqdn,

    /// The instances of this service, keyed by instance name.
    pub instances: HashMap<InstanceName, Instance>,
}

impl Service {
    pub fn new(service_type: ServiceType, domain: Fqdn) -> Self {
        Service {
            service_type,
            domain,
            instances: HashMap::new(),
        }
    }

    /// The name queried to enumerate this service's instances.
    pub fn instance_enum_fqdn(&self) -> Fqdn {
        instance_enum_fqdn(&self.service_type, &self.domain)
    }

    /// The service's PTR record, as queried when performing service type
    /// enumeration (RFC 6763 section 9).
    ///
    /// Returns `None` if the service has no instances. The TTL is the
    /// maximum TTL across the service's instances.
    pub fn ptr(&self) -> Option<Resource> {
        if self.instances.is_empty() {
            return None;
        }

        let ttl = self
            .instances
            .values()
            .map(Instance::ttl_secs)
            .max()
            .unwrap_or(0);

        Some(Resource {
            header: ResourceHeader {
                name: WireName {
                    data: type_enum_fqdn(&self.domain).as_str().to_owned(),
                },
                class: DNSCLASS_INET,
                ttl,
                ..Default::default()
            },
            body: Some(Box::new(PtrResource::new(WireName {
                data: self.instance_enum_fqdn().as_str().to_owned(),
            }))),
        })
    }

    /// Returns an error if the service is configured incorrectly.
    pub fn validate(&self) -> Result<()> {
        for (name, instance) in &self.instances {
            if &instance.name != name || instance.service_type != self.service_type {
                return Err(Error::ErrMisfiledInstance(
                    instance.name.as_raw_str().to_owned(),
                ));
            }
            instance.validate()?;
        }
        Ok(())
    }
}
