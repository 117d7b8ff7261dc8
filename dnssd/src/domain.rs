//! An internet domain that has DNS-SD service instances.

use std::collections::HashMap;

use crate::enumeration::type_enum_fqdn;
use crate::names::Fqdn;
use crate::service::Service;
use crate::service_type::ServiceType;
use shared::error::{Error, Result};

/// An internet domain and the DNS-SD services advertised within it.
#[derive(Debug, Clone)]
pub struct Domain {
    /// The fully-qualified name of the domain, such as `local.`.
    pub name: Fqdn,

    /// The services within the domain, keyed by service type.
    pub services: HashMap<ServiceType, Service>,
}

impl Domain {
    pub fn new(name: Fqdn) -> Self {
        Domain {
            name,
            services: HashMap::new(),
        }
    }

    /// The name queried to enumerate this domain's service types.
    pub fn type_enum_fqdn(&self) -> Fqdn {
        type_enum_fqdn(&self.name)
    }

    /// Returns an error if the domain is configured incorrectly.
    pub fn validate(&self) -> Result<()> {
        for (service_type, service) in &self.services {
            if &service.service_type != service_type || service.domain != self.name {
                return Err(Error::ErrMisfiledService(
                    service.service_type.as_str().to_owned(),
                ));
            }
            service.validate()?;
        }
        Ok(())
    }
}
