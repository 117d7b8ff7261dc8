//! The well-known enumeration names of DNS-SD.

use crate::names::{Fqdn, Label, Relative};
use crate::service_type::ServiceType;

// The relative name queried for service type enumeration.
const TYPE_ENUM_NAME: &str = "_services._dns-sd._udp";

/// Returns the DNS name that is queried to perform "service type
/// enumeration" for a single domain (RFC 6763 section 9).
pub fn type_enum_fqdn(domain: &Fqdn) -> Fqdn {
    Relative::from_valid(TYPE_ENUM_NAME.to_owned()).qualify(domain)
}

/// Returns the DNS name that is queried to perform "service instance
/// enumeration", also known as browsing, on a service within a domain
/// (RFC 6763 section 4).
pub fn instance_enum_fqdn(service_type: &ServiceType, domain: &Fqdn) -> Fqdn {
    service_type.qualify(domain)
}

/// Returns the DNS name that is queried to perform "selective instance
/// enumeration" for a service sub-type within a domain (RFC 6763
/// section 7.1).
pub fn subtype_enum_fqdn(subtype: &Label, service_type: &ServiceType, domain: &Fqdn) -> Fqdn {
    Fqdn::from_valid(format!(
        "{subtype}._sub.{service_type}.{}",
        domain.as_str()
    ))
}
