//! DNS-SD service type names.

use std::fmt;

use crate::names::{Fqdn, Label};
use shared::error::{Error, Result};

/// A DNS-SD service type, including the protocol, such as `_http._tcp`.
///
/// A service type is an unqualified name of exactly two labels, each
/// beginning with an underscore (RFC 6763 section 7).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceType(String);

impl ServiceType {
    /// Parses `s` as a service type.
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();

        let mut labels = s.split('.');
        let service = labels.next().unwrap_or("");
        let proto = labels.next().unwrap_or("");

        let two_underscore_labels = service.len() > 1
            && proto.len() > 1
            && service.starts_with('_')
            && proto.starts_with('_')
            && labels.next().is_none();

        if !two_underscore_labels {
            return Err(Error::ErrInvalidServiceType(s));
        }

        Ok(ServiceType(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the labels that form this name.
    pub fn labels(&self) -> Vec<Label> {
        self.0
            .split('.')
            .map(|l| Label::from_valid(l.to_owned()))
            .collect()
    }

    /// Returns a fully-qualified name produced by qualifying this type
    /// with `f`.
    pub fn qualify(&self, f: &Fqdn) -> Fqdn {
        Fqdn::from_valid(format!("{}.{}", self.0, f.as_str()))
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
