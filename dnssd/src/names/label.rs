use std::fmt;

use super::{Fqdn, Name, Relative};
use shared::error::{Error, Result};

/// A single DNS label: the part of a name contained within dots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(String);

impl Label {
    /// Parses `s` as a label.
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if s.is_empty() {
            return Err(Error::ErrEmptyName);
        }
        if s.contains('.') {
            return Err(Error::ErrDotsInLabel(s));
        }
        Ok(Label(s))
    }

    pub(crate) fn from_valid(s: String) -> Self {
        Label(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a fully-qualified name produced by qualifying this label
    /// with `f`.
    pub fn qualify(&self, f: &Fqdn) -> Fqdn {
        Fqdn::from_valid(format!("{}.{}", self.0, f.as_str()))
    }

    /// Returns the name produced by concatenating this label with `other`.
    pub fn join(&self, other: &Name) -> Name {
        match other {
            Name::Fqdn(f) => Name::Fqdn(self.qualify(f)),
            other => Name::Relative(Relative::from_valid(format!("{}.{other}", self.0))),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
