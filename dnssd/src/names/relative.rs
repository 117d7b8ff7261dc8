use std::fmt;

use super::{Fqdn, Label, Name};
use shared::error::{Error, Result};

/// An unqualified (relative) domain name of one or more labels, with no
/// trailing dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relative(String);

impl Relative {
    /// Parses `s` as a relative name.
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if s.is_empty() {
            return Err(Error::ErrEmptyName);
        }
        if s.starts_with('.') {
            return Err(Error::ErrLeadingDot(s));
        }
        if s.ends_with('.') {
            return Err(Error::ErrUnexpectedTrailingDot(s));
        }
        Ok(Relative(s))
    }

    pub(crate) fn from_valid(s: String) -> Self {
        Relative(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a fully-qualified name produced by qualifying this name
    /// with `f`.
    pub fn qualify(&self, f: &Fqdn) -> Fqdn {
        Fqdn::from_valid(format!("{}.{}", self.0, f.as_str()))
    }

    /// Returns the labels that form this name.
    pub fn labels(&self) -> Vec<Label> {
        self.0
            .split('.')
            .map(|l| Label::from_valid(l.to_owned()))
            .collect()
    }

    /// Splits the first label from the name. If the name has only a
    /// single label, the tail is `None`.
    pub fn split(&self) -> (Label, Option<Relative>) {
        match self.0.find('.') {
            None => (Label::from_valid(self.0.clone()), None),
            Some(i) => (
                Label::from_valid(self.0[..i].to_owned()),
                Some(Relative::from_valid(self.0[i + 1..].to_owned())),
            ),
        }
    }

    /// Returns the name produced by concatenating this name with `other`.
    pub fn join(&self, other: &Name) -> Name {
        match other {
            Name::Fqdn(f) => Name::Fqdn(self.qualify(f)),
            other => Name::Relative(Relative::from_valid(format!("{}.{other}", self.0))),
        }
    }
}

impl fmt::Display for Relative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
