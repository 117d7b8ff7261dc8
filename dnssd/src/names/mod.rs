//! Typed DNS names.
//!
//! Three shapes of name exist, with validation at construction:
//!
//! - [`Label`]: a single label, no dots.
//! - [`Relative`]: one or more labels, no trailing dot; meaningful only
//!   relative to some domain.
//! - [`Fqdn`]: an absolute name in trailing-dot form.
//!
//! [`Name`] is the closed sum of the three, as parsed from free text.
//! Qualifying a relative name or label against an [`Fqdn`] yields an
//! [`Fqdn`]; qualifying an [`Fqdn`] is the identity. Joining onto a
//! fully-qualified name is a type error rather than a runtime one:
//! [`Fqdn`] simply has no `join`.


mod fqdn;
mod label;
mod relative;

use std::fmt;

pub use fqdn::Fqdn;
pub use label::Label;
pub use relative::Relative;

use shared::error::{Error, Result};

/// An internet name of some kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Name {
    Label(Label),
    Relative(Relative),
    Fqdn(Fqdn),
}

impl Name {
    /// Parses an arbitrary internet name.
    pub fn parse(s: &str) -> Result<Name> {
        if !s.contains('.') {
            Ok(Name::Label(Label::new(s)?))
        } else if s.ends_with('.') {
            Ok(Name::Fqdn(Fqdn::new(s)?))
        } else {
            Ok(Name::Relative(Relative::new(s)?))
        }
    }

    /// Returns true if the name is fully-qualified.
    pub fn is_qualified(&self) -> bool {
        matches!(self, Name::Fqdn(_))
    }

    /// Returns a fully-qualified name produced by qualifying this name
    /// with `f`. A name that is already qualified is returned unchanged.
    pub fn qualify(&self, f: &Fqdn) -> Fqdn {
        match self {
            Name::Label(l) => l.qualify(f),
            Name::Relative(r) => r.qualify(f),
            Name::Fqdn(q) => q.clone(),
        }
    }

    /// Returns the labels that form this name.
    pub fn labels(&self) -> Vec<Label> {
        match self {
            Name::Label(l) => vec![l.clone()],
            Name::Relative(r) => r.labels(),
            Name::Fqdn(f) => f.labels(),
        }
    }

    /// Splits the first label from the name. If the name has only a
    /// single label, the tail is `None`.
    pub fn split(&self) -> (Label, Option<Name>) {
        match self {
            Name::Label(l) => (l.clone(), None),
            Name::Relative(r) => {
                let (head, tail) = r.split();
                (head, tail.map(Name::Relative))
            }
            Name::Fqdn(f) => {
                let (head, tail) = f.split();
                (head, tail.map(Name::Fqdn))
            }
        }
    }

    /// Returns the name produced by concatenating this name with `other`.
    /// Joining onto a fully-qualified name is illegal.
    pub fn join(&self, other: &Name) -> Result<Name> {
        match self {
            Name::Label(l) => Ok(l.join(other)),
            Name::Relative(r) => Ok(r.join(other)),
            Name::Fqdn(f) => Err(Error::ErrJoinQualified(f.as_str().to_owned())),
        }
    }

    /// The name as used by DNS systems.
    pub fn as_str(&self) -> &str {
        match self {
            Name::Label(l) => l.as_str(),
            Name::Relative(r) => r.as_str(),
            Name::Fqdn(f) => f.as_str(),
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
