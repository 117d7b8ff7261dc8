//! Service instance labels and their DNS-SD escaping.

use std::fmt;

use crate::names::Fqdn;
use shared::error::{Error, Result};

/// The leftmost label of a service instance name.
///
/// Instance names are human-readable and may contain raw dots and
/// backslashes. When the label is rendered into a DNS name, dots are
/// escaped as `\.` and backslashes as `\\`, per the customary DNS
/// text-file convention (RFC 6763 section 4.3). The value held here is
/// the raw, unescaped form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceName(String);

impl InstanceName {
    /// Creates an instance name from its raw (unescaped) form.
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if s.is_empty() {
            return Err(Error::ErrEmptyName);
        }
        Ok(InstanceName(s))
    }

    /// The raw, unescaped name.
    pub fn as_raw_str(&self) -> &str {
        &self.0
    }

    /// Returns a fully-qualified name produced by qualifying the escaped
    /// label with `f`.
    pub fn qualify(&self, f: &Fqdn) -> Fqdn {
        Fqdn::from_valid(format!("{self}.{}", f.as_str()))
    }
}

// Displays the escaped form, as used in DNS names.
impl fmt::Display for InstanceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            if c == '.' || c == '\\' {
                f.write_str("\\")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Parses the first backslash-escaped label off `name`.
///
/// Returns the decoded instance name and the remainder of the name, or
/// `None` if `name` holds only a single label.
pub fn split_instance_name(name: &Fqdn) -> Result<(InstanceName, Option<Fqdn>)> {
    let s = name.as_str();
    let mut head = String::with_capacity(s.len());
    let mut esc = false;

    for (i, c) in s.char_indices() {
        if esc {
            // accept any character after a backslash
            head.push(c);
            esc = false;
        } else if c == '\\' {
            esc = true;
        } else if c == '.' {
            let tail = if i < s.len() - 1 {
                Some(Fqdn::new(&s[i + 1..])?)
            } else {
                None
            };
            return Ok((InstanceName::new(head)?, tail));
        } else {
            head.push(c);
        }
    }

    // The name ended midway through an escape sequence; assume it was
    // intended to end with a backslash.
    if esc {
        head.push('\\');
    }

    Ok((InstanceName::new(head)?, None))
}
