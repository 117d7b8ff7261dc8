use std::fmt;

use super::Label;
use shared::error::{Error, Result};

/// A fully-qualified internet domain name, in trailing-dot form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fqdn(String);

// Returns the byte index of the first dot in `s` that is not preceded by
// an odd number of backslashes, i.e. a real label boundary.
fn unescaped_dot(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut esc = false;
    for (i, &b) in bytes.iter().enumerate() {
        if esc {
            esc = false;
        } else if b == b'\\' {
            esc = true;
        } else if b == b'.' {
            return Some(i);
        }
    }
    None
}

impl Fqdn {
    /// Parses `s` as a fully-qualified name.
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if s.is_empty() {
            return Err(Error::ErrEmptyName);
        }
        if s.starts_with('.') && s != "." {
            return Err(Error::ErrLeadingDot(s));
        }
        if !s.ends_with('.') {
            return Err(Error::ErrMissingTrailingDot(s));
        }
        Ok(Fqdn(s))
    }

    pub(crate) fn from_valid(s: String) -> Self {
        Fqdn(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the labels that form this name. Escaped dots do not
    /// terminate a label.
    pub fn labels(&self) -> Vec<Label> {
        let mut labels = Vec::new();
        let mut s = self.0.as_str();
        while let Some(i) = unescaped_dot(s) {
            labels.push(Label::from_valid(s[..i].to_owned()));
            s = &s[i + 1..];
        }
        labels
    }

    /// Splits the first label from the name. If the name has only a
    /// single label, the tail is `None`.
    pub fn split(&self) -> (Label, Option<Fqdn>) {
        let i = unescaped_dot(&self.0).unwrap_or(self.0.len() - 1);
        let head = Label::from_valid(self.0[..i].to_owned());
        let tail = &self.0[i + 1..];
        if tail.is_empty() {
            (head, None)
        } else {
            (head, Some(Fqdn::from_valid(tail.to_owned())))
        }
    }

    /// Returns true if this name equals `suffix` or lies beneath it.
    ///
    /// The match is on label boundaries: a name only shares a suffix with
    /// another if the remainder is separated by a real (unescaped) dot.
    pub fn is_within(&self, suffix: &Fqdn) -> bool {
        if self == suffix {
            return true;
        }
        if self.0.len() <= suffix.0.len() || !self.0.ends_with(&suffix.0) {
            return false;
        }

        // The byte before the suffix must be a dot that is a real label
        // boundary, not an escaped character.
        let boundary = self.0.len() - suffix.0.len() - 1;
        let bytes = self.0.as_bytes();
        if bytes[boundary] != b'.' {
            return false;
        }
        let backslashes = bytes[..boundary]
            .iter()
            .rev()
            .take_while(|&&b| b == b'\\')
            .count();
        backslashes % 2 == 0
    }
}

impl fmt::Display for Fqdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
