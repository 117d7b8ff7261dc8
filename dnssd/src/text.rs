//! The key/value pairs of a service instance's TXT record.

use std::collections::HashMap;

use shared::error::{Error, Result};

/// Returns an error if `k` is not a valid TXT record key.
///
/// Keys must be at least one character of printable ASCII (0x20-0x7E),
/// excluding `=` (RFC 6763 section 6.4).
pub fn validate_key(k: &str) -> Result<()> {
    let printable = !k.is_empty()
        && k.bytes().all(|b| (0x20..=0x7E).contains(&b) && b != b'=');

    if !printable {
        return Err(Error::ErrInvalidTextKey(k.to_owned()));
    }
    Ok(())
}

/// Returns an error if `v` is not a valid TXT record value.
///
/// Values are arbitrary octet strings (RFC 6763 section 6.5), so this
/// never fails; it exists for symmetry and future tightening.
pub fn validate_value(_v: &str) -> Result<()> {
    Ok(())
}

/// The key/value pairs encoded in a service instance's TXT record.
///
/// Keys are case-insensitive and stored lower-cased. An empty value is
/// legal and denotes a boolean "present" attribute. The specification
/// recommends keys be no longer than 9 characters, but since that is not
/// a strict requirement no such limit is enforced here.
///
/// See RFC 6763 section 6.1.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Text {
    m: HashMap<String, String>,
}

impl Text {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value associated with the key `k`.
    pub fn get(&self, k: &str) -> Option<&str> {
        self.m.get(&k.to_ascii_lowercase()).map(String::as_str)
    }

    /// Associates the value `v` with the key `k`.
    pub fn set(&mut self, k: &str, v: &str) -> Result<()> {
        validate_key(k)?;
        validate_value(v)?;
        self.m.insert(k.to_ascii_lowercase(), v.to_owned());
        Ok(())
    }

    /// Associates an empty value with `k` if `v` is true; otherwise
    /// deletes the value associated with `k`, if any.
    pub fn set_bool(&mut self, k: &str, v: bool) -> Result<()> {
        if v {
            self.set(k, "")
        } else {
            self.delete(k);
            Ok(())
        }
    }

    /// Returns true if `k` is present.
    ///
    /// This is the same as [`has`](Self::has) with a single key; it
    /// exists to better express intent when a key is used as a boolean
    /// attribute (RFC 6763 section 6.4).
    pub fn get_bool(&self, k: &str) -> bool {
        self.m.contains_key(&k.to_ascii_lowercase())
    }

    /// Returns true if all of the given keys are present.
    pub fn has(&self, keys: &[&str]) -> bool {
        keys.iter()
            .all(|k| self.m.contains_key(&k.to_ascii_lowercase()))
    }

    /// Removes the key `k`, if present.
    pub fn delete(&mut self, k: &str) {
        self.m.remove(&k.to_ascii_lowercase());
    }

    pub fn is_empty(&self) -> bool {
        self.m.is_empty()
    }

    pub fn len(&self) -> usize {
        self.m.len()
    }

    /// Returns the string form of each pair as it appears in the TXT
    /// record: `k=v`, or just `k` for empty values. Iteration order is
    /// unspecified.
    pub fn pairs(&self) -> Vec<String> {
        self.m
            .iter()
            .map(|(k, v)| {
                if v.is_empty() {
                    k.clone()
                } else {
                    format!("{k}={v}")
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_case_insensitive() {
        let mut text = Text::new();
        text.set("Path", "/api").unwrap();
        assert_eq!(text.get("path"), Some("/api"));
        assert_eq!(text.get("PATH"), Some("/api"));
        assert_eq!(text.len(), 1);
    }

    #[test]
    fn test_empty_value_is_boolean_present() {
        let mut text = Text::new();
        text.set_bool("tls", true).unwrap();
        assert!(text.get_bool("tls"));
        assert_eq!(text.get("tls"), Some(""));
        assert_eq!(text.pairs(), vec!["tls".to_owned()]);

        text.set_bool("tls", false).unwrap();
        assert!(!text.get_bool("tls"));
        assert!(text.is_empty());
    }

    #[test]
    fn test_pairs_format() {
        let mut text = Text::new();
        text.set("path", "/api").unwrap();
        let pairs = text.pairs();
        assert_eq!(pairs, vec!["path=/api".to_owned()]);
    }

    #[test]
    fn test_has() {
        let mut text = Text::new();
        text.set("a", "1").unwrap();
        text.set("b", "").unwrap();
        assert!(text.has(&["a", "b"]));
        assert!(!text.has(&["a", "c"]));
    }

    #[test]
    fn test_invalid_keys_are_rejected() {
        let mut text = Text::new();
        for k in ["", "a=b", "ke\u{7f}y", "caf\u{e9}"] {
            assert!(
                matches!(text.set(k, "v"), Err(Error::ErrInvalidTextKey(_))),
                "{k:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_any_value_is_accepted() {
        let mut text = Text::new();
        text.set("k", "spaces and = signs are fine").unwrap();
        assert_eq!(text.get("k"), Some("spaces and = signs are fine"));
    }
}
