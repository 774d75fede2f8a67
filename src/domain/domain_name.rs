//! Tenant domain name value object.

use super::errors::{PrimitiveKind, ValidationError, Violation};
use super::text_rules::{check_charset, check_length};
use super::value_object::{impl_value_object_serde, ValueObject};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fully qualified host name such as `eu.acme.example.com`, stored lower-cased.
///
/// Hierarchy queries walk the labels from the right: the last label is the
/// TLD, the last two form the root domain, everything further left is a
/// subdomain.
///
/// # Validation Rules
///
/// - At most 253 characters, at least two labels
/// - Each label 1 to 63 characters of `a-z`, `0-9` and `-`, not starting or ending with `-`
/// - The TLD is alphabetic and at least two characters
///
/// # Example
///
/// ```
/// use tenant_primitives::domain::DomainName;
///
/// let domain = DomainName::new("EU.Acme.example.com").unwrap();
/// assert!(domain.is_subdomain());
/// assert_eq!(domain.root_domain(), "example.com");
/// assert_eq!(domain.parent().unwrap().as_str(), "acme.example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainName {
    value: String,
}

impl DomainName {
    pub const MAX_LEN: usize = 253;
    pub const MAX_LABEL_LEN: usize = 63;

    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let value = raw.as_ref().trim().trim_end_matches('.').to_ascii_lowercase();
        Self { value }.checked()
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Labels from left to right.
    pub fn labels(&self) -> Vec<&str> {
        self.value.split('.').collect()
    }

    pub fn label_count(&self) -> usize {
        self.value.split('.').count()
    }

    pub fn tld(&self) -> &str {
        self.value.rsplit('.').next().unwrap_or(&self.value)
    }

    /// The registrable domain: the last two labels.
    pub fn root_domain(&self) -> &str {
        match self.value.rmatch_indices('.').nth(1) {
            Some((idx, _)) => &self.value[idx + 1..],
            None => &self.value,
        }
    }

    pub fn is_subdomain(&self) -> bool {
        self.label_count() > 2
    }

    /// The domain one level up, or `None` for a root domain.
    pub fn parent(&self) -> Option<DomainName> {
        if !self.is_subdomain() {
            return None;
        }
        self.value.split_once('.').map(|(_, rest)| DomainName {
            value: rest.to_string(),
        })
    }

    /// The leftmost label of a subdomain, e.g. `"eu"` for `eu.acme.example.com`.
    pub fn subdomain_label(&self) -> Option<&str> {
        if self.is_subdomain() {
            self.value.split('.').next()
        } else {
            None
        }
    }

    /// Parents from nearest to the root domain.
    pub fn ancestors(&self) -> Vec<DomainName> {
        let mut out = Vec::new();
        let mut current = self.parent();
        while let Some(domain) = current {
            current = domain.parent();
            out.push(domain);
        }
        out
    }

    /// True when `self` sits strictly below `other` in the hierarchy.
    pub fn is_subdomain_of(&self, other: &DomainName) -> bool {
        let mine = self.value.rsplit('.');
        let theirs: Vec<&str> = other.value.rsplit('.').collect();
        let mut depth = 0;
        for (a, b) in mine.zip(theirs.iter()) {
            if a != *b {
                return false;
            }
            depth += 1;
        }
        depth == theirs.len() && self.label_count() > theirs.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainNameRepr {
    pub value: String,
}

impl ValueObject for DomainName {
    type Repr = DomainNameRepr;
    const KIND: PrimitiveKind = PrimitiveKind::DomainName;

    fn validate(&self) -> Result<(), ValidationError> {
        let v = &self.value;
        check_length(Self::KIND, v, 1, Self::MAX_LEN)?;
        check_charset(Self::KIND, v, |c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.'
        })?;

        let labels: Vec<&str> = v.split('.').collect();
        if labels.len() < 2 {
            return Err(ValidationError::new(
                Self::KIND,
                v.as_str(),
                Violation::Format("at least two labels are required".to_string()),
            ));
        }
        for label in &labels {
            if label.is_empty() {
                return Err(ValidationError::new(
                    Self::KIND,
                    v.as_str(),
                    Violation::ConsecutiveSeparators,
                ));
            }
            if label.len() > Self::MAX_LABEL_LEN {
                return Err(ValidationError::new(
                    Self::KIND,
                    v.as_str(),
                    Violation::Format(format!(
                        "label {label:?} exceeds {} characters",
                        Self::MAX_LABEL_LEN
                    )),
                ));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(ValidationError::new(
                    Self::KIND,
                    v.as_str(),
                    Violation::EdgeSeparator,
                ));
            }
        }

        let tld = labels[labels.len() - 1];
        if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(ValidationError::new(
                Self::KIND,
                v.as_str(),
                Violation::Format(format!("{tld:?} is not a valid top-level domain")),
            ));
        }
        Ok(())
    }

    fn canonical_string(&self) -> String {
        self.value.clone()
    }

    fn to_repr(&self) -> DomainNameRepr {
        DomainNameRepr {
            value: self.value.clone(),
        }
    }

    fn from_repr(repr: DomainNameRepr) -> Result<Self, ValidationError> {
        Self::new(repr.value)
    }
}

impl_value_object_serde!(DomainName);

impl FromStr for DomainName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_valid() {
        let d = DomainName::new("Acme.Example.COM.").unwrap();
        assert_eq!(d.as_str(), "acme.example.com");
        assert_eq!(d.labels(), vec!["acme", "example", "com"]);
        assert_eq!(d.tld(), "com");
    }

    #[test]
    fn test_domain_invalid() {
        assert!(DomainName::new("localhost").is_err());
        assert!(DomainName::new("acme..com").is_err());
        assert!(DomainName::new("-acme.com").is_err());
        assert!(DomainName::new("acme-.com").is_err());
        assert!(DomainName::new("acme.c").is_err());
        assert!(DomainName::new("acme.c0m").is_err());
        assert!(DomainName::new("ac_me.com").is_err());
        assert!(DomainName::new(format!("{}.com", "a".repeat(64))).is_err());
        assert!(DomainName::new(format!("{}.com", "a".repeat(63))).is_ok());
    }

    #[test]
    fn test_domain_hierarchy() {
        let d = DomainName::new("api.eu.acme.io").unwrap();
        assert!(d.is_subdomain());
        assert_eq!(d.root_domain(), "acme.io");
        assert_eq!(d.subdomain_label(), Some("api"));
        let ancestors: Vec<String> = d.ancestors().iter().map(|a| a.to_string()).collect();
        assert_eq!(ancestors, vec!["eu.acme.io", "acme.io"]);
    }

    #[test]
    fn test_root_domain_has_no_parent() {
        let d = DomainName::new("acme.io").unwrap();
        assert!(!d.is_subdomain());
        assert_eq!(d.root_domain(), "acme.io");
        assert!(d.parent().is_none());
        assert!(d.subdomain_label().is_none());
        assert!(d.ancestors().is_empty());
    }

    #[test]
    fn test_is_subdomain_of() {
        let root = DomainName::new("acme.io").unwrap();
        let child = DomainName::new("eu.acme.io").unwrap();
        let grandchild = DomainName::new("api.eu.acme.io").unwrap();
        let lookalike = DomainName::new("eu.notacme.io").unwrap();

        assert!(child.is_subdomain_of(&root));
        assert!(grandchild.is_subdomain_of(&root));
        assert!(grandchild.is_subdomain_of(&child));
        assert!(!root.is_subdomain_of(&root));
        assert!(!root.is_subdomain_of(&child));
        assert!(!lookalike.is_subdomain_of(&root));
    }

    #[test]
    fn test_domain_round_trip() {
        let d = DomainName::new("eu.acme.io").unwrap();
        let json = d.to_json().unwrap();
        assert_eq!(json, r#"{"value":"eu.acme.io"}"#);
        assert_eq!(DomainName::from_json(&json).unwrap(), d);
    }
}
