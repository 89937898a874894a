//! Primitive types and newtypes for type-safe resource identification.
//!
//! This module provides strongly-typed wrappers so that resource references
//! and version tokens cannot be mixed up with arbitrary strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A reference to a resource, written as `owner:name`.
///
/// # Example
///
/// ```
/// use resource_pager::Reference;
///
/// let reference: Reference = "demo:content-1".parse().unwrap();
/// assert_eq!(reference.owner(), "demo");
/// assert_eq!(reference.name(), "content-1");
/// assert_eq!(reference.to_string(), "demo:content-1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Reference {
    owner: String,
    name: String,
}

impl Reference {
    /// Create a new reference from its owner and name.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// The owner part of the reference.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The name part of the reference.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Join references into a single comma-separated path segment.
    pub(crate) fn join(references: &[Reference]) -> String {
        references
            .iter()
            .map(Reference::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.owner, self.name)
    }
}

impl FromStr for Reference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() => {
                Ok(Self::new(owner, name))
            }
            _ => Err(Error::InvalidReference(s.to_string())),
        }
    }
}

impl TryFrom<String> for Reference {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Reference> for String {
    fn from(reference: Reference) -> Self {
        reference.to_string()
    }
}

/// An opaque version token used for optimistic-concurrency writes.
///
/// The server hands out a new version on every successful write; sending
/// the last seen version back as an `If-Match` precondition makes an update
/// fail instead of silently overwriting someone else's change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    /// Create a new version token.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the version as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The quoted entity-tag form used in an `If-Match` header.
    pub fn if_match_value(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_parse() {
        let reference: Reference = "demo:content-1".parse().unwrap();
        assert_eq!(reference.owner(), "demo");
        assert_eq!(reference.name(), "content-1");
        assert_eq!(reference.to_string(), "demo:content-1");
    }

    #[test]
    fn test_reference_invalid() {
        assert!("no-separator".parse::<Reference>().is_err());
        assert!(":name".parse::<Reference>().is_err());
        assert!("owner:".parse::<Reference>().is_err());
    }

    #[test]
    fn test_reference_serde() {
        let reference: Reference = serde_json::from_str("\"demo:c1\"").unwrap();
        assert_eq!(reference, Reference::new("demo", "c1"));
        assert_eq!(serde_json::to_string(&reference).unwrap(), "\"demo:c1\"");
        assert!(serde_json::from_str::<Reference>("\"broken\"").is_err());
    }

    #[test]
    fn test_reference_join() {
        let refs = [Reference::new("a", "1"), Reference::new("a", "2")];
        assert_eq!(Reference::join(&refs), "a:1,a:2");
    }

    #[test]
    fn test_version_if_match() {
        let version = Version::new("8f3c");
        assert_eq!(version.if_match_value(), "\"8f3c\"");
    }
}
