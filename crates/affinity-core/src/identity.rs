//! Identities and principals.
//!
//! An [`Identity`] names an actor within one authentication scheme, written
//! canonically as `scheme:id`. A [`Principal`] groups every identity known
//! to belong to the same actor. Access control compares principals by
//! identity, never by any internal surrogate key.
//!
//! Authentication happens elsewhere: by the time a string reaches
//! [`Identity::parse`] it has already been verified.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Separator between scheme and id in the canonical form.
pub const SEPARATOR: char = ':';

/// A scheme-qualified actor identifier.
///
/// # Example
///
/// ```
/// use affinity_core::Identity;
///
/// let id = Identity::parse("usso:fry@planetexpress.com").unwrap();
/// assert_eq!(id.scheme(), "usso");
/// assert_eq!(id.id(), "fry@planetexpress.com");
/// assert_eq!(id.to_string(), "usso:fry@planetexpress.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity {
    scheme: String,
    id: String,
}

impl Identity {
    /// Create an identity from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedIdentity`] if either part is empty or the
    /// scheme contains the separator.
    pub fn new(scheme: impl Into<String>, id: impl Into<String>) -> Result<Self> {
        let scheme = scheme.into();
        let id = id.into();
        if scheme.is_empty() || id.is_empty() || scheme.contains(SEPARATOR) {
            return Err(Error::malformed_identity(format!("{scheme}{SEPARATOR}{id}")));
        }
        Ok(Self { scheme, id })
    }

    /// Parse the canonical `scheme:id` form.
    ///
    /// Splits on the first separator, so ids may themselves contain `:`.
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once(SEPARATOR) {
            Some((scheme, id)) => Self::new(scheme, id),
            None => Err(Error::malformed_identity(s)),
        }
    }

    /// The authentication scheme (e.g. a provider name).
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The id, opaque within its scheme.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.scheme, SEPARATOR, self.id)
    }
}

impl FromStr for Identity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identity {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.to_string()
    }
}

/// An actor, known by one or more identities.
///
/// The first identity is the primary one; grants written through the admin
/// engine are recorded under it. Lookups consider every identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    identities: Vec<Identity>,
}

impl Principal {
    /// Parse a principal from a single canonical identity string.
    pub fn parse(s: &str) -> Result<Self> {
        Identity::parse(s).map(Self::from)
    }

    /// Add another identity for the same actor. Duplicates are ignored.
    pub fn with_identity(mut self, identity: Identity) -> Self {
        if !self.identities.contains(&identity) {
            self.identities.push(identity);
        }
        self
    }

    /// The identity grants are recorded under.
    pub fn primary(&self) -> &Identity {
        &self.identities[0]
    }

    /// All identities, primary first.
    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    /// Whether `identity` belongs to this principal.
    pub fn has_identity(&self, identity: &Identity) -> bool {
        self.identities.contains(identity)
    }

    /// Whether two principals share at least one identity.
    pub fn same_actor(&self, other: &Principal) -> bool {
        self.identities.iter().any(|id| other.has_identity(id))
    }
}

impl From<Identity> for Principal {
    fn from(identity: Identity) -> Self {
        Self {
            identities: vec![identity],
        }
    }
}

impl FromStr for Principal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.primary())
    }
}
