//! Grant records.
//!
//! A [`Grant`] says that a principal holds a role on a resource and, by
//! the query engine's ancestor-chain resolution, on that resource's
//! descendants. At most one grant exists per (identity, resource) pair.

use serde::{Deserialize, Serialize};

use crate::{Identity, Principal, ResourceKey};

/// A durable (principal, role, resource) association.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grant {
    /// The identity the grant is recorded under.
    pub principal: Identity,
    /// Role name, resolved through the role map at query time.
    pub role: String,
    /// The resource the role is scoped to.
    pub resource: ResourceKey,
}

impl Grant {
    /// Create a grant.
    pub fn new(principal: Identity, role: impl Into<String>, resource: ResourceKey) -> Self {
        Self {
            principal,
            role: role.into(),
            resource,
        }
    }

    /// Whether this grant is scoped to exactly `resource`.
    pub fn matches(&self, resource: &ResourceKey) -> bool {
        &self.resource == resource
    }

    /// Whether this grant was recorded under one of `principal`'s identities.
    pub fn is_for(&self, principal: &Principal) -> bool {
        principal.has_identity(&self.principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant() -> Grant {
        Grant::new(
            Identity::parse("test:scruffy").unwrap(),
            "janitor",
            ResourceKey::new("facilities", "facilities:bucket"),
        )
    }

    #[test]
    fn test_grant_matches_exact_key() {
        let g = grant();
        assert!(g.matches(&ResourceKey::new("facilities", "facilities:bucket")));
        assert!(!g.matches(&ResourceKey::new("facilities", "walrus:bucket")));
        assert!(!g.matches(&ResourceKey::new("spacecraft", "facilities:bucket")));
    }

    #[test]
    fn test_grant_is_for_any_identity() {
        let g = grant();
        let scruffy = Principal::parse("usso:scruffy@planetexpress.com")
            .unwrap()
            .with_identity(Identity::parse("test:scruffy").unwrap());
        assert!(g.is_for(&scruffy));
        assert!(!g.is_for(&Principal::parse("test:fry").unwrap()));
    }

    #[test]
    fn test_grant_json_shape() {
        let json = serde_json::to_value(grant()).unwrap();
        assert_eq!(json["principal"], "test:scruffy");
        assert_eq!(json["role"], "janitor");
        assert_eq!(json["resource"]["kind"], "facilities");
        assert_eq!(json["resource"]["uri"], "facilities:bucket");
    }
}
