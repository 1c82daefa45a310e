//! Shared test policy: a small Planet Express domain.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use affinity_core::{
    Error, Grant, KindRegistry, Permission, PermissionMap, Policy, Principal, Resource,
    ResourceKey, ResourceKind, ResourceTree, Result, Role, RoleMap,
};
use async_trait::async_trait;

use crate::GrantStore;

pub fn perm(name: &str) -> Permission {
    Permission::new(name)
}

pub fn principal(s: &str) -> Principal {
    Principal::parse(s).unwrap()
}

fn caps(names: &[&str]) -> PermissionMap {
    PermissionMap::from_names(names.iter().copied()).unwrap()
}

pub fn policy() -> Arc<Policy> {
    let kinds = KindRegistry::new([
        ResourceKind::new("facilities", caps(&["empty-bucket", "fill-bucket", "use-thing"])),
        ResourceKind::new("spacecraft", caps(&["board-ship", "control-ship"])),
        ResourceKind::new("medical", caps(&["perform-surgery"])),
    ])
    .unwrap();
    let roles = RoleMap::new([
        Role::new("janitor", caps(&["empty-bucket", "fill-bucket"])),
        Role::new("user", caps(&["use-thing"])),
        Role::new("pilot", caps(&["board-ship", "control-ship"])),
        Role::new("passenger", caps(&["board-ship"])),
        Role::new("doctor", caps(&["perform-surgery"])),
    ])
    .unwrap();
    let mut tree = ResourceTree::new();
    let building = resource_of(&kinds, "facilities", "planet-express-hq");
    tree.insert(&building).unwrap();
    tree.insert(&resource_of(&kinds, "facilities", "vending-machine").with_parent(&building))
        .unwrap();
    Arc::new(Policy::new(kinds, roles, tree))
}

fn resource_of(kinds: &KindRegistry, kind: &str, uri: &str) -> Resource {
    Resource::new(kinds.get(kind).unwrap(), uri)
}

pub fn resource(policy: &Policy, kind: &str, uri: &str) -> Resource {
    policy.resource(kind, uri).unwrap()
}

/// A store whose every call fails.
pub struct FailingStore;

#[async_trait]
impl GrantStore for FailingStore {
    async fn list_grants(&self, _principal: &Principal) -> Result<Vec<Grant>> {
        Err(Error::store("connection refused"))
    }

    async fn upsert_grant(&self, _holder: &Principal, _grant: Grant) -> Result<()> {
        Err(Error::store("read-only replica"))
    }

    async fn remove_grant(&self, _principal: &Principal, _resource: &ResourceKey) -> Result<()> {
        Err(Error::store("read-only replica"))
    }
}
