//! In-memory grant store.

use std::collections::HashMap;
use std::sync::Arc;

use affinity_core::{Grant, Identity, Principal, ResourceKey, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::GrantStore;

type GrantKey = (Identity, ResourceKey);

/// Grant store backed by a `HashMap`.
///
/// Clones share the same underlying map, so one handle can be given to
/// [`Access`](crate::Access) and another to [`Admin`](crate::Admin).
/// Upserts are atomic under the write lock; the last writer wins.
#[derive(Clone, Default)]
pub struct MemoryGrantStore {
    grants: Arc<RwLock<HashMap<GrantKey, Grant>>>,
}

impl MemoryGrantStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with grants.
    ///
    /// Later grants for the same identity and resource replace earlier ones.
    pub fn with_grants(grants: impl IntoIterator<Item = Grant>) -> Self {
        let map = grants
            .into_iter()
            .map(|g| ((g.principal.clone(), g.resource.clone()), g))
            .collect();
        Self {
            grants: Arc::new(RwLock::new(map)),
        }
    }

    /// Total number of grants held.
    pub async fn len(&self) -> usize {
        self.grants.read().await.len()
    }

    /// Whether the store holds no grants.
    pub async fn is_empty(&self) -> bool {
        self.grants.read().await.is_empty()
    }
}

#[async_trait]
impl GrantStore for MemoryGrantStore {
    async fn list_grants(&self, principal: &Principal) -> Result<Vec<Grant>> {
        let grants = self.grants.read().await;
        Ok(grants
            .values()
            .filter(|g| g.is_for(principal))
            .cloned()
            .collect())
    }

    async fn upsert_grant(&self, holder: &Principal, grant: Grant) -> Result<()> {
        let mut grants = self.grants.write().await;
        for identity in holder.identities() {
            grants.remove(&(identity.clone(), grant.resource.clone()));
        }
        grants.insert((grant.principal.clone(), grant.resource.clone()), grant);
        Ok(())
    }

    async fn remove_grant(&self, principal: &Principal, resource: &ResourceKey) -> Result<()> {
        let mut grants = self.grants.write().await;
        for identity in principal.identities() {
            grants.remove(&(identity.clone(), resource.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn bucket() -> ResourceKey {
        ResourceKey::new("facilities", "facilities:bucket")
    }

    fn scruffy() -> Principal {
        Principal::parse("test:scruffy").unwrap()
    }

    fn janitor_grant() -> Grant {
        Grant::new(scruffy().primary().clone(), "janitor", bucket())
    }

    #[tokio::test]
    async fn test_memory_store_upsert_and_list() {
        let store = MemoryGrantStore::new();
        store
            .upsert_grant(&scruffy(), janitor_grant())
            .await
            .unwrap();

        let grants = store.list_grants(&scruffy()).await.unwrap();
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].role, "janitor");

        let fry = Principal::parse("test:fry").unwrap();
        assert!(store.list_grants(&fry).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_upsert_replaces() {
        let store = MemoryGrantStore::new();
        let id = scruffy().primary().clone();
        store
            .upsert_grant(&scruffy(), Grant::new(id.clone(), "janitor", bucket()))
            .await
            .unwrap();
        store
            .upsert_grant(&scruffy(), Grant::new(id, "user", bucket()))
            .await
            .unwrap();

        assert_eq!(store.len().await, 1);
        let grants = store.list_grants(&scruffy()).await.unwrap();
        assert_eq!(grants[0].role, "user");
    }

    #[tokio::test]
    async fn test_memory_store_upsert_replaces_across_identities() {
        let usso = Identity::parse("usso:scruffy@planetexpress.com").unwrap();
        let store = MemoryGrantStore::with_grants([Grant::new(usso.clone(), "user", bucket())]);

        let both = scruffy().with_identity(usso);
        store.upsert_grant(&both, janitor_grant()).await.unwrap();

        let grants = store.list_grants(&both).await.unwrap();
        assert_eq!(grants, vec![janitor_grant()]);
    }

    #[tokio::test]
    async fn test_memory_store_remove_is_idempotent() {
        let store = MemoryGrantStore::with_grants([Grant::new(
            scruffy().primary().clone(),
            "janitor",
            bucket(),
        )]);

        store.remove_grant(&scruffy(), &bucket()).await.unwrap();
        assert!(store.is_empty().await);
        store.remove_grant(&scruffy(), &bucket()).await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_store_lists_every_identity() {
        let usso = Identity::parse("usso:scruffy@planetexpress.com").unwrap();
        let store = MemoryGrantStore::with_grants([
            janitor_grant(),
            Grant::new(
                usso.clone(),
                "user",
                ResourceKey::new("facilities", "vending-machine"),
            ),
        ]);

        let both = scruffy().with_identity(usso);
        assert_eq!(store.list_grants(&both).await.unwrap().len(), 2);
        assert_eq!(store.list_grants(&scruffy()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_state() {
        let a = MemoryGrantStore::new();
        let b = a.clone();
        a.upsert_grant(&scruffy(), janitor_grant())
            .await
            .unwrap();
        assert_eq!(b.len().await, 1);
    }
}
