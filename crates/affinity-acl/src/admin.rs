//! The mutation engine.
//!
//! [`Admin`] writes and removes grants. A principal holds at most one role
//! per resource: granting again replaces the earlier role.

use std::sync::Arc;

use affinity_core::{Error, Grant, Policy, Principal, Resource, Result};

use crate::store::GrantStore;

/// Grants and revokes roles through a grant store.
pub struct Admin<S> {
    store: S,
    policy: Arc<Policy>,
}

impl<S: GrantStore> Admin<S> {
    /// Create an engine over `store` with the given policy.
    pub fn new(store: S, policy: Arc<Policy>) -> Self {
        Self { store, policy }
    }

    /// The policy roles are validated against.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Grant `role` to `principal` on `resource`, replacing any role
    /// held there under any of the principal's identities.
    ///
    /// The new grant is recorded under the primary identity.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownRole`] if the role is not in the policy
    /// - [`Error::InvalidResource`] if the resource URI is empty
    /// - [`Error::Store`] if the write fails
    pub async fn grant(
        &self,
        principal: &Principal,
        role: &str,
        resource: &Resource,
    ) -> Result<()> {
        if !self.policy.roles().contains(role) {
            return Err(Error::UnknownRole(role.to_string()));
        }
        check_resource(resource)?;

        let grant = Grant::new(principal.primary().clone(), role, resource.key());
        self.store.upsert_grant(principal, grant).await?;
        log::info!("Granted role '{role}' to {principal} on {}", resource.key());
        Ok(())
    }

    /// Remove whatever role `principal` holds on exactly `resource`.
    ///
    /// Revoking a grant that does not exist succeeds. Grants on ancestors
    /// are untouched.
    pub async fn revoke(&self, principal: &Principal, resource: &Resource) -> Result<()> {
        check_resource(resource)?;
        self.store.remove_grant(principal, &resource.key()).await?;
        log::info!("Revoked grants of {principal} on {}", resource.key());
        Ok(())
    }

    /// Every grant held by `principal`, ordered by resource.
    pub async fn grants(&self, principal: &Principal) -> Result<Vec<Grant>> {
        let mut grants = self.store.list_grants(principal).await?;
        grants.sort_by(|a, b| {
            a.resource
                .cmp(&b.resource)
                .then_with(|| a.principal.cmp(&b.principal))
        });
        Ok(grants)
    }
}

fn check_resource(resource: &Resource) -> Result<()> {
    if resource.uri().is_empty() {
        return Err(Error::invalid_resource(format!(
            "empty URI for kind '{}'",
            resource.kind().name()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Access;
    use crate::fixtures::{FailingStore, perm, policy, principal, resource};
    use crate::store::MemoryGrantStore;
    use affinity_core::ResourceKey;

    fn engines() -> (Admin<MemoryGrantStore>, Access<MemoryGrantStore>) {
        let store = MemoryGrantStore::new();
        let policy = policy();
        (
            Admin::new(store.clone(), Arc::clone(&policy)),
            Access::new(store, policy),
        )
    }

    #[tokio::test]
    async fn test_grant_then_can() {
        let (admin, access) = engines();
        let ship = resource(admin.policy(), "spacecraft", "ship");
        let leela = principal("test:leela");

        admin.grant(&leela, "pilot", &ship).await.unwrap();
        assert!(access.can(&leela, &perm("control-ship"), &ship).await.unwrap());
    }

    #[tokio::test]
    async fn test_grant_unknown_role() {
        let (admin, _) = engines();
        let ship = resource(admin.policy(), "spacecraft", "ship");
        let err = admin
            .grant(&principal("test:zapp"), "captain", &ship)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownRole(ref r) if r == "captain"));
        assert!(admin.store().is_empty().await);
    }

    #[tokio::test]
    async fn test_grant_empty_uri() {
        let (admin, _) = engines();
        let nowhere = resource(admin.policy(), "spacecraft", "");
        let err = admin
            .grant(&principal("test:leela"), "pilot", &nowhere)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidResource(_)));
        assert!(admin.store().is_empty().await);
    }

    #[tokio::test]
    async fn test_unknown_role_checked_before_resource() {
        let (admin, _) = engines();
        let nowhere = resource(admin.policy(), "spacecraft", "");
        let err = admin
            .grant(&principal("test:leela"), "captain", &nowhere)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownRole(_)));
    }

    #[tokio::test]
    async fn test_regrant_replaces_role() {
        let (admin, access) = engines();
        let ship = resource(admin.policy(), "spacecraft", "ship");
        let fry = principal("test:fry");

        admin.grant(&fry, "pilot", &ship).await.unwrap();
        admin.grant(&fry, "passenger", &ship).await.unwrap();

        assert!(access.can(&fry, &perm("board-ship"), &ship).await.unwrap());
        assert!(!access.can(&fry, &perm("control-ship"), &ship).await.unwrap());
        assert_eq!(admin.grants(&fry).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_regrant_replaces_role_held_under_other_identity() {
        let (admin, access) = engines();
        let ship = resource(admin.policy(), "spacecraft", "ship");
        let usso = principal("usso:fry@planetexpress.com");
        let fry = principal("test:fry").with_identity(usso.primary().clone());

        admin.grant(&usso, "pilot", &ship).await.unwrap();
        admin.grant(&fry, "passenger", &ship).await.unwrap();

        let grants = admin.grants(&fry).await.unwrap();
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].role, "passenger");
        assert_eq!(&grants[0].principal, fry.primary());
        assert!(!access.can(&fry, &perm("control-ship"), &ship).await.unwrap());
        assert!(!access.can(&usso, &perm("board-ship"), &ship).await.unwrap());
    }

    #[tokio::test]
    async fn test_regrant_across_identities_on_file_store() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = crate::FileGrantStore::new(dir.path().join("grants.json"));
        let admin = Admin::new(store, policy());
        let ship = resource(admin.policy(), "spacecraft", "ship");
        let usso = principal("usso:fry@planetexpress.com");
        let fry = principal("test:fry").with_identity(usso.primary().clone());

        admin.grant(&usso, "pilot", &ship).await.unwrap();
        admin.grant(&fry, "passenger", &ship).await.unwrap();

        let roles: Vec<String> = admin
            .grants(&fry)
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.role)
            .collect();
        assert_eq!(roles, vec!["passenger".to_string()]);
    }

    #[tokio::test]
    async fn test_revoke() {
        let (admin, access) = engines();
        let ship = resource(admin.policy(), "spacecraft", "ship");
        let leela = principal("test:leela");

        admin.grant(&leela, "pilot", &ship).await.unwrap();
        admin.revoke(&leela, &ship).await.unwrap();
        assert!(!access.can(&leela, &perm("board-ship"), &ship).await.unwrap());

        // Idempotent.
        admin.revoke(&leela, &ship).await.unwrap();
    }

    #[tokio::test]
    async fn test_revoke_leaves_other_resources() {
        let (admin, access) = engines();
        let hq = resource(admin.policy(), "facilities", "planet-express-hq");
        let vending = resource(admin.policy(), "facilities", "vending-machine");
        let bender = principal("test:bender");

        admin.grant(&bender, "user", &hq).await.unwrap();
        admin.grant(&bender, "janitor", &vending).await.unwrap();
        admin.revoke(&bender, &vending).await.unwrap();

        // The ancestor grant still reaches the vending machine.
        assert!(access.can(&bender, &perm("use-thing"), &vending).await.unwrap());
        assert!(!access.can(&bender, &perm("fill-bucket"), &vending).await.unwrap());
    }

    #[tokio::test]
    async fn test_grants_sorted_by_resource() {
        let (admin, _) = engines();
        let bender = principal("test:bender");
        for uri in ["vending-machine", "planet-express-hq"] {
            let r = resource(admin.policy(), "facilities", uri);
            admin.grant(&bender, "user", &r).await.unwrap();
        }

        let keys: Vec<ResourceKey> = admin
            .grants(&bender)
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.resource)
            .collect();
        assert_eq!(
            keys,
            vec![
                ResourceKey::new("facilities", "planet-express-hq"),
                ResourceKey::new("facilities", "vending-machine"),
            ]
        );
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let admin = Admin::new(FailingStore, policy());
        let ship = resource(admin.policy(), "spacecraft", "ship");
        let leela = principal("test:leela");

        assert!(admin.grant(&leela, "pilot", &ship).await.unwrap_err().is_store());
        assert!(admin.revoke(&leela, &ship).await.unwrap_err().is_store());
        assert!(admin.grants(&leela).await.unwrap_err().is_store());
    }
}
