//! The query engine.
//!
//! [`Access::can`] decides whether a principal holds a permission on a
//! resource:
//!
//! 1. A permission outside the resource kind's capabilities is never held.
//! 2. The ancestor chain `[resource, parent, grandparent, ...]` is built,
//!    bounded by [`EngineConfig::max_depth`].
//! 3. The principal's grants are read from the store once.
//! 4. Ancestors are visited closest first; for each grant on an ancestor,
//!    the role is resolved through the policy's role map and the first role
//!    conferring the permission answers `true`. Grants naming unknown roles
//!    are skipped.
//!
//! There is no explicit deny. Absence of a matching grant is the only
//! negative answer, and it is reported as `Ok(false)`, not an error.

use std::sync::Arc;

use affinity_core::{
    Grant, Permission, PermissionMap, Policy, Principal, Resource, ResourceKey, Result, Role,
};

use crate::config::EngineConfig;
use crate::store::GrantStore;

/// Answers permission queries against a grant store.
///
/// Holds no mutable state; share one instance across callers.
pub struct Access<S> {
    store: S,
    policy: Arc<Policy>,
    config: EngineConfig,
}

impl<S: GrantStore> Access<S> {
    /// Create an engine over `store` with the given policy.
    pub fn new(store: S, policy: Arc<Policy>) -> Self {
        Self {
            store,
            policy,
            config: EngineConfig::default(),
        }
    }

    /// Override the engine settings.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// The policy this engine resolves against.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether `principal` holds `permission` on `resource`.
    ///
    /// # Errors
    ///
    /// Only store failures and [`Error::DepthExceeded`](affinity_core::Error::DepthExceeded)
    /// are errors. Every authorization outcome is the boolean.
    pub async fn can(
        &self,
        principal: &Principal,
        permission: &Permission,
        resource: &Resource,
    ) -> Result<bool> {
        if !resource.capabilities().contains(permission) {
            log::debug!(
                "{principal} cannot {permission} on {}: not a {} capability",
                resource.key(),
                resource.kind().name()
            );
            return Ok(false);
        }

        let chain = self
            .policy
            .resources()
            .ancestors(resource, self.config.max_depth)?;
        let grants = self.store.list_grants(principal).await?;

        for key in &chain {
            for (grant, role) in self.roles_on(&grants, key) {
                if role.can(permission) {
                    log::debug!(
                        "{principal} can {permission} on {} via role '{}' on {key}",
                        resource.key(),
                        grant.role
                    );
                    return Ok(true);
                }
            }
        }

        log::debug!(
            "{principal} cannot {permission} on {}: no matching grant",
            resource.key()
        );
        Ok(false)
    }

    /// The role that applies closest to `resource`, with the resource it
    /// was granted on.
    ///
    /// This is the first grant [`can`](Self::can) consults. `None` when no
    /// grant with a known role exists anywhere on the ancestor chain.
    pub async fn effective_role(
        &self,
        principal: &Principal,
        resource: &Resource,
    ) -> Result<Option<(ResourceKey, Role)>> {
        let chain = self
            .policy
            .resources()
            .ancestors(resource, self.config.max_depth)?;
        let grants = self.store.list_grants(principal).await?;

        for key in chain {
            let closest = self.roles_on(&grants, &key).next().map(|(_, role)| role.clone());
            if let Some(role) = closest {
                return Ok(Some((key, role)));
            }
        }
        Ok(None)
    }

    /// Every permission `principal` holds on `resource`.
    ///
    /// The union of the capabilities of all roles held along the ancestor
    /// chain, restricted to the permissions legal on the resource's kind.
    pub async fn effective_permissions(
        &self,
        principal: &Principal,
        resource: &Resource,
    ) -> Result<PermissionMap> {
        let chain = self
            .policy
            .resources()
            .ancestors(resource, self.config.max_depth)?;
        let grants = self.store.list_grants(principal).await?;

        let mut held = PermissionMap::empty();
        for key in &chain {
            for (_, role) in self.roles_on(&grants, key) {
                held.extend_from(role.capabilities());
            }
        }
        Ok(held.intersection(resource.capabilities()))
    }

    /// Grants on exactly `key` whose role resolves, in store order.
    fn roles_on<'a>(
        &'a self,
        grants: &'a [Grant],
        key: &'a ResourceKey,
    ) -> impl Iterator<Item = (&'a Grant, &'a Role)> + 'a {
        grants
            .iter()
            .filter(move |g| g.matches(key))
            .filter_map(move |g| match self.policy.roles().get(&g.role) {
                Some(role) => Some((g, role)),
                None => {
                    log::warn!(
                        "Grant to {} on {key} names unknown role '{}'; skipping",
                        g.principal,
                        g.role
                    );
                    None
                }
            })
    }
}
