//! Handlers for the grant, revoke, check, roles and grants commands.

use std::process::ExitCode;
use std::sync::Arc;

use affinity_acl::{Access, Admin, FileGrantStore};
use affinity_core::{Permission, Policy, Principal, Result};

use crate::config::AffinityConfig;

/// What a command concluded, mapped onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command ran to completion.
    Done,
    /// A permission check passed.
    Allowed,
    /// A permission check failed.
    Denied,
}

impl Outcome {
    /// Process exit status: 0 unless a check was denied.
    pub fn code(self) -> u8 {
        match self {
            Outcome::Done | Outcome::Allowed => 0,
            Outcome::Denied => 1,
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        ExitCode::from(outcome.code())
    }
}

/// The query and mutation engines over the configured policy and store.
pub struct Engines {
    policy: Arc<Policy>,
    access: Access<FileGrantStore>,
    admin: Admin<FileGrantStore>,
}

impl Engines {
    /// Load the policy file and open the grant store named by `config`.
    pub fn open(config: &AffinityConfig) -> Result<Self> {
        let policy_path = config.policy_path()?;
        let policy = Arc::new(Policy::load(&policy_path)?);
        let store = FileGrantStore::new(config.store_path()?);
        tracing::debug!(
            policy = %policy_path.display(),
            store = %store.path().display(),
            "opened engines"
        );

        Ok(Self {
            access: Access::new(store.clone(), Arc::clone(&policy))
                .with_config(config.engine.clone()),
            admin: Admin::new(store, Arc::clone(&policy)),
            policy,
        })
    }

    /// `affinity grant`
    pub async fn grant(
        &self,
        principal: &str,
        role: &str,
        kind: &str,
        uri: &str,
    ) -> Result<Outcome> {
        let principal = Principal::parse(principal)?;
        let resource = self.policy.resource(kind, uri)?;
        self.admin.grant(&principal, role, &resource).await?;
        println!("Granted {role} to {principal} on {}", resource.key());
        Ok(Outcome::Done)
    }

    /// `affinity revoke`
    pub async fn revoke(&self, principal: &str, kind: &str, uri: &str) -> Result<Outcome> {
        let principal = Principal::parse(principal)?;
        let resource = self.policy.resource(kind, uri)?;
        self.admin.revoke(&principal, &resource).await?;
        println!("Revoked {principal} on {}", resource.key());
        Ok(Outcome::Done)
    }

    /// `affinity check`
    pub async fn check(
        &self,
        principal: &str,
        permission: &str,
        kind: &str,
        uri: &str,
    ) -> Result<Outcome> {
        let principal = Principal::parse(principal)?;
        let resource = self.policy.resource(kind, uri)?;
        let allowed = self
            .access
            .can(&principal, &Permission::new(permission), &resource)
            .await?;

        if allowed {
            println!("allowed");
            Ok(Outcome::Allowed)
        } else {
            println!("denied");
            Ok(Outcome::Denied)
        }
    }

    /// `affinity roles`
    pub async fn roles(&self, principal: &str, kind: &str, uri: &str) -> Result<Outcome> {
        let principal = Principal::parse(principal)?;
        let resource = self.policy.resource(kind, uri)?;

        match self.access.effective_role(&principal, &resource).await? {
            Some((granted_on, role)) => {
                println!("role: {} (granted on {granted_on})", role.name());
            }
            None => println!("role: none"),
        }
        let held = self
            .access
            .effective_permissions(&principal, &resource)
            .await?;
        println!("permissions: {}", held.names().join(", "));
        Ok(Outcome::Done)
    }

    /// `affinity grants`
    pub async fn grants(&self, principal: &str) -> Result<Outcome> {
        let principal = Principal::parse(principal)?;
        let grants = self.admin.grants(&principal).await?;
        if grants.is_empty() {
            println!("{principal} holds no grants");
        }
        for grant in grants {
            println!("{}\t{}\t{}", grant.resource, grant.role, grant.principal);
        }
        Ok(Outcome::Done)
    }
}

// ============================================================================
// Tests
// ============================================================================
