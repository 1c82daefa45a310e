//! Grant storage abstraction and implementations.
//!
//! The engines only ever talk to a [`GrantStore`]. Persistence technology,
//! encoding and atomicity of concurrent upserts are the store's business.

mod file;
mod memory;

use std::sync::Arc;

use affinity_core::{Grant, Principal, ResourceKey, Result};
use async_trait::async_trait;

pub use file::FileGrantStore;
pub use memory::MemoryGrantStore;

/// Durable set of grants.
///
/// Implementations report their own failures as
/// [`Error::Store`](affinity_core::Error::Store) and must be safe for
/// concurrent reads and writes.
#[async_trait]
pub trait GrantStore: Send + Sync {
    /// All grants recorded under any of `principal`'s identities.
    async fn list_grants(&self, principal: &Principal) -> Result<Vec<Grant>>;

    /// Record `grant` for `holder`, replacing whatever grant any of the
    /// holder's identities has on the same resource.
    ///
    /// The replacement is atomic: readers see either the old grants or the
    /// new one, never both.
    async fn upsert_grant(&self, holder: &Principal, grant: Grant) -> Result<()>;

    /// Remove the grant `principal` holds on `resource`.
    ///
    /// Removing a grant that does not exist is not an error.
    async fn remove_grant(&self, principal: &Principal, resource: &ResourceKey) -> Result<()>;
}

#[async_trait]
impl<S: GrantStore + ?Sized> GrantStore for Arc<S> {
    async fn list_grants(&self, principal: &Principal) -> Result<Vec<Grant>> {
        (**self).list_grants(principal).await
    }

    async fn upsert_grant(&self, holder: &Principal, grant: Grant) -> Result<()> {
        (**self).upsert_grant(holder, grant).await
    }

    async fn remove_grant(&self, principal: &Principal, resource: &ResourceKey) -> Result<()> {
        (**self).remove_grant(principal, resource).await
    }
}
