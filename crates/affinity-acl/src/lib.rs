//! Access control engines for Affinity.
//!
//! This crate decides whether a principal holds a permission on a
//! resource, and records grants of roles to principals over resources.
//!
//! # Modules
//!
//! - [`access`]: The query engine
//! - [`admin`]: The mutation engine
//! - [`store`]: The grant store trait and its implementations
//! - [`config`]: Engine settings
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use affinity_acl::{Access, Admin, MemoryGrantStore};
//! use affinity_core::{Permission, Policy, Principal};
//!
//! # tokio_test::block_on(async {
//! let policy = Arc::new(Policy::from_toml_str(r#"
//!     [[kinds]]
//!     name = "facilities"
//!     capabilities = ["empty-bucket", "fill-bucket"]
//!
//!     [[roles]]
//!     name = "janitor"
//!     capabilities = ["empty-bucket", "fill-bucket"]
//! "#).unwrap());
//!
//! let store = MemoryGrantStore::new();
//! let admin = Admin::new(store.clone(), Arc::clone(&policy));
//! let access = Access::new(store, Arc::clone(&policy));
//!
//! let scruffy = Principal::parse("test:scruffy").unwrap();
//! let bucket = policy.resource("facilities", "facilities:bucket").unwrap();
//!
//! admin.grant(&scruffy, "janitor", &bucket).await.unwrap();
//! assert!(access.can(&scruffy, &Permission::new("empty-bucket"), &bucket).await.unwrap());
//! # });
//! ```

#![doc = include_str!("../README.md")]

pub mod access;
pub mod admin;
pub mod config;
pub mod store;

#[cfg(test)]
mod fixtures;

pub use access::Access;
pub use admin::Admin;
pub use config::{DEFAULT_MAX_DEPTH, EngineConfig};
pub use store::{FileGrantStore, GrantStore, MemoryGrantStore};
