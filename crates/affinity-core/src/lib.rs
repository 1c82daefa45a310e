//! Affinity Core: identity, permission, role, resource and policy types.
//!
//! This crate provides the foundational types used across all Affinity
//! crates. It has no internal Affinity dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`identity`]: `scheme:id` identities and principals
//! - [`permission`]: Named permissions and permission maps
//! - [`role`]: Roles and the role registry
//! - [`resource`]: Resource kinds, resources, and the resource forest
//! - [`grant`]: Grant records
//! - [`policy`]: The read-only registries handed to the engines

#![doc = include_str!("../README.md")]

pub mod error;
pub mod grant;
pub mod identity;
pub mod permission;
pub mod policy;
pub mod resource;
pub mod role;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use grant::Grant;
pub use identity::{Identity, Principal};
pub use permission::{Permission, PermissionMap};
pub use policy::{NamedCapabilities, Policy, PolicyDocument, ResourceEntry};
pub use resource::{KindRegistry, Resource, ResourceKey, ResourceKind, ResourceTree};
pub use role::{Role, RoleMap};
