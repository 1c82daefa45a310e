//! Error types for Affinity operations.
//!
//! This module provides the common `Error` type and `Result<T>` alias used
//! across all Affinity crates. Uses `thiserror` for derive macros.
//!
//! Authorization outcomes are never errors: a permission that does not apply
//! to a resource kind, or a principal with no matching grant, is reported as
//! `Ok(false)` by the query engine. The variants below cover malformed input,
//! policy construction mistakes, and storage failures.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur in Affinity operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Principal string is not in `scheme:id` form.
    #[error("Malformed identity: {0}")]
    MalformedIdentity(String),

    /// A permission name appears more than once in a permission map.
    #[error("Duplicate permission: {0}")]
    DuplicatePermission(String),

    /// A role name appears more than once in a role map.
    #[error("Duplicate role: {0}")]
    DuplicateRole(String),

    /// A resource kind is declared more than once.
    #[error("Duplicate resource kind: {0}")]
    DuplicateKind(String),

    /// A resource is registered more than once in the resource tree.
    #[error("Duplicate resource: {0}")]
    DuplicateResource(String),

    /// A resource references a kind that was never declared.
    #[error("Unknown resource kind: {0}")]
    UnknownKind(String),

    /// A grant references a role absent from the role map.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Malformed resource reference (e.g. empty URI).
    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    /// The ancestor chain of a resource is longer than the configured bound.
    #[error("Ancestor chain of '{uri}' exceeds {limit} levels")]
    DepthExceeded {
        /// URI of the resource whose chain was being built.
        uri: String,
        /// The configured maximum depth.
        limit: usize,
    },

    /// Underlying grant storage failure.
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error with the path that caused it.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a malformed identity error.
    pub fn malformed_identity(msg: impl Into<String>) -> Self {
        Self::MalformedIdentity(msg.into())
    }

    /// Create an invalid resource error.
    pub fn invalid_resource(msg: impl Into<String>) -> Self {
        Self::InvalidResource(msg.into())
    }

    /// Create a store error.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Wrap an I/O error together with the offending path.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this error came from the grant store.
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// Whether this error is a policy construction mistake.
    ///
    /// These are fatal at startup and must not be swallowed.
    pub fn is_policy(&self) -> bool {
        matches!(
            self,
            Self::DuplicatePermission(_)
                | Self::DuplicateRole(_)
                | Self::DuplicateKind(_)
                | Self::DuplicateResource(_)
                | Self::UnknownKind(_)
        )
    }
}

/// Result type alias using Affinity's Error type.
pub type Result<T> = std::result::Result<T, Error>;
