//! Roles and role maps.
//!
//! A [`Role`] bundles permissions under a name. Grants refer to roles by
//! name, and the engines resolve that name through a [`RoleMap`].

use std::collections::HashMap;

use crate::{Error, Permission, PermissionMap, Result};

/// A named bundle of permissions. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    name: String,
    capabilities: PermissionMap,
}

impl Role {
    /// Create a role.
    pub fn new(name: impl Into<String>, capabilities: PermissionMap) -> Self {
        Self {
            name: name.into(),
            capabilities,
        }
    }

    /// The role name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Permissions this role confers.
    pub fn capabilities(&self) -> &PermissionMap {
        &self.capabilities
    }

    /// Whether this role confers `perm`.
    pub fn can(&self, perm: &Permission) -> bool {
        self.capabilities.contains(perm)
    }
}

/// Roles keyed by name.
#[derive(Debug, Clone, Default)]
pub struct RoleMap {
    roles: HashMap<String, Role>,
}

impl RoleMap {
    /// Build a map from a list of roles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateRole`] if a name appears twice.
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Result<Self> {
        let mut map = HashMap::new();
        for role in roles {
            if map.contains_key(role.name()) {
                return Err(Error::DuplicateRole(role.name().to_string()));
            }
            map.insert(role.name().to_string(), role);
        }
        Ok(Self { roles: map })
    }

    /// Resolve a role by name.
    pub fn get(&self, name: &str) -> Option<&Role> {
        self.roles.get(name)
    }

    /// Whether a role with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.roles.contains_key(name)
    }

    /// Number of roles.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Iterate roles in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.values()
    }

    /// Role names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.roles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
