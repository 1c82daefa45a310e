//! Permissions and permission maps.
//!
//! A [`Permission`] is an atomic named right such as `board-ship`. Its
//! identity is its name. A [`PermissionMap`] groups permissions by name and
//! is used both as a role's capabilities and as the set of permissions a
//! resource kind allows.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// An atomic named capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(String);

impl Permission {
    /// Declare a permission.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The permission name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Permission {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A set of permissions keyed by name.
///
/// Iteration is ordered by name.
///
/// # Example
///
/// ```
/// use affinity_core::{Permission, PermissionMap};
///
/// let caps = PermissionMap::new([
///     Permission::new("board-ship"),
///     Permission::new("control-ship"),
/// ])
/// .unwrap();
/// assert!(caps.contains(&Permission::new("board-ship")));
/// assert!(!caps.contains_name("empty-bucket"));
///
/// assert!(PermissionMap::new([Permission::new("a"), Permission::new("a")]).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionMap {
    perms: BTreeMap<String, Permission>,
}

impl PermissionMap {
    /// Build a map from a list of permissions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicatePermission`] if a name appears twice.
    pub fn new(perms: impl IntoIterator<Item = Permission>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for perm in perms {
            if map.contains_key(perm.name()) {
                return Err(Error::DuplicatePermission(perm.name().to_string()));
            }
            map.insert(perm.name().to_string(), perm);
        }
        Ok(Self { perms: map })
    }

    /// Build a map from permission names.
    pub fn from_names<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> Result<Self> {
        Self::new(names.into_iter().map(|n| Permission::new(n.as_ref())))
    }

    /// A map with no permissions.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Membership test.
    pub fn contains(&self, perm: &Permission) -> bool {
        self.perms.contains_key(perm.name())
    }

    /// Membership test by name.
    pub fn contains_name(&self, name: &str) -> bool {
        self.perms.contains_key(name)
    }

    /// Look up a permission by name.
    pub fn get(&self, name: &str) -> Option<&Permission> {
        self.perms.get(name)
    }

    /// Number of permissions.
    pub fn len(&self) -> usize {
        self.perms.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.perms.is_empty()
    }

    /// Iterate permissions in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.perms.values()
    }

    /// Permission names in order.
    pub fn names(&self) -> Vec<&str> {
        self.perms.keys().map(String::as_str).collect()
    }

    /// Permissions present in both maps.
    pub fn intersection(&self, other: &PermissionMap) -> PermissionMap {
        let perms = self
            .perms
            .iter()
            .filter(|(name, _)| other.contains_name(name))
            .map(|(name, perm)| (name.clone(), perm.clone()))
            .collect();
        Self { perms }
    }

    /// Add every permission of `other` not already present.
    pub fn extend_from(&mut self, other: &PermissionMap) {
        for (name, perm) in &other.perms {
            self.perms
                .entry(name.clone())
                .or_insert_with(|| perm.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facilities() -> PermissionMap {
        PermissionMap::from_names(["empty-bucket", "fill-bucket", "use-thing"]).unwrap()
    }

    #[test]
    fn test_permission_name() {
        let perm = Permission::new("perform-surgery");
        assert_eq!(perm.name(), "perform-surgery");
        assert_eq!(perm.to_string(), "perform-surgery");
        assert_eq!(perm, Permission::from("perform-surgery"));
    }

    #[test]
    fn test_permission_map_membership() {
        let caps = facilities();
        assert_eq!(caps.len(), 3);
        assert!(caps.contains(&Permission::new("use-thing")));
        assert!(!caps.contains(&Permission::new("board-ship")));
        assert_eq!(caps.get("fill-bucket").map(Permission::name), Some("fill-bucket"));
    }

    #[test]
    fn test_permission_map_duplicate_fails() {
        let err = PermissionMap::from_names(["file-paperwork", "file-paperwork"]).unwrap_err();
        assert!(matches!(err, Error::DuplicatePermission(ref n) if n == "file-paperwork"));
    }

    #[test]
    fn test_permission_map_ordered_names() {
        let caps = PermissionMap::from_names(["use-thing", "empty-bucket", "fill-bucket"]).unwrap();
        assert_eq!(caps.names(), vec!["empty-bucket", "fill-bucket", "use-thing"]);
    }

    #[test]
    fn test_permission_map_empty() {
        let caps = PermissionMap::empty();
        assert!(caps.is_empty());
        assert!(!caps.contains_name("anything"));
    }

    #[test]
    fn test_permission_map_intersection_and_extend() {
        let janitor = PermissionMap::from_names(["empty-bucket", "fill-bucket"]).unwrap();
        let mut merged = PermissionMap::from_names(["board-ship"]).unwrap();
        merged.extend_from(&janitor);
        assert_eq!(merged.len(), 3);

        let legal = merged.intersection(&facilities());
        assert_eq!(legal.names(), vec!["empty-bucket", "fill-bucket"]);
    }
}
