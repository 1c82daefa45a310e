//! Policy configuration.
//!
//! A [`Policy`] is the read-only bundle of registries the engines are
//! constructed with: declared resource kinds, roles, and the resource
//! forest. It is built once at startup, either in code or from a TOML
//! [`PolicyDocument`]:
//!
//! ```toml
//! [[kinds]]
//! name = "facilities"
//! capabilities = ["empty-bucket", "fill-bucket", "use-thing"]
//!
//! [[roles]]
//! name = "janitor"
//! capabilities = ["empty-bucket", "fill-bucket"]
//!
//! [[resources]]
//! kind = "facilities"
//! uri = "facilities:building"
//!
//! [[resources]]
//! kind = "facilities"
//! uri = "facilities:bucket"
//! parent = { kind = "facilities", uri = "facilities:building" }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    Error, KindRegistry, PermissionMap, Resource, ResourceKey, ResourceKind, ResourceTree,
    Result, Role, RoleMap,
};

/// Serializable policy description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyDocument {
    /// Resource kinds and the permissions legal on each.
    pub kinds: Vec<NamedCapabilities>,
    /// Roles and the permissions each confers.
    pub roles: Vec<NamedCapabilities>,
    /// Known resources and their parent links.
    pub resources: Vec<ResourceEntry>,
}

/// A name with a list of permission names, used for kinds and roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedCapabilities {
    /// Kind or role name.
    pub name: String,
    /// Permission names.
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// A resource declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceEntry {
    /// Kind name; must be declared under `kinds`.
    pub kind: String,
    /// URI within the kind.
    pub uri: String,
    /// Optional parent.
    #[serde(default)]
    pub parent: Option<ResourceKey>,
}

/// Read-only registries shared by the access and admin engines.
#[derive(Debug, Clone, Default)]
pub struct Policy {
    kinds: KindRegistry,
    roles: RoleMap,
    resources: ResourceTree,
}

impl Policy {
    /// Assemble a policy from already-built registries.
    pub fn new(kinds: KindRegistry, roles: RoleMap, resources: ResourceTree) -> Self {
        Self {
            kinds,
            roles,
            resources,
        }
    }

    /// Build a policy from its serializable description.
    ///
    /// # Errors
    ///
    /// Duplicate kinds, roles, permissions or resources fail, as does a
    /// resource (or parent) of an undeclared kind.
    pub fn from_document(doc: PolicyDocument) -> Result<Self> {
        let kinds = KindRegistry::new(
            doc.kinds
                .into_iter()
                .map(|k| -> Result<ResourceKind> {
                    Ok(ResourceKind::new(k.name, PermissionMap::from_names(k.capabilities)?))
                })
                .collect::<Result<Vec<_>>>()?,
        )?;

        let roles = RoleMap::new(
            doc.roles
                .into_iter()
                .map(|r| -> Result<Role> {
                    Ok(Role::new(r.name, PermissionMap::from_names(r.capabilities)?))
                })
                .collect::<Result<Vec<_>>>()?,
        )?;

        let mut resources = ResourceTree::new();
        for entry in doc.resources {
            let kind = kinds.require(&entry.kind)?;
            let mut resource = Resource::new(kind, entry.uri);
            if let Some(parent) = entry.parent {
                kinds.require(&parent.kind)?;
                resource = resource.with_parent_key(parent);
            }
            resources.insert(&resource)?;
        }

        log::debug!(
            "Loaded policy: {} kinds, {} roles, {} resources",
            kinds.len(),
            roles.len(),
            resources.len()
        );
        Ok(Self::new(kinds, roles, resources))
    }

    /// Parse and build a policy from TOML.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let doc: PolicyDocument =
            toml::from_str(s).map_err(|e| Error::config(format!("policy: {e}")))?;
        Self::from_document(doc)
    }

    /// Load a policy from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Declared resource kinds.
    pub fn kinds(&self) -> &KindRegistry {
        &self.kinds
    }

    /// Declared roles.
    pub fn roles(&self) -> &RoleMap {
        &self.roles
    }

    /// The resource forest.
    pub fn resources(&self) -> &ResourceTree {
        &self.resources
    }

    /// Build a resource of a declared kind, with the parent recorded in the
    /// resource tree (if it is registered there).
    pub fn resource(&self, kind: &str, uri: impl Into<String>) -> Result<Resource> {
        let resource = Resource::new(self.kinds.require(kind)?, uri);
        match self.resources.parent_of(&resource.key()).cloned() {
            Some(parent) => Ok(resource.with_parent_key(parent)),
            None => Ok(resource),
        }
    }
}
