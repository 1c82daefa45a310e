//! Resource kinds, resources, and the resource forest.
//!
//! Every resource belongs to exactly one [`ResourceKind`]. The kind fixes
//! the set of permissions that can ever apply to its resources; all
//! resources of a kind share it. Resources point at their parent by
//! [`ResourceKey`] only, so a resource never owns its parent and the
//! hierarchy stays a plain, serializable forest.
//!
//! The forest must be acyclic. That is the caller's invariant: building the
//! ancestor chain is bounded and reports [`Error::DepthExceeded`] rather
//! than detecting cycles.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Error, PermissionMap, Result};

/// A resource kind and the permissions legal on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceKind {
    name: String,
    capabilities: PermissionMap,
}

impl ResourceKind {
    /// Declare a kind.
    pub fn new(name: impl Into<String>, capabilities: PermissionMap) -> Self {
        Self {
            name: name.into(),
            capabilities,
        }
    }

    /// The kind name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Permissions legal on resources of this kind.
    pub fn capabilities(&self) -> &PermissionMap {
        &self.capabilities
    }
}

/// Declared resource kinds, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    kinds: HashMap<String, Arc<ResourceKind>>,
}

impl KindRegistry {
    /// Build a registry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKind`] if a kind name appears twice.
    pub fn new(kinds: impl IntoIterator<Item = ResourceKind>) -> Result<Self> {
        let mut map = HashMap::new();
        for kind in kinds {
            if map.contains_key(kind.name()) {
                return Err(Error::DuplicateKind(kind.name().to_string()));
            }
            map.insert(kind.name().to_string(), Arc::new(kind));
        }
        Ok(Self { kinds: map })
    }

    /// Look up a kind by name.
    pub fn get(&self, name: &str) -> Option<&Arc<ResourceKind>> {
        self.kinds.get(name)
    }

    /// Look up a kind by name, failing with [`Error::UnknownKind`].
    pub fn require(&self, name: &str) -> Result<&Arc<ResourceKind>> {
        self.get(name)
            .ok_or_else(|| Error::UnknownKind(name.to_string()))
    }

    /// Number of kinds.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether no kinds are declared.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Plain `(kind, uri)` identifier of a resource.
///
/// URIs are unique within a kind; the same URI under two kinds names two
/// different resources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceKey {
    /// Kind name.
    pub kind: String,
    /// URI within the kind's namespace.
    pub uri: String,
}

impl ResourceKey {
    /// Create a key.
    pub fn new(kind: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            uri: uri.into(),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.uri)
    }
}

/// A resource of a declared kind, with an optional parent reference.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use affinity_core::{PermissionMap, Resource, ResourceKind};
///
/// let facilities = Arc::new(ResourceKind::new(
///     "facilities",
///     PermissionMap::from_names(["use-thing"]).unwrap(),
/// ));
/// let hq = Resource::new(&facilities, "planet-express-hq");
/// let vending = Resource::new(&facilities, "vending-machine").with_parent(&hq);
///
/// assert_eq!(vending.parent_of(), Some(&hq.key()));
/// assert!(vending.capabilities().contains_name("use-thing"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    kind: Arc<ResourceKind>,
    uri: String,
    parent: Option<ResourceKey>,
}

impl Resource {
    /// Create a root resource of `kind`.
    pub fn new(kind: &Arc<ResourceKind>, uri: impl Into<String>) -> Self {
        Self {
            kind: Arc::clone(kind),
            uri: uri.into(),
            parent: None,
        }
    }

    /// Set the parent to another resource.
    pub fn with_parent(self, parent: &Resource) -> Self {
        self.with_parent_key(parent.key())
    }

    /// Set the parent by key.
    pub fn with_parent_key(mut self, parent: ResourceKey) -> Self {
        self.parent = Some(parent);
        self
    }

    /// URI within the kind's namespace.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The resource kind.
    pub fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    /// Permissions legal on this resource (its kind's capabilities).
    pub fn capabilities(&self) -> &PermissionMap {
        self.kind.capabilities()
    }

    /// The resource one level up, if any.
    pub fn parent_of(&self) -> Option<&ResourceKey> {
        self.parent.as_ref()
    }

    /// This resource's key.
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(self.kind.name(), self.uri.clone())
    }
}

/// Parent links of every registered resource.
#[derive(Debug, Clone, Default)]
pub struct ResourceTree {
    parents: HashMap<ResourceKey, Option<ResourceKey>>,
}

impl ResourceTree {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource and its parent link.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidResource`] for an empty URI and
    /// [`Error::DuplicateResource`] if the key is already registered.
    pub fn insert(&mut self, resource: &Resource) -> Result<()> {
        if resource.uri().is_empty() {
            return Err(Error::invalid_resource(format!(
                "empty URI for kind '{}'",
                resource.kind().name()
            )));
        }
        let key = resource.key();
        if self.parents.contains_key(&key) {
            return Err(Error::DuplicateResource(key.to_string()));
        }
        self.parents.insert(key, resource.parent_of().cloned());
        Ok(())
    }

    /// Whether a resource is registered.
    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.parents.contains_key(key)
    }

    /// Recorded parent of a registered resource.
    pub fn parent_of(&self, key: &ResourceKey) -> Option<&ResourceKey> {
        self.parents.get(key).and_then(Option::as_ref)
    }

    /// Number of registered resources.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Whether no resources are registered.
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// The ancestor chain of `resource`, starting with the resource itself.
    ///
    /// The resource's own parent reference is followed first, falling back
    /// to the parent registered for it in the tree; further ancestors come
    /// from the tree. A parent missing from the tree ends the chain as a
    /// root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DepthExceeded`] if the chain would hold more than
    /// `limit` entries.
    pub fn ancestors(&self, resource: &Resource, limit: usize) -> Result<Vec<ResourceKey>> {
        let depth_exceeded = || Error::DepthExceeded {
            uri: resource.uri().to_string(),
            limit,
        };

        if limit == 0 {
            return Err(depth_exceeded());
        }
        let key = resource.key();
        let mut next = resource
            .parent_of()
            .or_else(|| self.parent_of(&key))
            .cloned();
        let mut chain = vec![key];
        while let Some(key) = next {
            if chain.len() >= limit {
                return Err(depth_exceeded());
            }
            next = self.parent_of(&key).cloned();
            chain.push(key);
        }
        Ok(chain)
    }
}
