//! JSON-file grant store.
//!
//! Grants are kept in a single pretty-printed JSON document:
//!
//! ```json
//! {
//!   "grants": [
//!     {
//!       "principal": "test:scruffy",
//!       "role": "janitor",
//!       "resource": { "kind": "facilities", "uri": "facilities:bucket" }
//!     }
//!   ]
//! }
//! ```
//!
//! Every operation re-reads the file, so several handles and processes may
//! share it. Mutations hold an exclusive advisory lock on a sibling
//! `<file>.lock` for the whole read-modify-write, and land through a
//! uniquely named temp file persisted over the document.

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::{BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use affinity_core::{Error, Grant, Principal, ResourceKey, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

use super::GrantStore;

#[derive(Debug, Default, Serialize, Deserialize)]
struct GrantFile {
    #[serde(default)]
    grants: Vec<Grant>,
}

/// Grant store persisted as a JSON file.
///
/// A missing file is an empty store; it is created on the first write.
#[derive(Clone)]
pub struct FileGrantStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileGrantStore {
    /// Create a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The advisory lock file guarding mutations.
    pub fn lock_path(&self) -> PathBuf {
        lock_path(&self.path)
    }

    async fn read(&self) -> Result<GrantFile> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => parse(&self.path, &json),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(GrantFile::default()),
            Err(e) => Err(store_err("read", &self.path, e)),
        }
    }

    /// Apply `edit` to the grants under the file lock. `edit` returns
    /// whether anything changed; unchanged documents are not rewritten.
    async fn modify<F>(&self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<Grant>) -> bool + Send + 'static,
    {
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || modify_locked(&path, edit))
            .await
            .map_err(|e| Error::store(format!("grant store task failed: {e}")))?
    }
}

fn store_err(what: &str, path: &Path, e: impl std::fmt::Display) -> Error {
    Error::store(format!("{what} {}: {e}", path.display()))
}

fn parse(path: &Path, json: &str) -> Result<GrantFile> {
    serde_json::from_str(json).map_err(|e| store_err("parse", path, e))
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

fn modify_locked(path: &Path, edit: impl FnOnce(&mut Vec<Grant>) -> bool) -> Result<()> {
    let dir = parent_dir(path);
    std::fs::create_dir_all(dir).map_err(|e| store_err("create directory for", path, e))?;

    let lock_file = lock_path(path);
    let lock = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_file)
        .map_err(|e| store_err("open lock", &lock_file, e))?;
    // Released when `lock` is dropped.
    lock.lock().map_err(|e| store_err("lock", &lock_file, e))?;

    let mut file = match std::fs::read_to_string(path) {
        Ok(json) => parse(path, &json)?,
        Err(e) if e.kind() == ErrorKind::NotFound => GrantFile::default(),
        Err(e) => return Err(store_err("read", path, e)),
    };
    if !edit(&mut file.grants) {
        return Ok(());
    }

    let tmp =
        NamedTempFile::new_in(dir).map_err(|e| store_err("create temp file for", path, e))?;
    let mut writer = BufWriter::new(tmp);
    serde_json::to_writer_pretty(&mut writer, &file)
        .map_err(|e| store_err("serialize", path, e))?;
    let tmp = writer
        .into_inner()
        .map_err(|e| store_err("write", path, e.error()))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| store_err("sync", path, e))?;
    tmp.persist(path)
        .map_err(|e| store_err("replace", path, e.error))?;
    Ok(())
}

#[async_trait]
impl GrantStore for FileGrantStore {
    async fn list_grants(&self, principal: &Principal) -> Result<Vec<Grant>> {
        let file = self.read().await?;
        Ok(file
            .grants
            .into_iter()
            .filter(|g| g.is_for(principal))
            .collect())
    }

    async fn upsert_grant(&self, holder: &Principal, grant: Grant) -> Result<()> {
        let holder = holder.clone();
        self.modify(move |grants| {
            grants.retain(|g| !(g.is_for(&holder) && g.matches(&grant.resource)));
            grants.push(grant);
            true
        })
        .await
    }

    async fn remove_grant(&self, principal: &Principal, resource: &ResourceKey) -> Result<()> {
        let principal = principal.clone();
        let resource = resource.clone();
        self.modify(move |grants| {
            let before = grants.len();
            grants.retain(|g| !(g.is_for(&principal) && g.matches(&resource)));
            grants.len() != before
        })
        .await
    }
}
