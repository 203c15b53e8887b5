//! The dispatch-table cache.
//!
//! Rebuilding the dispatch table means re-registering every flattened
//! route with the matcher. When the route list has not changed between
//! requests, the registration set can be reused instead: it is keyed by
//! a SHA-256 fingerprint of the flattened list (methods and paths, in
//! order), so any change to the declared routes invalidates the cache.

use crate::dispatch::TableEntry;
use crate::route::Route;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Computes the cache key for a flattened route list.
#[must_use]
pub fn fingerprint(routes: &[Route]) -> String {
    let mut hasher = Sha256::new();
    for route in routes {
        for method in route.methods() {
            hasher.update(method.as_str().as_bytes());
            hasher.update(b" ");
        }
        hasher.update(route.path().as_bytes());
        hasher.update(b"\n");
    }
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// Storage for a dispatch-table registration set.
pub trait DispatchCache: Send + Sync {
    /// Returns the registration set stored under `key`, if any.
    fn get(&self, key: &str) -> anyhow::Result<Option<Vec<TableEntry>>>;

    /// Stores `entries` under `key`, replacing whatever was there.
    fn put(&self, key: &str, entries: &[TableEntry]) -> anyhow::Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    key: String,
    entries: Vec<TableEntry>,
}

/// A single-slot cache persisted as a JSON file.
///
/// The file holds one registration set and its key; a lookup under a
/// different key is a miss and the next `put` overwrites the slot.
#[derive(Debug, Clone)]
pub struct FileDispatchCache {
    path: PathBuf,
}

impl FileDispatchCache {
    /// Creates a cache backed by `path`. The file is created on first
    /// `put`; a missing file is an empty cache, not an error.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DispatchCache for FileDispatchCache {
    fn get(&self, key: &str) -> anyhow::Result<Option<Vec<TableEntry>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        let parsed: CacheFile = serde_json::from_str(&raw)?;
        if parsed.key == key {
            Ok(Some(parsed.entries))
        } else {
            Ok(None)
        }
    }

    fn put(&self, key: &str, entries: &[TableEntry]) -> anyhow::Result<()> {
        let contents = serde_json::to_string(&CacheFile {
            key: key.to_string(),
            entries: entries.to_vec(),
        })?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}
