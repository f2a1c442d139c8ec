//! Repository cache
//!
//! Keeps load results per directory and reuses them until the directory's
//! source files change.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::LoadReport;
use super::loader::{load, source_files};
use crate::error::RepositoryError;

struct CacheEntry {
    fingerprint: u64,
    report: LoadReport,
}

/// Caller-owned cache of [`LoadReport`]s keyed by directory
#[derive(Default)]
pub struct RepositoryCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl RepositoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `dir`, reusing the cached report when its source files are unchanged
    pub fn load(&mut self, dir: impl AsRef<Path>) -> Result<&LoadReport, RepositoryError> {
        let dir = dir.as_ref().to_path_buf();
        let fingerprint = fingerprint(&dir)?;
        debug!(?dir, fingerprint, "RepositoryCache::load: called");

        let fresh = self
            .entries
            .get(&dir)
            .is_some_and(|entry| entry.fingerprint == fingerprint);

        if fresh {
            debug!("RepositoryCache::load: cache hit");
        } else {
            debug!("RepositoryCache::load: cache miss, loading");
            let report = load(&dir)?;
            self.entries.insert(dir.clone(), CacheEntry { fingerprint, report });
        }

        Ok(&self.entries[&dir].report)
    }

    /// Drop the cached report for `dir`; returns whether one was cached
    pub fn invalidate(&mut self, dir: impl AsRef<Path>) -> bool {
        let removed = self.entries.remove(dir.as_ref()).is_some();
        debug!(dir = ?dir.as_ref(), removed, "RepositoryCache::invalidate: called");
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hash of the names and contents of the source files in `dir`
fn fingerprint(dir: &Path) -> Result<u64, RepositoryError> {
    let mut hasher = DefaultHasher::new();
    for path in source_files(dir)? {
        let bytes = fs::read(&path).map_err(|source| RepositoryError::Read {
            path: path.clone(),
            source,
        })?;
        path.hash(&mut hasher);
        bytes.hash(&mut hasher);
    }
    Ok(hasher.finish())
}
