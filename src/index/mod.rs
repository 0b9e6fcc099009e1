//! Persisted hash index
//!
//! The index maps every known file path to the hashes computed for it,
//! one value per hash kind (e.g. "content", "perceptual"). It is loaded
//! from a JSON document inside the collection root at startup, mutated in
//! place while hashing, and persisted back on completion and on interrupt.
//!
//! A missing or corrupt index document is not fatal: the caller receives
//! an empty, usable index and the condition is logged. Entries use sorted
//! maps so the persisted document is diff-stable across runs.

use crate::core::error::{OrganizerError, Result};
use log::{debug, error, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Mapping of hash-kind name to hex-string hash value
pub type KindMap = BTreeMap<String, String>;

/// Persisted mapping of file path to the hashes known for it
#[derive(Debug)]
pub struct HashIndex {
    /// Path of the persisted index document
    index_path: PathBuf,

    /// path -> (kind -> hex value)
    entries: BTreeMap<String, KindMap>,
}

impl HashIndex {
    /// Create an empty index backed by the given document path
    pub fn new<P: Into<PathBuf>>(index_path: P) -> Self {
        Self {
            index_path: index_path.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Load the persisted document into the index.
    ///
    /// A missing document leaves the index empty and logs a warning; a
    /// malformed document leaves the index empty and logs an error.
    /// Neither is propagated as fatal.
    pub fn load(&mut self) {
        match Self::read_document(&self.index_path) {
            Ok(entries) => {
                info!(
                    "Loaded index with {} entries from {}",
                    entries.len(),
                    self.index_path.display()
                );
                self.entries = entries;
            }
            Err(OrganizerError::NotFound(path)) => {
                warn!("No index found at {}", path.display());
            }
            Err(e) => {
                error!("{} (starting with an empty index)", e);
            }
        }
    }

    /// Read and parse an index document
    fn read_document(path: &Path) -> Result<BTreeMap<String, KindMap>> {
        if !path.exists() {
            return Err(OrganizerError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| OrganizerError::Corrupt {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Persist the full index to its document path.
    ///
    /// Safe to call repeatedly; the last writer wins.
    pub fn persist(&self) -> Result<()> {
        if let Some(parent) = self.index_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| OrganizerError::IoError(format!("Failed to serialize index: {}", e)))?;
        fs::write(&self.index_path, json)?;

        info!("Index persisted to {}", self.index_path.display());
        Ok(())
    }

    /// Whether a value is recorded for the given (path, kind)
    pub fn has(&self, path: &Path, kind: &str) -> bool {
        self.entries
            .get(&Self::key(path))
            .map(|kinds| kinds.contains_key(kind))
            .unwrap_or(false)
    }

    /// Get the hash of the given kind for a path
    #[allow(dead_code)]
    pub fn get(&self, path: &Path, kind: &str) -> Option<&str> {
        self.entries
            .get(&Self::key(path))
            .and_then(|kinds| kinds.get(kind))
            .map(String::as_str)
    }

    /// Get every hash recorded for a path
    pub fn get_all(&self, path: &Path) -> KindMap {
        self.entries.get(&Self::key(path)).cloned().unwrap_or_default()
    }

    /// Insert or overwrite the hash of the given kind for a path
    pub fn set(&mut self, path: &Path, kind: &str, value: String) {
        debug!("Hash: {} belongs to file: {}", value, path.display());
        self.entries
            .entry(Self::key(path))
            .or_default()
            .insert(kind.to_string(), value);
    }

    /// All (path, value) pairs holding a hash of the given kind
    pub fn for_kind(&self, kind: &str) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .filter_map(|(path, kinds)| {
                kinds.get(kind).map(|value| (path.clone(), value.clone()))
            })
            .collect()
    }

    /// Find the first path whose hash equals `value`.
    ///
    /// With a kind given, only that kind is consulted. Without one, every
    /// kind of every entry is scanned; kinds are visited in sorted order,
    /// but callers must not rely on which kind matched.
    pub fn find_by_value(&self, value: &str, kind: Option<&str>) -> Option<PathBuf> {
        for (path, kinds) in &self.entries {
            let hit = match kind {
                Some(kind) => kinds.get(kind).map(|v| v == value).unwrap_or(false),
                None => kinds.values().any(|v| v == value),
            };
            if hit {
                return Some(PathBuf::from(path));
            }
        }
        None
    }

    /// Remove every entry for the given kind across all paths.
    ///
    /// Used to force recomputation of one hash kind on the next run.
    pub fn clear_kind(&mut self, kind: &str) -> usize {
        let mut removed = 0;
        for kinds in self.entries.values_mut() {
            if kinds.remove(kind).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Move an entry to a new path, keeping its hashes.
    ///
    /// Used after a file rename so the index stays consistent without a
    /// full rehash. Returns false when the old path is not indexed.
    pub fn rename_path(&mut self, old: &Path, new: &Path) -> bool {
        match self.entries.remove(&Self::key(old)) {
            Some(kinds) => {
                self.entries.insert(Self::key(new), kinds);
                true
            }
            None => false,
        }
    }

    /// Remove every entry whose path no longer exists on disk.
    ///
    /// Returns the number of removed entries. Calling this twice in a row
    /// is a no-op the second time.
    pub fn prune_missing(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|path, _| {
            let exists = Path::new(path).exists();
            if !exists {
                info!("Removing file from index: {}", path);
            }
            exists
        });
        before - self.entries.len()
    }

    /// Paths currently present in the index
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of indexed paths
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn key(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }
}
