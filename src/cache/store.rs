//! Persistence backends for the badge cache.
//!
//! A store holds exactly two values: the cache entry (the ordered record list)
//! and the cache meta (`{"hash": "<hex>"}`). Both are always replaced whole.

use std::fmt::Debug;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::CacheMeta;
use crate::badge::BadgeRecord;
use crate::constants::{CACHE_FILE, META_FILE};
use crate::core::BadgeError;
use crate::utils::fs::{atomic_write, ensure_dir, remove_file_if_exists};

/// Key-value persistence for the cache entry and its meta.
///
/// Read failures of any kind (missing, unreadable, corrupt) are reported as
/// [`BadgeError::CacheReadFailure`]; write failures as
/// [`BadgeError::CacheWriteFailure`].
pub trait CacheStore: Send + Sync + Debug {
    /// Load the persisted record list.
    fn read_entry(&self) -> Result<Vec<BadgeRecord>, BadgeError>;

    /// Replace the persisted record list.
    fn write_entry(&self, records: &[BadgeRecord]) -> Result<(), BadgeError>;

    /// Load the persisted meta.
    fn read_meta(&self) -> Result<CacheMeta, BadgeError>;

    /// Replace the persisted meta.
    fn write_meta(&self, meta: &CacheMeta) -> Result<(), BadgeError>;

    /// Remove both values. Returns how many were actually present.
    fn clear(&self) -> Result<usize, BadgeError>;

    /// Human-readable location, for logs and `cache info`.
    fn describe(&self) -> String;
}

/// Cache stored as two JSON files in one directory.
///
/// ```text
/// .cache/
/// ├── badges.json        # pretty-printed record array
/// └── badges.meta.json   # {"hash":"<sha256 hex of the input file>"}
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
    entry_path: PathBuf,
    meta_path: PathBuf,
}

impl DirectoryStore {
    /// Store rooted at `dir`, using the standard file names.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            entry_path: dir.join(CACHE_FILE),
            meta_path: dir.join(META_FILE),
            dir,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entry_path(&self) -> &Path {
        &self.entry_path
    }

    pub fn meta_path(&self) -> &Path {
        &self.meta_path
    }

    fn read_file(path: &Path) -> Result<String, BadgeError> {
        std::fs::read_to_string(path).map_err(|e| BadgeError::CacheReadFailure {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<(), BadgeError> {
        let write_failure = |e: anyhow::Error| BadgeError::CacheWriteFailure {
            path: path.display().to_string(),
            reason: format!("{e:#}"),
        };

        ensure_dir(&self.dir).map_err(write_failure)?;
        atomic_write(path, content.as_bytes()).map_err(write_failure)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

fn corrupt(path: &Path, error: &serde_json::Error) -> BadgeError {
    BadgeError::CacheReadFailure {
        path: path.display().to_string(),
        reason: format!("invalid JSON: {error}"),
    }
}

fn unserializable(path: &Path, error: &serde_json::Error) -> BadgeError {
    BadgeError::CacheWriteFailure {
        path: path.display().to_string(),
        reason: error.to_string(),
    }
}

impl CacheStore for DirectoryStore {
    fn read_entry(&self) -> Result<Vec<BadgeRecord>, BadgeError> {
        let content = Self::read_file(&self.entry_path)?;
        serde_json::from_str(&content).map_err(|e| corrupt(&self.entry_path, &e))
    }

    fn write_entry(&self, records: &[BadgeRecord]) -> Result<(), BadgeError> {
        let content = serde_json::to_string_pretty(records)
            .map_err(|e| unserializable(&self.entry_path, &e))?;
        self.write_file(&self.entry_path, &content)
    }

    fn read_meta(&self) -> Result<CacheMeta, BadgeError> {
        let content = Self::read_file(&self.meta_path)?;
        serde_json::from_str(&content).map_err(|e| corrupt(&self.meta_path, &e))
    }

    fn write_meta(&self, meta: &CacheMeta) -> Result<(), BadgeError> {
        let content =
            serde_json::to_string(meta).map_err(|e| unserializable(&self.meta_path, &e))?;
        self.write_file(&self.meta_path, &content)
    }

    fn clear(&self) -> Result<usize, BadgeError> {
        let mut removed = 0;
        for path in [&self.entry_path, &self.meta_path] {
            let existed =
                remove_file_if_exists(path).map_err(|e| BadgeError::CacheWriteFailure {
                    path: path.display().to_string(),
                    reason: format!("{e:#}"),
                })?;
            if existed {
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}
