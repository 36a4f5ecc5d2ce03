//! Temporary project roots for tests.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::badge::BadgeRecord;
use crate::constants::{CACHE_FILE, DEFAULT_CACHE_DIR, DEFAULT_INPUT_PATH, META_FILE};

/// A throwaway project directory laid out like a real site:
///
/// ```text
/// <root>/
/// ├── src/data/badge-urls.json
/// └── .cache/{badges.json,badges.meta.json}
/// ```
///
/// The directory is deleted when the value is dropped.
pub struct TestProject {
    temp: TempDir,
}

impl TestProject {
    /// An empty project (no input file).
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp: TempDir::new().context("Failed to create temp project")?,
        })
    }

    /// A project whose input file holds `content` verbatim.
    pub fn with_input(content: &str) -> Result<Self> {
        let project = Self::new()?;
        project.write_input(content)?;
        Ok(project)
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn input_path(&self) -> PathBuf {
        self.root().join(DEFAULT_INPUT_PATH)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root().join(DEFAULT_CACHE_DIR)
    }

    pub fn cache_file(&self) -> PathBuf {
        self.cache_dir().join(CACHE_FILE)
    }

    pub fn meta_file(&self) -> PathBuf {
        self.cache_dir().join(META_FILE)
    }

    /// Overwrite the input file, creating `src/data/` if needed.
    pub fn write_input(&self, content: &str) -> Result<()> {
        let path = self.input_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Write an arbitrary file relative to the root.
    pub fn write_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Parse the persisted cache entry.
    pub fn read_cache(&self) -> Result<Vec<BadgeRecord>> {
        let content = std::fs::read_to_string(self.cache_file())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// The hash stored in the meta file.
    pub fn read_meta_hash(&self) -> Result<String> {
        let content = std::fs::read_to_string(self.meta_file())?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        value["hash"]
            .as_str()
            .map(str::to_string)
            .context("meta file has no hash")
    }
}
