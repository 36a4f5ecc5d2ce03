//! Build integration
//!
//! [`BadgeModule`] exposes the badge records to a bundler as the virtual module
//! `virtual:badges`, whose source is `export default [...];`. It owns the
//! recovery policy the cache leaves to its caller:
//!
//! - [`BadgeModule::build_start`] syncs; on failure it serves the persisted
//!   entry regardless of the digest, or `[]` when there is none
//! - [`BadgeModule::on_file_change`] resyncs when the input file changes and
//!   asks for a full reload, falling back the same way on failure; other paths
//!   are ignored
//!
//! Neither operation ever returns an error: a broken badge list must not break
//! the build.

use std::path::{Component, Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::badge::BadgeRecord;
use crate::cache::{BadgeCache, SyncSource};
use crate::constants::{RESOLVED_MODULE_ID, VIRTUAL_MODULE_ID};
use crate::core::BadgeError;

const EMPTY_LIST: &str = "[]";

/// What `build_start` ended up serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Served {
    /// Up-to-date records, from the cache or a fresh fetch.
    Current(SyncSource),
    /// Sync failed; a persisted entry of unknown freshness is served.
    Stale,
    /// Sync failed and nothing was persisted.
    Empty,
}

/// Result of a file-change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchOutcome {
    /// The path is not the badge input file.
    Ignored,
    /// Records were refreshed; consumers should reload.
    FullReload,
    /// Resync failed; stale cached records (or `[]`) are served instead.
    Failed(String),
}

/// The `virtual:badges` module.
pub struct BadgeModule {
    cache: BadgeCache,
    served: RwLock<Option<String>>,
}

impl BadgeModule {
    pub fn new(cache: BadgeCache) -> Self {
        Self {
            cache,
            served: RwLock::new(None),
        }
    }

    pub fn cache(&self) -> &BadgeCache {
        &self.cache
    }

    /// Map the public module id to its internal id.
    pub fn resolve_id(&self, id: &str) -> Option<&'static str> {
        (id == VIRTUAL_MODULE_ID).then_some(RESOLVED_MODULE_ID)
    }

    /// Module source for the internal id, `None` for any other id.
    pub async fn load(&self, id: &str) -> Option<String> {
        if id != RESOLVED_MODULE_ID {
            return None;
        }
        Some(format!("export default {};", self.served_json().await))
    }

    /// JSON currently served, `[]` when nothing is loaded.
    pub async fn served_json(&self) -> String {
        self.served.read().await.clone().unwrap_or_else(|| EMPTY_LIST.to_string())
    }

    /// Sync at the start of a build, degrading to stale data or an empty list.
    pub async fn build_start(&self) -> Served {
        match self.cache.sync_badges().await {
            Ok(report) => {
                self.serve(&report.records).await;
                Served::Current(report.source)
            }
            Err(e) => self.recover(&e).await,
        }
    }

    /// React to a change of `path`.
    pub async fn on_file_change(&self, path: &Path) -> WatchOutcome {
        if normalize(path) != normalize(self.cache.input_path()) {
            return WatchOutcome::Ignored;
        }

        info!("{} changed, refreshing badges", path.display());
        *self.served.write().await = None;

        match self.cache.sync_badges().await {
            Ok(report) => {
                self.serve(&report.records).await;
                WatchOutcome::FullReload
            }
            Err(e) => {
                self.recover(&e).await;
                WatchOutcome::Failed(e.to_string())
            }
        }
    }

    /// Serve the persisted entry regardless of the digest, else an empty list.
    async fn recover(&self, error: &BadgeError) -> Served {
        if let Some(records) = self.cache.read_stale() {
            warn!("Badge sync failed, serving cached data: {error}");
            self.serve(&records).await;
            Served::Stale
        } else {
            warn!("Badge sync failed and no cache exists, serving no badges: {error}");
            *self.served.write().await = Some(EMPTY_LIST.to_string());
            Served::Empty
        }
    }

    async fn serve(&self, records: &[BadgeRecord]) {
        let json = match serde_json::to_string_pretty(records) {
            Ok(json) => json,
            Err(e) => {
                warn!("Cannot serialize badge records: {e}");
                EMPTY_LIST.to_string()
            }
        };
        *self.served.write().await = Some(json);
    }
}

/// Lexical normalization; the file may not exist while being replaced.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}
