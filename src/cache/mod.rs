//! Content-addressed badge cache
//!
//! The batch fetch is expensive (one or more HTTP round-trips per badge plus a
//! throttle delay), so its result is memoized against a digest of the raw input
//! file. [`BadgeCache::sync_badges`] is the gatekeeper:
//!
//! 1. Read the input file bytes and compute [`content_digest`]
//! 2. If the persisted [`CacheMeta`] carries the same digest and the persisted
//!    entry is readable, return the entry without touching the network
//! 3. Otherwise parse the input, run the [`BadgeSource`], persist the entry and
//!    only then persist the new meta
//!
//! Writing the entry before the meta means an interrupted refresh can never
//! leave a meta that vouches for an entry that was not written.
//!
//! Recovery is the caller's business: [`BadgeCache::read_stale`] returns
//! whatever entry exists regardless of the digest.
//!
//! A single process is assumed to own the cache directory. Two processes
//! refreshing the same directory at once may interleave their writes.

pub mod store;

pub use store::{CacheStore, DirectoryStore};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::badge::{BadgeRecord, BadgeRequest};
use crate::batch::BadgeSource;
use crate::core::BadgeError;

/// Persisted validity marker for the cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMeta {
    /// Lowercase hex SHA-256 of the input file bytes the entry was built from.
    pub hash: String,
}

impl CacheMeta {
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
        }
    }
}

/// Lowercase hex SHA-256 of `bytes`.
///
/// Bytes are hashed as-is: whitespace or key-order changes in the input file
/// invalidate the cache.
#[must_use]
pub fn content_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Where the records returned by [`BadgeCache::sync_badges`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncSource {
    /// Digest matched; served from the persisted entry.
    Cache,
    /// Digest missing or different; freshly fetched and persisted.
    Fetched,
}

/// Result of a successful sync.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub records: Vec<BadgeRecord>,
    pub source: SyncSource,
    /// Digest of the input the records correspond to.
    pub hash: String,
}

/// Gatekeeper between the input file, the badge source and the cache store.
pub struct BadgeCache {
    input: PathBuf,
    store: Arc<dyn CacheStore>,
    source: Arc<dyn BadgeSource>,
}

impl BadgeCache {
    pub fn new(
        input: impl Into<PathBuf>,
        store: Arc<dyn CacheStore>,
        source: Arc<dyn BadgeSource>,
    ) -> Self {
        Self {
            input: input.into(),
            store,
            source,
        }
    }

    /// Path of the watched input file.
    pub fn input_path(&self) -> &Path {
        &self.input
    }

    pub fn store(&self) -> &dyn CacheStore {
        self.store.as_ref()
    }

    /// Return up-to-date records, fetching only when the input changed.
    ///
    /// # Errors
    ///
    /// - [`BadgeError::UpstreamUnavailable`] if the input file cannot be read or
    ///   parsed, or the badge source fails
    /// - [`BadgeError::CacheWriteFailure`] if the fresh records cannot be persisted
    ///
    /// Cache read problems are never errors; they only force a refetch.
    pub async fn sync_badges(&self) -> Result<SyncReport, BadgeError> {
        let raw = tokio::fs::read(&self.input).await.map_err(|e| {
            BadgeError::upstream(format!("cannot read {}: {e}", self.input.display()))
        })?;
        let hash = content_digest(&raw);

        if let Some(records) = self.cached_records(&hash) {
            debug!("Badge cache hit ({} records)", records.len());
            return Ok(SyncReport {
                records,
                source: SyncSource::Cache,
                hash,
            });
        }

        let requests: Vec<BadgeRequest> = serde_json::from_slice(&raw).map_err(|e| {
            BadgeError::upstream(format!("cannot parse {}: {e}", self.input.display()))
        })?;

        info!("Fetching badge data for {} badges", requests.len());
        let records = self
            .source
            .fetch_all(&requests)
            .await
            .map_err(|e| BadgeError::upstream(format!("batch fetch failed: {e}")))?;

        self.store.write_entry(&records)?;
        self.store.write_meta(&CacheMeta::new(hash.clone()))?;
        info!("Badge data cached in {}", self.store.describe());

        Ok(SyncReport {
            records,
            source: SyncSource::Fetched,
            hash,
        })
    }

    /// The persisted entry if `hash` matches the persisted meta.
    fn cached_records(&self, hash: &str) -> Option<Vec<BadgeRecord>> {
        let meta = match self.store.read_meta() {
            Ok(meta) => meta,
            Err(e) => {
                debug!("No usable cache meta: {e}");
                return None;
            }
        };
        if meta.hash != hash {
            debug!("Badge input changed; cache invalidated");
            return None;
        }
        match self.store.read_entry() {
            Ok(records) => Some(records),
            Err(e) => {
                warn!("Cache meta is current but the entry is unusable: {e}");
                None
            }
        }
    }

    /// Whatever entry is persisted, ignoring the digest.
    pub fn read_stale(&self) -> Option<Vec<BadgeRecord>> {
        self.store.read_entry().ok()
    }
}
