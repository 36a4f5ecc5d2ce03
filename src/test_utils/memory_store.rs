//! In-memory [`CacheStore`] with failure injection.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::badge::BadgeRecord;
use crate::cache::{CacheMeta, CacheStore};
use crate::core::BadgeError;

#[derive(Debug, Default)]
struct State {
    entry: Option<Vec<BadgeRecord>>,
    meta: Option<CacheMeta>,
    fail_entry_writes: bool,
    fail_meta_writes: bool,
    writes: Vec<&'static str>,
}

/// Cache store backed by memory. Clones share state.
///
/// Every successful write is appended to [`MemoryStore::write_log`] as
/// `"entry"` or `"meta"`, which makes write ordering observable.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Make subsequent entry writes fail with `CacheWriteFailure`.
    pub fn fail_entry_writes(&self, fail: bool) {
        self.state().fail_entry_writes = fail;
    }

    /// Make subsequent meta writes fail with `CacheWriteFailure`.
    pub fn fail_meta_writes(&self, fail: bool) {
        self.state().fail_meta_writes = fail;
    }

    /// Successful writes, oldest first.
    pub fn write_log(&self) -> Vec<&'static str> {
        self.state().writes.clone()
    }
}

fn missing(key: &str) -> BadgeError {
    BadgeError::CacheReadFailure {
        path: format!("memory:{key}"),
        reason: "not present".to_string(),
    }
}

fn injected(key: &str) -> BadgeError {
    BadgeError::CacheWriteFailure {
        path: format!("memory:{key}"),
        reason: "injected failure".to_string(),
    }
}

impl CacheStore for MemoryStore {
    fn read_entry(&self) -> Result<Vec<BadgeRecord>, BadgeError> {
        self.state().entry.clone().ok_or_else(|| missing("entry"))
    }

    fn write_entry(&self, records: &[BadgeRecord]) -> Result<(), BadgeError> {
        let mut state = self.state();
        if state.fail_entry_writes {
            return Err(injected("entry"));
        }
        state.entry = Some(records.to_vec());
        state.writes.push("entry");
        Ok(())
    }

    fn read_meta(&self) -> Result<CacheMeta, BadgeError> {
        self.state().meta.clone().ok_or_else(|| missing("meta"))
    }

    fn write_meta(&self, meta: &CacheMeta) -> Result<(), BadgeError> {
        let mut state = self.state();
        if state.fail_meta_writes {
            return Err(injected("meta"));
        }
        state.meta = Some(meta.clone());
        state.writes.push("meta");
        Ok(())
    }

    fn clear(&self) -> Result<usize, BadgeError> {
        let mut state = self.state();
        let removed =
            usize::from(state.entry.take().is_some()) + usize::from(state.meta.take().is_some());
        Ok(removed)
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
