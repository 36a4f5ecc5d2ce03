//! Sequential batch resolution.
//!
//! Badges are resolved strictly one after another with a fixed pause between
//! them; the third-party API rate limits concurrent or bursty clients. Output
//! order and length always match the input.

use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use crate::badge::{BadgeRecord, BadgeRequest};
use crate::core::BadgeError;
use crate::resolver::BadgeResolver;
use crate::utils::progress::ProgressBar;

/// Anything that can turn a request list into records.
///
/// [`BatchFetcher`] is the production implementation; the cache gatekeeper
/// depends only on this trait so that tests can count invocations.
#[async_trait]
pub trait BadgeSource: Send + Sync {
    /// Resolve every request, preserving order.
    async fn fetch_all(&self, requests: &[BadgeRequest]) -> Result<Vec<BadgeRecord>, BadgeError>;
}

/// Resolves badges one at a time with a delay in between.
pub struct BatchFetcher {
    resolver: BadgeResolver,
    delay: Duration,
    show_progress: bool,
}

impl BatchFetcher {
    /// Create a fetcher that pauses `delay` between two resolutions.
    pub fn new(resolver: BadgeResolver, delay: Duration) -> Self {
        Self {
            resolver,
            delay,
            show_progress: false,
        }
    }

    /// Show a progress bar while a non-empty batch is being resolved.
    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn progress_bar(&self, len: usize) -> Option<ProgressBar> {
        (self.show_progress && len > 0).then(|| ProgressBar::new(len as u64))
    }

    /// Resolve all requests sequentially.
    pub async fn resolve_all(&self, requests: &[BadgeRequest]) -> Vec<BadgeRecord> {
        let mut records = Vec::with_capacity(requests.len());
        let progress = self.progress_bar(requests.len());

        for (index, request) in requests.iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            if let Some(progress) = &progress {
                progress.set_message(request.display_name().to_string());
            }

            let record = self.resolver.resolve(request).await;
            info!("[{}/{}] {}", index + 1, requests.len(), record.name);
            records.push(record);

            if let Some(progress) = &progress {
                progress.inc(1);
            }
        }

        if let Some(progress) = &progress {
            progress.finish_and_clear();
        }

        records
    }
}

#[async_trait]
impl BadgeSource for BatchFetcher {
    async fn fetch_all(&self, requests: &[BadgeRequest]) -> Result<Vec<BadgeRecord>, BadgeError> {
        Ok(self.resolve_all(requests).await)
    }
}
