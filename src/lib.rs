//! badgesync - Open Badge metadata for static sites
//!
//! Resolves a hand-maintained list of badge verification URLs into
//! display-ready metadata at build time, and caches the result until the list
//! changes.
//!
//! # Architecture Overview
//!
//! Data flows one way:
//!
//! ```text
//! badge-urls.json ─► assertion id ─► resolver (per badge) ─► batch (sequential)
//!                                                               │
//!              virtual:badges ◄─ build hook ◄─ cache gatekeeper ◄┘
//! ```
//!
//! - [`badge`] - Request/record types and assertion id extraction
//! - [`resolver`] - Tiered metadata resolution that never fails
//! - [`batch`] - Sequential, throttled resolution of the whole list
//! - [`cache`] - Content-addressed memoization of the batch result
//! - [`hook`] - The `virtual:badges` module and its recovery policy
//!
//! ## Supporting Modules
//! - [`cli`] - `badgesync` command-line interface
//! - [`config`] - `badgesync.toml` and environment overrides
//! - [`constants`] - Endpoints, file names, defaults
//! - [`core`] - Error types and user-facing error formatting
//! - [`http`] - GET-only HTTP abstraction over `reqwest`
//! - [`utils`] - Atomic file writes and progress bars
//!
//! # Input Format (`src/data/badge-urls.json`)
//!
//! ```json
//! [
//!   { "url": "https://example.com/GetAssertionShare/abc123", "note": "Cloud Practitioner" }
//! ]
//! ```
//!
//! # Cache Layout
//!
//! ```text
//! .cache/
//! ├── badges.json        # resolved records, pretty-printed
//! └── badges.meta.json   # {"hash": "<sha256 of badge-urls.json>"}
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use badgesync::batch::BatchFetcher;
//! use badgesync::cache::{BadgeCache, DirectoryStore};
//! use badgesync::http::ReqwestFetcher;
//! use badgesync::resolver::BadgeResolver;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let http = Arc::new(ReqwestFetcher::new(Duration::from_secs(10), "my-site")?);
//! let resolver = BadgeResolver::new(http, badgesync::constants::DEFAULT_API_BASE);
//! let batch = BatchFetcher::new(resolver, Duration::from_millis(500));
//! let cache = BadgeCache::new(
//!     "src/data/badge-urls.json",
//!     Arc::new(DirectoryStore::new(".cache")),
//!     Arc::new(batch),
//! );
//! let report = cache.sync_badges().await?;
//! println!("{} badges ({:?})", report.records.len(), report.source);
//! # Ok(())
//! # }
//! ```

pub mod badge;
pub mod batch;
pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod hook;
pub mod http;
pub mod resolver;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
