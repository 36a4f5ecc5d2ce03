//! Global constants used throughout the badgesync codebase.
//!
//! Endpoint templates, file names and timing defaults live here so the
//! resolver, the cache and the CLI agree on them.

use std::time::Duration;

/// Base URL of the Open Badge v2 API that hosts the assertions.
pub const DEFAULT_API_BASE: &str = "https://nlp.netlearning.co.jp/api/v1.0/openbadge/v2";

/// Marker path segment that precedes the assertion id in a verification URL.
pub const ASSERTION_SHARE_MARKER: &str = "GetAssertionShare";

/// Delay inserted between two badge resolutions (500ms).
///
/// The upstream API is operated by a third party and rate limits aggressively.
pub const DEFAULT_DELAY_MS: u64 = 500;

/// Per-request timeout for upstream calls (10 seconds).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent with every upstream request.
pub const DEFAULT_USER_AGENT: &str = concat!("badgesync/", env!("CARGO_PKG_VERSION"));

/// Project-relative path of the badge request list.
pub const DEFAULT_INPUT_PATH: &str = "src/data/badge-urls.json";

/// Project-relative cache directory.
pub const DEFAULT_CACHE_DIR: &str = ".cache";

/// File holding the pretty-printed badge record array.
pub const CACHE_FILE: &str = "badges.json";

/// File holding `{"hash": "..."}` for the cached input.
pub const META_FILE: &str = "badges.meta.json";

/// Optional per-project configuration file.
pub const CONFIG_FILE: &str = "badgesync.toml";

/// Id the page bundle imports the badge list from.
pub const VIRTUAL_MODULE_ID: &str = "virtual:badges";

/// Internal id the virtual module resolves to.
pub const RESOLVED_MODULE_ID: &str = "\0virtual:badges";

/// Default polling interval for `badgesync watch` (1 second).
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(1);
