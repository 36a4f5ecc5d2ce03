//! Test utilities for badgesync
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration suite:
//! - [`FakeFetcher`] - scripted HTTP responses with per-URL call counting
//! - [`MemoryStore`] - in-memory cache store with write-failure injection
//! - [`TestProject`] - temporary project root with the standard layout
//!
//! # Example
//!
//! ```rust,no_run
//! use badgesync::test_utils::{FakeFetcher, TestProject};
//! use serde_json::json;
//!
//! # fn example() -> anyhow::Result<()> {
//! let project = TestProject::with_input(r#"[{"url":"https://x/GetAssertionShare/a","note":"A"}]"#)?;
//! let fake = FakeFetcher::new();
//! fake.respond_json("https://api.example/Assertion/Host/a", 200, json!({"badge": {"name": "A"}}));
//! # Ok(())
//! # }
//! ```

pub mod fake_http;
pub mod memory_store;
pub mod project;

pub use fake_http::FakeFetcher;
pub use memory_store::MemoryStore;
pub use project::TestProject;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has any effect. With `None` the `RUST_LOG` environment
/// variable decides; if it is unset, tests run without a subscriber.
///
/// ```bash
/// RUST_LOG=badgesync=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
