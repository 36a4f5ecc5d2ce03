//! Utilities shared by the cache and the CLI
//!
//! - [`fs`] - Atomic writes and directory helpers
//! - [`progress`] - Progress bars for batch fetches

pub mod fs;
pub mod progress;

pub use fs::{atomic_write, ensure_dir, safe_write};
pub use progress::ProgressBar;
