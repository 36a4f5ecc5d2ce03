//! File system utilities
//!
//! - [`atomic`] - temp-file-then-rename writes for the cache files
//! - [`dirs`] - idempotent directory creation and tolerant removal

pub mod atomic;
pub mod dirs;

pub use atomic::{atomic_write, safe_write};
pub use dirs::{ensure_dir, ensure_parent_dir, remove_file_if_exists};
