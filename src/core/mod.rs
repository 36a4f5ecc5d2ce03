//! Core types and error handling for badgesync
//!
//! - [`error`] - [`BadgeError`] taxonomy and CLI-facing [`ErrorContext`]

pub mod error;

pub use error::{BadgeError, ErrorContext, user_friendly_error};
