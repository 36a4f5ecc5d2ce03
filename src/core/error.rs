//! Error handling for badgesync
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** ([`BadgeError`]) for the library layers
//! 2. **User-friendly messages** ([`ErrorContext`]) with actionable suggestions for CLI users
//!
//! # Propagation Policy
//!
//! Per-badge failures ([`BadgeError::InvalidUrlFormat`], [`BadgeError::TransportFailure`])
//! are absorbed by the resolver, which always degrades to a displayable record.
//! Orchestration failures ([`BadgeError::UpstreamUnavailable`],
//! [`BadgeError::CacheWriteFailure`]) propagate once to the caller, which decides
//! between stale cache and an empty list. [`BadgeError::CacheReadFailure`] only
//! ever means "no cache".
//!
//! # Examples
//!
//! ```rust,no_run
//! use badgesync::core::{BadgeError, user_friendly_error};
//!
//! let error = BadgeError::UpstreamUnavailable {
//!     reason: "badge list could not be read".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for badgesync operations.
///
/// # Error Categories
///
/// ## Per-badge (absorbed by the resolver)
/// - [`InvalidUrlFormat`] - Verification URL without the assertion marker segment
/// - [`TransportFailure`] - Network error or non-success HTTP status
///
/// ## Orchestration (propagated to the caller)
/// - [`UpstreamUnavailable`] - Input list unreadable or unparsable, or the batch failed
/// - [`CacheWriteFailure`] - Cache entry or meta could not be persisted
/// - [`ConfigError`] - Invalid `badgesync.toml` or environment override
///
/// ## Cache reads (never fatal)
/// - [`CacheReadFailure`] - Missing or corrupt cache file
///
/// [`InvalidUrlFormat`]: BadgeError::InvalidUrlFormat
/// [`TransportFailure`]: BadgeError::TransportFailure
/// [`UpstreamUnavailable`]: BadgeError::UpstreamUnavailable
/// [`CacheWriteFailure`]: BadgeError::CacheWriteFailure
/// [`ConfigError`]: BadgeError::ConfigError
/// [`CacheReadFailure`]: BadgeError::CacheReadFailure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BadgeError {
    /// The verification URL does not contain `/GetAssertionShare/<id>`.
    #[error("Invalid badge URL format: {url}")]
    InvalidUrlFormat {
        /// The offending URL
        url: String,
    },

    /// A network call failed or returned a non-success status.
    #[error("Request to {url} failed: {reason}")]
    TransportFailure {
        /// The requested URL
        url: String,
        /// Transport error or HTTP status description
        reason: String,
    },

    /// The gatekeeper could not obtain its input or run the batch.
    #[error("Badge data unavailable: {reason}")]
    UpstreamUnavailable {
        /// What went wrong
        reason: String,
    },

    /// A cache file is missing or corrupt.
    #[error("Cache file {path} could not be read: {reason}")]
    CacheReadFailure {
        /// Path (or store key) of the cache file
        path: String,
        /// Underlying I/O or parse error
        reason: String,
    },

    /// A cache file could not be written.
    #[error("Cache file {path} could not be written: {reason}")]
    CacheWriteFailure {
        /// Path (or store key) of the cache file
        path: String,
        /// Underlying I/O or serialization error
        reason: String,
    },

    /// Configuration is invalid.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// Anything else surfaced to the CLI user.
    #[error("{0}")]
    Other(String),
}

impl BadgeError {
    /// Build a [`BadgeError::TransportFailure`] from anything displayable.
    pub fn transport(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::TransportFailure {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`BadgeError::UpstreamUnavailable`] from anything displayable.
    pub fn upstream(reason: impl fmt::Display) -> Self {
        Self::UpstreamUnavailable {
            reason: reason.to_string(),
        }
    }
}

/// Error context wrapper that provides user-friendly error information.
///
/// Suggestions are printed in green, details in yellow, the error itself in
/// bold red.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: BadgeError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: BadgeError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into a user-friendly [`ErrorContext`].
///
/// Known [`BadgeError`]s anywhere in the chain get tailored suggestions;
/// everything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(badge_error) = error.chain().find_map(|e| e.downcast_ref::<BadgeError>()) {
        return create_error_context(badge_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>()
        && io_error.kind() == std::io::ErrorKind::PermissionDenied
    {
        return ErrorContext::new(BadgeError::Other(io_error.to_string()))
            .with_suggestion("Check ownership and permissions of the project and cache directories");
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(BadgeError::Other(message))
}

fn create_error_context(error: BadgeError) -> ErrorContext {
    match &error {
        BadgeError::InvalidUrlFormat {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Use the share link of the badge, e.g. https://<host>/GetAssertionShare/<id>")
            .with_details("The assertion id is read from the path segment after 'GetAssertionShare'"),
        BadgeError::TransportFailure {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check your network connection or retry later; the badge API may be rate limiting"),
        BadgeError::UpstreamUnavailable {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check that src/data/badge-urls.json exists and is a JSON array of {url, note} objects"),
        BadgeError::CacheReadFailure {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Run 'badgesync cache clean' to discard the corrupt cache"),
        BadgeError::CacheWriteFailure {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check that the cache directory is writable"),
        BadgeError::ConfigError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the syntax of badgesync.toml and the BADGESYNC_* environment variables"),
        BadgeError::Other(_) => ErrorContext::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BadgeError::InvalidUrlFormat {
            url: "https://example.com/badge".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid badge URL format: https://example.com/badge");

        let err = BadgeError::transport("https://api.example.com/a", "HTTP 500");
        assert_eq!(err.to_string(), "Request to https://api.example.com/a failed: HTTP 500");
    }

    #[test]
    fn test_user_friendly_error_finds_badge_error_in_chain() {
        let err = anyhow::Error::from(BadgeError::upstream("no input"))
            .context("Failed to sync badges");
        let ctx = user_friendly_error(err);

        assert!(matches!(ctx.error, BadgeError::UpstreamUnavailable { .. }));
        assert!(ctx.suggestion.is_some());
    }

    #[test]
    fn test_user_friendly_error_generic_includes_chain() {
        let err = anyhow::anyhow!("root cause").context("outer");
        let ctx = user_friendly_error(err);
        let rendered = ctx.to_string();

        assert!(rendered.contains("outer"));
        assert!(rendered.contains("Caused by:"));
        assert!(rendered.contains("root cause"));
    }

    #[test]
    fn test_error_context_display_format() {
        let ctx = ErrorContext::new(BadgeError::ConfigError {
            message: "bad delay".to_string(),
        })
        .with_details("delay_ms must be a number")
        .with_suggestion("Fix badgesync.toml");

        let rendered = ctx.to_string();
        assert!(rendered.starts_with("Configuration error: bad delay"));
        assert!(rendered.contains("\nDetails: delay_ms must be a number"));
        assert!(rendered.contains("\nSuggestion: Fix badgesync.toml"));
    }
}
