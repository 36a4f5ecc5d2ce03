//! Assertion id extraction from verification URLs.
//!
//! Share links look like `https://<host>/.../GetAssertionShare/<id>`; the id is
//! the path segment right after the marker.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::constants::ASSERTION_SHARE_MARKER;
use crate::core::BadgeError;

/// Assertion id extracted from a verification URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssertionId(String);

impl AssertionId {
    /// The raw id token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssertionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn share_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let pattern = format!("/{}/([^/?#]+)", regex::escape(ASSERTION_SHARE_MARKER));
        Regex::new(&pattern).expect("assertion share pattern is a valid regex")
    })
}

/// Derive the assertion id from a verification URL.
///
/// # Errors
///
/// [`BadgeError::InvalidUrlFormat`] when the URL has no `/GetAssertionShare/<id>` segment.
///
/// # Examples
///
/// ```rust
/// use badgesync::badge::extract_assertion_id;
///
/// let id = extract_assertion_id("https://example.com/GetAssertionShare/abc123").unwrap();
/// assert_eq!(id.as_str(), "abc123");
/// ```
pub fn extract_assertion_id(url: &str) -> Result<AssertionId, BadgeError> {
    share_pattern()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| AssertionId(m.as_str().to_string()))
        .ok_or_else(|| BadgeError::InvalidUrlFormat {
            url: url.to_string(),
        })
}
