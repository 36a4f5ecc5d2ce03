//! Badge data model
//!
//! - [`BadgeRequest`] - one `{url, note}` entry of the input list
//! - [`AssertionId`] - token embedded in a verification URL ([`assertion`])
//! - [`BadgeRecord`] - normalized output unit consumed by the page
//!
//! Order is preserved end to end: the n-th request always produces the n-th record.
//!
//! # Wire format
//!
//! ```json
//! {
//!   "name": "Cloud Practitioner",
//!   "description": "Awarded for ...",
//!   "image": "https://example.com/badge.png",
//!   "issuedOn": "2024-05-01",
//!   "url": "https://example.com/GetAssertionShare/abc123",
//!   "issuer": "Example Org"
//! }
//! ```
//!
//! `issuedOn` is always present (possibly `null`); `issuer` is omitted entirely
//! when it could not be resolved.

pub mod assertion;

pub use assertion::{AssertionId, extract_assertion_id};

use serde::{Deserialize, Serialize};

/// Name used when a request has neither a note nor a URL.
pub const UNTITLED_BADGE: &str = "Untitled badge";

/// A badge the site owner wants displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeRequest {
    /// Verification (share) URL of the assertion.
    pub url: String,
    /// Free-form label, used as the name when upstream has none.
    #[serde(default)]
    pub note: String,
}

impl BadgeRequest {
    /// Create a request from a URL and a note.
    pub fn new(url: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            note: note.into(),
        }
    }

    /// Name of last resort for this badge: the note, else the URL, else a fixed label.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if !self.note.trim().is_empty() {
            &self.note
        } else if !self.url.trim().is_empty() {
            &self.url
        } else {
            UNTITLED_BADGE
        }
    }
}

/// Normalized badge metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeRecord {
    pub name: String,
    pub description: String,
    /// Absolute image URL; never empty.
    pub image: String,
    /// Issuance date as reported upstream, `null` when unknown.
    pub issued_on: Option<String>,
    /// The verification URL the record was resolved from.
    pub url: String,
    /// Issuer display name, omitted when unresolvable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
}
