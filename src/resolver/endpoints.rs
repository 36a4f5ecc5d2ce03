//! Upstream URL templates.
//!
//! The host-scoped and id-scoped APIs use different default image paths
//! (`.../Image` vs `.../image`); both spellings are kept as the API serves them.

use crate::badge::AssertionId;

/// URL builder for the badge API rooted at `api_base`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    api_base: String,
}

impl Endpoints {
    /// Create endpoints for an API base URL; a trailing slash is ignored.
    pub fn new(api_base: impl Into<String>) -> Self {
        let mut api_base = api_base.into();
        while api_base.ends_with('/') {
            api_base.pop();
        }
        Self {
            api_base,
        }
    }

    /// The normalized API base.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Host-scoped assertion lookup.
    #[must_use]
    pub fn host_assertion(&self, id: &AssertionId) -> String {
        format!("{}/Assertion/Host/{id}", self.api_base)
    }

    /// Alternate (id-scoped) assertion lookup.
    #[must_use]
    pub fn alt_assertion(&self, id: &AssertionId) -> String {
        format!("{}/Assertion/{id}", self.api_base)
    }

    /// Default image for records resolved through the host endpoint.
    #[must_use]
    pub fn host_default_image(&self, id: &AssertionId) -> String {
        format!("{}/Assertion/Host/{id}/Image", self.api_base)
    }

    /// Default image for records resolved through the alternate endpoint or page metadata.
    #[must_use]
    pub fn alt_default_image(&self, id: &AssertionId) -> String {
        format!("{}/Assertion/{id}/image", self.api_base)
    }

    /// Default image for the terminal fallback record.
    #[must_use]
    pub fn terminal_default_image(&self, id: &AssertionId) -> String {
        format!("{}/Assertion/{id}/Image", self.api_base)
    }
}
