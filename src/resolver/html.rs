//! Page metadata fallback.
//!
//! When neither API yields a badge definition, the verification page itself is
//! fetched and its Open Graph / Twitter Card tags are used. Attribute order
//! inside a `<meta>` tag does not matter.

use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::debug;

use super::definition::{NoData, lookup_assertion, string_field};
use super::endpoints::Endpoints;
use super::strategy::{Attempt, Partial, Strategy};
use crate::badge::{AssertionId, BadgeRecord};
use crate::http::HttpFetcher;

fn meta_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?is)<meta\b(?:[^>"']|"[^"]*"|'[^']*')*>"#)
            .expect("meta tag pattern is a valid regex")
    })
}

fn attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("attribute pattern is a valid regex")
    })
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// `property`/`name` → `content` pairs of a document's `<meta>` tags.
///
/// Keys are compared case-insensitively; the first tag for a key wins.
#[derive(Debug, Default, Clone)]
pub struct MetaTags {
    entries: HashMap<String, String>,
}

impl MetaTags {
    /// Scan an HTML document.
    pub fn parse(html: &str) -> Self {
        let mut entries = HashMap::new();

        for tag in meta_tag_pattern().find_iter(html) {
            let mut key = None;
            let mut content = None;

            for caps in attribute_pattern().captures_iter(tag.as_str()) {
                let attr = caps[1].to_ascii_lowercase();
                let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
                match attr.as_str() {
                    "property" | "name" if key.is_none() => key = Some(value.to_ascii_lowercase()),
                    "content" => content = Some(decode_entities(value)),
                    _ => {}
                }
            }

            if let (Some(key), Some(content)) = (key, content) {
                entries.entry(key).or_insert(content);
            }
        }

        Self {
            entries,
        }
    }

    /// Non-empty content for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&key.to_ascii_lowercase()).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// First non-empty content among `keys`.
    #[must_use]
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }
}

/// Strategy 4: scrape the verification page.
///
/// A non-OK page response is a failure of this tier. When no date is known
/// yet, both assertion endpoints are queried once more purely for `issuedOn`.
pub struct HtmlMetaStrategy {
    fetcher: Arc<dyn HttpFetcher>,
    endpoints: Endpoints,
    placeholder_image: String,
}

impl HtmlMetaStrategy {
    pub fn new(
        fetcher: Arc<dyn HttpFetcher>,
        endpoints: Endpoints,
        placeholder_image: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            endpoints,
            placeholder_image: placeholder_image.into(),
        }
    }

    async fn recover_issued_on(&self, id: &AssertionId) -> Option<String> {
        for url in [self.endpoints.host_assertion(id), self.endpoints.alt_assertion(id)] {
            match lookup_assertion(self.fetcher.as_ref(), &url).await {
                Ok(assertion) => {
                    if let Some(issued_on) = string_field(&assertion, "issuedOn") {
                        return Some(issued_on);
                    }
                }
                Err(e) => debug!("Date recovery from {} failed: {}", url, e),
            }
        }
        None
    }
}

#[async_trait]
impl Strategy for HtmlMetaStrategy {
    fn name(&self) -> &'static str {
        "html-meta"
    }

    async fn attempt(&self, attempt: Attempt<'_>) -> Result<Partial, NoData> {
        let url = &attempt.request.url;
        let response = self.fetcher.get(url).await.map_err(|e| NoData::new(e.to_string()))?;
        if !response.is_success() {
            return Err(NoData::new(format!("failed to fetch badge page: HTTP {}", response.status)));
        }

        let tags = MetaTags::parse(response.text());
        let image = match (tags.first_of(&["og:image", "twitter:image"]), attempt.id) {
            (Some(image), _) => image.to_string(),
            (None, Some(id)) => self.endpoints.alt_default_image(id),
            (None, None) => self.placeholder_image.clone(),
        };

        let issued_on = match (attempt.issued_on, attempt.id) {
            (Some(known), _) => Some(known.to_string()),
            (None, Some(id)) => self.recover_issued_on(id).await,
            (None, None) => None,
        };

        Ok(Partial::complete(BadgeRecord {
            name: tags
                .first_of(&["og:title", "twitter:title"])
                .unwrap_or_else(|| attempt.request.display_name())
                .to_string(),
            description: tags
                .first_of(&["og:description", "twitter:description"])
                .unwrap_or_default()
                .to_string(),
            image,
            issued_on,
            url: url.clone(),
            issuer: None,
        }))
    }
}
