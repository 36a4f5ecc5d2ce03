//! Badge metadata resolution
//!
//! [`BadgeResolver::resolve`] turns one [`BadgeRequest`] into a [`BadgeRecord`]
//! and never fails: it walks an ordered list of [`Strategy`] tiers and degrades
//! to a minimal record built from the request alone.
//!
//! # Tiers
//!
//! 1. [`HostApiStrategy`] - `Assertion/Host/{id}` plus the referenced badge definition
//! 2. [`AltApiStrategy`] - `Assertion/{id}` plus the referenced badge definition
//! 3. [`HtmlMetaStrategy`] - Open Graph / Twitter Card tags of the verification page
//! 4. Terminal fallback - `note` as name, default image, no date
//!
//! A tier runs only while no complete record exists. The first non-null
//! `issuedOn` seen by any tier wins and is stamped on the final record, so an
//! assertion that only exposes its date on the host endpoint still gets it
//! when the definition comes from the alternate endpoint.
//!
//! # Example
//!
//! ```rust,no_run
//! use badgesync::badge::BadgeRequest;
//! use badgesync::http::ReqwestFetcher;
//! use badgesync::resolver::BadgeResolver;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let fetcher = Arc::new(ReqwestFetcher::new(Duration::from_secs(10), "badgesync")?);
//! let resolver = BadgeResolver::new(fetcher, "https://api.example.com/openbadge/v2");
//! let record = resolver
//!     .resolve(&BadgeRequest::new("https://example.com/GetAssertionShare/abc", "My badge"))
//!     .await;
//! println!("{} ({:?})", record.name, record.issued_on);
//! # Ok(())
//! # }
//! ```

pub mod definition;
pub mod endpoints;
pub mod html;
pub mod strategy;

pub use definition::NoData;
pub use endpoints::Endpoints;
pub use html::{HtmlMetaStrategy, MetaTags};
pub use strategy::{AltApiStrategy, Attempt, HostApiStrategy, Partial, Strategy};

use std::sync::Arc;
use tracing::{debug, warn};

use crate::badge::{AssertionId, BadgeRecord, BadgeRequest, extract_assertion_id};
use crate::http::HttpFetcher;

/// Multi-tier badge resolver.
pub struct BadgeResolver {
    strategies: Vec<Box<dyn Strategy>>,
    endpoints: Endpoints,
    placeholder_image: String,
}

impl BadgeResolver {
    /// Standard chain (host API, alternate API, page metadata) against `api_base`.
    ///
    /// Badges with malformed URLs fall back to `{api_base}/Assertion/Host/unknown/Image`;
    /// use [`with_placeholder_image`](Self::with_placeholder_image) to change it.
    pub fn new(fetcher: Arc<dyn HttpFetcher>, api_base: impl Into<String>) -> Self {
        Self::standard(fetcher, api_base, None)
    }

    /// Standard chain with an optional custom placeholder image, shared by the
    /// page-metadata tier and the terminal fallback.
    pub fn standard(
        fetcher: Arc<dyn HttpFetcher>,
        api_base: impl Into<String>,
        placeholder_image: Option<String>,
    ) -> Self {
        let endpoints = Endpoints::new(api_base);
        let placeholder_image =
            placeholder_image.unwrap_or_else(|| default_placeholder_image(endpoints.api_base()));
        let strategies: Vec<Box<dyn Strategy>> = vec![
            Box::new(HostApiStrategy::new(Arc::clone(&fetcher), endpoints.clone())),
            Box::new(AltApiStrategy::new(Arc::clone(&fetcher), endpoints.clone())),
            Box::new(HtmlMetaStrategy::new(fetcher, endpoints.clone(), placeholder_image.clone())),
        ];

        Self {
            strategies,
            endpoints,
            placeholder_image,
        }
    }

    /// Custom chain; the terminal fallback still applies after the last tier.
    pub fn with_strategies(
        strategies: Vec<Box<dyn Strategy>>,
        api_base: impl Into<String>,
    ) -> Self {
        let endpoints = Endpoints::new(api_base);
        let placeholder_image = default_placeholder_image(endpoints.api_base());
        Self {
            strategies,
            endpoints,
            placeholder_image,
        }
    }

    /// Image used when no assertion id can be derived.
    ///
    /// Only affects the terminal fallback; build the page-metadata tier with the
    /// same value when using [`with_strategies`](Self::with_strategies).
    #[must_use]
    pub fn with_placeholder_image(mut self, placeholder_image: impl Into<String>) -> Self {
        self.placeholder_image = placeholder_image.into();
        self
    }

    /// Resolve one badge. Never fails.
    pub async fn resolve(&self, request: &BadgeRequest) -> BadgeRecord {
        let id = match extract_assertion_id(&request.url) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("{}; skipping API lookups", e);
                None
            }
        };

        let mut issued_on: Option<String> = None;

        for strategy in &self.strategies {
            let attempt = Attempt {
                request,
                id: id.as_ref(),
                issued_on: issued_on.as_deref(),
            };

            let outcome = strategy.attempt(attempt).await;
            match outcome {
                Ok(partial) => {
                    if issued_on.is_none() {
                        issued_on = partial.issued_on;
                    }
                    if let Some(mut record) = partial.record {
                        debug!("Resolved {} via {}", request.url, strategy.name());
                        record.issued_on = issued_on;
                        return record;
                    }
                    debug!("{} returned no badge definition for {}", strategy.name(), request.url);
                }
                Err(no_data) => {
                    debug!("{} had no data for {}: {}", strategy.name(), request.url, no_data);
                }
            }
        }

        warn!("All strategies failed for {}; using minimal record", request.url);
        self.terminal_record(request, id.as_ref())
    }

    fn terminal_record(&self, request: &BadgeRequest, id: Option<&AssertionId>) -> BadgeRecord {
        BadgeRecord {
            name: request.display_name().to_string(),
            description: String::new(),
            image: id.map_or_else(
                || self.placeholder_image.clone(),
                |id| self.endpoints.terminal_default_image(id),
            ),
            issued_on: None,
            url: request.url.clone(),
            issuer: None,
        }
    }
}

fn default_placeholder_image(api_base: &str) -> String {
    format!("{api_base}/Assertion/Host/unknown/Image")
}
