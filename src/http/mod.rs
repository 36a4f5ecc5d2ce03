//! Upstream HTTP access
//!
//! Every upstream call in badgesync is a plain GET. The [`HttpFetcher`] trait is
//! the seam between the resolver and the network: production code uses
//! [`ReqwestFetcher`], tests script responses with `test_utils::FakeFetcher`.
//!
//! A fetcher only fails for transport-level problems (DNS, connect, timeout,
//! unreadable body). Non-success statuses come back as an [`HttpResponse`] so
//! that each strategy can decide what a 404 or 500 means for it; [`fetch_json`]
//! folds both into [`BadgeError::TransportFailure`] for the common case.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::core::BadgeError;

/// Status and body of a completed GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Create a response from a status code and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// The body as text.
    pub fn text(&self) -> &str {
        &self.body
    }
}

/// Minimal GET-only HTTP client used by the resolver.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// Perform a GET request.
    ///
    /// # Errors
    ///
    /// [`BadgeError::TransportFailure`] when no response could be obtained.
    async fn get(&self, url: &str) -> Result<HttpResponse, BadgeError>;
}

#[async_trait]
impl<T: HttpFetcher + ?Sized> HttpFetcher for Arc<T> {
    async fn get(&self, url: &str) -> Result<HttpResponse, BadgeError> {
        (**self).get(url).await
    }
}

/// GET `url` and parse a successful response body as JSON.
///
/// # Errors
///
/// [`BadgeError::TransportFailure`] for transport errors, non-2xx statuses and
/// bodies that are not JSON.
pub async fn fetch_json(fetcher: &dyn HttpFetcher, url: &str) -> Result<Value, BadgeError> {
    let response = fetcher.get(url).await?;
    if !response.is_success() {
        return Err(BadgeError::transport(url, format!("HTTP {}", response.status)));
    }
    response.json().map_err(|e| BadgeError::transport(url, format!("invalid JSON body: {e}")))
}

/// [`HttpFetcher`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// Build a client with the given per-request timeout and user agent.
    ///
    /// # Errors
    ///
    /// [`BadgeError::ConfigError`] if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, BadgeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| BadgeError::ConfigError {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
        })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str) -> Result<HttpResponse, BadgeError> {
        debug!("GET {}", url);

        let response =
            self.client.get(url).send().await.map_err(|e| BadgeError::transport(url, e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| BadgeError::transport(url, e))?;

        debug!("GET {} -> {}", url, status);
        Ok(HttpResponse::new(status, body))
    }
}
