//! Resolution strategies.
//!
//! Each tier implements [`Strategy`] and reports either a [`Partial`] result
//! (possibly just an issuance date) or [`NoData`]. The reducer in
//! [`super::BadgeResolver`] runs them in order and carries the first known
//! date forward.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::definition::{
    NoData, load_definition, lookup_assertion, record_from_definition, resolve_image,
    resolve_issuer_name, string_field,
};
use super::endpoints::Endpoints;
use crate::badge::{AssertionId, BadgeRecord, BadgeRequest};
use crate::http::HttpFetcher;

/// Input to a single strategy attempt.
#[derive(Debug, Clone, Copy)]
pub struct Attempt<'a> {
    pub request: &'a BadgeRequest,
    /// `None` when the verification URL is malformed.
    pub id: Option<&'a AssertionId>,
    /// Issuance date found by an earlier tier, if any.
    pub issued_on: Option<&'a str>,
}

/// What a tier produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Partial {
    pub issued_on: Option<String>,
    /// Complete record; ends the chain when present.
    pub record: Option<BadgeRecord>,
}

impl Partial {
    /// An assertion was found but carried no usable badge definition.
    pub fn date_only(issued_on: Option<String>) -> Self {
        Self {
            issued_on,
            record: None,
        }
    }

    /// A complete record.
    pub fn complete(record: BadgeRecord) -> Self {
        Self {
            issued_on: record.issued_on.clone(),
            record: Some(record),
        }
    }
}

/// One tier of the resolution chain.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Try to resolve the badge.
    async fn attempt(&self, attempt: Attempt<'_>) -> Result<Partial, NoData>;
}

fn require_id<'a>(attempt: &Attempt<'a>) -> Result<&'a AssertionId, NoData> {
    attempt.id.ok_or_else(|| NoData::new("no assertion id"))
}

/// Strategy 1: `Assertion/Host/{id}`.
pub struct HostApiStrategy {
    fetcher: Arc<dyn HttpFetcher>,
    endpoints: Endpoints,
}

impl HostApiStrategy {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, endpoints: Endpoints) -> Self {
        Self {
            fetcher,
            endpoints,
        }
    }
}

#[async_trait]
impl Strategy for HostApiStrategy {
    fn name(&self) -> &'static str {
        "host-api"
    }

    async fn attempt(&self, attempt: Attempt<'_>) -> Result<Partial, NoData> {
        let id = require_id(&attempt)?;
        let fetcher = self.fetcher.as_ref();

        let assertion = lookup_assertion(fetcher, &self.endpoints.host_assertion(id)).await?;
        let issued_on = string_field(&assertion, "issuedOn");

        let Some(definition) = load_definition(fetcher, &assertion).await else {
            debug!("Host assertion {} has no badge definition", id);
            return Ok(Partial::date_only(issued_on));
        };

        let image = resolve_image(definition.get("image"))
            .unwrap_or_else(|| self.endpoints.host_default_image(id));
        let issuer = resolve_issuer_name(fetcher, definition.get("issuer")).await;

        Ok(Partial::complete(record_from_definition(
            &definition,
            attempt.request,
            image,
            issued_on,
            issuer,
        )))
    }
}

/// Strategy 2: `Assertion/{id}`.
///
/// Prefers the assertion's own `image` over the definition's.
pub struct AltApiStrategy {
    fetcher: Arc<dyn HttpFetcher>,
    endpoints: Endpoints,
}

impl AltApiStrategy {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, endpoints: Endpoints) -> Self {
        Self {
            fetcher,
            endpoints,
        }
    }
}

#[async_trait]
impl Strategy for AltApiStrategy {
    fn name(&self) -> &'static str {
        "alt-api"
    }

    async fn attempt(&self, attempt: Attempt<'_>) -> Result<Partial, NoData> {
        let id = require_id(&attempt)?;
        let fetcher = self.fetcher.as_ref();

        let assertion = lookup_assertion(fetcher, &self.endpoints.alt_assertion(id)).await?;
        let issued_on = string_field(&assertion, "issuedOn");

        let Some(definition) = load_definition(fetcher, &assertion).await else {
            debug!("Assertion {} has no badge definition", id);
            return Ok(Partial::date_only(issued_on));
        };

        let image = resolve_image(assertion.get("image"))
            .or_else(|| resolve_image(definition.get("image")))
            .unwrap_or_else(|| self.endpoints.alt_default_image(id));
        let issuer = resolve_issuer_name(fetcher, definition.get("issuer")).await;

        Ok(Partial::complete(record_from_definition(
            &definition,
            attempt.request,
            image,
            issued_on,
            issuer,
        )))
    }
}
