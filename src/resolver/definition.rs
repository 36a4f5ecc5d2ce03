//! Normalization of loosely-typed Open Badge JSON.
//!
//! Badge platforms disagree on shapes: `image` may be a URL or an object with
//! an `id`, `issuer` may be inlined or referenced by URL, `badge` may be
//! embedded or referenced. The helpers here map all of them onto plain
//! strings and treat empty values as absent.

use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

use crate::badge::{BadgeRecord, BadgeRequest};
use crate::http::{HttpFetcher, fetch_json};

/// A tier had nothing usable; carries the reason for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoData(pub String);

impl NoData {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

impl fmt::Display for NoData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-empty string value of `value[key]`.
pub(crate) fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty()).map(str::to_string)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Whether an API payload reports an application-level failure.
///
/// The badge API answers some failures with HTTP 200 and either an `errors`
/// member or `"status": 500` in the body.
pub(crate) fn reports_error(payload: &Value) -> bool {
    payload.get("errors").is_some_and(is_truthy)
        || payload.get("status").and_then(Value::as_i64) == Some(500)
}

/// Fetch an assertion document, folding every failure mode into [`NoData`].
pub(crate) async fn lookup_assertion(fetcher: &dyn HttpFetcher, url: &str) -> Result<Value, NoData> {
    let payload = fetch_json(fetcher, url).await.map_err(|e| NoData::new(e.to_string()))?;
    if reports_error(&payload) {
        return Err(NoData::new(format!("{url} reported an error payload")));
    }
    if !payload.is_object() {
        return Err(NoData::new(format!("{url} did not return an object")));
    }
    Ok(payload)
}

/// Resolve the badge definition an assertion points to.
///
/// Embedded objects are used as-is; string references are fetched. Returns
/// `None` when the assertion has no reference or the definition is unreachable.
pub(crate) async fn load_definition(fetcher: &dyn HttpFetcher, assertion: &Value) -> Option<Value> {
    match assertion.get("badge")? {
        Value::Object(_) => assertion.get("badge").cloned(),
        Value::String(url) if !url.is_empty() => match fetch_json(fetcher, url).await {
            Ok(definition) if definition.is_object() => Some(definition),
            Ok(_) => {
                debug!("Badge definition at {} is not an object", url);
                None
            }
            Err(e) => {
                debug!("Badge definition unavailable: {}", e);
                None
            }
        },
        _ => None,
    }
}

/// Image URL from an `image` member: a URL string, or an object's `id`.
pub(crate) fn resolve_image(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        obj @ Value::Object(_) => string_field(obj, "id"),
        _ => None,
    }
}

/// Issuer display name from an `issuer` member.
///
/// Inline objects contribute their `name`; URL references are fetched once.
/// A failed fetch yields `None`, never an error.
pub(crate) async fn resolve_issuer_name(
    fetcher: &dyn HttpFetcher,
    issuer: Option<&Value>,
) -> Option<String> {
    match issuer? {
        obj @ Value::Object(_) => string_field(obj, "name"),
        Value::String(url) if !url.is_empty() => match fetch_json(fetcher, url).await {
            Ok(document) => string_field(&document, "name"),
            Err(e) => {
                warn!("Issuer lookup skipped: {}", e);
                None
            }
        },
        _ => None,
    }
}

/// Build a record from a badge definition and already-resolved parts.
pub(crate) fn record_from_definition(
    definition: &Value,
    request: &BadgeRequest,
    image: String,
    issued_on: Option<String>,
    issuer: Option<String>,
) -> BadgeRecord {
    BadgeRecord {
        name: string_field(definition, "name")
            .unwrap_or_else(|| request.display_name().to_string()),
        description: string_field(definition, "description").unwrap_or_default(),
        image,
        issued_on,
        url: request.url.clone(),
        issuer,
    }
}
