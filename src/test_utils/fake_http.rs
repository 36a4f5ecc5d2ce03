//! Scripted in-memory [`HttpFetcher`] for tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::core::BadgeError;
use crate::http::{HttpFetcher, HttpResponse};

#[derive(Debug, Clone)]
enum Route {
    Respond(HttpResponse),
    Fail(String),
}

/// `FakeFetcher` answers GET requests from a route table and records every call.
///
/// URLs without a route fail with a transport error, which lets tests model an
/// unreachable host simply by not scripting it.
#[derive(Clone, Default)]
pub struct FakeFetcher {
    routes: Arc<Mutex<HashMap<String, Route>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeFetcher {
    /// Create a fetcher with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with a JSON body.
    pub fn respond_json(&self, url: impl Into<String>, status: u16, body: Value) -> &Self {
        self.route(url, Route::Respond(HttpResponse::new(status, body.to_string())))
    }

    /// Answer `url` with a raw text body.
    pub fn respond_text(&self, url: impl Into<String>, status: u16, body: impl Into<String>) -> &Self {
        self.route(url, Route::Respond(HttpResponse::new(status, body)))
    }

    /// Make `url` fail at the transport level (timeout, connection reset, ...).
    pub fn fail(&self, url: impl Into<String>, reason: impl Into<String>) -> &Self {
        self.route(url, Route::Fail(reason.into()))
    }

    fn route(&self, url: impl Into<String>, route: Route) -> &Self {
        self.routes.lock().unwrap().insert(url.into(), route);
        self
    }

    /// Every requested URL, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests made to `url`.
    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.as_str() == url).count()
    }

    /// Number of requests made in total.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Forget recorded calls, keeping the routes.
    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

#[async_trait]
impl HttpFetcher for FakeFetcher {
    async fn get(&self, url: &str) -> Result<HttpResponse, BadgeError> {
        self.calls.lock().unwrap().push(url.to_string());

        let route = self.routes.lock().unwrap().get(url).cloned();
        match route {
            Some(Route::Respond(response)) => Ok(response),
            Some(Route::Fail(reason)) => Err(BadgeError::transport(url, reason)),
            None => Err(BadgeError::transport(url, "connection refused (no fake route)")),
        }
    }
}
