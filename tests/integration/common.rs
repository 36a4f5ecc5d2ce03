//! Shared fixtures for the integration suite.

use assert_cmd::Command;
use badgesync::batch::BatchFetcher;
use badgesync::cache::{BadgeCache, DirectoryStore};
use badgesync::resolver::BadgeResolver;
use badgesync::test_utils::{FakeFetcher, TestProject};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// API base used with `FakeFetcher`.
pub const API: &str = "https://api.badges.test/v2";

/// A local port nothing listens on, so every request fails fast.
pub const OFFLINE_API: &str = "http://127.0.0.1:9/openbadge/v2";

/// Share URL for assertion `id` on the fake host.
pub fn share_url(id: &str) -> String {
    format!("https://badges.test/GetAssertionShare/{id}")
}

/// Share URL for assertion `id` on the closed local port.
pub fn offline_share_url(id: &str) -> String {
    format!("http://127.0.0.1:9/GetAssertionShare/{id}")
}

/// Badge list JSON for `(url, note)` pairs.
pub fn badge_list(entries: &[(&str, &str)]) -> String {
    let list: Vec<_> =
        entries.iter().map(|(url, note)| json!({"url": url, "note": note})).collect();
    serde_json::to_string_pretty(&list).unwrap()
}

/// Host-endpoint assertion with an embedded definition.
pub fn script_host_badge(fake: &FakeFetcher, id: &str, name: &str, issued_on: &str) {
    fake.respond_json(
        format!("{API}/Assertion/Host/{id}"),
        200,
        json!({
            "issuedOn": issued_on,
            "badge": {
                "name": name,
                "description": format!("{name} description"),
                "image": format!("https://img.badges.test/{id}.png"),
                "issuer": {"name": "Test Issuer"}
            }
        }),
    );
}

/// Gatekeeper over the project's real cache directory and a scripted network.
pub fn disk_cache(project: &TestProject, fake: &FakeFetcher) -> BadgeCache {
    let resolver = BadgeResolver::new(Arc::new(fake.clone()), API);
    BadgeCache::new(
        project.input_path(),
        Arc::new(DirectoryStore::new(project.cache_dir())),
        Arc::new(BatchFetcher::new(resolver, Duration::ZERO)),
    )
}

/// The binary, isolated from the caller's environment and rooted at `project`.
pub fn badgesync(project: &TestProject) -> Command {
    let mut cmd = Command::cargo_bin("badgesync").unwrap();
    cmd.current_dir(project.root())
        .env("BADGESYNC_API_BASE", OFFLINE_API)
        .env("BADGESYNC_DELAY_MS", "0")
        .env("BADGESYNC_TIMEOUT_SECS", "2")
        .env("BADGESYNC_NO_PROGRESS", "1")
        .env_remove("BADGESYNC_CONFIG")
        .env_remove("RUST_LOG")
        .env_remove("HTTP_PROXY")
        .env_remove("HTTPS_PROXY")
        .env_remove("ALL_PROXY")
        .env_remove("http_proxy")
        .env_remove("https_proxy")
        .env_remove("all_proxy");
    cmd
}
