//! Tier fallbacks through the full batch pipeline.

use badgesync::badge::BadgeRequest;
use badgesync::batch::BatchFetcher;
use badgesync::resolver::BadgeResolver;
use badgesync::test_utils::FakeFetcher;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::common::{API, script_host_badge, share_url};

fn batch(fake: &FakeFetcher) -> BatchFetcher {
    BatchFetcher::new(BadgeResolver::new(Arc::new(fake.clone()), API), Duration::ZERO)
}

#[tokio::test]
async fn test_mixed_list_resolves_every_badge_in_order() {
    let fake = FakeFetcher::new();

    // host tier
    script_host_badge(&fake, "host", "Host Badge", "2024-01-01");

    // alt tier, definition referenced by URL and date only on the host endpoint
    fake.respond_json(format!("{API}/Assertion/Host/alt"), 200, json!({"issuedOn": "2023-06-30"}));
    fake.respond_json(
        format!("{API}/Assertion/alt"),
        200,
        json!({"badge": "https://defs.badges.test/alt", "image": {"id": "https://img.badges.test/alt-assertion.png"}}),
    );
    fake.respond_json(
        "https://defs.badges.test/alt",
        200,
        json!({"name": "Alt Badge", "issuer": "https://issuers.badges.test/org"}),
    );
    fake.respond_json("https://issuers.badges.test/org", 200, json!({"name": "Remote Org"}));

    // page tier
    let page = share_url("page");
    fake.respond_json(format!("{API}/Assertion/Host/page"), 500, json!({"errors": ["boom"]}));
    fake.respond_json(format!("{API}/Assertion/page"), 200, json!({"status": 500}));
    fake.respond_text(
        &page,
        200,
        r#"<html><head>
            <meta property="og:title" content="Page Badge">
            <meta name="twitter:description" content="From the page">
        </head></html>"#,
    );

    let requests = vec![
        BadgeRequest::new(share_url("host"), "host note"),
        BadgeRequest::new(share_url("alt"), "alt note"),
        BadgeRequest::new(page.clone(), "page note"),
        BadgeRequest::new(share_url("gone"), "Gone Badge"),
        BadgeRequest::new("https://elsewhere.test/badge/42", "Malformed"),
    ];

    let records = batch(&fake).resolve_all(&requests).await;
    assert_eq!(records.len(), 5);

    assert_eq!(records[0].name, "Host Badge");
    assert_eq!(records[0].issued_on.as_deref(), Some("2024-01-01"));
    assert_eq!(records[0].issuer.as_deref(), Some("Test Issuer"));

    assert_eq!(records[1].name, "Alt Badge");
    assert_eq!(records[1].image, "https://img.badges.test/alt-assertion.png");
    assert_eq!(records[1].issued_on.as_deref(), Some("2023-06-30"));
    assert_eq!(records[1].issuer.as_deref(), Some("Remote Org"));

    assert_eq!(records[2].name, "Page Badge");
    assert_eq!(records[2].description, "From the page");
    assert_eq!(records[2].image, format!("{API}/Assertion/page/image"));
    assert_eq!(records[2].issued_on, None);
    assert_eq!(records[2].issuer, None);

    assert_eq!(records[3].name, "Gone Badge");
    assert_eq!(records[3].image, format!("{API}/Assertion/gone/Image"));
    assert_eq!(records[3].issued_on, None);

    assert_eq!(records[4].name, "Malformed");
    assert_eq!(records[4].image, format!("{API}/Assertion/Host/unknown/Image"));

    for (record, request) in records.iter().zip(&requests) {
        assert_eq!(record.url, request.url);
    }
}

#[tokio::test]
async fn test_host_success_never_touches_other_tiers() {
    let fake = FakeFetcher::new();
    let url = share_url("only");
    script_host_badge(&fake, "only", "Only", "2024-03-03");

    batch(&fake).resolve_all(&[BadgeRequest::new(url.clone(), "")]).await;

    assert_eq!(fake.calls(), vec![format!("{API}/Assertion/Host/only")]);
    assert_eq!(fake.call_count(&url), 0);
}

#[tokio::test]
async fn test_issuer_failure_keeps_record_and_omits_issuer() {
    let fake = FakeFetcher::new();
    fake.respond_json(
        format!("{API}/Assertion/Host/slow"),
        200,
        json!({"issuedOn": "2022-02-22", "badge": {"name": "Slow Issuer", "issuer": "https://slow.test/org"}}),
    );
    fake.fail("https://slow.test/org", "operation timed out");

    let records = batch(&fake).resolve_all(&[BadgeRequest::new(share_url("slow"), "")]).await;

    assert_eq!(records[0].name, "Slow Issuer");
    assert_eq!(records[0].image, format!("{API}/Assertion/Host/slow/Image"));
    let json = serde_json::to_value(&records[0]).unwrap();
    assert!(json.get("issuer").is_none());
    assert_eq!(json["issuedOn"], "2022-02-22");
}
