//! Hash-gated caching against a real cache directory.

use anyhow::Result;
use badgesync::cache::{SyncSource, content_digest};
use badgesync::core::BadgeError;
use badgesync::test_utils::{FakeFetcher, TestProject};

use crate::common::{badge_list, disk_cache, script_host_badge, share_url};

#[tokio::test]
async fn test_unchanged_input_makes_no_network_calls() -> Result<()> {
    let a = share_url("a");
    let b = share_url("b");
    let content = badge_list(&[(a.as_str(), "A"), (b.as_str(), "B")]);
    let project = TestProject::with_input(&content)?;
    let fake = FakeFetcher::new();
    script_host_badge(&fake, "a", "Badge A", "2024-01-01");
    script_host_badge(&fake, "b", "Badge B", "2024-02-02");
    let cache = disk_cache(&project, &fake);

    let first = cache.sync_badges().await?;
    assert_eq!(first.source, SyncSource::Fetched);
    assert!(fake.total_calls() > 0);

    fake.reset_calls();
    let second = cache.sync_badges().await?;

    assert_eq!(second.source, SyncSource::Cache);
    assert_eq!(fake.total_calls(), 0);
    assert_eq!(second.records, first.records);
    Ok(())
}

#[tokio::test]
async fn test_cache_survives_a_new_gatekeeper() -> Result<()> {
    let a = share_url("a");
    let project = TestProject::with_input(&badge_list(&[(a.as_str(), "A")]))?;
    let fake = FakeFetcher::new();
    script_host_badge(&fake, "a", "Badge A", "2024-01-01");

    disk_cache(&project, &fake).sync_badges().await?;
    fake.reset_calls();

    let report = disk_cache(&project, &fake).sync_badges().await?;
    assert_eq!(report.source, SyncSource::Cache);
    assert_eq!(fake.total_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_one_byte_change_invalidates() -> Result<()> {
    let a = share_url("a");
    let content = badge_list(&[(a.as_str(), "A")]);
    let project = TestProject::with_input(&content)?;
    let fake = FakeFetcher::new();
    script_host_badge(&fake, "a", "Badge A", "2024-01-01");
    let cache = disk_cache(&project, &fake);

    cache.sync_badges().await?;
    let old_hash = project.read_meta_hash()?;
    assert_eq!(old_hash, content_digest(content.as_bytes()));

    project.write_input(&format!("{content}\n"))?;
    fake.reset_calls();
    let report = cache.sync_badges().await?;

    assert_eq!(report.source, SyncSource::Fetched);
    assert!(fake.total_calls() > 0);
    let new_hash = project.read_meta_hash()?;
    assert_ne!(new_hash, old_hash);
    assert_eq!(new_hash, report.hash);
    Ok(())
}

#[tokio::test]
async fn test_cache_files_match_expected_layout() -> Result<()> {
    let a = share_url("a");
    let project = TestProject::with_input(&badge_list(&[(a.as_str(), "A")]))?;
    let fake = FakeFetcher::new();
    script_host_badge(&fake, "a", "Badge A", "2024-01-01");

    disk_cache(&project, &fake).sync_badges().await?;

    let entry = std::fs::read_to_string(project.cache_file())?;
    let value: serde_json::Value = serde_json::from_str(&entry)?;
    assert_eq!(value[0]["name"], "Badge A");
    assert_eq!(value[0]["issuedOn"], "2024-01-01");
    assert_eq!(value[0]["issuer"], "Test Issuer");
    assert_eq!(value[0]["url"], a.as_str());

    let meta = std::fs::read_to_string(project.meta_file())?;
    let meta: serde_json::Value = serde_json::from_str(&meta)?;
    assert_eq!(meta.as_object().map(|m| m.len()), Some(1));
    assert_eq!(meta["hash"].as_str().map(str::len), Some(64));
    Ok(())
}

#[tokio::test]
async fn test_corrupt_entry_with_matching_meta_refetches() -> Result<()> {
    let a = share_url("a");
    let project = TestProject::with_input(&badge_list(&[(a.as_str(), "A")]))?;
    let fake = FakeFetcher::new();
    script_host_badge(&fake, "a", "Badge A", "2024-01-01");
    let cache = disk_cache(&project, &fake);

    cache.sync_badges().await?;
    std::fs::write(project.cache_file(), "{ truncated")?;
    fake.reset_calls();

    let report = cache.sync_badges().await?;
    assert_eq!(report.source, SyncSource::Fetched);
    assert_eq!(project.read_cache()?[0].name, "Badge A");
    Ok(())
}

#[tokio::test]
async fn test_legacy_meta_from_other_tool_is_honoured() -> Result<()> {
    let a = share_url("a");
    let content = badge_list(&[(a.as_str(), "A")]);
    let project = TestProject::with_input(&content)?;
    project.write_file(
        ".cache/badges.json",
        r#"[{"name":"Prebuilt","description":"","image":"x","issuedOn":null,"url":"u"}]"#,
    )?;
    project.write_file(
        ".cache/badges.meta.json",
        &format!(r#"{{"hash":"{}"}}"#, content_digest(content.as_bytes())),
    )?;
    let fake = FakeFetcher::new();

    let report = disk_cache(&project, &fake).sync_badges().await?;

    assert_eq!(report.source, SyncSource::Cache);
    assert_eq!(report.records[0].name, "Prebuilt");
    assert_eq!(fake.total_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_unwritable_cache_dir_writes_no_meta() -> Result<()> {
    let project = TestProject::with_input("[]")?;
    // A file where the cache directory should be.
    project.write_file(".cache", "blocked")?;
    let fake = FakeFetcher::new();

    let err = disk_cache(&project, &fake).sync_badges().await.unwrap_err();

    assert!(matches!(err, BadgeError::CacheWriteFailure { .. }));
    assert!(!project.meta_file().exists());
    Ok(())
}

#[tokio::test]
async fn test_missing_input_is_upstream_unavailable() -> Result<()> {
    let project = TestProject::new()?;
    let fake = FakeFetcher::new();

    let err = disk_cache(&project, &fake).sync_badges().await.unwrap_err();

    assert!(matches!(err, BadgeError::UpstreamUnavailable { .. }));
    assert!(!project.cache_dir().exists());
    assert_eq!(fake.total_calls(), 0);
    Ok(())
}
