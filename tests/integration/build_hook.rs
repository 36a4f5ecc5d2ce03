//! `virtual:badges` serving across build starts and file changes.

use anyhow::Result;
use badgesync::cache::SyncSource;
use badgesync::hook::{BadgeModule, Served, WatchOutcome};
use badgesync::test_utils::{FakeFetcher, TestProject};

use crate::common::{badge_list, disk_cache, script_host_badge, share_url};

const RESOLVED: &str = "\0virtual:badges";

#[tokio::test]
async fn test_dev_session_lifecycle() -> Result<()> {
    let a = share_url("a");
    let b = share_url("b");
    let project = TestProject::with_input(&badge_list(&[(a.as_str(), "A")]))?;
    let fake = FakeFetcher::new();
    script_host_badge(&fake, "a", "Badge A", "2024-01-01");
    script_host_badge(&fake, "b", "Badge B", "2024-02-02");
    let module = BadgeModule::new(disk_cache(&project, &fake));

    assert_eq!(module.resolve_id("virtual:badges"), Some(RESOLVED));
    assert_eq!(module.build_start().await, Served::Current(SyncSource::Fetched));
    let source = module.load(RESOLVED).await.unwrap();
    assert!(source.contains("Badge A"));
    assert!(!source.contains("Badge B"));

    project.write_input(&badge_list(&[(a.as_str(), "A"), (b.as_str(), "B")]))?;
    assert_eq!(module.on_file_change(&project.input_path()).await, WatchOutcome::FullReload);

    let source = module.load(RESOLVED).await.unwrap();
    assert!(source.starts_with("export default ["));
    assert!(source.ends_with("];"));
    assert!(source.contains("Badge B"));
    assert_eq!(project.read_cache()?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_restart_serves_cache_without_network() -> Result<()> {
    let a = share_url("a");
    let project = TestProject::with_input(&badge_list(&[(a.as_str(), "A")]))?;
    let fake = FakeFetcher::new();
    script_host_badge(&fake, "a", "Badge A", "2024-01-01");

    BadgeModule::new(disk_cache(&project, &fake)).build_start().await;
    fake.reset_calls();

    let module = BadgeModule::new(disk_cache(&project, &fake));
    assert_eq!(module.build_start().await, Served::Current(SyncSource::Cache));
    assert_eq!(fake.total_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_broken_input_falls_back_to_stale_cache() -> Result<()> {
    let a = share_url("a");
    let project = TestProject::with_input(&badge_list(&[(a.as_str(), "A")]))?;
    let fake = FakeFetcher::new();
    script_host_badge(&fake, "a", "Badge A", "2024-01-01");
    BadgeModule::new(disk_cache(&project, &fake)).build_start().await;

    project.write_input("[{ not json")?;
    let module = BadgeModule::new(disk_cache(&project, &fake));

    assert_eq!(module.build_start().await, Served::Stale);
    assert!(module.served_json().await.contains("Badge A"));
    Ok(())
}

#[tokio::test]
async fn test_broken_input_without_cache_serves_empty_list() -> Result<()> {
    let project = TestProject::with_input("not json at all")?;
    let module = BadgeModule::new(disk_cache(&project, &FakeFetcher::new()));

    assert_eq!(module.build_start().await, Served::Empty);
    assert_eq!(module.load(RESOLVED).await.unwrap(), "export default [];");
    Ok(())
}

#[tokio::test]
async fn test_changes_to_other_files_are_ignored() -> Result<()> {
    let project = TestProject::with_input("[]")?;
    let other = project.write_file("src/data/profile.json", "{}")?;
    let module = BadgeModule::new(disk_cache(&project, &FakeFetcher::new()));
    module.build_start().await;

    assert_eq!(module.on_file_change(&other).await, WatchOutcome::Ignored);
    Ok(())
}

#[tokio::test]
async fn test_broken_edit_during_dev_keeps_serving_cache() -> Result<()> {
    let a = share_url("a");
    let project = TestProject::with_input(&badge_list(&[(a.as_str(), "A")]))?;
    let fake = FakeFetcher::new();
    script_host_badge(&fake, "a", "Badge A", "2024-01-01");
    let module = BadgeModule::new(disk_cache(&project, &fake));
    module.build_start().await;

    project.write_input("[{ broken")?;
    let outcome = module.on_file_change(&project.input_path()).await;

    assert!(matches!(outcome, WatchOutcome::Failed(_)));
    assert!(module.load(RESOLVED).await.unwrap().contains("Badge A"));
    Ok(())
}
