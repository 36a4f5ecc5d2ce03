//! The `badgesync` binary.
//!
//! The API base points at a closed local port, so every badge degrades to its
//! minimal record and the tests stay offline.

use assert_cmd::Command;
use badgesync::test_utils::TestProject;
use predicates::prelude::*;

use crate::common::{OFFLINE_API, badge_list, badgesync, offline_share_url};

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("badgesync")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("cache"));
}

#[test]
fn test_sync_creates_cache_then_reuses_it() {
    let url = offline_share_url("abc");
    let content = badge_list(&[(url.as_str(), "Offline Badge")]);
    let project = TestProject::with_input(&content).unwrap();

    badgesync(&project)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Badge data refreshed"));

    let records = project.read_cache().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Offline Badge");
    assert_eq!(records[0].image, format!("{OFFLINE_API}/Assertion/abc/Image"));
    assert_eq!(records[0].issued_on, None);
    assert_eq!(project.read_meta_hash().unwrap().len(), 64);

    badgesync(&project)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Badge list unchanged"));
}

#[test]
fn test_sync_without_input_still_succeeds() {
    let project = TestProject::new().unwrap();

    badgesync(&project)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("serving no badges"));
}

#[test]
fn test_sync_json_output() {
    let project = TestProject::with_input("[]").unwrap();

    badgesync(&project).args(["sync", "--json"]).assert().success().stdout("[]\n");
}

#[test]
fn test_fetch_writes_output_and_summary() {
    let a = offline_share_url("a");
    let content = badge_list(&[(a.as_str(), "First"), ("not-a-share-link", "Second")]);
    let project = TestProject::with_input(&content).unwrap();

    badgesync(&project)
        .args(["fetch", "--output", "public/badges.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. First (issue date unknown)"))
        .stdout(predicate::str::contains("2. Second (issue date unknown)"));

    let written = std::fs::read_to_string(project.root().join("public/badges.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(2));
    assert_eq!(value[1]["image"], format!("{OFFLINE_API}/Assertion/Host/unknown/Image"));
    assert!(!project.meta_file().exists());
}

#[test]
fn test_fetch_without_input_fails() {
    let project = TestProject::new().unwrap();

    badgesync(&project)
        .arg("fetch")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("badge-urls.json"));
}

#[test]
fn test_module_prints_virtual_module() {
    let project = TestProject::with_input("[]").unwrap();

    badgesync(&project)
        .arg("module")
        .assert()
        .success()
        .stdout(predicate::str::contains("export default [];"));
}

#[test]
fn test_module_rejects_unknown_id() {
    let project = TestProject::with_input("[]").unwrap();

    badgesync(&project).args(["module", "--id", "virtual:other"]).assert().failure();
}

#[test]
fn test_cache_info_and_clean() {
    let project = TestProject::with_input("[]").unwrap();
    badgesync(&project).arg("sync").assert().success();

    badgesync(&project)
        .args(["cache", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entry:    0 badges"))
        .stdout(predicate::str::contains("current"));

    badgesync(&project)
        .args(["cache", "clean"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2 cache file(s)"));
    assert!(!project.cache_file().exists());
    assert!(!project.meta_file().exists());

    badgesync(&project)
        .args(["cache", "clean"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache already empty"));
}

#[test]
fn test_root_flag_and_config_file() {
    let project = TestProject::new().unwrap();
    project.write_file("badges/list.json", "[]").unwrap();
    project
        .write_file("badgesync.toml", "input = \"badges/list.json\"\ncache_dir = \"out\"\n")
        .unwrap();
    let elsewhere = TestProject::new().unwrap();

    badgesync(&elsewhere)
        .arg("--root")
        .arg(project.root())
        .arg("sync")
        .assert()
        .success();

    assert!(project.root().join("out/badges.json").exists());
    assert!(project.root().join("out/badges.meta.json").exists());
}

#[test]
fn test_invalid_config_is_reported() {
    let project = TestProject::with_input("[]").unwrap();
    project.write_file("badgesync.toml", "delay_ms = \"slow\"").unwrap();

    badgesync(&project)
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_invalid_env_override_is_reported() {
    let project = TestProject::with_input("[]").unwrap();

    badgesync(&project)
        .env("BADGESYNC_DELAY_MS", "soon")
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("BADGESYNC_DELAY_MS"));
}
