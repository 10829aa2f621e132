//! CLI integration tests for the gallery
//!
//! Each test runs the binary inside a fresh temporary directory so the
//! project configuration and artifact directories are isolated.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the gallery binary, run inside `dir`
fn gallery_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("gallery"));
    cmd.current_dir(dir).env_remove("GALLERY_LOG");
    cmd
}

/// Create a temporary directory and initialize a gallery project
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    gallery_cmd(dir.path()).arg("init").assert().success();
    dir
}

fn write_document(root: &Path, relative: &str, contents: &str) {
    let path = root.join("artifacts").join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    gallery_cmd(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized gallery at ."));

    assert!(dir.path().join("gallery.toml").is_file());
    assert!(dir.path().join("artifacts/welcome/v1/index.md").is_file());
}

#[test]
fn test_init_twice_fails() {
    let dir = setup_project();

    gallery_cmd(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_invalid_project_config_is_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("gallery.toml"), "start_route = \"home\"\n").unwrap();

    gallery_cmd(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("must start with '/'"));
}

// =============================================================================
// Catalog Tests
// =============================================================================

#[test]
fn test_list_shows_builtin_and_documents() {
    let dir = setup_project();

    gallery_cmd(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("binary-compare-swatch"))
        .stdout(predicate::str::contains("v2, v1"))
        .stdout(predicate::str::contains("welcome"));
}

#[test]
fn test_list_json() {
    let dir = setup_project();

    let output = gallery_cmd(dir.path())
        .args(["--format", "json", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let groups: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<_> = groups
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["binary-compare-swatch", "counter", "timer", "welcome"]);

    let timer = &groups[2];
    assert_eq!(timer["default_route"], "/artifacts/timer/v2");
    assert_eq!(timer["versions"][0]["version"], 2);
    assert_eq!(timer["versions"][1]["version"], 1);
}

#[test]
fn test_routes_lists_aliases() {
    let dir = setup_project();

    gallery_cmd(dir.path())
        .arg("routes")
        .assert()
        .success()
        .stdout(predicate::str::contains("/research"))
        .stdout(predicate::str::contains("-> /artifacts/counter/v2"))
        .stdout(predicate::str::contains("/artifacts/welcome/v1"));
}

#[test]
fn test_misplaced_document_is_skipped() {
    let dir = setup_project();
    write_document(dir.path(), "notes/draft/index.md", "not an artifact");

    gallery_cmd(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("notes").not());
}

// =============================================================================
// Show Tests
// =============================================================================

#[test]
fn test_show_home() {
    let dir = setup_project();

    gallery_cmd(dir.path())
        .args(["show", "/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Creative Space"));
}

#[test]
fn test_show_artifact() {
    let dir = setup_project();

    gallery_cmd(dir.path())
        .args(["show", "/artifacts/counter/v2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Home > Artifacts > Counter (v2)"))
        .stdout(predicate::str::contains("Persistent Counter"));
}

#[test]
fn test_show_bare_name_opens_latest() {
    let dir = setup_project();

    let output = gallery_cmd(dir.path())
        .args(["-f", "json", "show", "/artifacts/timer"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["route"], "/artifacts/timer/v2");
    assert_eq!(report["view"], "artifact");
}

#[test]
fn test_show_crashing_artifact_is_contained() {
    let dir = setup_project();

    gallery_cmd(dir.path())
        .args(["show", "/artifacts/timer/v1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Error in Timer (v1)"))
        .stdout(predicate::str::contains("Intentional Crashing"))
        .stdout(predicate::str::contains("[R] Reload gallery"))
        .stdout(predicate::str::contains("[p]").not())
        .stderr(predicate::str::contains("artifact failed"))
        .stderr(predicate::str::contains("artifact=timer.v1"))
        .stderr(predicate::str::contains("category=unclassified"))
        .stderr(predicate::str::contains("Intentional Crashing"));
}

#[test]
fn test_captured_logs_have_no_color_codes() {
    let dir = setup_project();

    gallery_cmd(dir.path())
        .args(["show", "/artifacts/timer/v1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("ERROR"))
        .stderr(predicate::str::contains("\x1b[").not());
}

#[test]
fn test_show_broken_document_offers_previous_version() {
    let dir = setup_project();
    write_document(
        dir.path(),
        "welcome/v2/index.md",
        "---\ntitle: Welcome back\nauthor: nobody\n---\nbody\n",
    );

    gallery_cmd(dir.path())
        .args(["show", "/artifacts/welcome/v2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Error in Welcome (v2)"))
        .stdout(predicate::str::contains("invalid front matter"))
        .stdout(predicate::str::contains("[p] Try Welcome (v1)"))
        .stdout(predicate::str::contains("/artifacts/welcome/v1"));
}

#[test]
fn test_show_failure_json() {
    let dir = setup_project();

    let output = gallery_cmd(dir.path())
        .args(["--format", "json", "show", "/artifacts/timer/v1"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["view"], "failed");
    assert_eq!(report["failure"]["phase"], "render");
    assert!(report["previous_version"].is_null());
}

#[test]
fn test_show_unknown_route() {
    let dir = setup_project();

    gallery_cmd(dir.path())
        .args(["show", "/nowhere"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page not found"));

    gallery_cmd(dir.path())
        .args(["show", "/artifacts/ghost/v1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page not found"));
}

#[test]
fn test_builtin_can_be_disabled() {
    let dir = setup_project();
    fs::write(dir.path().join("gallery.toml"), "include_builtin = false\n").unwrap();

    gallery_cmd(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("welcome"))
        .stdout(predicate::str::contains("counter").not());
}
