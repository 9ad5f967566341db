//! Integration tests for the bindsmith CLI

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const FIXTURE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/openapi/petstore.json"
);

#[test]
fn test_generate_multiple_files() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("bindsmith").unwrap();

    cmd.arg("generate")
        .arg("--openapi")
        .arg(FIXTURE)
        .arg("--output")
        .arg(temp_dir.path())
        .arg("--multiple-interfaces")
        .arg("by-tag")
        .arg("--multiple-files")
        .assert()
        .success()
        .stdout(predicate::str::contains("interfaces.rs"))
        .stdout(predicate::str::contains("contracts.rs"));

    let interfaces = std::fs::read_to_string(temp_dir.path().join("interfaces.rs")).unwrap();
    assert!(interfaces.contains("pub trait PetsApi {"));
    assert!(interfaces.contains("pub trait StoreApi {"));

    let contracts = std::fs::read_to_string(temp_dir.path().join("contracts.rs")).unwrap();
    assert!(contracts.contains("pub struct Pet {"));
}

#[test]
fn test_generate_dry_run_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out");
    let mut cmd = Command::cargo_bin("bindsmith").unwrap();

    cmd.arg("generate")
        .arg("--openapi")
        .arg(FIXTURE)
        .arg("--output")
        .arg(&output)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("dry run"));

    assert!(!output.exists());
}

#[test]
fn test_generate_from_settings_file() {
    let temp_dir = TempDir::new().unwrap();
    let settings = temp_dir.path().join("petstore.bindsmith");
    std::fs::write(
        &settings,
        serde_json::json!({
            "openapiPath": FIXTURE,
            "outputFolder": "generated",
            "outputFilename": "petstore.rs",
            "includeTags": ["store"]
        })
        .to_string(),
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("bindsmith").unwrap();
    cmd.arg("generate")
        .arg("--settings")
        .arg(&settings)
        .assert()
        .success();

    let content =
        std::fs::read_to_string(temp_dir.path().join("generated/petstore.rs")).unwrap();
    assert!(content.contains("async fn place_order("));
    assert!(!content.contains("async fn list_pets("));
}

#[test]
fn test_generate_empty_selection_fails() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("bindsmith").unwrap();

    cmd.arg("generate")
        .arg("--openapi")
        .arg(FIXTURE)
        .arg("--output")
        .arg(temp_dir.path())
        .arg("--tag")
        .arg("nonexistent")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No operations remain after filtering"));
}

#[test]
fn test_generate_requires_a_document() {
    let mut cmd = Command::cargo_bin("bindsmith").unwrap();

    cmd.arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("openapiPath"));
}

#[test]
fn test_batch_runs_every_settings_file() {
    let temp_dir = TempDir::new().unwrap();
    for (name, tag) in [("pets", "pets"), ("store", "store")] {
        std::fs::write(
            temp_dir.path().join(format!("{name}.bindsmith")),
            serde_json::json!({
                "openapiPath": FIXTURE,
                "outputFolder": name,
                "includeTags": [tag]
            })
            .to_string(),
        )
        .unwrap();
    }

    let mut cmd = Command::cargo_bin("bindsmith").unwrap();
    cmd.arg("batch").arg(temp_dir.path()).assert().success();

    assert!(temp_dir.path().join("pets/client.rs").exists());
    assert!(temp_dir.path().join("store/client.rs").exists());
}

#[test]
fn test_batch_reports_failures() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("broken.bindsmith"),
        serde_json::json!({ "openapiPath": FIXTURE, "includeTags": ["nonexistent"] }).to_string(),
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("bindsmith").unwrap();
    cmd.arg("batch")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 1 generations failed"));
}
