//! End-to-end tests for the `svd-controller` binary.

use std::fs;

use assert_cmd::Command;
use tempfile::tempdir;
use testresult::TestResult;

fn write_fixture(dir: &std::path::Path, filename: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(filename);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn resolve_prints_a_plan_for_a_dependency_free_svd() -> TestResult {
    let dir = tempdir()?;
    let catalog = write_fixture(
        dir.path(),
        "ocs.json",
        r#"{"namespace":"default","name":"ocs","svds":[{"namespace":"default","name":"my-op"}],"schemas":[]}"#,
    );

    let mut cmd = Command::cargo_bin("svd-controller")?;
    cmd.args(["resolve", "--catalog", &catalog.to_string_lossy(), "--name", "my-op"]);
    cmd.assert().success();

    Ok(())
}

#[test]
fn resolve_fails_for_an_unknown_root() -> TestResult {
    let dir = tempdir()?;
    let catalog = write_fixture(dir.path(), "ocs.json", r#"{"namespace":"default","name":"ocs"}"#);

    let mut cmd = Command::cargo_bin("svd-controller")?;
    cmd.args(["resolve", "--catalog", &catalog.to_string_lossy(), "--name", "missing"]);
    cmd.assert().failure();

    Ok(())
}

#[test]
fn resolve_json_output_is_valid_json() -> TestResult {
    let dir = tempdir()?;
    let catalog = write_fixture(
        dir.path(),
        "ocs.json",
        r#"{"namespace":"default","name":"ocs","svds":[{"namespace":"default","name":"my-op"}],"schemas":[]}"#,
    );

    let mut cmd = Command::cargo_bin("svd-controller")?;
    cmd.args([
        "resolve",
        "--catalog",
        &catalog.to_string_lossy(),
        "--name",
        "my-op",
        "--format",
        "json",
    ]);
    let output = cmd.assert().success().get_output().clone();
    let rendered: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(rendered["steps"].as_array().unwrap().len(), 1);

    Ok(())
}

#[test]
fn run_drives_a_noop_svd_to_succeeded() -> TestResult {
    let dir = tempdir()?;
    let catalog = write_fixture(
        dir.path(),
        "cluster.json",
        r#"{
            "namespace": "default",
            "name": "ocs",
            "svds": [{"namespace": "default", "name": "my-op", "install_strategy": {"strategyName": "noop"}}],
            "schemas": []
        }"#,
    );

    let mut cmd = Command::cargo_bin("svd-controller")?;
    cmd.args(["run", "--catalog", &catalog.to_string_lossy()]);
    let output = cmd.assert().success().get_output().clone();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Succeeded"), "expected a Succeeded line in: {stdout}");

    Ok(())
}
