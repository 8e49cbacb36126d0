//! Tests that run the compiled binary.

use super::common::{endpoint, read_artifact, respond, write_query, ALICE};
use std::path::Path;
use tempfile::tempdir;
use tokio::process::Command;
use wiremock::MockServer;

/// Runs sparql-batch with `args`, using an empty config file in `dir`.
async fn run_binary(dir: &Path, args: &[&str]) -> (i32, String, String) {
    run_binary_with_config(dir, "", args).await
}

/// Runs sparql-batch with `args` and a config file holding `config_toml`.
async fn run_binary_with_config(
    dir: &Path,
    config_toml: &str,
    args: &[&str],
) -> (i32, String, String) {
    let config = dir.join("config.toml");
    std::fs::write(&config, config_toml).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_sparql-batch"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .await
        .unwrap();

    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

#[tokio::test]
async fn test_no_arguments_prints_usage() {
    let dir = tempdir().unwrap();
    let (code, stdout, stderr) = run_binary(dir.path(), &[]).await;

    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("USAGE: sparql-batch [endpoint] q1file"));
}

#[tokio::test]
async fn test_usage_reported_before_bad_config() {
    let dir = tempdir().unwrap();
    let (code, _, stderr) = run_binary_with_config(dir.path(), "endpoint = [", &[]).await;

    assert_eq!(code, 1);
    assert!(stderr.contains("USAGE: sparql-batch [endpoint] q1file"));
    assert!(!stderr.contains("Configuration"));
}

#[tokio::test]
async fn test_bad_config_with_files_is_config_error() {
    let dir = tempdir().unwrap();
    let (code, stdout, stderr) =
        run_binary_with_config(dir.path(), "endpoint = [", &["q.rq"]).await;

    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Configuration"));
}

#[tokio::test]
async fn test_endpoint_without_files_prints_usage() {
    let dir = tempdir().unwrap();
    let (code, _, stderr) = run_binary(dir.path(), &["http://localhost:1/sparql"]).await;

    assert_eq!(code, 1);
    assert!(stderr.contains("USAGE"));
}

#[tokio::test]
async fn test_run_against_endpoint() {
    let server = MockServer::start().await;
    respond(&server, "query=SELECT", 200, ALICE).await;

    let dir = tempdir().unwrap();
    let path = write_query(dir.path(), "names.rq", "SELECT ?name WHERE {}");
    let url = endpoint(&server);

    let (code, stdout, _) = run_binary(dir.path(), &[url.as_str(), path.to_str().unwrap()]).await;

    assert_eq!(code, 0);
    assert!(stdout.contains("Query returned 1 results"));
    assert!(read_artifact(&path, "html").unwrap().contains("<td>Alice</td>"));
}

#[tokio::test]
async fn test_per_file_failure_still_exits_zero() {
    let server = MockServer::start().await;
    respond(&server, "broken", 500, "error").await;

    let dir = tempdir().unwrap();
    let path = write_query(dir.path(), "broken.rq", "SELECT broken");
    let url = endpoint(&server);

    let (code, stdout, _) = run_binary(dir.path(), &[url.as_str(), path.to_str().unwrap()]).await;
    assert_eq!(code, 0);
    assert!(stdout.contains("failed: Transport error"));

    let (code, _, _) = run_binary(
        dir.path(),
        &["--fail-fast", url.as_str(), path.to_str().unwrap()],
    )
    .await;
    assert_eq!(code, 1);
}
