//! End-to-end tests of the `crcatalog` binary: working directory layout and exit codes.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn crcatalog(cwd: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("crcatalog").unwrap();
    cmd.current_dir(cwd.path());
    cmd
}

fn temp_downloads_left(cwd: &TempDir) -> usize {
    fs::read_dir(cwd.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with("tmpfile"))
        .count()
}

// The binary blocks this thread, so the mock server needs another worker.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_success_writes_catalog_and_exits_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"abc".to_vec()))
        .mount(&server)
        .await;

    let cwd = TempDir::new().unwrap();
    fs::create_dir_all(cwd.path().join("sub")).unwrap();
    fs::write(
        cwd.path().join("sub/list.txt"),
        format!("abc;{}/abc\n", server.uri()),
    )
    .unwrap();

    crcatalog(&cwd)
        .assert()
        .success()
        .stdout(predicate::str::contains("CRC32: 352441C2"));

    let catalog = fs::read_to_string(cwd.path().join("catalog.txt")).unwrap();
    assert_eq!(
        catalog.lines().collect::<Vec<_>>(),
        vec![format!("\"abc\";\"sub\";\"{}/abc\";\"352441C2\"", server.uri())]
    );
    assert_eq!(temp_downloads_left(&cwd), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failed_download_exits_one_without_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let cwd = TempDir::new().unwrap();
    fs::write(
        cwd.path().join("list.txt"),
        format!("down;{}/down\n", server.uri()),
    )
    .unwrap();

    crcatalog(&cwd)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("A file download failed"));

    assert!(!cwd.path().join("catalog.txt").exists());
    assert_eq!(temp_downloads_left(&cwd), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_summary_lists_failures_when_continuing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let cwd = TempDir::new().unwrap();
    fs::write(
        cwd.path().join("list.txt"),
        format!("gone;{}/gone\nonly-one-field\n", server.uri()),
    )
    .unwrap();

    crcatalog(&cwd)
        .args(["--on-download-error", "continue", "--summary", "summary.json"])
        .assert()
        .success();

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(cwd.path().join("summary.json")).unwrap())
            .unwrap();
    assert_eq!(summary["failed_downloads"][0]["name"], "gone");
    assert_eq!(summary["skipped_malformed"], 1);
    assert_eq!(summary["entries"].as_array().unwrap().len(), 0);
    assert_eq!(fs::read(cwd.path().join("catalog.txt")).unwrap(), Vec::<u8>::new());
}

#[test]
fn test_empty_directory_succeeds() {
    let cwd = TempDir::new().unwrap();

    crcatalog(&cwd).assert().success();

    assert!(cwd.path().join("catalog.txt").exists());
}
