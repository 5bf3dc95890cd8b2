//! End-to-end CLI tests for the curlbind binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::{refused_url, start_mock_server_or_skip};

/// Binary with an isolated config directory.
fn curlbind(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("curlbind").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_binary_invocation_returns_zero() {
    let home = TempDir::new().unwrap();
    curlbind(&home).assert().success();
}

#[test]
fn test_binary_help_displays_usage() {
    let home = TempDir::new().unwrap();
    curlbind(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Drive libcurl transfers"));
}

#[test]
fn test_binary_version_displays_version() {
    let home = TempDir::new().unwrap();
    curlbind(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("curlbind"));
}

#[test]
fn test_binary_invalid_flag_returns_error() {
    let home = TempDir::new().unwrap();
    curlbind(&home)
        .arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_binary_invalid_config_is_reported() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("curlbind");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "timeout_secs = 0\n").unwrap();
    curlbind(&home)
        .arg("http://a.test/")
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout_secs"));
}

#[test]
fn test_binary_failed_transfer_exits_nonzero() {
    let home = TempDir::new().unwrap();
    curlbind(&home)
        .args(["-q", &refused_url()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 1 transfers failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_prints_body() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/hello"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&server)
        .await;
    let url = format!("{}/hello", server.uri());
    let home = TempDir::new().unwrap();

    tokio::task::block_in_place(|| {
        curlbind(&home)
            .args(["-q", &url])
            .assert()
            .success()
            .stdout("hello");
    });
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_json_summary() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&server)
        .await;
    let url = server.uri();
    let home = TempDir::new().unwrap();

    tokio::task::block_in_place(|| {
        let output = curlbind(&home)
            .args(["-q", "--json", &url])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let summary: serde_json::Value =
            serde_json::from_slice(&output).expect("stdout should be one JSON object");
        assert_eq!(summary["response_code"], 200);
        assert_eq!(summary["bytes"], 5);
        assert_eq!(summary["result"], 0);
    });
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_multi_mode_runs_every_url() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    for (route, body) in [("/a", "alpha"), ("/b", "bravo")] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;
    }
    let (a, b) = (format!("{}/a", server.uri()), format!("{}/b", server.uri()));
    let home = TempDir::new().unwrap();

    tokio::task::block_in_place(|| {
        curlbind(&home)
            .args(["-q", "--multi", "--poll-timeout", "0.2", &a, &b])
            .assert()
            .success()
            .stdout(predicate::str::contains("alpha").and(predicate::str::contains("bravo")));
    });
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_applies_config_and_headers() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(header("user-agent", "from-config"))
        .and(header("x-extra", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;
    let url = server.uri();
    let home = TempDir::new().unwrap();
    let dir = home.path().join("curlbind");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "user_agent = \"from-config\"\n").unwrap();

    tokio::task::block_in_place(|| {
        curlbind(&home)
            .args(["-q", "-H", "X-Extra: 1", &url])
            .assert()
            .success()
            .stdout("ok");
    });
}
