// Tests for token handling and connection failures

use super::test_utils::*;
use crate::common::FakePlatform;
use assert_cmd::Command;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use predicates::prelude::*;

fn without_token(url: &str, home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("prominence").unwrap();
    cmd.env("PROMINENCE_URL", url)
        .env("HOME", home)
        .env_remove("PROMINENCE_TOKEN");
    cmd
}

#[test]
fn test_rejected_token() {
    let platform = FakePlatform::start();

    prominence(&platform.url)
        .env("PROMINENCE_TOKEN", "wrong-token")
        .arg("list")
        .assert()
        .code(1)
        .stdout("Error: authentication failed, please obtain a new token\n");
}

#[test]
fn test_no_token_anywhere() {
    let platform = FakePlatform::start();
    let ws = Workspace::new();

    without_token(&platform.url, ws.path())
        .arg("list")
        .assert()
        .code(1)
        .stdout("Error: authentication failed, please obtain a new token\n");

    assert!(platform.requests.all().is_empty());
}

#[test]
fn test_expired_token() {
    let platform = FakePlatform::start();
    let token = format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256"}"#),
        URL_SAFE_NO_PAD.encode(r#"{"exp":1000}"#)
    );

    prominence(&platform.url)
        .env("PROMINENCE_TOKEN", token)
        .args(["delete", "job", "1"])
        .assert()
        .code(1)
        .stdout("Error: your token has expired, please obtain a new token\n");

    assert!(platform.requests.all().is_empty());
}

#[cfg(unix)]
#[test]
fn test_token_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let platform = FakePlatform::start();
    let ws = Workspace::new();
    std::fs::create_dir(ws.path().join(".prominence")).unwrap();
    let token_file = ws.write(".prominence/token", r#"{"access_token": "test-token"}"#);

    std::fs::set_permissions(&token_file, std::fs::Permissions::from_mode(0o644)).unwrap();
    without_token(&platform.url, ws.path())
        .arg("list")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("should be 0600"));

    std::fs::set_permissions(&token_file, std::fs::Permissions::from_mode(0o600)).unwrap();
    without_token(&platform.url, ws.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("NAME"));
}

#[test]
fn test_unreachable_platform() {
    prominence("http://127.0.0.1:9/api/v1")
        .arg("list")
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with(
            "Error: unable to connect to http://127.0.0.1:9/api/v1",
        ));
}
