// Tests for the create command

use super::test_utils::*;
use crate::common::{FakePlatform, CREATED_JOB_ID};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use predicates::prelude::*;
use serde_json::json;

#[test]
fn test_default_job() {
    let doc = json_output(offline().args(["create", "--dry-run", "busybox", "echo hi"]));

    assert_eq!(
        doc,
        json!({
            "resources": {"memory": 1, "cpus": 1, "nodes": 1, "disk": 10},
            "tasks": [{"image": "busybox", "cmd": "echo hi", "runtime": "singularity"}]
        })
    );
    assert!(doc["tasks"][0].get("type").is_none());
}

#[test]
fn test_multiple_nodes_without_mpi_is_usage_error() {
    let platform = FakePlatform::start();

    prominence(&platform.url)
        .args(["create", "--nodes", "2", "busybox", "echo hi"])
        .assert()
        .code(1)
        .stdout("Error: more than one node requested but MPI not specified\n");

    assert!(platform.requests.all().is_empty());
}

#[test]
fn test_mpi_job() {
    let doc = json_output(offline().args([
        "create",
        "--dry-run",
        "--openmpi",
        "--nodes",
        "2",
        "--cpus",
        "4",
        "--omp-threads-per-node",
        "2",
        "alahiff/openmpi-hello-world",
        "/mpi_hello_world",
    ]));

    assert_eq!(doc["resources"]["nodes"], json!(2));
    assert_eq!(doc["tasks"][0]["type"], json!("openmpi"));
    assert_eq!(doc["tasks"][0]["procsPerNode"], json!(2));
}

#[test]
fn test_procs_and_omp_threads_together_is_usage_error() {
    offline()
        .args([
            "create",
            "--dry-run",
            "--procs-per-node",
            "2",
            "--omp-threads-per-node",
            "2",
            "--cpus",
            "4",
            "busybox",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("Error: "));
}

#[test]
fn test_full_flag_set() {
    let ws = Workspace::new();
    let input = ws.write("params.txt", "alpha=1\n");
    let storage = ws.write(
        "storage.yaml",
        "type: onedata\nmountpoint: /data\nonedata:\n  provider: example.org\n",
    );

    let doc = json_output(offline().args([
        "create",
        "--dry-run",
        "--name",
        "full",
        "--memory",
        "4",
        "--walltime",
        "60",
        "--input",
        input.to_str().unwrap(),
        "--env",
        "MODE=test",
        "--env",
        "malformed",
        "--label",
        "app=demo",
        "--artifact",
        "https://example.org/data.tar.gz",
        "--retries",
        "2",
        "--site",
        "site-a",
        "--workdir",
        "/work",
        "--storage-file",
        storage.to_str().unwrap(),
        "busybox",
        "cat params.txt",
    ]));

    assert_eq!(doc["name"], json!("full"));
    assert_eq!(doc["resources"]["memory"], json!(4));
    assert_eq!(doc["resources"]["walltime"], json!(60));
    assert_eq!(doc["tasks"][0]["env"], json!({"MODE": "test"}));
    assert_eq!(doc["tasks"][0]["workdir"], json!("/work"));
    assert_eq!(doc["labels"], json!({"app": "demo"}));
    assert_eq!(doc["artifacts"], json!([{"url": "https://example.org/data.tar.gz"}]));
    assert_eq!(doc["policies"], json!({"maximumRetries": 2}));
    assert_eq!(doc["placement"], json!({"requirements": {"sites": ["site-a"]}}));
    assert_eq!(doc["storage"]["mountpoint"], json!("/data"));
    assert_eq!(
        doc["inputs"],
        json!([{"filename": "params.txt", "content": STANDARD.encode("alpha=1\n")}])
    );
}

#[test]
fn test_tarball_image_uses_udocker() {
    let doc = json_output(offline().args([
        "create",
        "--dry-run",
        "https://example.org/images/tool.tar.gz",
    ]));
    assert_eq!(doc["tasks"][0]["runtime"], json!("udocker"));
}

#[test]
fn test_create_submits_job() {
    let platform = FakePlatform::start();

    prominence(&platform.url)
        .args(["create", "--cpus", "2", "busybox", "echo hi"])
        .assert()
        .success()
        .stdout(format!("Job created with id {}\n", CREATED_JOB_ID));

    let submitted = platform.requests.submissions();
    assert_eq!(submitted.len(), 1);
    assert_eq!(
        submitted[0].body.as_ref().unwrap()["resources"]["cpus"],
        json!(2)
    );
}
