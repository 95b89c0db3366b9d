// Tests for the run command

use super::test_utils::*;
use crate::common::{FakePlatform, CREATED_JOB_ID, CREATED_WORKFLOW_ID, JOB_YAML};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use predicates::prelude::*;
use serde_json::json;

#[test]
fn test_dry_run_splits_multiline_commands() {
    let ws = Workspace::new();
    let job = ws.write(
        "job.yaml",
        "tasks:\n  - image: busybox\n    cmd: |\n      echo one\n\n      echo two\n      echo three\n",
    );

    let doc = json_output(offline().args(["run", "--dry-run", job.to_str().unwrap()]));

    let cmds: Vec<_> = doc["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["cmd"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(cmds, vec!["echo one", "echo two", "echo three"]);
    assert_eq!(doc["resources"], json!({"memory": 1, "cpus": 1, "nodes": 1, "disk": 10}));
}

#[test]
fn test_dry_run_ships_scripts_as_executable_inputs() {
    let ws = Workspace::new();
    let script = "#!/bin/bash\necho hello\n";
    let job = ws.write(
        "job.json",
        serde_json::to_string(&json!({"tasks": [{"image": "busybox", "cmd": script}]})).unwrap(),
    );

    let doc = json_output(offline().args(["run", "--dry-run", job.to_str().unwrap()]));

    let input = &doc["inputs"][0];
    assert_eq!(input["executable"], json!(true));
    let filename = input["filename"].as_str().unwrap();
    assert_eq!(doc["tasks"][0]["cmd"], json!(format!("./{}", filename)));
    assert_eq!(
        STANDARD.decode(input["content"].as_str().unwrap()).unwrap(),
        script.as_bytes()
    );
}

#[test]
fn test_dry_run_inlines_local_files() {
    let ws = Workspace::new();
    let data = ws.write("data.csv", "a,b\n1,2\n");
    let job = ws.write(
        "job.yaml",
        format!(
            "tasks:\n  - image: busybox\n    cmd: cat data.csv\ninputs:\n  - file://{}\n  - not-a-file-reference\n",
            data.display()
        ),
    );

    let doc = json_output(offline().args(["run", "--dry-run", job.to_str().unwrap()]));

    assert_eq!(
        doc["inputs"],
        json!([{"filename": "data.csv", "content": STANDARD.encode("a,b\n1,2\n")}])
    );
}

#[test]
fn test_workflow_dry_run_normalizes_every_job() {
    let ws = Workspace::new();
    let workflow = ws.write(
        "workflow.yaml",
        "name: pipeline\njobs:\n  - name: a\n    tasks:\n      - image: busybox\n        cmd: \"x\\ny\"\n  - name: b\n    tasks:\n      - image: busybox\n        cmd: z\n",
    );

    let doc = json_output(offline().args(["run", "--dry-run", workflow.to_str().unwrap()]));

    assert_eq!(doc["name"], json!("pipeline"));
    assert_eq!(doc["jobs"][0]["tasks"].as_array().unwrap().len(), 2);
    assert_eq!(doc["jobs"][1]["tasks"].as_array().unwrap().len(), 1);
}

#[test]
fn test_run_submits_job() {
    let platform = FakePlatform::start();
    let ws = Workspace::new();
    let job = ws.write("job.yaml", JOB_YAML);

    prominence(&platform.url)
        .args(["run", job.to_str().unwrap()])
        .assert()
        .success()
        .stdout(format!("Job created with id {}\n", CREATED_JOB_ID));

    let submitted = platform.requests.submissions();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].path, "/jobs");
    let body = submitted[0].body.as_ref().unwrap();
    assert_eq!(body["name"], json!("hello"));
    assert_eq!(body["resources"]["cpus"], json!(2));
}

#[test]
fn test_run_submits_workflow() {
    let platform = FakePlatform::start();
    let ws = Workspace::new();
    let workflow = ws.write(
        "workflow.json",
        r#"{"jobs": [{"name": "a", "tasks": [{"image": "busybox"}]}]}"#,
    );

    prominence(&platform.url)
        .args(["run", workflow.to_str().unwrap()])
        .assert()
        .success()
        .stdout(format!("Workflow created with id {}\n", CREATED_WORKFLOW_ID));

    assert_eq!(platform.requests.submissions()[0].path, "/workflows");
}

#[test]
fn test_run_from_url() {
    let platform = FakePlatform::start();
    let source = format!("{}/descriptions/job.yaml", platform.url);

    let doc = json_output(prominence(&platform.url).args(["run", "--dry-run", &source]));
    assert_eq!(doc["name"], json!("hello"));
}

#[test]
fn test_run_from_missing_url_reports_status() {
    let platform = FakePlatform::start();
    let source = format!("{}/descriptions/other.yaml", platform.url);

    prominence(&platform.url)
        .args(["run", &source])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("Error: unable to fetch"))
        .stdout(predicate::str::contains("status code 404"));
}

#[test]
fn test_oversized_input_aborts_submission() {
    let platform = FakePlatform::start();
    let ws = Workspace::new();
    let big = ws.write("big.bin", vec![0u8; 1_000_000]);
    let workflow = ws.write(
        "workflow.yaml",
        format!(
            "jobs:\n  - tasks:\n      - image: busybox\n  - tasks:\n      - image: busybox\n    inputs:\n      - file://{}\n",
            big.display()
        ),
    );

    prominence(&platform.url)
        .args(["run", workflow.to_str().unwrap()])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Error: input file"))
        .stdout(predicate::str::contains("must be smaller than 1000000 bytes"));

    assert!(platform.requests.all().is_empty());
}

#[test]
fn test_missing_input_file() {
    let ws = Workspace::new();
    let job = ws.write(
        "job.yaml",
        "tasks:\n  - image: busybox\ninputs:\n  - file:///no/such/file.txt\n",
    );

    offline()
        .args(["run", "--dry-run", job.to_str().unwrap()])
        .assert()
        .code(1)
        .stdout("Error: input file /no/such/file.txt does not exist\n");
}

#[test]
fn test_unparseable_description() {
    let ws = Workspace::new();
    let job = ws.write("job.yaml", "tasks: [unclosed\n  - : :");

    offline()
        .args(["run", job.to_str().unwrap()])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with(
            "Error: unable to parse description as JSON or YAML",
        ));
}

#[test]
fn test_missing_description_file() {
    offline()
        .args(["run", "/no/such/job.yaml"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with(
            "Error: unable to fetch /no/such/job.yaml",
        ));
}
