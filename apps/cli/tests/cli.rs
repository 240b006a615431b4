//! End-to-end runs of the `flowdesk` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn flowdesk() -> Command {
    let mut cmd = Command::cargo_bin("flowdesk").unwrap();
    for var in ["FLOWDESK_LOG", "FLOWDESK_LOG_FORMAT", "FLOWDESK_CONFIG", "RUST_LOG"] {
        cmd.env_remove(var);
    }
    cmd
}

const MISSING_END: &str = r#"{
  "version": 1,
  "nodes": [
    { "id": "n1", "kind": "start" },
    { "id": "n2", "kind": "task", "position": { "x": 0, "y": 120 } }
  ],
  "edges": [
    { "id": "e1", "kind": "default", "source": "n1", "target": "n2" }
  ]
}"#;

const CYCLE: &str = r#"{
  "nodes": [
    { "id": "n1", "kind": "task" },
    { "id": "n2", "kind": "task" },
    { "id": "n3", "kind": "task" }
  ],
  "edges": [
    { "id": "e1", "source": "n1", "target": "n2" },
    { "id": "e2", "source": "n2", "target": "n3" },
    { "id": "e3", "source": "n3", "target": "n1" }
  ]
}"#;

fn sample(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("sample.json");
    flowdesk().arg("new").arg(&path).assert().success();
    path
}

#[test]
fn new_writes_a_valid_sample() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample(dir.path());

    flowdesk()
        .arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: 3 nodes, 2 edges"));
}

#[test]
fn new_refuses_to_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample(dir.path());

    flowdesk()
        .arg("new")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    flowdesk().arg("new").arg(&path).arg("--force").assert().success();
}

#[test]
fn validate_reports_issues_with_exit_status_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flow.json");
    fs::write(&path, MISSING_END).unwrap();

    flowdesk()
        .arg("validate")
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::diff("missing end node\n"));
}

#[test]
fn validate_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flow.json");
    fs::write(&path, MISSING_END).unwrap();

    let output = flowdesk().args(["--json", "validate"]).arg(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["ok"], false);
    assert_eq!(value["issues"][0]["kind"], "missing_end");
}

#[test]
fn unreadable_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ nodes: ").unwrap();

    flowdesk()
        .arg("validate")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("is not a flow snapshot"));
    flowdesk()
        .arg("inspect")
        .arg(dir.path().join("absent.json"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn inspect_prints_order_or_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample(dir.path());
    flowdesk()
        .arg("inspect")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("starts: n1"))
        .stdout(predicate::str::contains("ends: n3"))
        .stdout(predicate::str::contains("order: n1 -> n2 -> n3"));

    let cyclic = dir.path().join("cycle.json");
    fs::write(&cyclic, CYCLE).unwrap();
    flowdesk()
        .arg("inspect")
        .arg(&cyclic)
        .assert()
        .success()
        .stdout(predicate::str::contains("order: none (cycle)"));

    let output = flowdesk().args(["--json", "inspect"]).arg(&cyclic).output().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["has_cycle"], true);
    assert_eq!(value["order"], serde_json::Value::Null);
    assert_eq!(value["edges"], 3);
}

#[test]
fn shapes_lists_the_palette() {
    flowdesk()
        .arg("shapes")
        .assert()
        .success()
        .stdout(predicate::str::contains("decision"))
        .stdout(predicate::str::contains("router=manhattan"));

    let output = flowdesk().args(["shapes", "--json"]).output().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["nodes"].as_array().unwrap().len(), 10);
    assert_eq!(value["edges"].as_array().unwrap().len(), 7);
    assert_eq!(value["edges"][2]["dasharray"], "5 5");
}

#[test]
fn render_png_and_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample(dir.path());

    let png = dir.path().join("out.png");
    flowdesk()
        .args(["render"])
        .arg(&path)
        .arg("-o")
        .arg(&png)
        .args(["--width", "320", "--height", "480", "--background", "#f0f0f0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("320x480 png"));
    assert!(fs::read(&png).unwrap().starts_with(b"\x89PNG\r\n\x1a\n"));

    let jpeg = dir.path().join("out.jpg");
    flowdesk()
        .arg("render")
        .arg(&path)
        .arg("-o")
        .arg(&jpeg)
        .args(["--gradient", "#ffffff", "#1890ff", "--quality", "60", "--fit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jpg"));
    assert!(fs::read(&jpeg).unwrap().starts_with(&[0xFF, 0xD8, 0xFF]));
}

#[test]
fn render_rejects_bad_colors_and_images() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample(dir.path());
    let out = dir.path().join("out.png");

    flowdesk()
        .arg("render")
        .arg(&path)
        .arg("-o")
        .arg(&out)
        .args(["--background", "not-a-color"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("is not a color"));

    let fake = dir.path().join("picture.gif");
    fs::write(&fake, b"GIF89a").unwrap();
    flowdesk()
        .arg("render")
        .arg(&path)
        .arg("-o")
        .arg(&out)
        .arg("--image")
        .arg(&fake)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot use"));
    assert!(!out.exists());
}

#[test]
fn config_file_sets_the_default_canvas() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample(dir.path());
    let config = dir.path().join("flowdesk.toml");
    fs::write(&config, "[canvas]\nwidth = 300\nheight = 500\n\n[log]\nlevel = \"warn\"\n").unwrap();

    flowdesk()
        .arg("--config")
        .arg(&config)
        .arg("render")
        .arg(&path)
        .arg("-o")
        .arg(dir.path().join("out.png"))
        .assert()
        .success()
        .stdout(predicate::str::contains("300x500 png"));

    flowdesk()
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .arg("shapes")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("configuration"));
}
