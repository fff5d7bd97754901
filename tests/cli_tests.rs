//! Integration tests for the `infragc` command line.

use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};

use tempfile::tempdir;

const DIAGRAM: &str = r#"{
    "nodes": [
        { "id": "v", "type": "vpc", "data": { "label": "Main VPC", "cidr": "10.0.0.0/16" } },
        { "id": "s", "type": "subnet", "data": { "label": "App" }, "parentNode": "v" }
    ],
    "edges": [{ "source": "v", "target": "s" }]
}"#;

fn infragc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_infragc"))
}

fn run_with_stdin(mut cmd: Command, input: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    if let Some(mut stdin) = child.stdin.take() {
        // The process may exit before reading its input.
        let _ = stdin.write_all(input.as_bytes());
    }
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn compiles_stdin_to_stdout() {
    let output = run_with_stdin(infragc(), DIAGRAM);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let terraform = stdout(&output);
    assert!(terraform.starts_with("terraform {\n"));
    assert!(terraform.contains("resource \"aws_vpc\" \"main_vpc\" {"));
    assert!(terraform.contains("vpc_id            = aws_vpc.main_vpc.id"));
}

#[test]
fn reads_file_and_writes_output_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("diagram.json");
    let target = dir.path().join("main.tf");
    fs::write(&input, DIAGRAM).unwrap();

    let output = infragc().arg(&input).arg("-o").arg(&target).output().unwrap();

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());
    let written = fs::read_to_string(&target).unwrap();
    assert!(written.contains("resource \"aws_subnet\" \"app\" {"));
}

#[test]
fn stats_go_to_stderr() {
    let mut cmd = infragc();
    cmd.arg("--stats");
    let output = run_with_stdin(cmd, DIAGRAM);

    assert_eq!(output.status.code(), Some(0));
    let lines = stdout(&output).split('\n').count();
    assert!(stderr(&output).contains(&format!("nodes: 2, edges: 1, lines: {}", lines)));
}

#[test]
fn config_file_reaches_the_output() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("infragc.json");
    fs::write(&config, r#"{ "region": "eu-west-1" }"#).unwrap();

    let mut cmd = infragc();
    cmd.arg("--config").arg(&config);
    let output = run_with_stdin(cmd, DIAGRAM);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("region = \"eu-west-1\""));
}

#[test]
fn missing_nodes_exits_with_invalid_input() {
    let output = run_with_stdin(infragc(), r#"{"edges":[]}"#);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("Invalid input: nodes array is required"));
}

#[test]
fn non_json_input_exits_with_invalid_input() {
    let output = run_with_stdin(infragc(), "not json");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn missing_config_file_is_a_general_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("diagram.json");
    fs::write(&input, DIAGRAM).unwrap();

    let output = infragc()
        .arg(&input)
        .arg("--config")
        .arg(dir.path().join("absent.json"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("loading config"));
}

#[test]
fn missing_input_file_is_a_general_error() {
    let dir = tempdir().unwrap();
    let output = infragc().arg(dir.path().join("absent.json")).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("reading"));
}
