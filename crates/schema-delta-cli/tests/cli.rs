//! End-to-end tests for the `schema-delta` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::TempDir;

fn write_document(dir: &TempDir, name: &str, document: &Value) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_string_pretty(document).unwrap()).unwrap();
    path
}

fn run(args: &[&Path], extra: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_schema-delta"));
    command.env_remove("SCHEMA_DELTA_FORMAT");
    if let [from, to] = args {
        command.arg("--from").arg(from).arg("--to").arg(to);
    } else if let [to] = args {
        command.arg("--to").arg(to);
    }
    command.args(extra).output().unwrap()
}

#[test]
fn prints_operations_as_json() {
    let dir = TempDir::new().unwrap();
    let from = write_document(
        &dir,
        "from.json",
        &json!({"id": "users", "properties": {"name": {"type": "string"}}}),
    );
    let to = write_document(
        &dir,
        "to.json",
        &json!({"id": "users", "properties": {"label": {"type": "string"}}}),
    );

    let output = run(&[from.as_path(), to.as_path()], &[]);
    assert!(output.status.success());

    let ops: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        ops,
        json!([{"op": "rename_column", "table": "users", "from": "name", "to": "label"}])
    );
}

#[test]
fn prints_script_for_new_table() {
    let dir = TempDir::new().unwrap();
    let to = write_document(
        &dir,
        "to.json",
        &json!({"id": "posts", "properties": {"title": {"type": "STRING"}}}),
    );

    let output = run(&[to.as_path()], &["--format", "script"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("  queryInterface.createTable('posts', {"));
    assert!(stdout.contains("      type: dataTypes.STRING,"));
    assert!(stdout.contains("  queryInterface.dropTable('posts');"));
}

#[test]
fn fails_on_invalid_documents() {
    let dir = TempDir::new().unwrap();
    let to = write_document(
        &dir,
        "to.json",
        &json!({"id": "t", "properties": {"email": {"unique": true}}}),
    );

    let output = run(&[to.as_path()], &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("missing 'type' attribute"));
}
