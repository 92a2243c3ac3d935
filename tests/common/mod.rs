//! Shared test helpers for integration tests

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Helper to get a jqt command with logging quiet and config pinned
pub fn jqt() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("jqt"));
    cmd.env_remove("JQT_LOG")
        .env("JQT_AUTHOR", "tester")
        .env("JQT_CURRENCY", "R$");
    cmd
}

/// Helper to create a project seeded with the default catalogs
pub fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    jqt().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

/// Helper to create a project with empty catalogs
pub fn setup_empty_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    jqt()
        .current_dir(tmp.path())
        .args(["init", "--empty"])
        .assert()
        .success();
    tmp
}

/// Run a command in the project and return stdout
pub fn run_ok(tmp: &TempDir, args: &[&str]) -> String {
    let output = jqt().current_dir(tmp.path()).args(args).output().unwrap();
    assert!(
        output.status.success(),
        "jqt {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Run a command with `-o json` and parse the output
pub fn run_json(tmp: &TempDir, args: &[&str]) -> serde_json::Value {
    let mut full = args.to_vec();
    full.extend(["-o", "json"]);
    serde_json::from_str(&run_ok(tmp, &full)).unwrap()
}

/// Helper to add a piece to the cutting sheet
pub fn add_piece(tmp: &TempDir, material: &str, length: &str, width: &str, qty: &str, edge: Option<&str>) {
    let mut args = vec![
        "piece", "add", "--material", material, "--length", length, "--width", width, "--quantity", qty,
    ];
    if let Some(edge) = edge {
        args.extend(["--edge", edge]);
    }
    run_ok(tmp, &args);
}
