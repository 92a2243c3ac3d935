//! Saved proposal lifecycle tests

mod common;

use common::{add_piece, jqt, run_json, run_ok, setup_test_project};
use predicates::prelude::*;
use tempfile::TempDir;

fn project_with_job() -> TempDir {
    let tmp = setup_test_project();
    add_piece(&tmp, "MDF White 15mm", "700", "400", "4", Some("O"));
    run_ok(&tmp, &["hw", "add", "Hanger rod", "--quantity", "1"]);
    tmp
}

fn save(tmp: &TempDir, client: &str) {
    run_ok(tmp, &["proposal", "save", "--client", client, "--project", "Wardrobe"]);
}

#[test]
fn test_save_freezes_current_price() {
    let tmp = project_with_job();
    let stats = run_json(&tmp, &["stats"]);
    save(&tmp, "Ana");

    let proposals = run_json(&tmp, &["proposal", "list"]);
    let p = &proposals[0];
    assert_eq!(p["sequence"], 1);
    assert_eq!(p["author"], "tester");
    assert_eq!(p["status"], "awaiting_approval");
    assert_eq!(p["final_price"], stats["sales_price"]);
    assert_eq!(p["client"]["validity_days"], 15);
}

#[test]
fn test_sequence_increments() {
    let tmp = project_with_job();
    save(&tmp, "Ana");
    save(&tmp, "Bruno");

    let proposals = run_json(&tmp, &["proposal", "list"]);
    let seqs: Vec<u64> = proposals
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["sequence"].as_u64().unwrap())
        .collect();
    assert_eq!(seqs, vec![1, 2]);
}

#[test]
fn test_saved_proposal_ignores_later_edits() {
    let tmp = project_with_job();
    save(&tmp, "Ana");
    let before = run_json(&tmp, &["proposal", "show", "PROP@1"]);

    add_piece(&tmp, "Plywood", "2000", "600", "3", None);
    run_ok(&tmp, &["settings", "set", "--margin", "80"]);

    let after = run_json(&tmp, &["proposal", "show", "PROP@1"]);
    assert_eq!(before["stats"], after["stats"]);
    assert_eq!(after["data"]["pieces"].as_array().unwrap().len(), 1);
}

#[test]
fn test_load_restores_project() {
    let tmp = project_with_job();
    save(&tmp, "Ana");
    run_ok(&tmp, &["reset", "--yes"]);
    assert!(run_json(&tmp, &["piece", "list"]).as_array().unwrap().is_empty());

    run_ok(&tmp, &["proposal", "load", "PROP@1", "--yes"]);

    let pieces = run_json(&tmp, &["piece", "list"]);
    assert_eq!(pieces.as_array().unwrap().len(), 1);
    let hw = run_json(&tmp, &["hw", "list"]);
    assert_eq!(hw[0]["name"], "Hanger rod");
}

#[test]
fn test_status_change() {
    let tmp = project_with_job();
    save(&tmp, "Ana");

    run_ok(&tmp, &["proposal", "status", "PROP@1", "sent"]);
    let p = run_json(&tmp, &["proposal", "show", "PROP@1"]);
    assert_eq!(p["status"], "sent");

    jqt()
        .current_dir(tmp.path())
        .args(["proposal", "status", "PROP@1", "archived"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid proposal status"));
}

#[test]
fn test_edit_client_sets_and_clears_fields() {
    let tmp = project_with_job();
    save(&tmp, "Ana");

    run_ok(&tmp, &["proposal", "edit", "PROP@1", "--phone", "555-0100", "--delivery", "30 days"]);
    let p = run_json(&tmp, &["proposal", "show", "PROP@1"]);
    assert_eq!(p["client"]["phone"], "555-0100");
    assert_eq!(p["client"]["delivery_time"], "30 days");

    run_ok(&tmp, &["proposal", "edit", "PROP@1", "--phone", ""]);
    let p = run_json(&tmp, &["proposal", "show", "PROP@1"]);
    assert!(p["client"].get("phone").is_none());
}

#[test]
fn test_override_recomputes_margin() {
    let tmp = project_with_job();
    save(&tmp, "Ana");

    run_ok(
        &tmp,
        &["proposal", "override", "PROP@1", "--material", "400", "--fabrication", "600", "--price", "2000"],
    );

    let p = run_json(&tmp, &["proposal", "show", "PROP@1"]);
    assert_eq!(p["final_price"], 2000.0);
    assert_eq!(p["stats"]["total_cost"], 1000.0);
    assert_eq!(p["stats"]["sales_price"], 2000.0);

    // 14% anchor fee: net 1720, profit 720
    let margin = p["stats"]["realized_margin"].as_f64().unwrap();
    assert!((margin - 36.0).abs() < 1e-6);
}

#[test]
fn test_override_without_values_fails() {
    let tmp = project_with_job();
    save(&tmp, "Ana");
    jqt()
        .current_dir(tmp.path())
        .args(["proposal", "override", "PROP@1"])
        .assert()
        .failure();
}

#[test]
fn test_render_to_stdout() {
    let tmp = project_with_job();
    run_ok(&tmp, &["settings", "set", "--company-name", "Oak & Iron"]);
    save(&tmp, "Ana");
    run_ok(&tmp, &["proposal", "override", "PROP@1", "--price", "1500"]);

    jqt()
        .current_dir(tmp.path())
        .args(["proposal", "render", "PROP@1", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Oak & Iron"))
        .stdout(predicate::str::contains("**R$ 1500.00**"))
        .stdout(predicate::str::contains("| 12x | R$ 1500.00 | R$ 125.00 |"));
}

#[test]
fn test_render_writes_markdown_file() {
    let tmp = project_with_job();
    save(&tmp, "Ana");
    let out = tmp.path().join("quote.md");

    run_ok(&tmp, &["proposal", "render", "PROP@1", "--file", out.to_str().unwrap()]);
    let doc = std::fs::read_to_string(&out).unwrap();
    assert!(doc.contains("Ana"));
}

#[test]
fn test_rm_removes_file() {
    let tmp = project_with_job();
    save(&tmp, "Ana");
    run_ok(&tmp, &["proposal", "rm", "PROP@1", "--yes"]);
    assert!(run_json(&tmp, &["proposal", "list"]).as_array().unwrap().is_empty());
}

#[test]
fn test_unknown_proposal_fails() {
    let tmp = setup_test_project();
    jqt()
        .current_dir(tmp.path())
        .args(["proposal", "show", "PROP@9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No proposal matches"));
}
