use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

fn get_dirtree_cmd() -> Command {
    Command::cargo_bin("dirtree").unwrap()
}

#[test]
fn test_scan_prints_indented_tree() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path().join("A");
    fs::create_dir_all(root.join("B")).unwrap();
    fs::write(root.join("B").join("C.txt"), "abc").unwrap();

    // Run from an unrelated directory: the result must not depend on it.
    let elsewhere = tempfile::tempdir().unwrap();
    let mut cmd = get_dirtree_cmd();
    cmd.current_dir(elsewhere.path()).arg("scan").arg(&root);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("A/\n  B/\n    C.txt (3 bytes)\n"));
}

#[test]
fn test_scan_missing_path_succeeds_with_empty_tree() {
    let td = tempfile::tempdir().unwrap();
    let mut cmd = get_dirtree_cmd();
    cmd.current_dir(td.path())
        .arg("scan")
        .arg(td.path().join("ghost"))
        .arg("--report");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("ghost/\n"))
        .stdout(predicate::str::contains("Root unavailable"));
}

#[test]
fn test_init_then_validate() {
    let td = tempfile::tempdir().unwrap();

    get_dirtree_cmd()
        .current_dir(td.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default configuration"));
    assert!(td.path().join("dirtree.toml").exists());

    get_dirtree_cmd()
        .current_dir(td.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_export_writes_yaml() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path().join("data");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("x.csv"), "1,2\n").unwrap();
    let output = td.path().join("out.yaml");

    get_dirtree_cmd()
        .current_dir(td.path())
        .arg("export")
        .arg(&root)
        .arg("--output")
        .arg(&output)
        .arg("--format")
        .arg("yaml")
        .assert()
        .success();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("x.csv"));
    assert!(written.contains("type: file"));
}

#[test]
fn test_rejects_zero_max_depth() {
    get_dirtree_cmd()
        .arg("scan")
        .arg(".")
        .arg("--max-depth")
        .arg("0")
        .assert()
        .failure();
}
