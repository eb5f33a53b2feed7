use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn write_doc(source: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.md");
    fs::write(&path, source).unwrap();
    (dir, path)
}

#[test]
fn edit_backspaces_through_closing_delimiter() {
    let (_dir, path) = write_doc("**bold** text\n");
    cargo_bin_cmd!("marklight")
        .arg("edit")
        .arg(&path)
        .arg("--block")
        .arg("0")
        .arg("--cursor")
        .arg("4")
        .arg("--keys")
        .arg("ArrowRight,ArrowRight,Backspace")
        .assert()
        .success()
        .stdout("\\**bold* text\n")
        .stderr(predicate::str::contains("cursor: /0@5"));
}

#[test]
fn edit_types_into_nested_block() {
    let (_dir, path) = write_doc("- a\n- b\n");
    cargo_bin_cmd!("marklight")
        .arg("edit")
        .arg(&path)
        .arg("--block")
        .arg("0.1.0")
        .arg("--cursor")
        .arg("1")
        .arg("--keys")
        .arg("Space,x")
        .assert()
        .success()
        .stdout("- a\n- b x\n");
}

#[test]
fn edit_rejects_missing_block() {
    let (_dir, path) = write_doc("text\n");
    cargo_bin_cmd!("marklight")
        .arg("edit")
        .arg(&path)
        .arg("--block")
        .arg("4")
        .arg("--keys")
        .arg("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no text block"));
}
