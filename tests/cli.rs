//! End-to-end CLI checks.
//!
//! These exercise argument validation and the exit-code policy; conversion
//! behavior itself is covered by the unit tests against the codec seam.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("heic2jpg").unwrap()
}

#[test]
fn missing_input_folder_exits_2() {
    let tmp = tempfile::tempdir().unwrap();
    cmd()
        .arg(tmp.path().join("does-not-exist"))
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn file_as_input_folder_exits_2() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("photo.heic");
    std::fs::write(&file, b"x").unwrap();

    cmd()
        .arg(&file)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn empty_folder_exits_1() {
    let tmp = tempfile::tempdir().unwrap();
    cmd()
        .arg(tmp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No HEIC files found"));
}

#[test]
fn folder_without_heic_files_exits_1() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("img.png"), b"not heic").unwrap();

    cmd().arg(tmp.path()).assert().failure().code(1);
}

#[test]
fn quality_out_of_range_is_rejected() {
    cmd()
        .args([".", "--quality", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1..=100"));

    cmd()
        .args([".", "--quality", "101"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1..=100"));
}

#[test]
fn input_folder_is_required() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
