use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("aplus-tutors").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tutor directory backed by a Google Sheet"));
}

#[test]
fn test_cli_serve_help() {
    let mut cmd = Command::cargo_bin("aplus-tutors").unwrap();
    cmd.arg("serve").arg("--help").assert().success().stdout(predicate::str::contains("port"));
}

#[test]
fn test_cli_list_help() {
    let mut cmd = Command::cargo_bin("aplus-tutors").unwrap();
    cmd.args(["list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--city").and(predicate::str::contains("--limit")));
}

#[test]
fn test_refresh_requires_sheet_id() {
    let mut cmd = Command::cargo_bin("aplus-tutors").unwrap();
    cmd.arg("refresh")
        .env_remove("APLUS_SHEET_ID")
        .env_remove("APLUS_SHEETS_TOKEN")
        .assert()
        .failure()
        .stderr(predicate::str::contains("APLUS_SHEET_ID"));
}
