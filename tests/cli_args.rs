//! Argument-contract tests for the binary: exactly three positional
//! arguments, usage errors exit 1 with nothing on stdout.

use assert_cmd::Command;

fn cmd() -> Command {
    Command::cargo_bin("tgvmax-fetch").unwrap()
}

#[test]
fn missing_arguments_exit_one_with_empty_stdout() {
    cmd()
        .arg("FRPAR")
        .assert()
        .failure()
        .code(1)
        .stdout("");
}

#[test]
fn extra_arguments_exit_one_with_empty_stdout() {
    cmd()
        .args(["FRPAR", "FRRST", "2026-03-03", "extra"])
        .assert()
        .failure()
        .code(1)
        .stdout("");
}

#[test]
fn malformed_date_exits_one_with_empty_stdout() {
    cmd()
        .args(["FRPAR", "FRRST", "03/03/2026"])
        .assert()
        .failure()
        .code(1)
        .stdout("");
}

#[test]
fn help_goes_to_stdout_and_exits_zero() {
    cmd().arg("--help").assert().success();
}
