use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

fn sample_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("samples")
        .join(name)
}

#[test]
fn list_formats() {
    let mut cmd = cargo_bin_cmd!("ktfront");
    cmd.arg("list-formats");
    cmd.assert().success().stdout(
        predicate::str::contains("token-raw-json")
            .and(predicate::str::contains("tree-treeviz"))
            .and(predicate::str::contains("grammar-table")),
    );
}

#[test]
fn tokens_of_counter_sample() {
    let mut cmd = cargo_bin_cmd!("ktfront");
    cmd.arg("tokens").arg(sample_path("counter.kt"));
    cmd.assert().success().stdout(
        predicate::str::starts_with("[1,3] Public 'public'\n")
            .and(predicate::str::contains("Comment").not()),
    );
}

#[test]
fn all_tokens_include_comments() {
    let mut cmd = cargo_bin_cmd!("ktfront");
    cmd.arg("tokens").arg("--all").arg(sample_path("counter.kt"));
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("[1,1] BlockCommentStart\n"));
}

#[test]
fn parse_prints_derivation() {
    let mut cmd = cargo_bin_cmd!("ktfront");
    cmd.arg("parse").arg(sample_path("counter.kt"));
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("0: Program -> Declaration Program\n"));
}

#[test]
fn parse_failure_exits_with_error() {
    let mut cmd = cargo_bin_cmd!("ktfront");
    cmd.arg("parse").arg(sample_path("missing_brace.kt"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("line 3, column 16"));
}

#[test]
fn execute_with_explicit_format() {
    let mut cmd = cargo_bin_cmd!("ktfront");
    cmd.arg("execute")
        .arg(sample_path("counter.kt"))
        .arg("--format")
        .arg("symbols-simple");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("unresolved reference 'log'"));
}

#[test]
fn execute_rejects_unknown_format() {
    let mut cmd = cargo_bin_cmd!("ktfront");
    cmd.arg("execute")
        .arg(sample_path("counter.kt"))
        .arg("--format")
        .arg("tree-yaml");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("list-formats"));
}

#[test]
fn execute_uses_configured_format_and_grammar() {
    let dir = tempfile::tempdir().unwrap();
    let grammar = dir.path().join("balanced.grammar");
    fs::write(&grammar, "S -> a S b | EPSILON\n").unwrap();
    let source = dir.path().join("pairs.txt");
    fs::write(&source, "a a b b\n").unwrap();
    let config = dir.path().join("ktfront.toml");
    fs::write(&config, "[output]\nformat = \"derivation-json\"\n").unwrap();

    let mut cmd = cargo_bin_cmd!("ktfront");
    cmd.arg("execute")
        .arg(&source)
        .arg("--grammar")
        .arg(&grammar)
        .arg("--config")
        .arg(&config);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"tokens_consumed\": 4"));
}
