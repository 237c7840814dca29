use std::io::Write;
use std::process::{Command, Stdio};

use tempfile::tempdir;

/// Simple query: one table, one WHERE leaf.
const SQL_SIMPLE: &str = "SELECT id, name FROM users WHERE active = true";

/// Invalid SQL used to verify parse failures exit with code 1.
const SQL_INVALID: &str = "SELECT FROM FROM";

/// Query whose total differs across the built-in presets.
const SQL_MIXED: &str = "SELECT CASE WHEN a > 1 THEN UPPER(b) ELSE c END \
                         FROM t LEFT JOIN u ON t.id = u.id";

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sqlgauge"))
}

fn run_with_stdin(args: &[&str], stdin: &str) -> std::process::Output {
    let mut child = bin()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn CLI");
    // The child may exit before reading stdin (e.g. on a bad rules
    // file), so a broken pipe here is not a failure.
    let _ = child
        .stdin
        .as_mut()
        .expect("stdin handle")
        .write_all(stdin.as_bytes());
    child.wait_with_output().expect("run CLI")
}

#[test]
fn test_assess_file_prints_total() {
    let dir = tempdir().expect("temp dir");
    let sql_path = dir.path().join("simple.sql");
    std::fs::write(&sql_path, SQL_SIMPLE).expect("write sql");

    let output = bin()
        .arg(sql_path.to_str().expect("sql path"))
        .output()
        .expect("run CLI");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Expected exit 0, got: {stdout}");
    assert_eq!(stdout.trim(), "2");
}

#[test]
fn test_assess_stdin() {
    let output = run_with_stdin(&[], SQL_SIMPLE);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Expected exit 0, got: {stdout}");
    assert_eq!(stdout.trim(), "2");
}

#[test]
fn test_dash_reads_stdin() {
    let output = run_with_stdin(&["-"], SQL_SIMPLE);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "2");
}

#[test]
fn test_verbose_breakdown() {
    let output = run_with_stdin(&["--verbose"], SQL_SIMPLE);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "Expected exit 0, got: {stdout}");
    assert!(stdout.contains("Complexity Score: 2"), "got: {stdout}");
    assert!(stdout.contains("Tables: 1"), "got: {stdout}");
    assert!(stdout.contains("WHERE Predicates: 1"), "got: {stdout}");
    // Verbose echoes the input to stderr.
    assert!(stderr.contains("SELECT id, name"), "got: {stderr}");
}

#[test]
fn test_json_output() {
    let output = run_with_stdin(&["--format", "json"], SQL_SIMPLE);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["total"], 2);
    assert_eq!(json["tables"], 1);
    assert_eq!(json["wherePredicates"], 1);
}

#[test]
fn test_compact_json_is_one_line() {
    let output = run_with_stdin(&["--format", "json", "--compact"], SQL_SIMPLE);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim().lines().count(), 1);
}

#[test]
fn test_presets_change_the_total() {
    let default = run_with_stdin(&[], SQL_MIXED);
    let strict = run_with_stdin(&["--rules", "strict"], SQL_MIXED);
    let lenient = run_with_stdin(&["--rules", "lenient"], SQL_MIXED);

    let parse = |o: &std::process::Output| {
        String::from_utf8_lossy(&o.stdout)
            .trim()
            .parse::<u64>()
            .expect("numeric total")
    };
    let (d, s, l) = (parse(&default), parse(&strict), parse(&lenient));
    assert!(l < d, "lenient {l} should be below default {d}");
    assert!(d < s, "default {d} should be below strict {s}");
}

#[test]
fn test_rules_file_overrides_weights() {
    let dir = tempdir().expect("temp dir");
    let rules_path = dir.path().join("rules.json");
    std::fs::write(&rules_path, r#"{"base_per_table": 10}"#).expect("write rules");

    let output = run_with_stdin(
        &["--rules-file", rules_path.to_str().expect("rules path")],
        SQL_SIMPLE,
    );
    assert!(output.status.success());
    // 10 per table + 1 WHERE leaf.
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "11");
}

#[test]
fn test_bad_rules_file_exits_66() {
    let dir = tempdir().expect("temp dir");
    let rules_path = dir.path().join("rules.json");
    std::fs::write(&rules_path, "not json").expect("write rules");

    let output = run_with_stdin(
        &["--rules-file", rules_path.to_str().expect("rules path")],
        SQL_SIMPLE,
    );
    assert_eq!(output.status.code(), Some(66));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid rules file"), "got: {stderr}");
}

#[test]
fn test_missing_input_file_exits_66() {
    let output = bin()
        .arg("/no/such/query.sql")
        .output()
        .expect("run CLI");
    assert_eq!(output.status.code(), Some(66));
}

#[test]
fn test_invalid_sql_exits_1() {
    let output = run_with_stdin(&[], SQL_INVALID);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("sqlgauge: error:"),
        "Expected error prefix: {stderr}"
    );
    assert!(stderr.contains("line 1"), "Expected position: {stderr}");
}

#[test]
fn test_output_file() {
    let dir = tempdir().expect("temp dir");
    let out_path = dir.path().join("score.txt");

    let output = run_with_stdin(
        &["--output", out_path.to_str().expect("out path")],
        SQL_SIMPLE,
    );
    assert!(output.status.success());
    let written = std::fs::read_to_string(&out_path).expect("read output");
    assert_eq!(written.trim(), "2");
}

#[test]
fn test_version_flag() {
    let output = bin().arg("--version").output().expect("run CLI");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")), "got: {stdout}");
}
