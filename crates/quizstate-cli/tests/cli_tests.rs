//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `quizstate` invocation isolated to `dir`: no user config, no env
/// overrides, and state kept under `dir/data`.
fn quizstate(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizstate").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("QUIZSTATE_DATA_DIR")
        .env_remove("QUIZSTATE_ORIGIN")
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(dir.path().join("data"));
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn answer_save_then_load() {
    let dir = TempDir::new().unwrap();

    quizstate(&dir)
        .args(["answer", "save", "q42", "B"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved incorrect answer for quiz 'q42'"));

    let record = stdout_json(quizstate(&dir).args(["answer", "load", "q42"]));
    assert_eq!(record["answer"], "B");
    assert_eq!(record["isCorrect"], false);
    let ts = record["timestamp"].as_str().unwrap();
    assert!(ts.ends_with('Z'), "timestamp should be UTC ISO-8601: {ts}");
    assert_eq!(ts.len(), "2025-03-01T12:00:00.000Z".len());
}

#[test]
fn answer_overwrite_and_clear() {
    let dir = TempDir::new().unwrap();

    quizstate(&dir)
        .args(["answer", "save", "q1", "A", "--correct"])
        .assert()
        .success();
    quizstate(&dir)
        .args(["answer", "save", "q1", "C"])
        .assert()
        .success();

    let record = stdout_json(quizstate(&dir).args(["answer", "load", "q1"]));
    assert_eq!(record["answer"], "C");

    for _ in 0..2 {
        quizstate(&dir)
            .args(["answer", "clear", "q1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Cleared answer"));
    }

    quizstate(&dir)
        .args(["answer", "load", "q1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No answer recorded for quiz 'q1'"));
}

#[test]
fn completion_overrides_reserved_fields() {
    let dir = TempDir::new().unwrap();

    quizstate(&dir)
        .args([
            "completion",
            "save",
            "q1",
            "--field",
            "foo=1",
            "--field",
            "completed=false",
            "--field",
            "timestamp=bogus",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked quiz 'q1' completed"));

    let record = stdout_json(quizstate(&dir).args(["completion", "load", "q1"]));
    assert_eq!(record["foo"], 1);
    assert_eq!(record["completed"], true);
    assert_ne!(record["timestamp"], "bogus");
}

#[test]
fn completion_replace_and_clear() {
    let dir = TempDir::new().unwrap();

    quizstate(&dir)
        .args(["completion", "save", "q1", "--field", "score=3", "--field", "attempts=2"])
        .assert()
        .success();
    quizstate(&dir)
        .args(["completion", "save", "q1", "--field", "score=5"])
        .assert()
        .success();

    let record = stdout_json(quizstate(&dir).args(["completion", "load", "q1"]));
    assert_eq!(record["score"], 5);
    assert!(record.get("attempts").is_none());

    for _ in 0..2 {
        quizstate(&dir)
            .args(["completion", "clear", "q1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Cleared completion for quiz 'q1'"));
    }

    quizstate(&dir)
        .args(["completion", "load", "q1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No completion recorded for quiz 'q1'"));
}

#[test]
fn answer_does_not_create_completion() {
    let dir = TempDir::new().unwrap();

    quizstate(&dir)
        .args(["answer", "save", "q1", "A", "--correct"])
        .assert()
        .success();

    quizstate(&dir)
        .args(["completion", "load", "q1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No completion recorded"));

    quizstate(&dir)
        .args(["status", "q1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("q1: not-submitted"));
}

#[test]
fn status_table_lists_quizzes() {
    let dir = TempDir::new().unwrap();

    quizstate(&dir)
        .args(["answer", "save", "intro", "A", "--correct"])
        .assert()
        .success();
    quizstate(&dir)
        .args(["completion", "save", "intro", "--field", "score=3"])
        .assert()
        .success();
    quizstate(&dir)
        .args(["answer", "save", "advanced", "D"])
        .assert()
        .success();

    quizstate(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("intro"))
        .stdout(predicate::str::contains("advanced"))
        .stdout(predicate::str::contains("not-submitted"))
        .stdout(predicate::str::contains("1/2 completed"));
}

#[test]
fn status_with_no_state() {
    let dir = TempDir::new().unwrap();
    quizstate(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No quiz state recorded."));
}

#[test]
fn origins_are_separate() {
    let dir = TempDir::new().unwrap();

    quizstate(&dir)
        .args(["--origin", "site-a", "answer", "save", "q1", "A"])
        .assert()
        .success();

    quizstate(&dir)
        .args(["--origin", "site-b", "answer", "load", "q1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No answer recorded"));

    assert!(dir.path().join("data").join("site-a.json").exists());
}

#[test]
fn corrupt_record_reads_as_absent() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(data.join("default.json"), r#"{"quiz_q1": "{not json"}"#).unwrap();

    quizstate(&dir)
        .args(["answer", "load", "q1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No answer recorded"))
        .stderr(predicate::str::contains("treating answer record as absent"));
}

#[test]
fn read_only_config_surfaces_storage_unavailable() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("ro.toml");
    std::fs::write(
        &config,
        "[backend]\ntype = \"file\"\nread_only = true\n",
    )
    .unwrap();

    quizstate(&dir)
        .arg("--config")
        .arg(&config)
        .args(["answer", "save", "q1", "A"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("was not saved"))
        .stderr(predicate::str::contains("storage unavailable"));
}

#[test]
fn quota_exhaustion_fails_loudly() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("small.toml");
    std::fs::write(&config, "[backend]\ntype = \"file\"\nquota_bytes = 32\n").unwrap();

    quizstate(&dir)
        .arg("--config")
        .arg(&config)
        .args(["answer", "save", "q1", "A"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("quota exceeded"));
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    quizstate(&dir)
        .args(["--config", "nonexistent.toml", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn malformed_field_is_rejected() {
    let dir = TempDir::new().unwrap();
    quizstate(&dir)
        .args(["completion", "save", "q1", "--field", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected key=value"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    quizstate(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizstate.toml"));

    let content = std::fs::read_to_string(dir.path().join("quizstate.toml")).unwrap();
    assert!(content.contains("[backend]"));

    quizstate(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    quizstate(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("answer"))
        .stdout(predicate::str::contains("completion"))
        .stdout(predicate::str::contains("status"));
}
