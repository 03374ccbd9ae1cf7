use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{init_cli_db, setup_test_db, temp_dir, wl};

#[test]
fn test_init_creates_schema() {
    let db_path = setup_test_db("cli_init");

    wl().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    let conn = rusqlite::Connection::open(&db_path).expect("open db");
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type = 'table'
               AND name IN ('tasks', 'task_sessions', 'task_session_intervals', 'commits')",
            [],
            |r| r.get(0),
        )
        .expect("count tables");
    assert_eq!(tables, 4);
}

#[test]
fn test_session_lifecycle_via_cli() {
    let db_path = setup_test_db("cli_lifecycle");
    init_cli_db(&db_path);

    wl().args(["--db", &db_path, "start", "write docs", "--tag", "docs"])
        .assert()
        .success()
        .stdout(contains("Started session #1").and(contains("write docs")));

    wl().args(["--db", &db_path, "status"])
        .assert()
        .success()
        .stdout(contains("write docs").and(contains("in_progress")));

    wl().args(["--db", &db_path, "pause"])
        .assert()
        .success()
        .stdout(contains("paused"));

    wl().args(["--db", &db_path, "pause"])
        .assert()
        .success()
        .stdout(contains("already paused"));

    wl().args(["--db", &db_path, "resume"])
        .assert()
        .success()
        .stdout(contains("resumed"));

    wl().args(["--db", &db_path, "stop"])
        .assert()
        .success()
        .stdout(contains("Session #1 stopped").and(contains("Total")));

    wl().args(["--db", &db_path, "stop"])
        .assert()
        .failure()
        .stderr(contains("No active task session"));

    wl().args(["--db", &db_path, "stop", "--id", "1"])
        .assert()
        .success()
        .stdout(contains("already stopped"));
}

#[test]
fn test_start_twice_fails() {
    let db_path = setup_test_db("cli_start_twice");
    init_cli_db(&db_path);

    wl().args(["--db", &db_path, "start", "first"])
        .assert()
        .success();

    wl().args(["--db", &db_path, "start", "second"])
        .assert()
        .failure()
        .stderr(contains("already active"));
}

#[test]
fn test_pause_without_session_fails() {
    let db_path = setup_test_db("cli_pause_none");
    init_cli_db(&db_path);

    wl().args(["--db", &db_path, "pause"])
        .assert()
        .failure()
        .stderr(contains("Error: No active task session"));
}

#[test]
fn test_list_and_log() {
    let db_path = setup_test_db("cli_list_log");
    init_cli_db(&db_path);

    wl().args(["--db", &db_path, "start", "triage bugs", "--kpi", "closed-issues"])
        .assert()
        .success();
    wl().args(["--db", &db_path, "stop"]).assert().success();

    wl().args(["--db", &db_path, "list"])
        .assert()
        .success()
        .stdout(contains("triage bugs").and(contains("ended")));

    let out = wl()
        .args(["--db", &db_path, "list", "--json"])
        .output()
        .expect("run list --json");
    assert!(out.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid json");
    assert_eq!(rows[0]["task"], "triage bugs");
    assert_eq!(rows[0]["status"], "ended");

    wl().args(["--db", &db_path, "log"])
        .assert()
        .success()
        .stdout(contains("triage bugs").and(contains("closed-issues")));

    wl().args(["--db", &db_path, "log", "--audit"])
        .assert()
        .success()
        .stdout(contains("Internal log").and(contains("stop")));
}

#[test]
fn test_record_commit_and_log() {
    let db_path = setup_test_db("cli_record_commit");
    init_cli_db(&db_path);

    wl().args(["--db", &db_path, "start", "hooked work"])
        .assert()
        .success();

    let record = [
        "--db",
        &db_path,
        "record-commit",
        "--hash",
        "0123456789abcdef",
        "--message",
        "fix: parser",
        "--author",
        "Ada",
        "--date",
        "Mon Mar 10 09:00:00 2025 +0000",
    ];

    wl().args(record)
        .assert()
        .success()
        .stdout(contains("recorded in session #1"));

    wl().args(record)
        .assert()
        .success()
        .stdout(contains("already recorded"));

    wl().args(["--db", &db_path, "log"])
        .assert()
        .success()
        .stdout(contains("0123456").and(contains("fix: parser")));
}

#[test]
fn test_summary_output() {
    let db_path = setup_test_db("cli_summary");
    init_cli_db(&db_path);

    wl().args(["--db", &db_path, "summary", "--breakdown"])
        .assert()
        .success()
        .stdout(
            contains("Summary Stats")
                .and(contains("Productivity Score"))
                .and(contains("Monthly")),
        );
}

#[test]
fn test_sync_outside_repository_fails() {
    let db_path = setup_test_db("cli_sync_active");
    init_cli_db(&db_path);

    // not a git repository: the log cannot be read
    let dir = temp_dir("cli_sync_norepo");
    wl().args([
        "--db",
        &db_path,
        "sync",
        "--unassociated",
        "--repo",
        dir.to_str().expect("utf8 path"),
    ])
    .assert()
    .failure()
    .stderr(contains("Version control error"));
}

#[test]
fn test_sync_mode_flags_conflict() {
    let db_path = setup_test_db("cli_sync_conflict");

    wl().args(["--db", &db_path, "sync", "--unassociated", "--session", "1"])
        .assert()
        .failure();
}

#[test]
fn test_setup_hook() {
    let db_path = setup_test_db("cli_setup_hook");
    init_cli_db(&db_path);

    let repo = temp_dir("cli_hook_repo");
    fs::create_dir_all(repo.join(".git").join("hooks")).expect("hooks dir");

    wl().args([
        "--db",
        &db_path,
        "setup-hook",
        "--repo",
        repo.to_str().expect("utf8 path"),
    ])
    .assert()
    .success()
    .stdout(contains("post-commit hook installed"));

    let script = fs::read_to_string(repo.join(".git/hooks/post-commit")).expect("hook");
    assert!(script.starts_with("#!/bin/sh"));
    assert!(script.contains("record-commit"));
    assert!(script.contains(&db_path));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(repo.join(".git/hooks/post-commit"))
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}

#[test]
fn test_setup_hook_requires_git_dir() {
    let db_path = setup_test_db("cli_setup_hook_missing");
    init_cli_db(&db_path);

    let dir = temp_dir("cli_hook_norepo");
    wl().args([
        "--db",
        &db_path,
        "setup-hook",
        "--repo",
        dir.to_str().expect("utf8 path"),
    ])
    .assert()
    .failure()
    .stderr(contains("git hooks directory not found"));
}
