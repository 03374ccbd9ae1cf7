use worklogger::core::session::{SessionLogic, StartRequest};
use worklogger::core::sync::{Association, CommitSyncEngine, SyncTarget};
use worklogger::db::commits;
use worklogger::db::initialize::init_db;
use worklogger::db::pool::DbPool;
use worklogger::errors::AppError;
use worklogger::git::parse_log;
use worklogger::models::commit::GitCommit;

mod common;
use common::{at, open_test_pool, setup_test_db};

fn commit(hash: &str, message: &str) -> GitCommit {
    GitCommit {
        hash: hash.to_string(),
        author: "Ada".to_string(),
        date: "Mon Mar 10 09:00:00 2025 +0000".to_string(),
        message: message.to_string(),
    }
}

fn history() -> Vec<GitCommit> {
    vec![
        commit("e5", "fifth"),
        commit("d4", "fourth"),
        commit("c3", "third"),
        commit("b2", "second"),
        commit("a1", "first"),
    ]
}

#[test]
fn test_sync_inserts_only_unseen_commits() {
    let mut pool = open_test_pool("sync_unseen");

    // two hashes are already stored
    CommitSyncEngine::record(&mut pool, &commit("a1", "first")).expect("record");
    CommitSyncEngine::record(&mut pool, &commit("b2", "second")).expect("record");

    let report = CommitSyncEngine::sync(&mut pool, &history(), SyncTarget::Unassociated, at(0))
        .expect("sync");
    assert_eq!(report.inserted, 3);
    assert!(report.failures.is_empty());
    assert_eq!(report.association, Association::Unassociated);

    let again = CommitSyncEngine::sync(&mut pool, &history(), SyncTarget::Unassociated, at(1))
        .expect("second sync");
    assert_eq!(again.inserted, 0);

    assert_eq!(commits::all_hashes(&pool.conn).expect("hashes").len(), 5);
    assert_eq!(commits::count_unassociated(&pool.conn).expect("count"), 5);
}

#[test]
fn test_open_session_takes_precedence() {
    let mut pool = open_test_pool("sync_precedence");

    let started = SessionLogic::start(&mut pool, &StartRequest::new("active"), at(0))
        .expect("start");

    // the requested session does not even exist
    let report = CommitSyncEngine::sync(&mut pool, &history(), SyncTarget::Existing(999), at(5))
        .expect("sync");

    assert_eq!(report.association, Association::ActiveSession(started.session.id));
    assert_eq!(report.inserted, 5);

    let attached = commits::list_for_session(&pool.conn, started.session.id).expect("list");
    assert_eq!(attached.len(), 5);
    assert_eq!(commits::count_unassociated(&pool.conn).expect("count"), 0);
}

#[test]
fn test_sync_into_existing_session() {
    let mut pool = open_test_pool("sync_existing");

    let started = SessionLogic::start(&mut pool, &StartRequest::new("old work"), at(0))
        .expect("start");
    SessionLogic::stop(&mut pool, at(30)).expect("stop");

    let report = CommitSyncEngine::sync(
        &mut pool,
        &history(),
        SyncTarget::Existing(started.session.id),
        at(40),
    )
    .expect("sync");

    assert_eq!(report.association, Association::Existing(started.session.id));
    assert_eq!(
        commits::list_for_session(&pool.conn, started.session.id)
            .expect("list")
            .len(),
        5
    );
}

#[test]
fn test_sync_into_unknown_session_fails() {
    let mut pool = open_test_pool("sync_unknown");

    let err = CommitSyncEngine::sync(&mut pool, &history(), SyncTarget::Existing(42), at(0))
        .expect_err("unknown session");
    assert!(matches!(err, AppError::RecordNotFound(42)));
    assert!(commits::all_hashes(&pool.conn).expect("hashes").is_empty());
}

#[test]
fn test_sync_into_new_session_starts_paused() {
    let mut pool = open_test_pool("sync_new_session");

    let report = CommitSyncEngine::sync(
        &mut pool,
        &history(),
        SyncTarget::NewSession("catch up".into()),
        at(0),
    )
    .expect("sync");

    let Association::NewSession(id) = report.association else {
        panic!("unexpected association: {:?}", report.association);
    };
    assert_eq!(report.inserted, 5);

    let open = SessionLogic::get_open_session(&pool)
        .expect("open")
        .expect("new session is open");
    assert_eq!(open.id, id);
    assert!(!SessionLogic::has_open_interval(&pool, id).expect("interval"));

    // the new session can be resumed like any paused one
    SessionLogic::resume(&mut pool, at(10)).expect("resume");
    assert!(SessionLogic::has_open_interval(&pool, id).expect("interval"));
}

fn session_count(pool: &DbPool) -> i64 {
    pool.conn
        .query_row("SELECT COUNT(*) FROM task_sessions", [], |r| r.get(0))
        .expect("count sessions")
}

#[test]
fn test_new_session_not_left_behind_when_batch_cannot_start() {
    let db_path = setup_test_db("sync_new_session_locked");
    let mut pool = DbPool::with_timeout(&db_path, 1).expect("open db");
    init_db(&pool.conn).expect("init db");

    // another writer holds the lock for the whole sync
    let blocker = rusqlite::Connection::open(&db_path).expect("second connection");
    blocker.execute_batch("BEGIN IMMEDIATE;").expect("take write lock");

    let err = CommitSyncEngine::sync(
        &mut pool,
        &history(),
        SyncTarget::NewSession("catch up".into()),
        at(0),
    )
    .expect_err("locked database");
    assert!(matches!(err, AppError::Storage { .. }));

    blocker.execute_batch("ROLLBACK;").expect("release lock");

    assert_eq!(session_count(&pool), 0);
    assert!(SessionLogic::get_open_session(&pool).expect("open").is_none());
    assert!(commits::all_hashes(&pool.conn).expect("hashes").is_empty());

    // a later plain start is not blocked by a leftover session
    SessionLogic::start(&mut pool, &StartRequest::new("after"), at(5)).expect("start");
}

#[test]
fn test_new_session_rejected_description_rolls_back() {
    let mut pool = open_test_pool("sync_new_session_empty");

    let err = CommitSyncEngine::sync(
        &mut pool,
        &history(),
        SyncTarget::NewSession("   ".into()),
        at(0),
    )
    .expect_err("empty description");
    assert!(matches!(err, AppError::InvalidInput(_)));

    assert_eq!(session_count(&pool), 0);
    assert!(commits::all_hashes(&pool.conn).expect("hashes").is_empty());
}

#[test]
fn test_failed_row_is_skipped() {
    let mut pool = open_test_pool("sync_row_failure");

    pool.conn
        .execute_batch(
            "CREATE TRIGGER reject_bad BEFORE INSERT ON commits
             WHEN NEW.hash = 'bad'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .expect("trigger");

    let source = vec![commit("ok1", "one"), commit("bad", "boom"), commit("ok2", "two")];
    let report = CommitSyncEngine::sync(&mut pool, &source, SyncTarget::Unassociated, at(0))
        .expect("sync");

    assert_eq!(report.inserted, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].hash, "bad");

    let hashes = commits::all_hashes(&pool.conn).expect("hashes");
    assert!(hashes.contains("ok1"));
    assert!(hashes.contains("ok2"));
    assert!(!hashes.contains("bad"));

    let skipped: i64 = pool
        .conn
        .query_row(
            "SELECT COUNT(*) FROM log WHERE operation = 'sync_skip' AND target = 'bad'",
            [],
            |r| r.get(0),
        )
        .expect("log");
    assert_eq!(skipped, 1);
}

#[test]
fn test_record_commit_duplicate_is_noop() {
    let mut pool = open_test_pool("sync_record_dup");

    let first = CommitSyncEngine::record(&mut pool, &commit("f00", "hook")).expect("record");
    assert!(first.inserted);
    assert_eq!(first.session_id, None);

    let second = CommitSyncEngine::record(&mut pool, &commit("f00", "hook")).expect("record");
    assert!(!second.inserted);
}

#[test]
fn test_record_commit_joins_open_session() {
    let mut pool = open_test_pool("sync_record_session");

    let started = SessionLogic::start(&mut pool, &StartRequest::new("hooked"), at(0))
        .expect("start");
    let outcome = CommitSyncEngine::record(&mut pool, &commit("cafe", "wip")).expect("record");

    assert_eq!(outcome.session_id, Some(started.session.id));
}

#[test]
fn test_parse_log_skips_short_lines() {
    let output = "abc|Ada|Mon Mar 10 09:00:00 2025 +0000|fix: a | b\n\
                  broken line\n\
                  def|Bob|date-only\n\
                  |Eve|Tue Mar 11 10:00:00 2025 +0000|no hash\n\
                  123|Cy|Wed Mar 12 11:00:00 2025 +0000|feat: parser";

    let parsed = parse_log(output);
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].hash, "abc");
    assert_eq!(parsed[0].author, "Ada");
    assert_eq!(parsed[0].message, "fix: a | b");
    assert_eq!(parsed[1].hash, "123");
}
