use chrono::TimeDelta;
use worklogger::core::durations::DurationReconciler;
use worklogger::core::session::{SessionLogic, StartRequest};
use worklogger::db::{intervals, sessions};
use worklogger::errors::AppError;
use worklogger::models::outcome::{PauseOutcome, ResumeOutcome, StopOutcome};
use worklogger::models::session::SessionStatus;

mod common;
use common::{at, open_test_pool};

fn open_intervals(pool: &worklogger::db::pool::DbPool) -> i64 {
    pool.conn
        .query_row(
            "SELECT COUNT(*) FROM task_session_intervals WHERE end_time IS NULL",
            [],
            |row| row.get(0),
        )
        .expect("count open intervals")
}

#[test]
fn test_full_lifecycle_reconciles_durations() {
    let mut pool = open_test_pool("lifecycle_full");

    let started = SessionLogic::start(&mut pool, &StartRequest::new("write docs"), at(0))
        .expect("start");
    assert_eq!(started.task.description, "write docs");
    assert!(started.interval.is_open());

    assert!(matches!(
        SessionLogic::pause(&mut pool, at(40)).expect("pause"),
        PauseOutcome::Paused(_)
    ));
    assert!(matches!(
        SessionLogic::resume(&mut pool, at(60)).expect("resume"),
        ResumeOutcome::Resumed(_)
    ));

    match SessionLogic::stop(&mut pool, at(90)).expect("stop") {
        StopOutcome::Stopped { session, durations } => {
            assert_eq!(session.id, started.session.id);
            assert_eq!(session.ended_at, Some(at(90)));
            assert_eq!(durations.active, TimeDelta::minutes(70));
            assert_eq!(durations.paused, TimeDelta::minutes(20));
            assert_eq!(durations.total, TimeDelta::minutes(90));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    assert_eq!(open_intervals(&pool), 0);
    assert!(SessionLogic::get_open_session(&pool).expect("open").is_none());
}

#[test]
fn test_stop_is_idempotent_by_id() {
    let mut pool = open_test_pool("lifecycle_stop_twice");

    let started = SessionLogic::start(&mut pool, &StartRequest::new("refactor"), at(0))
        .expect("start");
    let id = started.session.id;

    assert!(matches!(
        SessionLogic::stop_session(&mut pool, id, at(30)).expect("first stop"),
        StopOutcome::Stopped { .. }
    ));
    assert_eq!(
        SessionLogic::stop_session(&mut pool, id, at(45)).expect("second stop"),
        StopOutcome::AlreadyStopped
    );

    // the first end time is kept
    let session = SessionLogic::get_session(&pool, id).expect("get");
    assert_eq!(session.ended_at, Some(at(30)));

    // with nothing open, the plain stop reports it
    assert!(matches!(
        SessionLogic::stop(&mut pool, at(50)),
        Err(AppError::NoActiveSession)
    ));
}

#[test]
fn test_pause_twice_reports_already_paused() {
    let mut pool = open_test_pool("lifecycle_pause_twice");

    let started = SessionLogic::start(&mut pool, &StartRequest::new("review"), at(0))
        .expect("start");
    SessionLogic::pause(&mut pool, at(10)).expect("pause");

    let before = intervals::list_for_session(&pool.conn, started.session.id).expect("list");
    assert_eq!(
        SessionLogic::pause(&mut pool, at(20)).expect("pause again"),
        PauseOutcome::AlreadyPaused
    );
    let after = intervals::list_for_session(&pool.conn, started.session.id).expect("list");

    assert_eq!(before, after);
    assert!(!SessionLogic::has_open_interval(&pool, started.session.id).expect("has open"));
}

#[test]
fn test_resume_while_running_is_a_no_op() {
    let mut pool = open_test_pool("lifecycle_resume_running");

    SessionLogic::start(&mut pool, &StartRequest::new("tests"), at(0)).expect("start");
    assert_eq!(
        SessionLogic::resume(&mut pool, at(5)).expect("resume"),
        ResumeOutcome::AlreadyRunning
    );
    assert_eq!(open_intervals(&pool), 1);
}

#[test]
fn test_at_most_one_open_interval() {
    let mut pool = open_test_pool("lifecycle_single_interval");

    SessionLogic::start(&mut pool, &StartRequest::new("spike"), at(0)).expect("start");
    for step in 1..5 {
        SessionLogic::pause(&mut pool, at(step * 10)).expect("pause");
        assert_eq!(open_intervals(&pool), 0);
        SessionLogic::resume(&mut pool, at(step * 10 + 5)).expect("resume");
        assert_eq!(open_intervals(&pool), 1);
    }
}

#[test]
fn test_resume_never_starts_before_previous_end() {
    let mut pool = open_test_pool("lifecycle_clock_skew");

    let started = SessionLogic::start(&mut pool, &StartRequest::new("skew"), at(0))
        .expect("start");
    SessionLogic::pause(&mut pool, at(40)).expect("pause");

    // clock went backwards
    match SessionLogic::resume(&mut pool, at(30)).expect("resume") {
        ResumeOutcome::Resumed(interval) => assert_eq!(interval.start_time, at(40)),
        other => panic!("unexpected outcome: {:?}", other),
    }

    let list = intervals::list_for_session(&pool.conn, started.session.id).expect("list");
    assert_eq!(list.len(), 2);
    assert!(list[1].start_time >= list[0].end_time.expect("closed"));
}

#[test]
fn test_start_while_active_fails() {
    let mut pool = open_test_pool("lifecycle_already_active");

    SessionLogic::start(&mut pool, &StartRequest::new("first"), at(0)).expect("start");
    let err = SessionLogic::start(&mut pool, &StartRequest::new("second"), at(5))
        .expect_err("second start must fail");
    assert!(matches!(err, AppError::AlreadyActive));

    // the partial unique index rejects a direct insert too
    let err = sessions::insert_session(&pool.conn, 1, at(6)).expect_err("index");
    assert!(matches!(err, AppError::AlreadyActive));

    let count: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM task_sessions", [], |r| r.get(0))
        .expect("count");
    assert_eq!(count, 1);
}

#[test]
fn test_start_stores_tags_and_kpis() {
    let mut pool = open_test_pool("lifecycle_annotations");

    let request = StartRequest {
        description: "ship release".into(),
        tags: vec!["release".into(), "backend".into()],
        kpis: vec!["latency".into()],
    };
    let started = SessionLogic::start(&mut pool, &request, at(0)).expect("start");

    let tags: i64 = pool
        .conn
        .query_row(
            "SELECT COUNT(*) FROM session_tags WHERE session_id = ?1",
            [started.session.id],
            |r| r.get(0),
        )
        .expect("tags");
    let kpis: i64 = pool
        .conn
        .query_row(
            "SELECT COUNT(*) FROM session_kpis WHERE session_id = ?1",
            [started.session.id],
            |r| r.get(0),
        )
        .expect("kpis");
    assert_eq!(tags, 2);
    assert_eq!(kpis, 1);
}

#[test]
fn test_empty_description_is_rejected() {
    let mut pool = open_test_pool("lifecycle_empty_desc");

    let err = SessionLogic::start(&mut pool, &StartRequest::new("   "), at(0))
        .expect_err("empty");
    assert!(matches!(err, AppError::InvalidInput(_)));
    assert!(SessionLogic::get_open_session(&pool).expect("open").is_none());
}

#[test]
fn test_pause_without_session_fails() {
    let mut pool = open_test_pool("lifecycle_no_session");

    assert!(matches!(
        SessionLogic::pause(&mut pool, at(0)),
        Err(AppError::NoActiveSession)
    ));
    assert!(matches!(
        SessionLogic::resume(&mut pool, at(0)),
        Err(AppError::NoActiveSession)
    ));
}

#[test]
fn test_durations_errors() {
    let mut pool = open_test_pool("lifecycle_duration_errors");

    let started = SessionLogic::start(&mut pool, &StartRequest::new("open"), at(0))
        .expect("start");

    assert!(matches!(
        DurationReconciler::durations(&pool, started.session.id),
        Err(AppError::SessionStillActive(id)) if id == started.session.id
    ));
    assert!(matches!(
        DurationReconciler::durations(&pool, 999),
        Err(AppError::RecordNotFound(999))
    ));
    assert!(matches!(
        SessionLogic::stop_session(&mut pool, 999, at(10)),
        Err(AppError::RecordNotFound(999))
    ));
}

#[test]
fn test_stop_while_paused_keeps_interval_sum() {
    let mut pool = open_test_pool("lifecycle_stop_paused");

    SessionLogic::start(&mut pool, &StartRequest::new("paused stop"), at(0)).expect("start");
    SessionLogic::pause(&mut pool, at(25)).expect("pause");

    match SessionLogic::stop(&mut pool, at(60)).expect("stop") {
        StopOutcome::Stopped { durations, .. } => {
            assert_eq!(durations.active, TimeDelta::minutes(25));
            assert_eq!(durations.paused, TimeDelta::minutes(35));
            assert_eq!(durations.active + durations.paused, durations.total);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_status_reports_running_and_paused() {
    let mut pool = open_test_pool("lifecycle_status");

    assert!(SessionLogic::status(&pool, at(0)).expect("status").is_none());

    SessionLogic::start(&mut pool, &StartRequest::new("status check"), at(0)).expect("start");
    let state = SessionLogic::status(&pool, at(15)).expect("status").expect("open");
    assert_eq!(state.status, SessionStatus::InProgress);
    assert_eq!(state.active, TimeDelta::minutes(15));
    assert_eq!(state.task.description, "status check");

    SessionLogic::pause(&mut pool, at(20)).expect("pause");
    let state = SessionLogic::status(&pool, at(50)).expect("status").expect("open");
    assert_eq!(state.status, SessionStatus::Paused);
    assert_eq!(state.active, TimeDelta::minutes(20));
}
