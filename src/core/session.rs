//! Task session lifecycle: start → (pause ⇄ resume)* → stop.
//!
//! Every transition runs inside one IMMEDIATE transaction; an error drops the
//! transaction and nothing is persisted.

use crate::core::durations::DurationReconciler;
use crate::db::annotations::{self, Annotation};
use crate::db::log::ttlog_lenient;
use crate::db::pool::DbPool;
use crate::db::{intervals, sessions, tasks};
use crate::errors::{AppError, AppResult, StorageContext};
use crate::models::interval::SessionInterval;
use crate::models::outcome::{PauseOutcome, ResumeOutcome, StartedSession, StopOutcome};
use crate::models::session::{SessionStatus, TaskSession};
use crate::models::task::Task;
use crate::utils::time::truncate_secs;
use chrono::{DateTime, TimeDelta, Utc};
use rusqlite::Connection;

/// What to start.
#[derive(Debug, Clone, Default)]
pub struct StartRequest {
    pub description: String,
    pub tags: Vec<String>,
    pub kpis: Vec<String>,
}

impl StartRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }
}

/// Snapshot of the open session.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub task: Task,
    pub session: TaskSession,
    pub status: SessionStatus,
    pub intervals: Vec<SessionInterval>,
    pub active: TimeDelta,
}

pub struct SessionLogic;

impl SessionLogic {
    /// The open session, if any.
    pub fn get_open_session(pool: &DbPool) -> AppResult<Option<TaskSession>> {
        sessions::get_open(&pool.conn)
    }

    pub fn has_open_interval(pool: &DbPool, session_id: i64) -> AppResult<bool> {
        intervals::has_open(&pool.conn, session_id)
    }

    pub fn get_session(pool: &DbPool, session_id: i64) -> AppResult<TaskSession> {
        sessions::get_by_id(&pool.conn, session_id)
    }

    pub fn start(
        pool: &mut DbPool,
        request: &StartRequest,
        now: DateTime<Utc>,
    ) -> AppResult<StartedSession> {
        let description = request.description.trim();
        if description.is_empty() {
            return Err(AppError::InvalidInput(
                "task description cannot be empty".into(),
            ));
        }

        let now = truncate_secs(now);
        let tx = pool.transaction()?;

        if sessions::get_open(&tx)?.is_some() {
            return Err(AppError::AlreadyActive);
        }

        let task = tasks::insert_task(&tx, description, now)?;
        let session = sessions::insert_session(&tx, task.id, now)?;
        let interval = intervals::insert_open(&tx, session.id, now)?;

        annotations::insert_all(&tx, Annotation::Tag, session.id, &request.tags, now)?;
        annotations::insert_all(&tx, Annotation::Kpi, session.id, &request.kpis, now)?;

        ttlog_lenient(
            &tx,
            "start",
            &format!("session #{}", session.id),
            &format!("Started task '{}'", task.description),
        );

        tx.commit().storage_context("committing session start")?;

        Ok(StartedSession {
            task,
            session,
            interval,
        })
    }

    /// Create a task and an open session without a running interval, on the
    /// caller's transaction. Used when commits are synced into a brand new session.
    pub fn open_paused(
        conn: &Connection,
        description: &str,
        now: DateTime<Utc>,
    ) -> AppResult<(Task, TaskSession)> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::InvalidInput(
                "task description cannot be empty".into(),
            ));
        }

        let now = truncate_secs(now);

        if sessions::get_open(conn)?.is_some() {
            return Err(AppError::AlreadyActive);
        }

        let task = tasks::insert_task(conn, description, now)?;
        let session = sessions::insert_session(conn, task.id, now)?;

        ttlog_lenient(
            conn,
            "start",
            &format!("session #{}", session.id),
            &format!("Created paused session for '{}'", task.description),
        );

        Ok((task, session))
    }

    pub fn pause(pool: &mut DbPool, now: DateTime<Utc>) -> AppResult<PauseOutcome> {
        let now = truncate_secs(now);
        let tx = pool.transaction()?;

        let session = sessions::get_open(&tx)?.ok_or(AppError::NoActiveSession)?;

        let Some(closed) = intervals::close_open(&tx, session.id, now)? else {
            return Ok(PauseOutcome::AlreadyPaused);
        };

        ttlog_lenient(
            &tx,
            "pause",
            &format!("session #{}", session.id),
            &format!("Closed interval #{}", closed.id),
        );

        tx.commit().storage_context("committing pause")?;
        Ok(PauseOutcome::Paused(closed))
    }

    pub fn resume(pool: &mut DbPool, now: DateTime<Utc>) -> AppResult<ResumeOutcome> {
        let now = truncate_secs(now);
        let tx = pool.transaction()?;

        let session = sessions::get_open(&tx)?.ok_or(AppError::NoActiveSession)?;

        if intervals::has_open(&tx, session.id)? {
            return Ok(ResumeOutcome::AlreadyRunning);
        }

        // a new interval never starts inside the previous one
        let start = match intervals::last_end(&tx, session.id)? {
            Some(last) => now.max(last),
            None => now.max(session.started_at),
        };

        let opened = intervals::insert_open(&tx, session.id, start)?;

        ttlog_lenient(
            &tx,
            "resume",
            &format!("session #{}", session.id),
            &format!("Opened interval #{}", opened.id),
        );

        tx.commit().storage_context("committing resume")?;
        Ok(ResumeOutcome::Resumed(opened))
    }

    /// Stop the open session.
    pub fn stop(pool: &mut DbPool, now: DateTime<Utc>) -> AppResult<StopOutcome> {
        let session = sessions::get_open(&pool.conn)?.ok_or(AppError::NoActiveSession)?;
        Self::stop_session(pool, session.id, now)
    }

    /// Stop a session by id. Stopping an already closed session is a no-op.
    pub fn stop_session(
        pool: &mut DbPool,
        session_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<StopOutcome> {
        let now = truncate_secs(now);
        let tx = pool.transaction()?;

        let session = sessions::get_by_id(&tx, session_id)?;
        if !session.is_open() {
            return Ok(StopOutcome::AlreadyStopped);
        }

        intervals::close_open(&tx, session.id, now)?;

        // ended_at never precedes the start or the last interval end
        let ended_at = match intervals::last_end(&tx, session.id)? {
            Some(last) => now.max(last),
            None => now.max(session.started_at),
        };

        let Some(stopped) = sessions::close(&tx, session.id, ended_at)? else {
            return Ok(StopOutcome::AlreadyStopped);
        };

        ttlog_lenient(
            &tx,
            "stop",
            &format!("session #{}", stopped.id),
            "Session stopped",
        );

        tx.commit().storage_context("committing stop")?;

        let durations = DurationReconciler::durations(pool, stopped.id)?;
        Ok(StopOutcome::Stopped {
            session: stopped,
            durations,
        })
    }

    /// State of the open session, with active time counted up to `now`.
    pub fn status(pool: &DbPool, now: DateTime<Utc>) -> AppResult<Option<SessionState>> {
        let Some(session) = sessions::get_open(&pool.conn)? else {
            return Ok(None);
        };

        let task = tasks::get_task(&pool.conn, session.task_id)?;
        let intervals = intervals::list_for_session(&pool.conn, session.id)?;
        let status = SessionStatus::derive(&session, intervals.iter().any(|i| i.is_open()));
        let active = intervals
            .iter()
            .fold(TimeDelta::zero(), |acc, i| acc + i.duration_until(now));

        Ok(Some(SessionState {
            task,
            session,
            status,
            intervals,
            active,
        }))
    }
}
