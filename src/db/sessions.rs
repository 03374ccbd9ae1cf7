use crate::errors::{AppError, AppResult};
use crate::models::session::{DetailedSession, TaskSession};
use crate::models::task::Task;
use crate::utils::time::{from_db, to_db};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

/// Raw row, timestamps still as text.
type SessionRow = (i64, i64, String, Option<String>);

fn read_row(row: &Row) -> rusqlite::Result<SessionRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn into_session((id, task_id, started_at, ended_at): SessionRow) -> AppResult<TaskSession> {
    Ok(TaskSession {
        id,
        task_id,
        started_at: from_db(&started_at)?,
        ended_at: ended_at.as_deref().map(from_db).transpose()?,
    })
}

pub fn insert_session(
    conn: &Connection,
    task_id: i64,
    now: DateTime<Utc>,
) -> AppResult<TaskSession> {
    let row = conn
        .query_row(
            "INSERT INTO task_sessions (task_id, started_at)
             VALUES (?1, ?2)
             RETURNING id, task_id, started_at, ended_at",
            params![task_id, to_db(now)],
            read_row,
        )
        .map_err(|e| {
            // the partial unique index rejects a second open session
            if crate::errors::is_constraint_violation(&e) {
                AppError::AlreadyActive
            } else {
                AppError::from(e)
            }
        })?;

    into_session(row)
}

/// The single open session, if any.
pub fn get_open(conn: &Connection) -> AppResult<Option<TaskSession>> {
    let row = conn
        .query_row(
            "SELECT id, task_id, started_at, ended_at
             FROM task_sessions
             WHERE ended_at IS NULL
             ORDER BY id DESC
             LIMIT 1",
            [],
            read_row,
        )
        .optional()?;

    row.map(into_session).transpose()
}

pub fn get_by_id(conn: &Connection, id: i64) -> AppResult<TaskSession> {
    let row = conn
        .query_row(
            "SELECT id, task_id, started_at, ended_at FROM task_sessions WHERE id = ?1",
            [id],
            read_row,
        )
        .optional()?;

    row.map(into_session)
        .transpose()?
        .ok_or(AppError::RecordNotFound(id))
}

/// Close the session if still open. `None` means it was already closed.
pub fn close(conn: &Connection, id: i64, now: DateTime<Utc>) -> AppResult<Option<TaskSession>> {
    let row = conn
        .query_row(
            "UPDATE task_sessions
             SET ended_at = ?2
             WHERE id = ?1 AND ended_at IS NULL
             RETURNING id, task_id, started_at, ended_at",
            params![id, to_db(now)],
            read_row,
        )
        .optional()?;

    row.map(into_session).transpose()
}

/// All sessions with their task, newest first.
pub fn list_with_task(conn: &Connection) -> AppResult<Vec<DetailedSession>> {
    let mut stmt = conn.prepare(
        "SELECT ts.id, ts.task_id, ts.started_at, ts.ended_at,
                t.description, t.created_at
         FROM task_sessions ts
         JOIN tasks t ON ts.task_id = t.id
         ORDER BY ts.started_at DESC, ts.id DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((read_row(row)?, row.get::<_, String>(4)?, row.get::<_, String>(5)?))
    })?;

    let mut out = Vec::new();
    for r in rows {
        let (raw, description, created_at) = r?;
        let session = into_session(raw)?;
        out.push(DetailedSession {
            task: Task {
                id: session.task_id,
                description,
                created_at: from_db(&created_at)?,
            },
            session,
        });
    }
    Ok(out)
}

/// Start and end of a session as stored; used by the duration reconciler.
pub fn bounds(
    conn: &Connection,
    id: i64,
) -> AppResult<(DateTime<Utc>, Option<DateTime<Utc>>)> {
    let session = get_by_id(conn, id)?;
    Ok((session.started_at, session.ended_at))
}
