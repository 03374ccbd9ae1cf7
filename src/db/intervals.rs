use crate::errors::AppResult;
use crate::models::interval::SessionInterval;
use crate::utils::time::{from_db, to_db};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

type IntervalRow = (i64, i64, String, Option<String>);

fn read_row(row: &Row) -> rusqlite::Result<IntervalRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn into_interval((id, session_id, start, end): IntervalRow) -> AppResult<SessionInterval> {
    Ok(SessionInterval {
        id,
        session_id,
        start_time: from_db(&start)?,
        end_time: end.as_deref().map(from_db).transpose()?,
    })
}

fn collect(rows: impl Iterator<Item = rusqlite::Result<IntervalRow>>) -> AppResult<Vec<SessionInterval>> {
    let mut out = Vec::new();
    for r in rows {
        out.push(into_interval(r?)?);
    }
    Ok(out)
}

/// Open a new running interval.
pub fn insert_open(
    conn: &Connection,
    session_id: i64,
    start: DateTime<Utc>,
) -> AppResult<SessionInterval> {
    let row = conn.query_row(
        "INSERT INTO task_session_intervals (session_id, start_time)
         VALUES (?1, ?2)
         RETURNING id, session_id, start_time, end_time",
        params![session_id, to_db(start)],
        read_row,
    )?;
    into_interval(row)
}

/// Close the running interval of a session. `None` when nothing was running.
/// The end never precedes the start.
pub fn close_open(
    conn: &Connection,
    session_id: i64,
    now: DateTime<Utc>,
) -> AppResult<Option<SessionInterval>> {
    let row = conn
        .query_row(
            "UPDATE task_session_intervals
             SET end_time = MAX(?2, start_time)
             WHERE session_id = ?1 AND end_time IS NULL
             RETURNING id, session_id, start_time, end_time",
            params![session_id, to_db(now)],
            read_row,
        )
        .optional()?;

    row.map(into_interval).transpose()
}

pub fn has_open(conn: &Connection, session_id: i64) -> AppResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM task_session_intervals
         WHERE session_id = ?1 AND end_time IS NULL",
        [session_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Latest end time among the closed intervals of a session.
pub fn last_end(conn: &Connection, session_id: i64) -> AppResult<Option<DateTime<Utc>>> {
    let raw: Option<String> = conn.query_row(
        "SELECT MAX(end_time) FROM task_session_intervals WHERE session_id = ?1",
        [session_id],
        |row| row.get(0),
    )?;
    raw.as_deref().map(from_db).transpose()
}

pub fn list_for_session(conn: &Connection, session_id: i64) -> AppResult<Vec<SessionInterval>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, session_id, start_time, end_time
         FROM task_session_intervals
         WHERE session_id = ?1
         ORDER BY start_time ASC, id ASC",
    )?;
    let rows = stmt.query_map([session_id], read_row)?;
    collect(rows)
}

pub fn list_all(conn: &Connection) -> AppResult<Vec<SessionInterval>> {
    let mut stmt = conn.prepare(
        "SELECT id, session_id, start_time, end_time
         FROM task_session_intervals
         ORDER BY session_id ASC, start_time ASC",
    )?;
    let rows = stmt.query_map([], read_row)?;
    collect(rows)
}

/// Intervals touching `[from, to)`; running intervals always qualify when they started before `to`.
pub fn list_overlapping(
    conn: &Connection,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> AppResult<Vec<SessionInterval>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, session_id, start_time, end_time
         FROM task_session_intervals
         WHERE start_time < ?2 AND (end_time IS NULL OR end_time > ?1)
         ORDER BY start_time ASC",
    )?;
    let rows = stmt.query_map(params![to_db(from), to_db(to)], read_row)?;
    collect(rows)
}

/// Sum of closed interval lengths, in seconds.
pub fn active_seconds(conn: &Connection, session_id: i64) -> AppResult<i64> {
    let secs: i64 = conn.query_row(
        "SELECT COALESCE(SUM(strftime('%s', end_time) - strftime('%s', start_time)), 0)
         FROM task_session_intervals
         WHERE session_id = ?1 AND end_time IS NOT NULL",
        [session_id],
        |row| row.get(0),
    )?;
    Ok(secs)
}
