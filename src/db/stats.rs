//! Aggregate queries used by the stats aggregator.

use crate::errors::AppResult;
use crate::utils::time::to_db;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};

/// Sessions alive at some point in `[from, to)`; an open session counts as alive until `now`.
pub fn count_sessions_overlapping(
    conn: &Connection,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    now: DateTime<Utc>,
) -> AppResult<i64> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*)
         FROM task_sessions
         WHERE started_at < ?2
           AND COALESCE(ended_at, ?3) >= ?1",
        params![to_db(from), to_db(to), to_db(now)],
        |row| row.get(0),
    )?;
    Ok(n)
}
