use crate::errors::AppResult;
use crate::models::commit::{Commit, GitCommit};
use rusqlite::{Connection, params};
use std::collections::HashSet;

/// Every stored hash, in one pass.
pub fn all_hashes(conn: &Connection) -> AppResult<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT hash FROM commits")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = HashSet::new();
    for r in rows {
        out.insert(r?);
    }
    Ok(out)
}

/// Insert, ignoring a duplicate hash. Returns `true` when a row was written.
pub fn insert_or_ignore(
    conn: &Connection,
    commit: &GitCommit,
    session_id: Option<i64>,
) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached(
        "INSERT OR IGNORE INTO commits (hash, session_id, message, author, date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    let changed = stmt.execute(params![
        commit.hash,
        session_id,
        commit.message,
        commit.author,
        commit.date
    ])?;
    Ok(changed > 0)
}

pub fn list_for_session(conn: &Connection, session_id: i64) -> AppResult<Vec<Commit>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, session_id, hash, message, author, date
         FROM commits
         WHERE session_id = ?1
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([session_id], |row| {
        Ok(Commit {
            id: row.get(0)?,
            session_id: row.get(1)?,
            hash: row.get(2)?,
            message: row.get(3)?,
            author: row.get(4)?,
            date: row.get(5)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_unassociated(conn: &Connection) -> AppResult<i64> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM commits WHERE session_id IS NULL",
        [],
        |row| row.get(0),
    )?;
    Ok(n)
}
