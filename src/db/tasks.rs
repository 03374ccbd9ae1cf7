use crate::errors::{AppError, AppResult};
use crate::models::task::Task;
use crate::utils::time::{from_db, to_db};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

pub fn insert_task(conn: &Connection, description: &str, now: DateTime<Utc>) -> AppResult<Task> {
    let (id, created_at): (i64, String) = conn.query_row(
        "INSERT INTO tasks (description, created_at)
         VALUES (?1, ?2)
         RETURNING id, created_at",
        params![description, to_db(now)],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    Ok(Task {
        id,
        description: description.to_string(),
        created_at: from_db(&created_at)?,
    })
}

pub fn get_task(conn: &Connection, id: i64) -> AppResult<Task> {
    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT description, created_at FROM tasks WHERE id = ?1",
            [id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let (description, created_at) = row.ok_or(AppError::RecordNotFound(id))?;
    Ok(Task {
        id,
        description,
        created_at: from_db(&created_at)?,
    })
}
