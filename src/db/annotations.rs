//! Tags and KPIs attached to a session at start time.

use crate::errors::AppResult;
use crate::utils::time::to_db;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};

#[derive(Debug, Clone, Copy)]
pub enum Annotation {
    Tag,
    Kpi,
}

impl Annotation {
    fn table(&self) -> &'static str {
        match self {
            Annotation::Tag => "session_tags",
            Annotation::Kpi => "session_kpis",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            Annotation::Tag => "tag",
            Annotation::Kpi => "kpi",
        }
    }
}

pub fn insert_all(
    conn: &Connection,
    kind: Annotation,
    session_id: i64,
    labels: &[String],
    now: DateTime<Utc>,
) -> AppResult<()> {
    let sql = format!(
        "INSERT INTO {} (session_id, {}, created_at) VALUES (?1, ?2, ?3)",
        kind.table(),
        kind.column()
    );
    let mut stmt = conn.prepare(&sql)?;
    let created_at = to_db(now);

    for label in labels {
        stmt.execute(params![session_id, label, created_at])?;
    }
    Ok(())
}

pub fn list(conn: &Connection, kind: Annotation, session_id: i64) -> AppResult<Vec<String>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE session_id = ?1 ORDER BY id ASC",
        kind.column(),
        kind.table()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([session_id], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
