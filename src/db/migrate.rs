use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension};

/// Ensure that the `log` table exists; it also records applied migrations.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

/// Ordered list of schema migrations: (version, description, sql).
const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "20250601_0001_create_core_tables",
        "Created tasks, sessions, intervals and commits tables",
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            description TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS task_sessions (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            task_id    INTEGER NOT NULL REFERENCES tasks(id),
            started_at TEXT NOT NULL,
            ended_at   TEXT,
            CHECK (ended_at IS NULL OR ended_at >= started_at)
        );

        CREATE TABLE IF NOT EXISTS task_session_intervals (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id INTEGER NOT NULL REFERENCES task_sessions(id) ON DELETE CASCADE,
            start_time TEXT NOT NULL,
            end_time   TEXT,
            CHECK (end_time IS NULL OR end_time >= start_time)
        );

        CREATE TABLE IF NOT EXISTS commits (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id INTEGER REFERENCES task_sessions(id) ON DELETE SET NULL,
            hash       TEXT NOT NULL UNIQUE,
            message    TEXT NOT NULL,
            author     TEXT NOT NULL,
            date       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_intervals_session ON task_session_intervals(session_id, start_time);
        CREATE INDEX IF NOT EXISTS idx_intervals_range ON task_session_intervals(start_time, end_time);
        CREATE INDEX IF NOT EXISTS idx_commits_session ON commits(session_id);
        "#,
    ),
    (
        "20250610_0002_create_session_annotations",
        "Created session_tags and session_kpis tables",
        r#"
        CREATE TABLE IF NOT EXISTS session_tags (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id INTEGER NOT NULL REFERENCES task_sessions(id) ON DELETE CASCADE,
            tag        TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS session_kpis (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id INTEGER NOT NULL REFERENCES task_sessions(id) ON DELETE CASCADE,
            kpi        TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "20250702_0003_single_open_constraints",
        "Added unique indexes for one open session and one open interval per session",
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_task_sessions_single_open
            ON task_sessions((ended_at IS NULL)) WHERE ended_at IS NULL;

        CREATE UNIQUE INDEX IF NOT EXISTS idx_intervals_single_open
            ON task_session_intervals(session_id) WHERE end_time IS NULL;
        "#,
    ),
];

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, version: &str, description: &str, sql: &str) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", version, e)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, description],
    )?;

    tx.commit()?;

    success(format!("Migration applied: {} → {}", version, description));
    Ok(())
}

/// Public entry point: run all pending migrations, in order.
///
/// Called by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for (version, description, sql) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }
        apply(conn, version, description, sql)?;
        applied += 1;
    }

    Ok(applied)
}

/// Versions recorded as applied, oldest first.
pub fn applied_versions(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
