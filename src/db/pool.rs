//! SQLite connection wrapper (lightweight for CLI usage).
//!
//! Besides the main read/write connection, the pool can fan read-only work
//! out to short-lived connections on scoped threads.

use crate::errors::{AppError, AppResult, StorageContext};
use rusqlite::{Connection, OpenFlags, Transaction, TransactionBehavior};
use std::path::Path;
use std::thread;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 3;

/// A boxed read job for [`DbPool::read_all`].
pub type ReadJob<'a, T> = Box<dyn FnOnce(&Connection) -> AppResult<T> + Send + 'a>;

pub struct DbPool {
    pub conn: Connection,
    path: String,
    timeout: Duration,
}

impl DbPool {
    pub fn new(path: &str) -> AppResult<Self> {
        Self::with_timeout(path, DEFAULT_TIMEOUT_SECS)
    }

    /// Open `path`; every lock wait (and so every transaction) is bounded by `timeout_secs`.
    pub fn with_timeout(path: &str, timeout_secs: u64) -> AppResult<Self> {
        let timeout = Duration::from_secs(timeout_secs.max(1));
        let conn = Connection::open(Path::new(path)).storage_context("opening the database")?;
        conn.busy_timeout(timeout)
            .storage_context("setting the busy timeout")?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .storage_context("enabling foreign keys")?;

        Ok(Self {
            conn,
            path: path.to_string(),
            timeout,
        })
    }

    /// Begin an IMMEDIATE transaction: the write lock is taken up front, so
    /// check-then-act sequences inside it cannot interleave with another writer.
    /// Dropping the transaction without `commit()` rolls everything back.
    pub fn transaction(&mut self) -> AppResult<Transaction<'_>> {
        self.conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .storage_context("beginning a transaction")
    }

    fn is_file_backed(&self) -> bool {
        !(self.path.is_empty() || self.path == ":memory:" || self.path.starts_with("file::memory:"))
    }

    fn open_reader(path: &str, timeout: Duration) -> AppResult<Connection> {
        let conn = Connection::open_with_flags(
            Path::new(path),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .storage_context("opening a read connection")?;
        conn.busy_timeout(timeout)
            .storage_context("setting the busy timeout")?;
        Ok(conn)
    }

    /// Run two independent reads concurrently and join them.
    /// Both must succeed; otherwise the first error (in argument order) is returned.
    pub fn read_pair<A, B, FA, FB>(&self, fa: FA, fb: FB) -> AppResult<(A, B)>
    where
        A: Send,
        B: Send,
        FA: FnOnce(&Connection) -> AppResult<A> + Send,
        FB: FnOnce(&Connection) -> AppResult<B> + Send,
    {
        if !self.is_file_backed() {
            let a = fa(&self.conn);
            let b = fb(&self.conn);
            return Ok((a?, b?));
        }

        let path = self.path.as_str();
        let timeout = self.timeout;

        thread::scope(|s| -> AppResult<(A, B)> {
            let ha = s.spawn(move || Self::open_reader(path, timeout).and_then(|c| fa(&c)));
            let hb = s.spawn(move || Self::open_reader(path, timeout).and_then(|c| fb(&c)));

            let a = ha.join().map_err(|_| reader_panicked());
            let b = hb.join().map_err(|_| reader_panicked());
            Ok((a??, b??))
        })
    }

    /// Run a fixed set of independent reads concurrently; results keep the job order.
    pub fn read_all<'a, T: Send>(&self, jobs: Vec<ReadJob<'a, T>>) -> AppResult<Vec<T>> {
        if !self.is_file_backed() {
            let results: Vec<AppResult<T>> = jobs.into_iter().map(|job| job(&self.conn)).collect();
            return results.into_iter().collect();
        }

        let path = self.path.as_str();
        let timeout = self.timeout;

        thread::scope(|s| -> AppResult<Vec<T>> {
            let handles: Vec<_> = jobs
                .into_iter()
                .map(|job| s.spawn(move || Self::open_reader(path, timeout).and_then(|c| job(&c))))
                .collect();

            // join everything before looking at the results
            let joined: Vec<AppResult<T>> = handles
                .into_iter()
                .map(|h| h.join().map_err(|_| reader_panicked()).and_then(|r| r))
                .collect();

            joined.into_iter().collect()
        })
    }
}

fn reader_panicked() -> AppError {
    AppError::Other("a database reader thread panicked".into())
}
