//! Attach git commits to task sessions.
//!
//! The engine compares the commit history against the stored hashes and
//! inserts only the unseen commits. When a session is open, every sync funnels
//! its commits into that session, whatever association was requested.

use crate::core::session::SessionLogic;
use crate::db::log::ttlog_lenient;
use crate::db::pool::DbPool;
use crate::db::{commits, sessions};
use crate::errors::{AppResult, StorageContext};
use crate::git::CommitSource;
use crate::models::commit::GitCommit;
use crate::ui::messages::warning;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Transaction};

/// Association requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncTarget {
    Existing(i64),
    NewSession(String),
    Unassociated,
}

/// Association actually used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Association {
    ActiveSession(i64),
    Existing(i64),
    NewSession(i64),
    Unassociated,
}

impl Association {
    pub fn session_id(&self) -> Option<i64> {
        match self {
            Association::ActiveSession(id)
            | Association::Existing(id)
            | Association::NewSession(id) => Some(*id),
            Association::Unassociated => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitFailure {
    pub hash: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct SyncReport {
    pub association: Association,
    pub inserted: usize,
    pub failures: Vec<CommitFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub inserted: bool,
    pub session_id: Option<i64>,
}

pub struct CommitSyncEngine;

impl CommitSyncEngine {
    pub fn sync(
        pool: &mut DbPool,
        source: &dyn CommitSource,
        target: SyncTarget,
        now: DateTime<Utc>,
    ) -> AppResult<SyncReport> {
        let known = commits::all_hashes(&pool.conn)?;
        let history = source.fetch()?;

        let fresh: Vec<GitCommit> = history
            .into_iter()
            .filter(|c| !known.contains(&c.hash))
            .collect();

        // the association and the inserts commit or roll back together
        let mut tx = pool.transaction()?;
        let association = Self::resolve(&tx, target, now)?;
        let (inserted, failures) = Self::insert_batch(&mut tx, &fresh, association.session_id())?;
        tx.commit().storage_context("committing synced commits")?;

        Ok(SyncReport {
            association,
            inserted,
            failures,
        })
    }

    /// Decide where new commits go. An open session always wins.
    pub fn resolve(
        conn: &Connection,
        target: SyncTarget,
        now: DateTime<Utc>,
    ) -> AppResult<Association> {
        if let Some(open) = sessions::get_open(conn)? {
            return Ok(Association::ActiveSession(open.id));
        }

        match target {
            SyncTarget::Existing(id) => {
                let session = sessions::get_by_id(conn, id)?;
                Ok(Association::Existing(session.id))
            }
            SyncTarget::NewSession(description) => {
                let (_, session) = SessionLogic::open_paused(conn, &description, now)?;
                Ok(Association::NewSession(session.id))
            }
            SyncTarget::Unassociated => Ok(Association::Unassociated),
        }
    }

    /// Insert every commit on `tx`, each row in its own savepoint:
    /// a failing row is rolled back, reported and skipped.
    fn insert_batch(
        tx: &mut Transaction<'_>,
        batch: &[GitCommit],
        session_id: Option<i64>,
    ) -> AppResult<(usize, Vec<CommitFailure>)> {
        let mut inserted = 0;
        let mut failures = Vec::new();

        for commit in batch {
            let sp = tx.savepoint().storage_context("opening a savepoint")?;

            match commits::insert_or_ignore(&sp, commit, session_id) {
                Ok(written) => {
                    sp.commit().storage_context("releasing a savepoint")?;
                    if written {
                        inserted += 1;
                    }
                }
                Err(e) => {
                    // dropping the savepoint rolls the row back
                    drop(sp);
                    warning(format!("Failed to insert commit {}: {}", commit.hash, e));
                    failures.push(CommitFailure {
                        hash: commit.hash.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        for f in &failures {
            ttlog_lenient(tx, "sync_skip", &f.hash, &f.reason);
        }

        let target = match session_id {
            Some(id) => format!("session #{}", id),
            None => "unassociated".to_string(),
        };
        ttlog_lenient(
            tx,
            "sync",
            &target,
            &format!("{} new commits, {} failed", inserted, failures.len()),
        );

        Ok((inserted, failures))
    }

    /// Store one commit (post-commit hook). It joins the open session, if any.
    pub fn record(pool: &mut DbPool, commit: &GitCommit) -> AppResult<RecordOutcome> {
        let tx = pool.transaction()?;

        let session_id = sessions::get_open(&tx)?.map(|s| s.id);
        let inserted = commits::insert_or_ignore(&tx, commit, session_id)?;

        if inserted {
            ttlog_lenient(&tx, "record_commit", &commit.hash, &commit.message);
        }

        tx.commit().storage_context("committing recorded commit")?;
        Ok(RecordOutcome {
            inserted,
            session_id,
        })
    }
}
