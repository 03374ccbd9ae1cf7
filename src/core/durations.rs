//! Active / paused / total time of a closed session.

use crate::db::pool::DbPool;
use crate::db::{intervals, sessions};
use crate::errors::{AppError, AppResult};
use crate::models::outcome::SessionDurations;
use chrono::TimeDelta;

pub struct DurationReconciler;

impl DurationReconciler {
    /// The session bounds and the interval sum are read concurrently and
    /// combined only once both reads succeeded.
    pub fn durations(pool: &DbPool, session_id: i64) -> AppResult<SessionDurations> {
        let ((started_at, ended_at), active_secs) = pool.read_pair(
            move |conn| sessions::bounds(conn, session_id),
            move |conn| intervals::active_seconds(conn, session_id),
        )?;

        let ended_at = ended_at.ok_or(AppError::SessionStillActive(session_id))?;

        Ok(Self::reconcile(ended_at - started_at, active_secs))
    }

    /// `paused = total - active`, never negative.
    pub fn reconcile(total: TimeDelta, active_secs: i64) -> SessionDurations {
        let active = TimeDelta::seconds(active_secs.max(0));
        let paused = (total - active).max(TimeDelta::zero());

        SessionDurations {
            active,
            paused,
            total,
        }
    }
}
