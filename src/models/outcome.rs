//! Results of the session state machine transitions.
//!
//! The `Already*` variants are idempotent no-ops, not failures: callers print
//! a friendly message and exit successfully.

use super::interval::SessionInterval;
use super::session::TaskSession;
use super::task::Task;
use chrono::TimeDelta;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct StartedSession {
    pub task: Task,
    pub session: TaskSession,
    pub interval: SessionInterval,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PauseOutcome {
    Paused(SessionInterval),
    AlreadyPaused,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeOutcome {
    Resumed(SessionInterval),
    AlreadyRunning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped {
        session: TaskSession,
        durations: SessionDurations,
    },
    AlreadyStopped,
}

/// Time accounting of a closed session. `active + paused == total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionDurations {
    #[serde(with = "seconds")]
    pub active: TimeDelta,
    #[serde(with = "seconds")]
    pub paused: TimeDelta,
    #[serde(with = "seconds")]
    pub total: TimeDelta,
}

mod seconds {
    use chrono::TimeDelta;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(d: &TimeDelta, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(d.num_seconds())
    }
}
