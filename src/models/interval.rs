use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

/// A contiguous stretch of active work inside a session.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SessionInterval {
    pub id: i64,
    pub session_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>, // None => running
}

impl SessionInterval {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Length of the interval; a running interval is measured up to `now`.
    pub fn duration_until(&self, now: DateTime<Utc>) -> TimeDelta {
        let end = self.end_time.unwrap_or(now);
        (end - self.start_time).max(TimeDelta::zero())
    }
}
