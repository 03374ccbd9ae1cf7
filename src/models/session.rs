use super::task::Task;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TaskSession {
    pub id: i64,
    pub task_id: i64,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>, // None => open
}

impl TaskSession {
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

/// A session joined with its task.
#[derive(Debug, Clone, Serialize)]
pub struct DetailedSession {
    pub session: TaskSession,
    pub task: Task,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Ended,
    InProgress,
    Paused,
}

impl SessionStatus {
    pub fn derive(session: &TaskSession, has_open_interval: bool) -> Self {
        if !session.is_open() {
            SessionStatus::Ended
        } else if has_open_interval {
            SessionStatus::InProgress
        } else {
            SessionStatus::Paused
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Ended => "ended",
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Paused => "paused",
        }
    }
}
