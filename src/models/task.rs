use chrono::{DateTime, Utc};
use serde::Serialize;

/// Unit of work description; created once per session start, never edited.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Task {
    pub id: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
