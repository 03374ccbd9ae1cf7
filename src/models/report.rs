//! Report models produced by the stats aggregator and the session log.

use super::session::SessionStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricStat {
    pub value: f64,
    pub change: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SummaryStats {
    pub today_hours: MetricStat,
    pub week_hours: MetricStat,
    pub sessions_today: MetricStat,
    pub productivity_score: MetricStat,
}

/// One bucket of a daily / weekly / monthly breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodStat {
    pub start: NaiveDate,
    pub hours: f64,
    pub sessions: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Breakdown {
    pub daily: Vec<PeriodStat>,
    pub weekly: Vec<PeriodStat>,
    pub monthly: Vec<PeriodStat>,
}

/// Row of the session list.
#[derive(Debug, Clone, Serialize)]
pub struct SessionRow {
    pub id: i64,
    pub task: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub active_seconds: i64,
    pub status: SessionStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogCommit {
    pub hash: String,
    pub message: String,
    pub author: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogSession {
    pub id: i64,
    pub task: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub durations: Option<super::outcome::SessionDurations>,
    pub tags: Vec<String>,
    pub kpis: Vec<String>,
    pub commits: Vec<LogCommit>,
}

/// Sessions started on the same local day.
#[derive(Debug, Clone, Serialize)]
pub struct DayLog {
    pub date: NaiveDate,
    pub sessions: Vec<LogSession>,
}
