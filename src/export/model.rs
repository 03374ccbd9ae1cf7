use crate::models::report::{Breakdown, SessionRow, SummaryStats};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything an export file contains.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub generated_at: DateTime<Utc>,
    pub summary: SummaryStats,
    pub breakdown: Breakdown,
    pub sessions: Vec<SessionRow>,
}
