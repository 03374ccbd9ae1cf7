// src/export/logic.rs

use crate::core::report::ReportLogic;
use crate::core::stats::StatsAggregator;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::ExportReport;
use crate::ui::messages::warning;
use chrono::{DateTime, Local, Utc};
use std::path::Path;

/// High level export logic.
pub struct ExportLogic;

impl ExportLogic {
    /// Gather summary, breakdowns and the session list as of `now`.
    pub fn build_report(pool: &DbPool, now: DateTime<Local>) -> AppResult<ExportReport> {
        let utc_now = now.with_timezone(&Utc);
        Ok(ExportReport {
            generated_at: utc_now,
            summary: StatsAggregator::summary(pool, now)?,
            breakdown: StatsAggregator::breakdown(pool, now)?,
            sessions: ReportLogic::session_rows(pool, utc_now)?,
        })
    }

    /// Export the report.
    ///
    /// - `format`: csv | json
    /// - `file`: absolute path of the output file
    pub fn export(
        pool: &DbPool,
        format: ExportFormat,
        file: &str,
        force: bool,
        now: DateTime<Local>,
    ) -> AppResult<ExportReport> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let report = Self::build_report(pool, now)?;

        if report.sessions.is_empty() {
            warning("No sessions recorded yet; exporting empty sections.");
        }

        match format {
            ExportFormat::Csv => export_csv(&report, path)?,
            ExportFormat::Json => export_json(&report, path)?,
        }

        Ok(report)
    }
}
