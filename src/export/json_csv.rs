// src/export/json_csv.rs

use crate::errors::AppResult;
use crate::export::{ExportReport, notify_export_success};
use crate::models::report::PeriodStat;
use crate::ui::messages::info;
use crate::utils::time::{format_hm, to_db};
use csv::{Writer, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export JSON pretty-printed.
pub(crate) fn export_json(report: &ExportReport, path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));

    let json_data = serde_json::to_string_pretty(report)?;

    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;

    notify_export_success("JSON", path);
    Ok(())
}

/// Export CSV: one section per block, separated by an empty record.
/// The first column always names the section.
pub(crate) fn export_csv(report: &ExportReport, path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    // sections have different widths
    let mut wtr = WriterBuilder::new().flexible(true).from_path(path)?;

    let s = &report.summary;
    wtr.write_record(["Section", "Metric", "Value", "Change"])?;
    for (label, m) in [
        ("Today's Hours", s.today_hours),
        ("Week Hours", s.week_hours),
        ("Sessions Today", s.sessions_today),
        ("Productivity Score", s.productivity_score),
    ] {
        wtr.write_record([
            "Summary".to_string(),
            label.to_string(),
            m.value.to_string(),
            m.change.to_string(),
        ])?;
    }

    write_periods(&mut wtr, "Daily", "Date", &report.breakdown.daily, "%Y-%m-%d")?;
    write_periods(&mut wtr, "Weekly", "Week Start", &report.breakdown.weekly, "%Y-%m-%d")?;
    write_periods(&mut wtr, "Monthly", "Month", &report.breakdown.monthly, "%Y-%m")?;

    wtr.write_record([""])?;
    wtr.write_record([
        "Section",
        "ID",
        "Task",
        "Start Time",
        "End Time",
        "Duration",
        "Status",
    ])?;
    for r in &report.sessions {
        wtr.write_record([
            "Session".to_string(),
            r.id.to_string(),
            r.task.clone(),
            to_db(r.start_time),
            r.end_time.map(to_db).unwrap_or_default(),
            format_hm(r.active_seconds),
            r.status.as_str().to_string(),
        ])?;
    }

    wtr.flush()?;
    notify_export_success("CSV", path);
    Ok(())
}

fn write_periods<W: Write>(
    wtr: &mut Writer<W>,
    section: &str,
    label: &str,
    stats: &[PeriodStat],
    date_fmt: &str,
) -> AppResult<()> {
    wtr.write_record([""])?;
    wtr.write_record(["Section", label, "Hours", "Sessions"])?;
    for p in stats {
        wtr.write_record([
            section.to_string(),
            p.start.format(date_fmt).to_string(),
            format!("{:.2}", p.hours),
            p.sessions.to_string(),
        ])?;
    }
    Ok(())
}
