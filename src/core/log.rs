use crate::core::durations::DurationReconciler;
use crate::db::annotations::{self, Annotation};
use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::db::{commits, intervals, sessions};
use crate::errors::AppResult;
use crate::models::report::{DayLog, LogCommit, LogSession};
use crate::utils::time::{format_duration, format_local};
use ansi_term::Colour;
use chrono::{Local, NaiveDate};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static ANSI: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok());

fn strip_ansi(s: &str) -> String {
    match ANSI.as_ref() {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

/// ANSI colour for an audit operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "start" | "resume" => Colour::Green,
        "stop" => Colour::Red,
        "pause" => Colour::Yellow,
        "sync" | "record_commit" => Colour::Cyan,
        "sync_skip" => Colour::RGB(255, 153, 51),
        "migration_applied" => Colour::Purple,
        "init" | "setup_hook" => Colour::Blue,
        _ => Colour::White,
    }
}

const OP_WIDTH_MAX: usize = 60;

pub struct LogLogic;

impl LogLogic {
    /// Sessions grouped by the local day they started on; newest day first,
    /// sessions in start order inside a day.
    pub fn session_log(pool: &DbPool) -> AppResult<Vec<DayLog>> {
        let mut days: BTreeMap<NaiveDate, Vec<LogSession>> = BTreeMap::new();

        // newest first from the DB, so iterate in reverse to get start order
        for detailed in sessions::list_with_task(&pool.conn)?.into_iter().rev() {
            let s = &detailed.session;

            let durations = match s.ended_at {
                Some(ended_at) => {
                    let active = intervals::active_seconds(&pool.conn, s.id)?;
                    Some(DurationReconciler::reconcile(ended_at - s.started_at, active))
                }
                None => None,
            };

            let commits = commits::list_for_session(&pool.conn, s.id)?
                .into_iter()
                .map(|c| LogCommit {
                    hash: c.hash,
                    message: c.message,
                    author: c.author,
                    date: c.date,
                })
                .collect();

            let day = s.started_at.with_timezone(&Local).date_naive();
            days.entry(day).or_default().push(LogSession {
                id: s.id,
                task: detailed.task.description.clone(),
                started_at: s.started_at,
                ended_at: s.ended_at,
                durations,
                tags: annotations::list(&pool.conn, Annotation::Tag, s.id)?,
                kpis: annotations::list(&pool.conn, Annotation::Kpi, s.id)?,
                commits,
            });
        }

        Ok(days
            .into_iter()
            .rev()
            .map(|(date, sessions)| DayLog { date, sessions })
            .collect())
    }

    pub fn print_sessions(days: &[DayLog], separator: &str) {
        if days.is_empty() {
            println!("No sessions recorded yet.");
            return;
        }

        let rule = separator.repeat(48);

        for day in days {
            println!("{}", Colour::Blue.bold().paint(day.date.format("%A, %Y-%m-%d").to_string()));
            println!("{}", rule);

            for s in &day.sessions {
                let end = s
                    .ended_at
                    .map(format_local)
                    .unwrap_or_else(|| "running".to_string());
                println!(
                    "#{:<4} {}  ({} → {})",
                    s.id,
                    Colour::White.bold().paint(&s.task),
                    format_local(s.started_at),
                    end
                );

                if let Some(d) = &s.durations {
                    println!(
                        "      active {}  paused {}  total {}",
                        format_duration(d.active),
                        format_duration(d.paused),
                        format_duration(d.total)
                    );
                }
                if !s.tags.is_empty() {
                    println!("      tags: {}", s.tags.join(", "));
                }
                if !s.kpis.is_empty() {
                    println!("      kpis: {}", s.kpis.join(", "));
                }
                for c in &s.commits {
                    let short: String = c.hash.chars().take(7).collect();
                    println!(
                        "      {} {} ({})",
                        Colour::Yellow.paint(short),
                        c.message,
                        c.author
                    );
                }
            }
            println!();
        }
    }

    /// Rows of the internal `log` table, operation coloured and aligned.
    pub fn print_audit(pool: &DbPool) -> AppResult<()> {
        let entries = load_log(&pool.conn)?;
        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let rows: Vec<(i64, String, String, String)> = entries
            .into_iter()
            .map(|e| {
                let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or(e.date);
                let colour = color_for_operation(&e.operation);
                let mut op_target = colour.paint(e.operation.as_str()).to_string();
                if !e.target.is_empty() {
                    op_target.push_str(&format!(" ({})", e.target));
                }
                (e.id, date, op_target, e.message)
            })
            .collect();

        let id_w = rows.iter().map(|r| r.0.to_string().len()).max().unwrap_or(1);
        let date_w = rows.iter().map(|r| r.1.len()).max().unwrap_or(10);
        let op_w = rows
            .iter()
            .map(|r| strip_ansi(&r.2).chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_WIDTH_MAX);

        println!("📜 Internal log:\n");

        for (id, date, op_target, message) in rows {
            let visible = strip_ansi(&op_target).chars().count();
            let padding = " ".repeat(op_w.saturating_sub(visible));
            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                op_target,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
