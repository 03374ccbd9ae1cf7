use crate::db::pool::DbPool;
use crate::db::{intervals, sessions};
use crate::errors::AppResult;
use crate::models::interval::SessionInterval;
use crate::models::report::SessionRow;
use crate::models::session::SessionStatus;
use crate::utils::colors::{GREEN, GREY, RESET, YELLOW};
use crate::utils::table::{Column, Table};
use crate::utils::time::{format_hm, format_local};
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;

pub struct ReportLogic;

impl ReportLogic {
    /// One row per session, newest first. Start and end come from the first and
    /// last interval; a running interval counts up to `now`.
    pub fn session_rows(pool: &DbPool, now: DateTime<Utc>) -> AppResult<Vec<SessionRow>> {
        let mut by_session: HashMap<i64, Vec<SessionInterval>> = HashMap::new();
        for i in intervals::list_all(&pool.conn)? {
            by_session.entry(i.session_id).or_default().push(i);
        }

        let rows = sessions::list_with_task(&pool.conn)?
            .into_iter()
            .map(|d| {
                let list = by_session.remove(&d.session.id).unwrap_or_default();
                let has_open = list.iter().any(|i| i.is_open());

                let start_time = list
                    .first()
                    .map(|i| i.start_time)
                    .unwrap_or(d.session.started_at);
                let end_time = if has_open {
                    None
                } else {
                    list.last().and_then(|i| i.end_time).or(d.session.ended_at)
                };
                let active = list
                    .iter()
                    .fold(TimeDelta::zero(), |acc, i| acc + i.duration_until(now));

                SessionRow {
                    id: d.session.id,
                    task: d.task.description,
                    start_time,
                    end_time,
                    active_seconds: active.num_seconds(),
                    status: SessionStatus::derive(&d.session, has_open),
                }
            })
            .collect();

        Ok(rows)
    }

    pub fn print_rows(rows: &[SessionRow]) {
        if rows.is_empty() {
            println!("No sessions recorded yet.");
            return;
        }

        let task_w = rows
            .iter()
            .map(|r| r.task.chars().count())
            .max()
            .unwrap_or(4)
            .clamp(4, 40);

        let mut table = Table::new(vec![
            Column::new("ID", 5),
            Column::new("TASK", task_w),
            Column::new("START", 19),
            Column::new("END", 19),
            Column::new("ACTIVE", 8),
            Column::new("STATUS", 11),
        ]);

        for r in rows {
            let task: String = r.task.chars().take(task_w).collect();
            let end = r.end_time.map(format_local).unwrap_or_else(|| "--".into());
            let colour = match r.status {
                SessionStatus::InProgress => GREEN,
                SessionStatus::Paused => YELLOW,
                SessionStatus::Ended => GREY,
            };

            table.add_row(vec![
                r.id.to_string(),
                task,
                format_local(r.start_time),
                end,
                format_hm(r.active_seconds),
                format!("{colour}{}{RESET}", r.status.as_str()),
            ]);
        }

        print!("{}", table.render());
    }
}
