//! Rollups derived from interval data.
//!
//! Every figure clips intervals to the period it describes; a running
//! interval is measured up to `now`. Period boundaries follow local time.

use crate::db::pool::{DbPool, ReadJob};
use crate::db::{intervals, stats};
use crate::errors::AppResult;
use crate::models::interval::SessionInterval;
use crate::models::report::{Breakdown, MetricStat, PeriodStat, SummaryStats};
use crate::utils::time::{local_midnight, overlap_seconds};
use chrono::{DateTime, Datelike, Days, Local, Months, NaiveDate, Utc};
use rusqlite::Connection;
use std::collections::HashSet;

/// Clipped intervals at least this long count as focused work.
pub const FOCUS_THRESHOLD_SECS: i64 = 20 * 60;

pub const DAILY_BUCKETS: u64 = 7;
pub const WEEKLY_BUCKETS: u64 = 4;
pub const MONTHLY_BUCKETS: u32 = 3;

/// Half-open local period `[from, to)` converted to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl Period {
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            from: local_midnight(start),
            to: local_midnight(end),
        }
    }

    pub fn day(date: NaiveDate) -> Self {
        Self::between(date, date + Days::new(1))
    }

    pub fn week(monday: NaiveDate) -> Self {
        Self::between(monday, monday + Days::new(7))
    }

    pub fn month(first: NaiveDate) -> Self {
        let next = first + Months::new(1);
        Self::between(first, next)
    }

    fn clip(&self, interval: &SessionInterval, now: DateTime<Utc>) -> i64 {
        let end = interval.end_time.unwrap_or(now);
        overlap_seconds(interval.start_time, end, self.from, self.to)
    }
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(date.weekday().num_days_from_monday() as u64)
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn hours(secs: i64) -> f64 {
    round2(secs as f64 / 3600.0)
}

pub struct StatsAggregator;

impl StatsAggregator {
    /// Percentage change from `prior` to `current`, rounded to the nearest integer.
    pub fn calculate_change(current: f64, prior: f64) -> f64 {
        if prior == 0.0 {
            if current == 0.0 { 0.0 } else { 100.0 }
        } else {
            ((current - prior) / prior * 100.0).round()
        }
    }

    fn metric(current: f64, prior: f64) -> MetricStat {
        MetricStat {
            value: current,
            change: Self::calculate_change(current, prior),
        }
    }

    /// Hour metric: the value is rounded, the change uses the exact figures.
    fn hours_metric(current_secs: i64, prior_secs: i64) -> MetricStat {
        MetricStat {
            value: hours(current_secs),
            change: Self::calculate_change(current_secs as f64 / 3600.0, prior_secs as f64 / 3600.0),
        }
    }

    /// Seconds of tracked work inside `period`.
    pub fn tracked_seconds(
        conn: &Connection,
        period: Period,
        now: DateTime<Utc>,
    ) -> AppResult<i64> {
        let rows = intervals::list_overlapping(conn, period.from, period.to)?;
        Ok(rows.iter().map(|i| period.clip(i, now)).sum())
    }

    /// Share of tracked time spent in focused intervals, as a percentage with two decimals.
    pub fn productivity_score(
        conn: &Connection,
        period: Period,
        now: DateTime<Utc>,
    ) -> AppResult<f64> {
        let rows = intervals::list_overlapping(conn, period.from, period.to)?;

        let (mut total, mut focused) = (0i64, 0i64);
        for i in &rows {
            let secs = period.clip(i, now);
            total += secs;
            if secs >= FOCUS_THRESHOLD_SECS {
                focused += secs;
            }
        }

        if total == 0 {
            return Ok(0.0);
        }
        Ok(round2(100.0 * focused as f64 / total as f64))
    }

    pub fn sessions_in(conn: &Connection, period: Period, now: DateTime<Utc>) -> AppResult<i64> {
        stats::count_sessions_overlapping(conn, period.from, period.to, now)
    }

    /// The four top-line metrics; each compares the current period with the previous one.
    pub fn summary(pool: &DbPool, now: DateTime<Local>) -> AppResult<SummaryStats> {
        let utc_now = now.with_timezone(&Utc);
        let today = now.date_naive();
        let yesterday = today - Days::new(1);
        let this_week = week_start(today);
        let last_week = this_week - Days::new(7);

        let mut jobs: Vec<ReadJob<'_, MetricStat>> = Vec::with_capacity(4);
        jobs.push(Box::new(move |c: &Connection| {
            let cur = Self::tracked_seconds(c, Period::day(today), utc_now)?;
            let prev = Self::tracked_seconds(c, Period::day(yesterday), utc_now)?;
            Ok(Self::hours_metric(cur, prev))
        }));
        jobs.push(Box::new(move |c: &Connection| {
            let cur = Self::tracked_seconds(c, Period::week(this_week), utc_now)?;
            let prev = Self::tracked_seconds(c, Period::week(last_week), utc_now)?;
            Ok(Self::hours_metric(cur, prev))
        }));
        jobs.push(Box::new(move |c: &Connection| {
            let cur = Self::sessions_in(c, Period::day(today), utc_now)?;
            let prev = Self::sessions_in(c, Period::day(yesterday), utc_now)?;
            Ok(Self::metric(cur as f64, prev as f64))
        }));
        jobs.push(Box::new(move |c: &Connection| {
            let cur = Self::productivity_score(c, Period::day(today), utc_now)?;
            let prev = Self::productivity_score(c, Period::day(yesterday), utc_now)?;
            Ok(Self::metric(cur, prev))
        }));

        let mut metrics = pool.read_all(jobs)?.into_iter();
        let mut next = || metrics.next().unwrap_or_default();

        Ok(SummaryStats {
            today_hours: next(),
            week_hours: next(),
            sessions_today: next(),
            productivity_score: next(),
        })
    }

    /// Hours and distinct sessions per bucket, oldest bucket first. Empty buckets are kept.
    pub fn bucketize(
        rows: &[SessionInterval],
        periods: &[Period],
        now: DateTime<Utc>,
    ) -> Vec<PeriodStat> {
        periods
            .iter()
            .map(|p| {
                let mut secs = 0i64;
                let mut sessions = HashSet::new();
                for i in rows {
                    let clipped = p.clip(i, now);
                    if clipped > 0 {
                        secs += clipped;
                        sessions.insert(i.session_id);
                    }
                }
                PeriodStat {
                    start: p.start,
                    hours: hours(secs),
                    sessions: sessions.len(),
                }
            })
            .collect()
    }

    /// Last 7 days, last 4 weeks and last 3 months, each including the current one.
    pub fn breakdown(pool: &DbPool, now: DateTime<Local>) -> AppResult<Breakdown> {
        let utc_now = now.with_timezone(&Utc);
        let today = now.date_naive();

        let daily: Vec<Period> = (0..DAILY_BUCKETS)
            .rev()
            .map(|back| Period::day(today - Days::new(back)))
            .collect();

        let this_week = week_start(today);
        let weekly: Vec<Period> = (0..WEEKLY_BUCKETS)
            .rev()
            .map(|back| Period::week(this_week - Days::new(7 * back)))
            .collect();

        let this_month = month_start(today);
        let monthly: Vec<Period> = (0..MONTHLY_BUCKETS)
            .rev()
            .map(|back| Period::month(this_month - Months::new(back)))
            .collect();

        // one scan over the widest window serves every bucket
        let window = || [&daily, &weekly, &monthly].into_iter().flat_map(|v| v.iter());
        let from = window().map(|p| p.from).min().unwrap_or(utc_now);
        let to = window().map(|p| p.to).max().unwrap_or(utc_now);
        let rows = intervals::list_overlapping(&pool.conn, from, to)?;

        Ok(Breakdown {
            daily: Self::bucketize(&rows, &daily, utc_now),
            weekly: Self::bucketize(&rows, &weekly, utc_now),
            monthly: Self::bucketize(&rows, &monthly, utc_now),
        })
    }
}
