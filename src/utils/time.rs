//! Time utilities: DB timestamp encoding, local period boundaries, duration formatting.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};

/// Storage format, identical to SQLite's CURRENT_TIMESTAMP.
pub const DB_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn to_db(dt: DateTime<Utc>) -> String {
    dt.format(DB_FORMAT).to_string()
}

pub fn from_db(s: &str) -> AppResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, DB_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| AppError::InvalidTimestamp(s.to_string()))
}

/// Drop sub-second precision so values survive a round trip through the DB.
pub fn truncate_secs(dt: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_opt(dt.timestamp(), 0).single().unwrap_or(dt)
}

/// Local midnight of `date`, expressed in UTC.
pub fn local_midnight(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    first_valid_local(naive, |n| {
        Local
            .from_local_datetime(n)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

/// Resolve `naive` through `lookup`; when a DST jump skips it, step forward
/// to the first local time that exists.
pub fn first_valid_local<F>(naive: NaiveDateTime, lookup: F) -> DateTime<Utc>
where
    F: Fn(&NaiveDateTime) -> Option<DateTime<Utc>>,
{
    let step = TimeDelta::minutes(15);
    let mut candidate = naive;
    // no real gap is longer than a day
    for _ in 0..(24 * 4) {
        if let Some(dt) = lookup(&candidate) {
            return dt;
        }
        candidate += step;
    }
    Utc.from_utc_datetime(&naive)
}

/// Formats a duration as `1h 05m 30s`, `5m 30s` or `30s`.
pub fn format_duration(d: TimeDelta) -> String {
    let secs = d.num_seconds().max(0);
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}h {:02}m {:02}s", h, m, s)
    } else if m > 0 {
        format!("{}m {:02}s", m, s)
    } else {
        format!("{}s", s)
    }
}

/// Compact `Xh Ym` / `Ym` format used in session lists.
pub fn format_hm(secs: i64) -> String {
    let secs = secs.max(0);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

pub fn format_local(dt: DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Seconds of overlap between `[start, end)` and `[from, to)`.
pub fn overlap_seconds(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> i64 {
    let lo = start.max(from);
    let hi = end.min(to);
    (hi - lo).num_seconds().max(0)
}
