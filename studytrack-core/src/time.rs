//! Time utilities: turn an assignment's local due date/time into an instant.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Due time assumed when an assignment only carries a date.
pub const DEFAULT_DUE_TIME: &str = "23:59";

/// Parse a due date (`YYYY-MM-DD`) and time (`HH:MM`) in the IANA zone `tz`,
/// returning UTC.
///
/// Returns `None` for anything unparseable, including unknown zones and local times
/// skipped by a DST transition. Ambiguous local times resolve to the earlier instant.
pub fn parse_due_local(date: &str, time: &str, tz: &str) -> Option<DateTime<Utc>> {
    let tz: Tz = tz.parse().ok()?;

    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let time = match time.trim() {
        "" => DEFAULT_DUE_TIME,
        t => t,
    };
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .ok()?;

    let local = tz.from_local_datetime(&NaiveDateTime::new(date, time)).earliest()?;
    Some(local.with_timezone(&Utc))
}

/// Hours from `now` until `due`; negative when already past.
pub fn hours_until(due: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (due - now).num_seconds() as f64 / 3600.0
}
