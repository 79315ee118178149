//! Time Helpers — Business-Timezone Conversion
//!
//! All date/time-of-day → instant conversion happens here, in the
//! restaurant's business timezone. The allocation engine only ever sees UTC
//! instants.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::domain::{DomainError, DomainResult};

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| DomainError::validation(format!("Invalid date format: {date}")))
}

/// Local date + minutes-since-midnight → UTC instant
///
/// DST gap fallback: if the local time does not exist, fall back to UTC.
pub fn local_minutes_to_utc(date: NaiveDate, minutes: u32, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_hms_opt(0, 0, 0).unwrap() + chrono::Duration::minutes(minutes as i64);
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// `[day start, next-day start)` of a local calendar date, as UTC instants
pub fn day_bounds(date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let next = date.succ_opt().unwrap_or(date);
    (
        local_minutes_to_utc(date, 0, tz),
        local_minutes_to_utc(next, 0, tz),
    )
}
