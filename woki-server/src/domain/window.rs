//! Service Window Value Object
//!
//! A restaurant-configured time-of-day range during which bookings are
//! allowed. Stored as minutes since midnight; only ever compared as such.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use super::error::{DomainError, DomainResult};
use crate::utils::time;

const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceWindow {
    start: u32,
    end: u32,
}

impl ServiceWindow {
    /// Parse from `"HH:MM"` bounds; `"24:00"` is accepted as an end-of-day bound
    pub fn parse(start: &str, end: &str) -> DomainResult<Self> {
        let start = parse_hhmm(start)?;
        let end = parse_hhmm(end)?;
        if start >= end {
            return Err(DomainError::validation("Start time must be before end time"));
        }
        Ok(Self { start, end })
    }

    /// The whole day `[00:00, 24:00)` — used when no window is configured
    pub fn full_day() -> Self {
        Self {
            start: 0,
            end: MINUTES_PER_DAY,
        }
    }

    pub fn start_minutes(&self) -> u32 {
        self.start
    }

    pub fn end_minutes(&self) -> u32 {
        self.end
    }

    pub fn format_start(&self) -> String {
        format_hhmm(self.start)
    }

    pub fn format_end(&self) -> String {
        format_hhmm(self.end)
    }

    pub fn contains(&self, minutes: u32) -> bool {
        minutes >= self.start && minutes < self.end
    }

    pub fn intersects(&self, other: &ServiceWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Resolve the window to UTC instants on a local calendar date
    pub fn bounds_on(&self, date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            time::local_minutes_to_utc(date, self.start, tz),
            time::local_minutes_to_utc(date, self.end, tz),
        )
    }
}

fn parse_hhmm(value: &str) -> DomainResult<u32> {
    let invalid = || DomainError::validation(format!("Invalid time format: {value}"));
    let (hours, minutes) = value.split_once(':').ok_or_else(invalid)?;
    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    match (hours, minutes) {
        (24, 0) => Ok(MINUTES_PER_DAY),
        (0..=23, 0..=59) => Ok(hours * 60 + minutes),
        _ => Err(invalid()),
    }
}

fn format_hhmm(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
