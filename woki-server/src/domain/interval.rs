//! Time Interval Value Object

use chrono::{DateTime, Timelike, Utc};

use super::duration::SLOT_MINUTES;
use super::error::{DomainError, DomainResult};

/// Half-open booking interval `[start, end)` with both boundaries on the
/// 15-minute grid. All contemporary IANA timezone offsets are multiples of
/// 15 minutes, so checking the minute-of-hour in UTC is equivalent to
/// checking it locally for any bookable date (historic LMT offsets are
/// arbitrary, but nothing books in 1880).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<Self> {
        if start >= end {
            return Err(DomainError::validation("Start time must be before end time"));
        }
        if !aligned(start) || !aligned(end) {
            return Err(DomainError::validation(format!(
                "Times must be aligned to the {SLOT_MINUTES}-minute grid"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

fn aligned(instant: DateTime<Utc>) -> bool {
    instant.minute() % SLOT_MINUTES == 0 && instant.second() == 0 && instant.nanosecond() == 0
}
