//! Booking Duration Value Object

use chrono::{DateTime, Utc};

use super::error::{DomainError, DomainResult};

/// Slot grid shared by every booking boundary (minutes)
pub const SLOT_MINUTES: u32 = 15;

const MIN_DURATION: u32 = 30;
const MAX_DURATION: u32 = 180;

/// Booking duration in minutes: bounded `[30, 180]`, multiple of 15
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration(u32);

impl Duration {
    pub fn new(minutes: u32) -> DomainResult<Self> {
        if !(MIN_DURATION..=MAX_DURATION).contains(&minutes) {
            return Err(DomainError::validation(format!(
                "Duration must be between {MIN_DURATION} and {MAX_DURATION} minutes"
            )));
        }
        if minutes % SLOT_MINUTES != 0 {
            return Err(DomainError::validation(format!(
                "Duration must be a multiple of {SLOT_MINUTES} minutes"
            )));
        }
        Ok(Self(minutes))
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    /// Number of 15-minute slots this duration spans
    pub fn slots(&self) -> u32 {
        self.0 / SLOT_MINUTES
    }

    pub fn add_to(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        instant + chrono::Duration::minutes(self.0 as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_minutes() {
        assert_eq!(Duration::new(90).unwrap().minutes(), 90);
        assert_eq!(Duration::new(90).unwrap().slots(), 6);
    }

    #[test]
    fn rejects_out_of_bounds() {
        assert!(Duration::new(15).is_err());
        assert!(Duration::new(195).is_err());
        assert!(Duration::new(30).is_ok());
        assert!(Duration::new(180).is_ok());
    }

    #[test]
    fn rejects_off_grid() {
        assert!(Duration::new(100).is_err());
        assert!(Duration::new(45).is_ok());
    }
}
