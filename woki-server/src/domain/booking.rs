//! Booking Entity
//!
//! Lifecycle: created CONFIRMED by the allocation coordinator, may transition
//! to CANCELLED exactly once, never mutated otherwise.

use chrono::{DateTime, Utc};

use super::duration::Duration;
use super::error::{DomainError, DomainResult};
use super::interval::TimeInterval;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(value: &str) -> DomainResult<Self> {
        match value {
            "CONFIRMED" => Ok(BookingStatus::Confirmed),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            other => Err(DomainError::validation(format!(
                "Unknown booking status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Booking {
    pub id: String,
    pub restaurant_id: String,
    pub sector_id: String,
    pub table_ids: Vec<String>,
    pub party_size: u32,
    pub interval: TimeInterval,
    pub duration: Duration,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Construct a new CONFIRMED booking. The interval length must equal the
    /// stated duration.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        id: String,
        restaurant_id: String,
        sector_id: String,
        table_ids: Vec<String>,
        party_size: u32,
        interval: TimeInterval,
        duration: Duration,
    ) -> DomainResult<Self> {
        if interval.duration_minutes() != duration.minutes() as i64 {
            return Err(DomainError::validation(
                "Interval length must match the booking duration",
            ));
        }
        if table_ids.is_empty() {
            return Err(DomainError::validation(
                "A booking must reference at least one table",
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id,
            restaurant_id,
            sector_id,
            table_ids,
            party_size,
            interval,
            duration,
            status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }

    /// CONFIRMED → CANCELLED; cancelling twice is a conflict
    pub fn cancel(&mut self) -> DomainResult<()> {
        if self.status == BookingStatus::Cancelled {
            return Err(DomainError::conflict("Booking is already cancelled"));
        }
        self.status = BookingStatus::Cancelled;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn occupies(&self, table_id: &str) -> bool {
        self.table_ids.iter().any(|id| id == table_id)
    }

    /// Two CONFIRMED bookings sharing a table with overlapping intervals must
    /// never persist simultaneously.
    pub fn conflicts_with(&self, other: &Booking) -> bool {
        if !self.is_confirmed() || !other.is_confirmed() {
            return false;
        }
        if !self.table_ids.iter().any(|id| other.occupies(id)) {
            return false;
        }
        self.interval.overlaps(&other.interval)
    }
}
