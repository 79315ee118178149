//! Record Types — database representation of domain entities
//!
//! Timestamps are stored as Unix millis; the record id is projected out of
//! the SurrealDB `id` field on read and never written back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Booking, BookingStatus, CapacityRange, DiningTable, DomainError, DomainResult, Duration,
    Restaurant, Sector, ServiceWindow, TimeInterval,
};

fn millis(dt: DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}

fn from_millis(value: i64, field: &str) -> DomainResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value)
        .ok_or_else(|| DomainError::repository(format!("Invalid timestamp in {field}: {value}")))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WindowRecord {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RestaurantRecord {
    #[serde(skip_serializing, default)]
    pub id: String,
    pub name: String,
    pub timezone: String,
    pub windows: Vec<WindowRecord>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl RestaurantRecord {
    pub fn from_domain(r: &Restaurant) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            timezone: r.timezone.name().to_string(),
            windows: r
                .windows
                .iter()
                .map(|w| WindowRecord {
                    start: w.format_start(),
                    end: w.format_end(),
                })
                .collect(),
            created_at: millis(r.created_at),
            updated_at: millis(r.updated_at),
        }
    }

    pub fn into_domain(self) -> DomainResult<Restaurant> {
        let timezone = self
            .timezone
            .parse()
            .map_err(|_| DomainError::repository(format!("Invalid timezone: {}", self.timezone)))?;
        let windows = self
            .windows
            .iter()
            .map(|w| ServiceWindow::parse(&w.start, &w.end))
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(Restaurant {
            id: self.id,
            name: self.name,
            timezone,
            windows,
            created_at: from_millis(self.created_at, "restaurant.created_at")?,
            updated_at: from_millis(self.updated_at, "restaurant.updated_at")?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SectorRecord {
    #[serde(skip_serializing, default)]
    pub id: String,
    pub restaurant: String,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl SectorRecord {
    pub fn from_domain(s: &Sector) -> Self {
        Self {
            id: s.id.clone(),
            restaurant: s.restaurant_id.clone(),
            name: s.name.clone(),
            created_at: millis(s.created_at),
            updated_at: millis(s.updated_at),
        }
    }

    pub fn into_domain(self) -> DomainResult<Sector> {
        Ok(Sector {
            id: self.id,
            restaurant_id: self.restaurant,
            name: self.name,
            created_at: from_millis(self.created_at, "sector.created_at")?,
            updated_at: from_millis(self.updated_at, "sector.updated_at")?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TableRecord {
    #[serde(skip_serializing, default)]
    pub id: String,
    pub sector: String,
    pub name: String,
    pub min_size: u32,
    pub max_size: u32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TableRecord {
    pub fn from_domain(t: &DiningTable) -> Self {
        Self {
            id: t.id.clone(),
            sector: t.sector_id.clone(),
            name: t.name.clone(),
            min_size: t.capacity.min(),
            max_size: t.capacity.max(),
            created_at: millis(t.created_at),
            updated_at: millis(t.updated_at),
        }
    }

    pub fn into_domain(self) -> DomainResult<DiningTable> {
        Ok(DiningTable {
            id: self.id,
            sector_id: self.sector,
            name: self.name,
            capacity: CapacityRange::new(self.min_size, self.max_size)?,
            created_at: from_millis(self.created_at, "table.created_at")?,
            updated_at: from_millis(self.updated_at, "table.updated_at")?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingRecord {
    #[serde(skip_serializing, default)]
    pub id: String,
    pub restaurant: String,
    pub sector: String,
    pub table_ids: Vec<String>,
    pub party_size: u32,
    pub start_at: i64,
    pub end_at: i64,
    pub duration_minutes: u32,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl BookingRecord {
    pub fn from_domain(b: &Booking) -> Self {
        Self {
            id: b.id.clone(),
            restaurant: b.restaurant_id.clone(),
            sector: b.sector_id.clone(),
            table_ids: b.table_ids.clone(),
            party_size: b.party_size,
            start_at: millis(b.interval.start()),
            end_at: millis(b.interval.end()),
            duration_minutes: b.duration.minutes(),
            status: b.status.as_str().to_string(),
            created_at: millis(b.created_at),
            updated_at: millis(b.updated_at),
        }
    }

    pub fn into_domain(self) -> DomainResult<Booking> {
        let interval = TimeInterval::new(
            from_millis(self.start_at, "booking.start_at")?,
            from_millis(self.end_at, "booking.end_at")?,
        )?;
        Ok(Booking {
            id: self.id,
            restaurant_id: self.restaurant,
            sector_id: self.sector,
            table_ids: self.table_ids,
            party_size: self.party_size,
            interval,
            duration: Duration::new(self.duration_minutes)?,
            status: BookingStatus::parse(&self.status)?,
            created_at: from_millis(self.created_at, "booking.created_at")?,
            updated_at: from_millis(self.updated_at, "booking.updated_at")?,
        })
    }
}

/// Idempotency key record; points at the booking it protects
#[derive(Debug, Serialize, Deserialize)]
pub struct KeyRecord {
    pub booking: String,
    pub expires_at: i64,
}
