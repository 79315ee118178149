//! Storage Layer (存储层)
//!
//! Repository traits plus two backends: an embedded SurrealDB store for
//! production and an in-memory store for tests and ephemeral deployments.

pub mod memory;
pub mod surreal;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Booking, DiningTable, DomainResult, Restaurant, Sector};

#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Restaurant>>;
    async fn find_all(&self) -> DomainResult<Vec<Restaurant>>;
    async fn save(&self, restaurant: &Restaurant) -> DomainResult<()>;
}

#[async_trait]
pub trait SectorRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Sector>>;
    async fn find_by_restaurant(&self, restaurant_id: &str) -> DomainResult<Vec<Sector>>;
    async fn save(&self, sector: &Sector) -> DomainResult<()>;
}

#[async_trait]
pub trait TableRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<DiningTable>>;
    async fn find_by_sector(&self, sector_id: &str) -> DomainResult<Vec<DiningTable>>;
    async fn save(&self, table: &DiningTable) -> DomainResult<()>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>>;

    /// Confirmed bookings of a sector whose start falls in `[day_start, day_end)`
    async fn find_confirmed_by_sector_and_date(
        &self,
        sector_id: &str,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>>;

    /// The booking previously stored under this idempotency key, if the key
    /// is still live
    async fn find_by_idempotency_key(&self, key: &str) -> DomainResult<Option<Booking>>;

    async fn save(&self, booking: &Booking) -> DomainResult<()>;

    /// Store the booking and bind the idempotency key to it in one atomic
    /// write
    async fn save_with_idempotency_key(
        &self,
        booking: &Booking,
        key: &str,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<()>;

    /// Remove a booking record entirely. Normal cancellation keeps the
    /// record and flips the status; this is for administrative purge.
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
