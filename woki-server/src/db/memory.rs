//! In-Memory Store
//!
//! A single `RwLock` over all collections. One write lock per mutation keeps
//! the booking + idempotency-key pair atomic without a transaction layer.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{BookingRepository, RestaurantRepository, SectorRepository, TableRepository};
use crate::domain::{Booking, DiningTable, DomainResult, Restaurant, Sector};

#[derive(Debug, Clone)]
struct IdempotencyRecord {
    booking_id: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Inner {
    restaurants: HashMap<String, Restaurant>,
    sectors: HashMap<String, Sector>,
    tables: HashMap<String, DiningTable>,
    bookings: HashMap<String, Booking>,
    idempotency: HashMap<String, IdempotencyRecord>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn save_restaurant(&self, restaurant: &Restaurant) -> DomainResult<()> {
        RestaurantRepository::save(self, restaurant).await
    }

    pub async fn save_sector(&self, sector: &Sector) -> DomainResult<()> {
        SectorRepository::save(self, sector).await
    }

    pub async fn save_table(&self, table: &DiningTable) -> DomainResult<()> {
        TableRepository::save(self, table).await
    }

    pub async fn booking_count(&self) -> usize {
        self.inner.read().await.bookings.len()
    }
}

#[async_trait]
impl RestaurantRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Restaurant>> {
        Ok(self.inner.read().await.restaurants.get(id).cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<Restaurant>> {
        let mut all: Vec<Restaurant> = self.inner.read().await.restaurants.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn save(&self, restaurant: &Restaurant) -> DomainResult<()> {
        self.inner
            .write()
            .await
            .restaurants
            .insert(restaurant.id.clone(), restaurant.clone());
        Ok(())
    }
}

#[async_trait]
impl SectorRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Sector>> {
        Ok(self.inner.read().await.sectors.get(id).cloned())
    }

    async fn find_by_restaurant(&self, restaurant_id: &str) -> DomainResult<Vec<Sector>> {
        let mut sectors: Vec<Sector> = self
            .inner
            .read()
            .await
            .sectors
            .values()
            .filter(|s| s.restaurant_id == restaurant_id)
            .cloned()
            .collect();
        sectors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sectors)
    }

    async fn save(&self, sector: &Sector) -> DomainResult<()> {
        self.inner
            .write()
            .await
            .sectors
            .insert(sector.id.clone(), sector.clone());
        Ok(())
    }
}

#[async_trait]
impl TableRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<DiningTable>> {
        Ok(self.inner.read().await.tables.get(id).cloned())
    }

    async fn find_by_sector(&self, sector_id: &str) -> DomainResult<Vec<DiningTable>> {
        let mut tables: Vec<DiningTable> = self
            .inner
            .read()
            .await
            .tables
            .values()
            .filter(|t| t.sector_id == sector_id)
            .cloned()
            .collect();
        tables.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tables)
    }

    async fn save(&self, table: &DiningTable) -> DomainResult<()> {
        self.inner
            .write()
            .await
            .tables
            .insert(table.id.clone(), table.clone());
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>> {
        Ok(self.inner.read().await.bookings.get(id).cloned())
    }

    async fn find_confirmed_by_sector_and_date(
        &self,
        sector_id: &str,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .inner
            .read()
            .await
            .bookings
            .values()
            .filter(|b| {
                b.sector_id == sector_id
                    && b.is_confirmed()
                    && b.interval.start() >= day_start
                    && b.interval.start() < day_end
            })
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.interval.start());
        Ok(bookings)
    }

    async fn find_by_idempotency_key(&self, key: &str) -> DomainResult<Option<Booking>> {
        let inner = self.inner.read().await;
        let Some(record) = inner.idempotency.get(key) else {
            return Ok(None);
        };
        if record.expires_at <= Utc::now() {
            return Ok(None);
        }
        Ok(inner.bookings.get(&record.booking_id).cloned())
    }

    async fn save(&self, booking: &Booking) -> DomainResult<()> {
        self.inner
            .write()
            .await
            .bookings
            .insert(booking.id.clone(), booking.clone());
        Ok(())
    }

    async fn save_with_idempotency_key(
        &self,
        booking: &Booking,
        key: &str,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        let mut inner = self.inner.write().await;
        inner.bookings.insert(booking.id.clone(), booking.clone());
        inner.idempotency.insert(
            key.to_string(),
            IdempotencyRecord {
                booking_id: booking.id.clone(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let mut inner = self.inner.write().await;
        inner.bookings.remove(id);
        inner.idempotency.retain(|_, record| record.booking_id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookingStatus, Duration, TimeInterval};
    use chrono::TimeZone;

    fn booking(id: &str, hour: u32) -> Booking {
        let start = Utc.with_ymd_and_hms(2025, 10, 22, hour, 0, 0).unwrap();
        let duration = Duration::new(60).unwrap();
        Booking::create(
            id.into(),
            "r1".into(),
            "s1".into(),
            vec!["t1".into()],
            2,
            TimeInterval::new(start, duration.add_to(start)).unwrap(),
            duration,
        )
        .unwrap()
    }

    async fn save_booking(store: &MemoryStore, booking: &Booking) {
        BookingRepository::save(store, booking).await.unwrap();
    }

    #[tokio::test]
    async fn filters_confirmed_bookings_by_day() {
        let store = MemoryStore::new();
        save_booking(&store, &booking("b1", 20)).await;
        save_booking(&store, &booking("b2", 21)).await;
        let mut cancelled = booking("b3", 22);
        cancelled.cancel().unwrap();
        save_booking(&store, &cancelled).await;

        let day_start = Utc.with_ymd_and_hms(2025, 10, 22, 0, 0, 0).unwrap();
        let day_end = Utc.with_ymd_and_hms(2025, 10, 23, 0, 0, 0).unwrap();
        let found = store
            .find_confirmed_by_sector_and_date("s1", day_start, day_end)
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|b| b.status == BookingStatus::Confirmed));
        assert!(found[0].interval.start() < found[1].interval.start());
    }

    #[tokio::test]
    async fn expired_idempotency_keys_resolve_to_nothing() {
        let store = MemoryStore::new();
        let b = booking("b1", 20);
        store
            .save_with_idempotency_key(&b, "k1", Utc::now() - chrono::Duration::seconds(1))
            .await
            .unwrap();

        assert!(store.find_by_idempotency_key("k1").await.unwrap().is_none());
        // the booking itself is untouched
        assert!(
            BookingRepository::find_by_id(&store, "b1")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn delete_purges_the_booking_and_its_keys() {
        let store = MemoryStore::new();
        let b = booking("b1", 20);
        store
            .save_with_idempotency_key(&b, "k1", Utc::now() + chrono::Duration::hours(1))
            .await
            .unwrap();

        store.delete("b1").await.unwrap();

        assert!(
            BookingRepository::find_by_id(&store, "b1")
                .await
                .unwrap()
                .is_none()
        );
        assert!(store.find_by_idempotency_key("k1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn live_idempotency_keys_resolve_to_their_booking() {
        let store = MemoryStore::new();
        let b = booking("b1", 20);
        store
            .save_with_idempotency_key(&b, "k1", Utc::now() + chrono::Duration::hours(1))
            .await
            .unwrap();

        let found = store.find_by_idempotency_key("k1").await.unwrap().unwrap();
        assert_eq!(found.id, "b1");
    }
}
