//! Allocation Coordinator (分配协调器)
//!
//! Orchestrates a booking attempt end to end: load the context, discover
//! gaps, generate and rank candidates, then confirm the winner under a
//! key-scoped lock with idempotency replay and a conflict re-check.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::allocation::candidates::{Candidate, CandidateGenerator};
use crate::allocation::gaps::{Gap, find_gaps};
use crate::allocation::lock::{LockRegistry, slot_lock_key};
use crate::allocation::selection::{rank, select_best};
use crate::db::{BookingRepository, RestaurantRepository, SectorRepository, TableRepository};
use crate::domain::{
    Booking, DiningTable, DomainError, DomainResult, Duration, Restaurant, ServiceWindow,
    TimeInterval,
};
use crate::services::events::{DomainEvent, EventPublisher};

/// A seating request, already parsed and validated at the edge
#[derive(Debug, Clone)]
pub struct AllocationRequest {
    pub restaurant_id: String,
    pub sector_id: String,
    pub party_size: u32,
    pub duration: Duration,
    pub date: NaiveDate,
    /// Explicit service window; `None` means the restaurant's configured ones
    pub window: Option<ServiceWindow>,
}

pub struct AllocationCoordinator {
    restaurants: Arc<dyn RestaurantRepository>,
    sectors: Arc<dyn SectorRepository>,
    tables: Arc<dyn TableRepository>,
    bookings: Arc<dyn BookingRepository>,
    events: EventPublisher,
    locks: LockRegistry,
    generator: CandidateGenerator,
    idempotency_ttl: chrono::Duration,
}

impl AllocationCoordinator {
    pub fn new(
        restaurants: Arc<dyn RestaurantRepository>,
        sectors: Arc<dyn SectorRepository>,
        tables: Arc<dyn TableRepository>,
        bookings: Arc<dyn BookingRepository>,
        events: EventPublisher,
        generator: CandidateGenerator,
        idempotency_ttl: chrono::Duration,
    ) -> Self {
        Self {
            restaurants,
            sectors,
            tables,
            bookings,
            events,
            locks: LockRegistry::new(),
            generator,
            idempotency_ttl,
        }
    }

    /// Allocate a seating and confirm a booking for it.
    ///
    /// With an idempotency key, a replayed request returns the original
    /// booking instead of creating a second one. The key is checked both
    /// before and after taking the lock, so concurrent replays collapse to
    /// one booking too.
    pub async fn create_booking(
        &self,
        request: AllocationRequest,
        idempotency_key: Option<String>,
    ) -> DomainResult<Booking> {
        if request.party_size == 0 {
            return Err(DomainError::validation("Party size must be at least 1"));
        }

        if let Some(key) = &idempotency_key
            && let Some(existing) = self.bookings.find_by_idempotency_key(key).await?
        {
            info!(booking_id = %existing.id, "Idempotent replay, returning existing booking");
            return Ok(existing);
        }

        let (restaurant, tables) = self.load_context(&request).await?;
        let candidates = self.feasible_candidates(&request, &restaurant, &tables).await?;
        let selected = select_best(candidates)
            .ok_or_else(|| DomainError::no_capacity("No seating available for the requested slot"))?;

        let lock_key = match &idempotency_key {
            Some(key) => format!("idempotency:{key}"),
            None => slot_lock_key(
                &request.restaurant_id,
                &request.sector_id,
                selected.seating.table_ids(),
                selected.start,
            ),
        };
        let _guard = self.locks.acquire(&lock_key).await;

        // Someone with the same key may have won the race while we waited.
        if let Some(key) = &idempotency_key
            && let Some(existing) = self.bookings.find_by_idempotency_key(key).await?
        {
            return Ok(existing);
        }

        let interval = TimeInterval::new(selected.start, selected.end)?;
        self.ensure_still_free(&request, selected.seating.table_ids(), interval)
            .await?;

        let booking = Booking::create(
            Uuid::new_v4().to_string(),
            request.restaurant_id.clone(),
            request.sector_id.clone(),
            selected.seating.table_ids().to_vec(),
            request.party_size,
            interval,
            request.duration,
        )?;

        match &idempotency_key {
            Some(key) => {
                let expires_at = Utc::now() + self.idempotency_ttl;
                self.bookings
                    .save_with_idempotency_key(&booking, key, expires_at)
                    .await?;
            }
            None => self.bookings.save(&booking).await?,
        }

        info!(
            booking_id = %booking.id,
            sector_id = %booking.sector_id,
            tables = ?booking.table_ids,
            start = %interval.start(),
            party_size = booking.party_size,
            "Booking confirmed"
        );
        self.events.publish(DomainEvent::booking_created(&booking));

        Ok(booking)
    }

    /// Rank every feasible seating for the request, best first, up to `limit`
    pub async fn discover_seats(
        &self,
        request: AllocationRequest,
        limit: usize,
    ) -> DomainResult<Vec<Candidate>> {
        if request.party_size == 0 {
            return Err(DomainError::validation("Party size must be at least 1"));
        }

        let (restaurant, tables) = self.load_context(&request).await?;
        if tables.is_empty() {
            return Err(DomainError::no_capacity("No tables available in sector"));
        }

        let mut candidates = self.feasible_candidates(&request, &restaurant, &tables).await?;
        if candidates.is_empty() {
            return Err(DomainError::no_capacity("No seating available for the requested slot"));
        }
        candidates.sort_by(rank);
        candidates.truncate(limit);
        Ok(candidates)
    }

    /// Cancel a confirmed booking, freeing its tables
    pub async fn cancel_booking(&self, booking_id: &str) -> DomainResult<Booking> {
        let mut booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", booking_id))?;

        booking.cancel()?;
        self.bookings.save(&booking).await?;

        info!(booking_id = %booking.id, "Booking cancelled");
        self.events.publish(DomainEvent::booking_cancelled(&booking));

        Ok(booking)
    }

    async fn load_context(
        &self,
        request: &AllocationRequest,
    ) -> DomainResult<(Restaurant, Vec<DiningTable>)> {
        let restaurant = self
            .restaurants
            .find_by_id(&request.restaurant_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Restaurant", &request.restaurant_id))?;

        let sector = self
            .sectors
            .find_by_id(&request.sector_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Sector", &request.sector_id))?;
        if sector.restaurant_id != restaurant.id {
            return Err(DomainError::not_found("Sector", &request.sector_id));
        }

        let tables = self.tables.find_by_sector(&sector.id).await?;
        Ok((restaurant, tables))
    }

    /// Windows the request runs against: the explicit one (which must overlap
    /// a configured window), or the restaurant's own.
    fn effective_windows(
        &self,
        request: &AllocationRequest,
        restaurant: &Restaurant,
    ) -> DomainResult<Vec<ServiceWindow>> {
        match request.window {
            Some(window) => {
                if restaurant.has_service_windows()
                    && !restaurant.windows.iter().any(|w| w.intersects(&window))
                {
                    return Err(DomainError::OutsideServiceWindow);
                }
                Ok(vec![window])
            }
            None => Ok(restaurant.effective_windows()),
        }
    }

    async fn feasible_candidates(
        &self,
        request: &AllocationRequest,
        restaurant: &Restaurant,
        tables: &[DiningTable],
    ) -> DomainResult<Vec<Candidate>> {
        let windows = self.effective_windows(request, restaurant)?;
        let bookings = self.confirmed_bookings(request, restaurant).await?;

        let mut gaps_by_table: HashMap<String, Vec<Gap>> = HashMap::new();
        for table in tables {
            let table_bookings: Vec<Booking> = bookings
                .iter()
                .filter(|b| b.occupies(&table.id))
                .cloned()
                .collect();
            let entry = gaps_by_table.entry(table.id.clone()).or_default();
            for window in &windows {
                let (start, end) = window.bounds_on(request.date, restaurant.timezone);
                entry.extend(find_gaps(&table_bookings, Gap::new(start, end)));
            }
        }

        Ok(self
            .generator
            .generate(tables, &gaps_by_table, request.party_size, request.duration))
    }

    async fn confirmed_bookings(
        &self,
        request: &AllocationRequest,
        restaurant: &Restaurant,
    ) -> DomainResult<Vec<Booking>> {
        let (day_start, day_end) =
            crate::utils::time::day_bounds(request.date, restaurant.timezone);
        self.bookings
            .find_confirmed_by_sector_and_date(&request.sector_id, day_start, day_end)
            .await
    }

    /// Overlap re-check under the lock; candidates were computed from a
    /// snapshot that may be stale by now.
    async fn ensure_still_free(
        &self,
        request: &AllocationRequest,
        table_ids: &[String],
        interval: TimeInterval,
    ) -> DomainResult<()> {
        let (restaurant, _) = self.load_context(request).await?;
        let bookings = self.confirmed_bookings(request, &restaurant).await?;
        let taken = bookings.iter().any(|b| {
            b.interval.overlaps(&interval) && table_ids.iter().any(|t| b.occupies(t))
        });
        if taken {
            return Err(DomainError::conflict("Selected tables are no longer available"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::domain::{CapacityRange, Sector};
    use chrono::{TimeZone, Timelike};

    fn request(party_size: u32, minutes: u32) -> AllocationRequest {
        AllocationRequest {
            restaurant_id: "r1".into(),
            sector_id: "s1".into(),
            party_size,
            duration: Duration::new(minutes).unwrap(),
            date: crate::utils::time::parse_date("2025-10-22").unwrap(),
            window: None,
        }
    }

    async fn seed(store: &MemoryStore, windows: Vec<ServiceWindow>, tables: &[(&str, u32, u32)]) {
        let now = Utc::now();
        store
            .save_restaurant(&Restaurant {
                id: "r1".into(),
                name: "Test Bistro".into(),
                timezone: chrono_tz::UTC,
                windows,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        store
            .save_sector(&Sector {
                id: "s1".into(),
                restaurant_id: "r1".into(),
                name: "Main".into(),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        for (id, min, max) in tables {
            store
                .save_table(&DiningTable {
                    id: (*id).into(),
                    sector_id: "s1".into(),
                    name: id.to_uppercase(),
                    capacity: CapacityRange::new(*min, *max).unwrap(),
                    created_at: now,
                    updated_at: now,
                })
                .await
                .unwrap();
        }
    }

    fn coordinator(store: &Arc<MemoryStore>) -> AllocationCoordinator {
        AllocationCoordinator::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            EventPublisher::new(),
            CandidateGenerator::default(),
            chrono::Duration::hours(24),
        )
    }

    fn dinner_window() -> ServiceWindow {
        ServiceWindow::parse("20:00", "23:45").unwrap()
    }

    #[tokio::test]
    async fn allocates_the_earliest_slot_of_the_service_window() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, vec![dinner_window()], &[("t1", 2, 4)]).await;
        let coordinator = coordinator(&store);

        let booking = coordinator.create_booking(request(3, 90), None).await.unwrap();

        assert_eq!(booking.table_ids, vec!["t1".to_string()]);
        assert_eq!(booking.interval.start().time().hour(), 20);
        assert_eq!(booking.interval.start().time().minute(), 0);
        assert_eq!(booking.interval.duration_minutes(), 90);
    }

    #[tokio::test]
    async fn rejects_a_party_no_table_set_can_hold() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, vec![dinner_window()], &[("t1", 2, 2), ("t2", 2, 2)]).await;
        let coordinator = coordinator(&store);

        let err = coordinator.create_booking(request(9, 60), None).await.unwrap_err();
        assert!(matches!(err, DomainError::NoCapacity(_)));
    }

    #[tokio::test]
    async fn rejects_an_explicit_window_outside_the_configured_ones() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, vec![dinner_window()], &[("t1", 2, 4)]).await;
        let coordinator = coordinator(&store);

        let mut req = request(2, 60);
        req.window = Some(ServiceWindow::parse("08:00", "10:00").unwrap());
        let err = coordinator.create_booking(req, None).await.unwrap_err();
        assert!(matches!(err, DomainError::OutsideServiceWindow));
    }

    #[tokio::test]
    async fn joins_tables_when_no_single_table_fits() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, vec![dinner_window()], &[("t1", 2, 2), ("t2", 2, 2)]).await;
        let coordinator = coordinator(&store);

        let booking = coordinator.create_booking(request(4, 60), None).await.unwrap();
        assert_eq!(booking.table_ids, vec!["t1".to_string(), "t2".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_attempts_never_double_book() {
        let store = Arc::new(MemoryStore::new());
        // One table, one feasible start: everyone fights for the same slot.
        seed(
            &store,
            vec![ServiceWindow::parse("20:00", "21:30").unwrap()],
            &[("t1", 2, 4)],
        )
        .await;
        let coordinator = Arc::new(coordinator(&store));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let coordinator = coordinator.clone();
            handles.push(tokio::spawn(async move {
                coordinator.create_booking(request(3, 90), None).await
            }));
        }

        let mut confirmed = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => confirmed += 1,
                Err(DomainError::Conflict(_)) | Err(DomainError::NoCapacity(_)) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(confirmed, 1);
        assert_eq!(store.booking_count().await, 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_replays_of_one_key_yield_one_booking() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, vec![dinner_window()], &[("t1", 2, 4)]).await;
        let coordinator = Arc::new(coordinator(&store));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let coordinator = coordinator.clone();
            handles.push(tokio::spawn(async move {
                coordinator
                    .create_booking(request(3, 90), Some("req-42".into()))
                    .await
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }

        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(store.booking_count().await, 1);
    }

    #[tokio::test]
    async fn sequential_replay_returns_the_original_booking() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, vec![dinner_window()], &[("t1", 2, 4)]).await;
        let coordinator = coordinator(&store);

        let first = coordinator
            .create_booking(request(2, 60), Some("key-1".into()))
            .await
            .unwrap();
        let second = coordinator
            .create_booking(request(2, 60), Some("key-1".into()))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.booking_count().await, 1);
    }

    #[tokio::test]
    async fn cancelling_frees_the_slot_for_rebooking() {
        let store = Arc::new(MemoryStore::new());
        seed(
            &store,
            vec![ServiceWindow::parse("20:00", "21:30").unwrap()],
            &[("t1", 2, 4)],
        )
        .await;
        let coordinator = coordinator(&store);

        let first = coordinator.create_booking(request(3, 90), None).await.unwrap();
        let err = coordinator.create_booking(request(3, 90), None).await.unwrap_err();
        assert!(matches!(err, DomainError::NoCapacity(_)));

        coordinator.cancel_booking(&first.id).await.unwrap();
        let second = coordinator.create_booking(request(3, 90), None).await.unwrap();
        assert_eq!(second.interval.start(), first.interval.start());
    }

    #[tokio::test]
    async fn cancelling_twice_is_a_conflict() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, vec![dinner_window()], &[("t1", 2, 4)]).await;
        let coordinator = coordinator(&store);

        let booking = coordinator.create_booking(request(2, 60), None).await.unwrap();
        coordinator.cancel_booking(&booking.id).await.unwrap();
        let err = coordinator.cancel_booking(&booking.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn cancelling_an_unknown_booking_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, vec![dinner_window()], &[("t1", 2, 4)]).await;
        let coordinator = coordinator(&store);

        let err = coordinator.cancel_booking("missing").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn discovery_ranks_best_first_and_respects_the_limit() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, vec![dinner_window()], &[("t1", 2, 4), ("t2", 2, 6)]).await;
        let coordinator = coordinator(&store);

        let candidates = coordinator.discover_seats(request(4, 90), 5).await.unwrap();
        assert_eq!(candidates.len(), 5);
        // t1 with a perfect 4/4 fit outranks everything on t2
        assert_eq!(candidates[0].seating.table_ids(), ["t1".to_string()]);
        assert_eq!(
            candidates[0].start,
            Utc.with_ymd_and_hms(2025, 10, 22, 20, 0, 0).unwrap()
        );
        for pair in candidates.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn multiple_windows_each_yield_candidates_but_the_dead_zone_none() {
        let store = Arc::new(MemoryStore::new());
        seed(
            &store,
            vec![
                ServiceWindow::parse("12:00", "14:00").unwrap(),
                ServiceWindow::parse("20:00", "23:45").unwrap(),
            ],
            &[("t1", 2, 4)],
        )
        .await;
        let coordinator = coordinator(&store);

        let candidates = coordinator.discover_seats(request(3, 60), 50).await.unwrap();

        let in_lunch = candidates.iter().any(|c| c.start.hour() == 12);
        let in_dinner = candidates.iter().any(|c| c.start.hour() >= 20);
        let in_dead_zone = candidates
            .iter()
            .any(|c| c.start.hour() >= 14 && c.start.hour() < 20);
        assert!(in_lunch);
        assert!(in_dinner);
        assert!(!in_dead_zone);
        // every slot still fits inside its own window
        assert!(candidates.iter().all(|c| {
            let end_minutes = c.end.hour() * 60 + c.end.minute();
            end_minutes <= 14 * 60 || c.start.hour() >= 20
        }));
    }

    #[tokio::test]
    async fn zero_windows_means_open_all_day() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, vec![], &[("t1", 2, 4)]).await;
        let coordinator = coordinator(&store);

        let booking = coordinator.create_booking(request(3, 90), None).await.unwrap();

        assert_eq!(booking.interval.start().time().hour(), 0);
        assert_eq!(booking.interval.start().time().minute(), 0);
    }

    #[tokio::test]
    async fn discovery_in_an_empty_sector_reports_no_capacity() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, vec![dinner_window()], &[]).await;
        let coordinator = coordinator(&store);

        let err = coordinator.discover_seats(request(2, 60), 5).await.unwrap_err();
        assert!(matches!(err, DomainError::NoCapacity(_)));
    }

    #[tokio::test]
    async fn zero_party_size_is_rejected_up_front() {
        let store = Arc::new(MemoryStore::new());
        let coordinator = coordinator(&store);
        let err = coordinator.create_booking(request(0, 60), None).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
