//! Booking Repository (SurrealDB)
//!
//! The idempotent save writes the booking and its key record in one
//! transaction, so a crash can never leave a key pointing at nothing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::records::{BookingRecord, KeyRecord};
use super::repo_err;
use crate::db::BookingRepository;
use crate::domain::{Booking, DomainResult};

pub struct SurrealBookingRepository {
    db: Surreal<Db>,
}

impl SurrealBookingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingRepository for SurrealBookingRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>> {
        let mut result = self
            .db
            .query("SELECT *, record::id(id) AS id FROM type::thing('booking', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(repo_err)?;
        let record: Option<BookingRecord> = result.take(0).map_err(repo_err)?;
        record.map(BookingRecord::into_domain).transpose()
    }

    async fn find_confirmed_by_sector_and_date(
        &self,
        sector_id: &str,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>> {
        let mut result = self
            .db
            .query(
                "SELECT *, record::id(id) AS id FROM booking \
                 WHERE sector = $sector AND status = 'CONFIRMED' \
                 AND start_at >= $day_start AND start_at < $day_end \
                 ORDER BY start_at ASC",
            )
            .bind(("sector", sector_id.to_string()))
            .bind(("day_start", day_start.timestamp_millis()))
            .bind(("day_end", day_end.timestamp_millis()))
            .await
            .map_err(repo_err)?;
        let records: Vec<BookingRecord> = result.take(0).map_err(repo_err)?;
        records.into_iter().map(BookingRecord::into_domain).collect()
    }

    async fn find_by_idempotency_key(&self, key: &str) -> DomainResult<Option<Booking>> {
        let mut result = self
            .db
            .query("SELECT booking, expires_at FROM type::thing('idempotency_key', $key)")
            .bind(("key", key.to_string()))
            .await
            .map_err(repo_err)?;
        let record: Option<KeyRecord> = result.take(0).map_err(repo_err)?;

        let Some(record) = record else {
            return Ok(None);
        };
        if record.expires_at <= Utc::now().timestamp_millis() {
            return Ok(None);
        }
        self.find_by_id(&record.booking).await
    }

    async fn save(&self, booking: &Booking) -> DomainResult<()> {
        self.db
            .query("UPSERT type::thing('booking', $id) CONTENT $data")
            .bind(("id", booking.id.clone()))
            .bind(("data", BookingRecord::from_domain(booking)))
            .await
            .map_err(repo_err)?
            .check()
            .map_err(repo_err)?;
        Ok(())
    }

    async fn save_with_idempotency_key(
        &self,
        booking: &Booking,
        key: &str,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.db
            .query(
                "BEGIN TRANSACTION; \
                 UPSERT type::thing('booking', $id) CONTENT $data; \
                 UPSERT type::thing('idempotency_key', $key) \
                 CONTENT { booking: $id, expires_at: $expires_at }; \
                 COMMIT TRANSACTION;",
            )
            .bind(("id", booking.id.clone()))
            .bind(("data", BookingRecord::from_domain(booking)))
            .bind(("key", key.to_string()))
            .bind(("expires_at", expires_at.timestamp_millis()))
            .await
            .map_err(repo_err)?
            .check()
            .map_err(repo_err)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.db
            .query(
                "BEGIN TRANSACTION; \
                 DELETE type::thing('booking', $id); \
                 DELETE idempotency_key WHERE booking = $id; \
                 COMMIT TRANSACTION;",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(repo_err)?
            .check()
            .map_err(repo_err)?;
        Ok(())
    }
}
