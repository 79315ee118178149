//! Embedded SurrealDB Backend
//!
//! RocksDB-backed embedded database. Records live in the `woki` namespace,
//! `bookings` database; one repository struct per table.

mod booking;
mod dining_table;
mod records;
mod restaurant;
mod sector;

pub use booking::SurrealBookingRepository;
pub use dining_table::SurrealTableRepository;
pub use restaurant::SurrealRestaurantRepository;
pub use sector::SurrealSectorRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::domain::{DomainError, DomainResult};

/// Shared embedded database handle
#[derive(Debug, Clone)]
pub struct DbService {
    db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at `path`
    pub async fn new(path: &str) -> DomainResult<Self> {
        let db = Surreal::new::<RocksDb>(path).await.map_err(repo_err)?;
        db.use_ns("woki").use_db("bookings").await.map_err(repo_err)?;
        Ok(Self { db })
    }

    pub fn restaurants(&self) -> SurrealRestaurantRepository {
        SurrealRestaurantRepository::new(self.db.clone())
    }

    pub fn sectors(&self) -> SurrealSectorRepository {
        SurrealSectorRepository::new(self.db.clone())
    }

    pub fn tables(&self) -> SurrealTableRepository {
        SurrealTableRepository::new(self.db.clone())
    }

    pub fn bookings(&self) -> SurrealBookingRepository {
        SurrealBookingRepository::new(self.db.clone())
    }
}

pub(crate) fn repo_err(e: surrealdb::Error) -> DomainError {
    DomainError::repository(e.to_string())
}
