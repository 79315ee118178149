//! Sector Repository (SurrealDB)

use async_trait::async_trait;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::records::SectorRecord;
use super::repo_err;
use crate::db::SectorRepository;
use crate::domain::{DomainResult, Sector};

pub struct SurrealSectorRepository {
    db: Surreal<Db>,
}

impl SurrealSectorRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SectorRepository for SurrealSectorRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Sector>> {
        let mut result = self
            .db
            .query("SELECT *, record::id(id) AS id FROM type::thing('sector', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(repo_err)?;
        let record: Option<SectorRecord> = result.take(0).map_err(repo_err)?;
        record.map(SectorRecord::into_domain).transpose()
    }

    async fn find_by_restaurant(&self, restaurant_id: &str) -> DomainResult<Vec<Sector>> {
        let mut result = self
            .db
            .query(
                "SELECT *, record::id(id) AS id FROM sector \
                 WHERE restaurant = $restaurant ORDER BY name ASC",
            )
            .bind(("restaurant", restaurant_id.to_string()))
            .await
            .map_err(repo_err)?;
        let records: Vec<SectorRecord> = result.take(0).map_err(repo_err)?;
        records.into_iter().map(SectorRecord::into_domain).collect()
    }

    async fn save(&self, sector: &Sector) -> DomainResult<()> {
        self.db
            .query("UPSERT type::thing('sector', $id) CONTENT $data")
            .bind(("id", sector.id.clone()))
            .bind(("data", SectorRecord::from_domain(sector)))
            .await
            .map_err(repo_err)?
            .check()
            .map_err(repo_err)?;
        Ok(())
    }
}
