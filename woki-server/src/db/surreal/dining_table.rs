//! Dining Table Repository (SurrealDB)

use async_trait::async_trait;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::records::TableRecord;
use super::repo_err;
use crate::db::TableRepository;
use crate::domain::{DiningTable, DomainResult};

pub struct SurrealTableRepository {
    db: Surreal<Db>,
}

impl SurrealTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TableRepository for SurrealTableRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<DiningTable>> {
        let mut result = self
            .db
            .query("SELECT *, record::id(id) AS id FROM type::thing('dining_table', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(repo_err)?;
        let record: Option<TableRecord> = result.take(0).map_err(repo_err)?;
        record.map(TableRecord::into_domain).transpose()
    }

    async fn find_by_sector(&self, sector_id: &str) -> DomainResult<Vec<DiningTable>> {
        let mut result = self
            .db
            .query(
                "SELECT *, record::id(id) AS id FROM dining_table \
                 WHERE sector = $sector ORDER BY name ASC",
            )
            .bind(("sector", sector_id.to_string()))
            .await
            .map_err(repo_err)?;
        let records: Vec<TableRecord> = result.take(0).map_err(repo_err)?;
        records.into_iter().map(TableRecord::into_domain).collect()
    }

    async fn save(&self, table: &DiningTable) -> DomainResult<()> {
        self.db
            .query("UPSERT type::thing('dining_table', $id) CONTENT $data")
            .bind(("id", table.id.clone()))
            .bind(("data", TableRecord::from_domain(table)))
            .await
            .map_err(repo_err)?
            .check()
            .map_err(repo_err)?;
        Ok(())
    }
}
