//! Restaurant Repository (SurrealDB)

use async_trait::async_trait;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::records::RestaurantRecord;
use super::repo_err;
use crate::db::RestaurantRepository;
use crate::domain::{DomainResult, Restaurant};

pub struct SurrealRestaurantRepository {
    db: Surreal<Db>,
}

impl SurrealRestaurantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RestaurantRepository for SurrealRestaurantRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Restaurant>> {
        let mut result = self
            .db
            .query("SELECT *, record::id(id) AS id FROM type::thing('restaurant', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(repo_err)?;
        let record: Option<RestaurantRecord> = result.take(0).map_err(repo_err)?;
        record.map(RestaurantRecord::into_domain).transpose()
    }

    async fn find_all(&self) -> DomainResult<Vec<Restaurant>> {
        let mut result = self
            .db
            .query("SELECT *, record::id(id) AS id FROM restaurant ORDER BY name ASC")
            .await
            .map_err(repo_err)?;
        let records: Vec<RestaurantRecord> = result.take(0).map_err(repo_err)?;
        records.into_iter().map(RestaurantRecord::into_domain).collect()
    }

    async fn save(&self, restaurant: &Restaurant) -> DomainResult<()> {
        self.db
            .query("UPSERT type::thing('restaurant', $id) CONTENT $data")
            .bind(("id", restaurant.id.clone()))
            .bind(("data", RestaurantRecord::from_domain(restaurant)))
            .await
            .map_err(repo_err)?
            .check()
            .map_err(repo_err)?;
        Ok(())
    }
}
