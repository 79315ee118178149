//! Server State
//!
//! Wires repositories, the allocation coordinator and the event bus into one
//! cloneable handle shared by every request handler.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::config::{Config, StorageKind};
use crate::allocation::{AllocationCoordinator, CandidateGenerator};
use crate::db::memory::MemoryStore;
use crate::db::surreal::DbService;
use crate::db::{BookingRepository, RestaurantRepository, SectorRepository, TableRepository};
use crate::domain::DomainResult;
use crate::services::{EventPublisher, WebhookDispatcher};

#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub restaurants: Arc<dyn RestaurantRepository>,
    pub sectors: Arc<dyn SectorRepository>,
    pub tables: Arc<dyn TableRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub coordinator: Arc<AllocationCoordinator>,
    pub events: EventPublisher,
    pub shutdown: CancellationToken,
}

impl ServerState {
    pub async fn initialize(config: &Config) -> DomainResult<Self> {
        let (restaurants, sectors, tables, bookings): (
            Arc<dyn RestaurantRepository>,
            Arc<dyn SectorRepository>,
            Arc<dyn TableRepository>,
            Arc<dyn BookingRepository>,
        ) = match config.storage {
            StorageKind::Memory => {
                info!("Using in-memory storage");
                let store = Arc::new(MemoryStore::new());
                (store.clone(), store.clone(), store.clone(), store)
            }
            StorageKind::Surreal => {
                let path = config.database_dir();
                info!(path = %path.display(), "Opening embedded database");
                let db = DbService::new(&path.to_string_lossy()).await?;
                (
                    Arc::new(db.restaurants()),
                    Arc::new(db.sectors()),
                    Arc::new(db.tables()),
                    Arc::new(db.bookings()),
                )
            }
        };

        let events = EventPublisher::new();
        let coordinator = Arc::new(AllocationCoordinator::new(
            restaurants.clone(),
            sectors.clone(),
            tables.clone(),
            bookings.clone(),
            events.clone(),
            CandidateGenerator::new(config.max_combo_tables),
            chrono::Duration::hours(config.idempotency_ttl_hours),
        ));

        Ok(Self {
            config: Arc::new(config.clone()),
            restaurants,
            sectors,
            tables,
            bookings,
            coordinator,
            events,
            shutdown: CancellationToken::new(),
        })
    }

    /// Spawn long-running background tasks
    pub fn start_background_tasks(&self) {
        let dispatcher = WebhookDispatcher::new(
            self.config.webhook_urls.clone(),
            self.events.clone(),
            self.shutdown.clone(),
        );
        tokio::spawn(dispatcher.run());
    }
}
