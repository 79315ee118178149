//! HTTP Server
//!
//! Router assembly and graceful-shutdown lifecycle.

use std::time::Duration;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::config::Config;
use super::state::ServerState;
use crate::api;
use crate::utils::{AppError, AppResult};

pub struct Server {
    state: ServerState,
}

impl Server {
    pub async fn new(config: &Config) -> AppResult<Self> {
        let state = ServerState::initialize(config).await?;
        Ok(Self::with_state(state))
    }

    pub fn with_state(state: ServerState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &ServerState {
        &self.state
    }

    /// Serve until ctrl-c
    pub async fn run(self) -> AppResult<()> {
        self.state.start_background_tasks();

        let app = router(self.state.clone());
        let addr = format!("0.0.0.0:{}", self.state.config.http_port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

        info!(
            addr,
            environment = %self.state.config.environment,
            storage = self.state.config.storage.as_str(),
            "Server listening"
        );

        let shutdown = self.state.shutdown.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        info!("Shutdown signal received");
                        shutdown.cancel();
                    }
                    _ = shutdown.cancelled() => {}
                }
            })
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

        info!("Server stopped");
        Ok(())
    }
}

/// Full API router with middleware stack
pub fn router(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);
    Router::new()
        .merge(api::health::router())
        .nest("/api/restaurants", api::restaurants::router())
        .nest("/api/sectors", api::sectors::router())
        .nest("/api/tables", api::tables::router())
        .nest("/api/bookings", api::bookings::router())
        .nest("/api/availability", api::availability::router())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
