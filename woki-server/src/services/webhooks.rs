//! Webhook Dispatch
//!
//! Background task that forwards domain events to configured HTTP endpoints.
//! Delivery is fire-and-forget: failures are logged, never retried into the
//! booking path.

use reqwest::Client;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::events::{DomainEvent, EventPublisher};

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct WebhookDispatcher {
    client: Client,
    endpoints: Vec<String>,
    events: EventPublisher,
    shutdown: CancellationToken,
}

impl WebhookDispatcher {
    pub fn new(endpoints: Vec<String>, events: EventPublisher, shutdown: CancellationToken) -> Self {
        let client = Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoints,
            events,
            shutdown,
        }
    }

    /// Consume events until shutdown. Spawn this once at startup.
    pub async fn run(self) {
        if self.endpoints.is_empty() {
            debug!("No webhook endpoints configured, dispatcher idle");
            return;
        }
        info!(endpoints = self.endpoints.len(), "Webhook dispatcher started");

        let mut rx = self.events.subscribe();
        loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Ok(event) => self.deliver(&event).await,
                    Err(RecvError::Lagged(missed)) => {
                        warn!(missed, "Webhook dispatcher lagged, events dropped");
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = self.shutdown.cancelled() => {
                    info!("Webhook dispatcher shutting down");
                    break;
                }
            }
        }
    }

    async fn deliver(&self, event: &DomainEvent) {
        let posts = self.endpoints.iter().map(|endpoint| {
            let client = self.client.clone();
            async move {
                match client.post(endpoint).json(event).send().await {
                    Ok(response) if response.status().is_success() => {
                        debug!(%endpoint, event = event.event_type.as_str(), "Webhook delivered");
                    }
                    Ok(response) => {
                        warn!(
                            %endpoint,
                            status = %response.status(),
                            "Webhook endpoint rejected event"
                        );
                    }
                    Err(e) => {
                        warn!(%endpoint, error = %e, "Webhook delivery failed");
                    }
                }
            }
        });
        futures::future::join_all(posts).await;
    }
}
