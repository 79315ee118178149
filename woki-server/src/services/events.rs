//! Domain Events (领域事件)
//!
//! Fan-out broadcast of booking lifecycle events. Publishing never blocks and
//! never fails the operation that produced the event; with no subscribers the
//! event is simply dropped.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::Booking;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventType {
    #[serde(rename = "booking.created")]
    BookingCreated,
    #[serde(rename = "booking.cancelled")]
    BookingCancelled,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::BookingCreated => "booking.created",
            EventType::BookingCancelled => "booking.cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DomainEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub payload: serde_json::Value,
    #[serde(rename = "occurredAt")]
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent {
    pub fn booking_created(booking: &Booking) -> Self {
        Self {
            event_type: EventType::BookingCreated,
            payload: booking_payload(booking),
            occurred_at: Utc::now(),
        }
    }

    pub fn booking_cancelled(booking: &Booking) -> Self {
        Self {
            event_type: EventType::BookingCancelled,
            payload: booking_payload(booking),
            occurred_at: Utc::now(),
        }
    }
}

fn booking_payload(booking: &Booking) -> serde_json::Value {
    json!({
        "bookingId": booking.id,
        "restaurantId": booking.restaurant_id,
        "sectorId": booking.sector_id,
        "tableIds": booking.table_ids,
        "partySize": booking.party_size,
        "start": booking.interval.start().to_rfc3339(),
        "end": booking.interval.end().to_rfc3339(),
        "status": booking.status.as_str(),
    })
}

/// Broadcast sender handle; clone freely
#[derive(Debug, Clone)]
pub struct EventPublisher {
    tx: broadcast::Sender<DomainEvent>,
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn publish(&self, event: DomainEvent) {
        if self.tx.send(event).is_err() {
            debug!("No event subscribers, dropping event");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }
}
