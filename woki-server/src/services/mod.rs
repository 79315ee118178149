//! Service Layer — cross-cutting facilities built on the domain

pub mod events;
pub mod webhooks;

pub use events::{DomainEvent, EventPublisher, EventType};
pub use webhooks::WebhookDispatcher;
