//! HTTP API (接口层)
//!
//! One module per resource, each exporting a `router()`. Request and
//! response DTOs are camelCase on the wire and converted at the handler
//! boundary; the domain types never touch serde.

pub mod availability;
pub mod bookings;
pub mod health;
pub mod restaurants;
pub mod sectors;
pub mod tables;
