//! Seat Discovery Endpoint
//!
//! `GET /api/availability` — ranked seating candidates without committing
//! to any of them.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/", get(handler::discover))
}
