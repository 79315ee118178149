//! Booking Endpoints
//!
//! - `POST /api/bookings` — allocate and confirm (honours `Idempotency-Key`)
//! - `GET /api/bookings?sectorId=&date=` — confirmed bookings of a day
//! - `GET /api/bookings/{id}`
//! - `DELETE /api/bookings/{id}` — cancel

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route("/{id}", get(handler::get_by_id).delete(handler::cancel))
}
