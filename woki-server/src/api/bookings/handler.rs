use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::allocation::AllocationRequest;
use crate::core::ServerState;
use crate::domain::{Booking, Duration, ServiceWindow};
use crate::utils::{AppError, AppResult, time};

const IDEMPOTENCY_HEADER: &str = "idempotency-key";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[validate(length(min = 1))]
    pub restaurant_id: String,
    #[validate(length(min = 1))]
    pub sector_id: String,
    #[validate(range(min = 1))]
    pub party_size: u32,
    pub duration_minutes: u32,
    /// Local calendar date, `YYYY-MM-DD`
    pub date: String,
    pub window_start: Option<String>,
    pub window_end: Option<String>,
}

impl CreateBookingRequest {
    fn into_allocation_request(self) -> AppResult<AllocationRequest> {
        let window = match (&self.window_start, &self.window_end) {
            (Some(start), Some(end)) => Some(ServiceWindow::parse(start, end)?),
            (None, None) => None,
            _ => {
                return Err(AppError::validation(
                    "windowStart and windowEnd must be provided together",
                ));
            }
        };
        Ok(AllocationRequest {
            restaurant_id: self.restaurant_id,
            sector_id: self.sector_id,
            party_size: self.party_size,
            duration: Duration::new(self.duration_minutes)?,
            date: time::parse_date(&self.date)?,
            window,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBookingsQuery {
    pub sector_id: String,
    pub date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: String,
    pub restaurant_id: String,
    pub sector_id: String,
    pub table_ids: Vec<String>,
    pub party_size: u32,
    pub start: String,
    pub end: String,
    pub duration_minutes: u32,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Booking> for BookingResponse {
    fn from(b: &Booking) -> Self {
        Self {
            id: b.id.clone(),
            restaurant_id: b.restaurant_id.clone(),
            sector_id: b.sector_id.clone(),
            table_ids: b.table_ids.clone(),
            party_size: b.party_size,
            start: b.interval.start().to_rfc3339(),
            end: b.interval.end().to_rfc3339(),
            duration_minutes: b.duration.minutes(),
            status: b.status.as_str().to_string(),
            created_at: b.created_at.to_rfc3339(),
            updated_at: b.updated_at.to_rfc3339(),
        }
    }
}

pub async fn create(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(request): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingResponse>)> {
    request
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let idempotency_key = headers
        .get(IDEMPOTENCY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(String::from);

    let booking = state
        .coordinator
        .create_booking(request.into_allocation_request()?, idempotency_key)
        .await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(&booking))))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListBookingsQuery>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let sector = state
        .sectors
        .find_by_id(&query.sector_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Sector {} not found", query.sector_id)))?;
    let restaurant = state
        .restaurants
        .find_by_id(&sector.restaurant_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Restaurant {} not found", sector.restaurant_id))
        })?;

    let date = time::parse_date(&query.date)?;
    let (day_start, day_end) = time::day_bounds(date, restaurant.timezone);
    let bookings = state
        .bookings
        .find_confirmed_by_sector_and_date(&sector.id, day_start, day_end)
        .await?;

    Ok(Json(bookings.iter().map(BookingResponse::from).collect()))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state
        .bookings
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {id} not found")))?;
    Ok(Json(BookingResponse::from(&booking)))
}

pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state.coordinator.cancel_booking(&id).await?;
    Ok(Json(BookingResponse::from(&booking)))
}
