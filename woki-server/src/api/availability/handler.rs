use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::allocation::{AllocationRequest, Candidate};
use crate::core::ServerState;
use crate::domain::{Duration, SLOT_MINUTES, ServiceWindow};
use crate::utils::{AppError, AppResult, time};

const DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverSeatsQuery {
    pub restaurant_id: String,
    pub sector_id: String,
    pub party_size: u32,
    pub duration_minutes: u32,
    pub date: String,
    pub window_start: Option<String>,
    pub window_end: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResponse {
    pub kind: &'static str,
    pub table_ids: Vec<String>,
    pub min_size: u32,
    pub max_size: u32,
    pub start: String,
    pub end: String,
    pub score: f64,
}

impl From<&Candidate> for CandidateResponse {
    fn from(c: &Candidate) -> Self {
        Self {
            kind: if c.seating.is_single() { "single" } else { "combo" },
            table_ids: c.seating.table_ids().to_vec(),
            min_size: c.capacity.min(),
            max_size: c.capacity.max(),
            start: c.start.to_rfc3339(),
            end: c.end.to_rfc3339(),
            score: c.score,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverSeatsResponse {
    pub slot_minutes: u32,
    pub duration_minutes: u32,
    pub candidates: Vec<CandidateResponse>,
}

pub async fn discover(
    State(state): State<ServerState>,
    Query(query): Query<DiscoverSeatsQuery>,
) -> AppResult<Json<DiscoverSeatsResponse>> {
    let window = match (&query.window_start, &query.window_end) {
        (Some(start), Some(end)) => Some(ServiceWindow::parse(start, end)?),
        (None, None) => None,
        _ => {
            return Err(AppError::validation(
                "windowStart and windowEnd must be provided together",
            ));
        }
    };

    let duration_minutes = query.duration_minutes;
    let request = AllocationRequest {
        restaurant_id: query.restaurant_id,
        sector_id: query.sector_id,
        party_size: query.party_size,
        duration: Duration::new(duration_minutes)?,
        date: time::parse_date(&query.date)?,
        window,
    };
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 100);

    let candidates = state.coordinator.discover_seats(request, limit).await?;

    Ok(Json(DiscoverSeatsResponse {
        slot_minutes: SLOT_MINUTES,
        duration_minutes,
        candidates: candidates.iter().map(CandidateResponse::from).collect(),
    }))
}
