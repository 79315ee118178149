use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::core::ServerState;
use crate::domain::{Restaurant, ServiceWindow};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize, Serialize)]
pub struct WindowDto {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestaurantRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    /// IANA timezone name, e.g. `Europe/Madrid`
    pub timezone: String,
    #[serde(default)]
    pub windows: Vec<WindowDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantResponse {
    pub id: String,
    pub name: String,
    pub timezone: String,
    pub windows: Vec<WindowDto>,
    pub created_at: String,
}

impl From<&Restaurant> for RestaurantResponse {
    fn from(r: &Restaurant) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            timezone: r.timezone.name().to_string(),
            windows: r
                .windows
                .iter()
                .map(|w| WindowDto {
                    start: w.format_start(),
                    end: w.format_end(),
                })
                .collect(),
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(request): Json<CreateRestaurantRequest>,
) -> AppResult<(StatusCode, Json<RestaurantResponse>)> {
    request
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let timezone = request
        .timezone
        .parse()
        .map_err(|_| AppError::validation(format!("Unknown timezone: {}", request.timezone)))?;
    let windows = request
        .windows
        .iter()
        .map(|w| ServiceWindow::parse(&w.start, &w.end))
        .collect::<Result<Vec<_>, _>>()?;

    let now = Utc::now();
    let restaurant = Restaurant {
        id: Uuid::new_v4().to_string(),
        name: request.name,
        timezone,
        windows,
        created_at: now,
        updated_at: now,
    };
    state.restaurants.save(&restaurant).await?;

    Ok((StatusCode::CREATED, Json(RestaurantResponse::from(&restaurant))))
}

pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<RestaurantResponse>>> {
    let restaurants = state.restaurants.find_all().await?;
    Ok(Json(restaurants.iter().map(RestaurantResponse::from).collect()))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<RestaurantResponse>> {
    let restaurant = state
        .restaurants
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {id} not found")))?;
    Ok(Json(RestaurantResponse::from(&restaurant)))
}
