use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::core::ServerState;
use crate::domain::Sector;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSectorRequest {
    #[validate(length(min = 1))]
    pub restaurant_id: String,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSectorsQuery {
    pub restaurant_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorResponse {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub created_at: String,
}

impl From<&Sector> for SectorResponse {
    fn from(s: &Sector) -> Self {
        Self {
            id: s.id.clone(),
            restaurant_id: s.restaurant_id.clone(),
            name: s.name.clone(),
            created_at: s.created_at.to_rfc3339(),
        }
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(request): Json<CreateSectorRequest>,
) -> AppResult<(StatusCode, Json<SectorResponse>)> {
    request
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    state
        .restaurants
        .find_by_id(&request.restaurant_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Restaurant {} not found", request.restaurant_id))
        })?;

    let now = Utc::now();
    let sector = Sector {
        id: Uuid::new_v4().to_string(),
        restaurant_id: request.restaurant_id,
        name: request.name,
        created_at: now,
        updated_at: now,
    };
    state.sectors.save(&sector).await?;

    Ok((StatusCode::CREATED, Json(SectorResponse::from(&sector))))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListSectorsQuery>,
) -> AppResult<Json<Vec<SectorResponse>>> {
    let sectors = state.sectors.find_by_restaurant(&query.restaurant_id).await?;
    Ok(Json(sectors.iter().map(SectorResponse::from).collect()))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<SectorResponse>> {
    let sector = state
        .sectors
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Sector {id} not found")))?;
    Ok(Json(SectorResponse::from(&sector)))
}
