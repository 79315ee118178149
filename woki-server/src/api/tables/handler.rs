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
use crate::domain::{CapacityRange, DiningTable};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableRequest {
    #[validate(length(min = 1))]
    pub sector_id: String,
    #[validate(length(min = 1, max = 60))]
    pub name: String,
    pub min_size: u32,
    pub max_size: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTablesQuery {
    pub sector_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableResponse {
    pub id: String,
    pub sector_id: String,
    pub name: String,
    pub min_size: u32,
    pub max_size: u32,
    pub created_at: String,
}

impl From<&DiningTable> for TableResponse {
    fn from(t: &DiningTable) -> Self {
        Self {
            id: t.id.clone(),
            sector_id: t.sector_id.clone(),
            name: t.name.clone(),
            min_size: t.capacity.min(),
            max_size: t.capacity.max(),
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(request): Json<CreateTableRequest>,
) -> AppResult<(StatusCode, Json<TableResponse>)> {
    request
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    state
        .sectors
        .find_by_id(&request.sector_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Sector {} not found", request.sector_id)))?;

    let now = Utc::now();
    let table = DiningTable {
        id: Uuid::new_v4().to_string(),
        sector_id: request.sector_id,
        name: request.name,
        capacity: CapacityRange::new(request.min_size, request.max_size)?,
        created_at: now,
        updated_at: now,
    };
    state.tables.save(&table).await?;

    Ok((StatusCode::CREATED, Json(TableResponse::from(&table))))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListTablesQuery>,
) -> AppResult<Json<Vec<TableResponse>>> {
    let tables = state.tables.find_by_sector(&query.sector_id).await?;
    Ok(Json(tables.iter().map(TableResponse::from).collect()))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<TableResponse>> {
    let table = state
        .tables
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {id} not found")))?;
    Ok(Json(TableResponse::from(&table)))
}
