//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::{AppJson, AppResult, with_deadline};
use shared::models::{Deleted, DiningTable, DiningTableCreate, DiningTableUpdate, StatusUpdate};

#[derive(Debug, Default, Deserialize)]
pub struct TableQuery {
    pub location: Option<String>,
}

/// GET /api/tables - ordered by location and number
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TableQuery>,
) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = state.tables.clone();
    let list = with_deadline(state.config.request_timeout(), async move {
        tables.list_tables(query.location.as_deref()).await
    })
    .await?;
    Ok(Json(list))
}

/// GET /api/tables/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DiningTable>> {
    let tables = state.tables.clone();
    let table = with_deadline(state.config.request_timeout(), async move { tables.get_table(id).await }).await?;
    Ok(Json(table))
}

/// POST /api/tables
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    let tables = state.tables.clone();
    let table = with_deadline(state.config.request_timeout(), async move {
        tables.create_table(payload).await
    })
    .await?;
    Ok(Json(table))
}

/// PUT /api/tables/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    let tables = state.tables.clone();
    let table = with_deadline(state.config.request_timeout(), async move {
        tables.update_table(id, payload).await
    })
    .await?;
    Ok(Json(table))
}

/// PATCH /api/tables/:id/status - `{ status }`
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<StatusUpdate>,
) -> AppResult<Json<DiningTable>> {
    let tables = state.tables.clone();
    let table = with_deadline(state.config.request_timeout(), async move {
        tables.update_table_status(id, &payload.status).await
    })
    .await?;
    Ok(Json(table))
}

/// DELETE /api/tables/:id - outcome depends on the table delete policy
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<Deleted>> {
    let tables = state.tables.clone();
    with_deadline(state.config.request_timeout(), async move { tables.delete_table(id).await }).await?;
    Ok(Json(Deleted::new(id)))
}
