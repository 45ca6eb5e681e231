//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::utils::{AppJson, AppResult, with_deadline};
use shared::models::{Deleted, MenuFilter, MenuItem, MenuItemCreate, MenuItemUpdate};

/// GET /api/menu - menu items, optionally by category / availability
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<MenuFilter>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let menu = state.menu.clone();
    let items = with_deadline(state.config.request_timeout(), async move {
        menu.list_menu_items(&filter).await
    })
    .await?;
    Ok(Json(items))
}

/// GET /api/menu/:id
pub async fn get_by_id(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<MenuItem>> {
    let menu = state.menu.clone();
    let item = with_deadline(state.config.request_timeout(), async move { menu.get_menu_item(id).await }).await?;
    Ok(Json(item))
}

/// POST /api/menu
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    let menu = state.menu.clone();
    let item = with_deadline(state.config.request_timeout(), async move {
        menu.create_menu_item(payload).await
    })
    .await?;
    Ok(Json(item))
}

/// PUT /api/menu/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    let menu = state.menu.clone();
    let item = with_deadline(state.config.request_timeout(), async move {
        menu.update_menu_item(id, payload).await
    })
    .await?;
    Ok(Json(item))
}

/// DELETE /api/menu/:id
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<Deleted>> {
    let menu = state.menu.clone();
    with_deadline(state.config.request_timeout(), async move { menu.delete_menu_item(id).await }).await?;
    Ok(Json(Deleted::new(id)))
}
