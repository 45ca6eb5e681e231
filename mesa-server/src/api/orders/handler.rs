//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::utils::{AppJson, AppResult, with_deadline};
use shared::models::{CreateOrderRequest, Deleted, Order, OrderDetail, OrderFilter, StatusUpdate};

/// GET /api/orders - newest first, `?status=&location=`
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<OrderFilter>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.orders.clone();
    let list = with_deadline(state.config.request_timeout(), async move {
        orders.list_orders(&filter).await
    })
    .await?;
    Ok(Json(list))
}

/// GET /api/orders/:id - order with its items
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let orders = state.orders.clone();
    let detail = with_deadline(state.config.request_timeout(), async move { orders.get_order(id).await }).await?;
    Ok(Json(detail))
}

/// POST /api/orders - `{ order, items[] }`
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<CreateOrderRequest>,
) -> AppResult<Json<OrderDetail>> {
    let orders = state.orders.clone();
    let detail = with_deadline(state.config.request_timeout(), async move {
        orders.create_order(payload).await
    })
    .await?;
    Ok(Json(detail))
}

/// PATCH /api/orders/:id/status - `{ status }`
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<StatusUpdate>,
) -> AppResult<Json<Order>> {
    let orders = state.orders.clone();
    let order = with_deadline(state.config.request_timeout(), async move {
        orders.update_order_status(id, &payload.status).await
    })
    .await?;
    Ok(Json(order))
}

/// DELETE /api/orders/:id
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<Deleted>> {
    let orders = state.orders.clone();
    with_deadline(state.config.request_timeout(), async move { orders.delete_order(id).await }).await?;
    Ok(Json(Deleted::new(id)))
}
