//! Kitchen queue API

use axum::{Json, Router, extract::State, middleware, routing::get};

use crate::auth::require_staff;
use crate::core::ServerState;
use crate::utils::{AppResult, with_deadline};
use shared::models::KitchenQueue;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/kitchen/orders", get(queue))
        .route_layer(middleware::from_fn(require_staff))
}

/// GET /api/kitchen/orders - active orders with items, oldest first
async fn queue(State(state): State<ServerState>) -> AppResult<Json<KitchenQueue>> {
    let dashboard = state.dashboard.clone();
    let queue = with_deadline(state.config.request_timeout(), async move { dashboard.kitchen_queue().await }).await?;
    Ok(Json(queue))
}
