//! Admin dashboard API

use axum::{
    Json, Router,
    extract::{Query, State},
    middleware,
    routing::get,
};

use crate::auth::require_admin;
use crate::core::ServerState;
use crate::utils::{AppResult, with_deadline};
use shared::models::{DashboardSummary, SummaryQuery};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/dashboard/summary", get(summary))
        .route_layer(middleware::from_fn(require_admin))
}

/// GET /api/dashboard/summary[?date=YYYY-MM-DD]
async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<DashboardSummary>> {
    let dashboard = state.dashboard.clone();
    let summary = with_deadline(state.config.request_timeout(), async move {
        dashboard.summary(query.date.as_deref()).await
    })
    .await?;
    Ok(Json(summary))
}
