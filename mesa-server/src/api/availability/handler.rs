//! Availability API Handlers

use axum::{
    Json,
    extract::{Query, State},
};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult, with_deadline};
use shared::models::{Availability, AvailabilityQuery};

/// GET /api/availability?date=YYYY-MM-DD&time=HH:MM
pub async fn check(
    State(state): State<ServerState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<Availability>> {
    let date = query
        .date
        .ok_or_else(|| AppError::required_field("date"))?;
    let time = query
        .time
        .ok_or_else(|| AppError::required_field("time"))?;

    let checker = state.availability.clone();
    let availability = with_deadline(state.config.request_timeout(), async move {
        checker.check_availability(&date, &time).await
    })
    .await?;
    Ok(Json(availability))
}
