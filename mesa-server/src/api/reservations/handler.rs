//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::utils::{AppJson, AppResult, with_deadline};
use shared::models::{Deleted, Reservation, ReservationCreate};

/// POST /api/reservations
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<ReservationCreate>,
) -> AppResult<Json<Reservation>> {
    let reservations = state.reservations.clone();
    let reservation = with_deadline(state.config.request_timeout(), async move {
        reservations.create_reservation(payload).await
    })
    .await?;
    Ok(Json(reservation))
}

/// GET /api/reservations - newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Reservation>>> {
    let reservations = state.reservations.clone();
    let list = with_deadline(state.config.request_timeout(), async move {
        reservations.list_reservations().await
    })
    .await?;
    Ok(Json(list))
}

/// GET /api/reservations/date/:date - by time, served from the 30s cache
pub async fn list_by_date(
    State(state): State<ServerState>,
    Path(date): Path<String>,
) -> AppResult<Json<Vec<Reservation>>> {
    let reservations = state.reservations.clone();
    let list = with_deadline(state.config.request_timeout(), async move {
        reservations.list_by_date(&date).await
    })
    .await?;
    Ok(Json(list))
}

/// DELETE /api/reservations/:id
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<Deleted>> {
    let reservations = state.reservations.clone();
    with_deadline(state.config.request_timeout(), async move {
        reservations.delete_reservation(id).await
    })
    .await?;
    Ok(Json(Deleted::new(id)))
}
