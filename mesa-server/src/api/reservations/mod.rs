//! Reservation API

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::auth::{require_admin, require_staff};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reservations", routes())
}

fn routes() -> Router<ServerState> {
    let public_routes = Router::new().route("/", post(handler::create));

    let staff_routes = Router::new()
        .route("/", get(handler::list))
        .route("/date/{date}", get(handler::list_by_date))
        .route_layer(middleware::from_fn(require_staff));

    let admin_routes = Router::new()
        .route("/{id}", delete(handler::delete))
        .route_layer(middleware::from_fn(require_admin));

    public_routes.merge(staff_routes).merge(admin_routes)
}
