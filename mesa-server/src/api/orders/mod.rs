//! Order API
//!
//! Customers place orders anonymously; staff follow them through the
//! kitchen; only admins delete.

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};

use crate::auth::{require_admin, require_staff};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let public_routes = Router::new().route("/", post(handler::create));

    let staff_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", patch(handler::update_status))
        .route_layer(middleware::from_fn(require_staff));

    let admin_routes = Router::new()
        .route("/{id}", delete(handler::delete))
        .route_layer(middleware::from_fn(require_admin));

    public_routes.merge(staff_routes).merge(admin_routes)
}
