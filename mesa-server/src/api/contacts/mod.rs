//! Contact API

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/contacts", routes())
}

fn routes() -> Router<ServerState> {
    let public_routes = Router::new().route("/", post(handler::create));

    let admin_routes = Router::new()
        .route("/", get(handler::list))
        .route_layer(middleware::from_fn(require_admin));

    public_routes.merge(admin_routes)
}
