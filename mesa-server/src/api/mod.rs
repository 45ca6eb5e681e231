//! API routes
//!
//! # Structure
//!
//! | Module | Prefix | Access |
//! |--------|--------|--------|
//! | [`health`] | /health | public |
//! | [`menu`] | /api/menu | reads public, writes admin |
//! | [`orders`] | /api/orders | create public, reads/status staff, delete admin |
//! | [`tables`] | /api/tables | reads/status staff, writes admin |
//! | [`availability`] | /api/availability | public |
//! | [`reservations`] | /api/reservations | create public, reads staff, delete admin |
//! | [`contacts`] | /api/contacts | create public, list admin |
//! | [`kitchen`] | /api/kitchen | staff |
//! | [`dashboard`] | /api/dashboard | admin |

pub mod availability;
pub mod contacts;
pub mod dashboard;
pub mod health;
pub mod kitchen;
pub mod logging;
pub mod menu;
pub mod orders;
pub mod reservations;
pub mod tables;

use axum::{Router, middleware};
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::authenticate;
use crate::core::ServerState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id generator
#[derive(Clone, Copy)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Every route, without middleware or state
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(menu::router())
        .merge(orders::router())
        .merge(tables::router())
        .merge(availability::router())
        .merge(reservations::router())
        .merge(contacts::router())
        .merge(kitchen::router())
        .merge(dashboard::router())
}

/// Fully configured application, used by the server and by tests
pub fn build_app(state: ServerState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    build_router()
        // Resolve bearer tokens before the per-group role checks run
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(logging::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, XRequestId))
}
