//! HTTP surface of the brand site CMS: public page reads, bearer-guarded
//! admin writes and an SSE change feed.

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

use crate::state::AppState;

/// Largest admin request body accepted.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Router with every route group and the standard middleware stack.
pub fn build_app(state: AppState) -> Router {
    routes::build_router(state).layer(
        ServiceBuilder::new()
            .layer(middleware::request_tracing::trace_layer())
            .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
            .layer(middleware::cors::cors_layer()),
    )
}
