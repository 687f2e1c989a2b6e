use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// Public reads and admin writes are called from the site and the editor UI,
/// both served from other origins.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
