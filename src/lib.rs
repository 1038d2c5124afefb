use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;
pub mod registry;
pub mod validation;

use registry::ToolRegistry;
use validation::ValidationLimits;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ToolRegistry>,
    pub limits: ValidationLimits,
}

impl AppState {
    pub fn new(registry: Arc<ToolRegistry>, limits: ValidationLimits) -> Self {
        Self { registry, limits }
    }
}

pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("mcp-session-id"),
        ]);

    Router::new()
        .route(
            "/",
            get(http::handlers::discovery)
                .post(http::handlers::mcp_endpoint)
                .options(http::handlers::preflight),
        )
        .route("/health", get(http::handlers::health))
        .layer(cors)
        .layer(middleware::from_fn(
            http::handlers::security_headers_middleware,
        ))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
