//! Axum router configuration with middleware.
//!
//! All routes are under `/api/`.
//! Middleware: CORS (any origin, so a static frontend can call us), tracing.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/start",
            post(handlers::session::start_post).get(handlers::session::start_get),
        )
        .route("/chat", post(handlers::chat::chat))
        .route("/reset", post(handlers::session::reset));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
