//! API routes definition

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;

/// Build the API router with all endpoints
pub fn build_router(state: Arc<AppState>, enable_cors: bool) -> Router {
    let mut router = Router::new()
        // Service routes
        .route("/", get(handlers::welcome))
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        // Space routes
        .route("/spaces", get(handlers::list_spaces))
        .route("/spaces/:id", get(handlers::get_space))
        .route("/spaces/:id/enter", post(handlers::enter_space))
        .route("/spaces/:id/leave", post(handlers::leave_space))
        .route("/spaces/:id/users", get(handlers::list_occupants));

    if state.metrics.is_some() {
        router = router.route("/metrics", get(handlers::metrics));
    }

    router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    );

    if enable_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router.with_state(state)
}
