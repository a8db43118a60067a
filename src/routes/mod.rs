//! HTTP and WebSocket surface

pub mod airports;
pub mod health;
pub mod metrics;
pub mod realtime;
pub mod ws;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health and metrics (Kubernetes liveness/readiness + Prometheus)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/metrics", get(metrics::prometheus_metrics))
        // Airport analytics
        .route("/api/v1/airports/:code/flights", get(airports::get_flights))
        .route("/api/v1/airports/:code/statistics", get(airports::get_statistics))
        .route("/api/v1/airports/:code/peak-hours", get(airports::get_peak_hours))
        .route(
            "/api/v1/airports/:code/recommendations",
            get(airports::get_recommendations),
        )
        .route("/api/v1/airlines/:flight_number", get(airports::get_airline))
        // Real-time simulation and streaming
        .route("/api/v1/airports/:code/realtime", post(realtime::advance))
        .route("/api/v1/airports/:code/ws", get(ws::ws_handler))
        .layer(middleware::from_fn_with_state(state.clone(), count_requests))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn count_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.metrics.inc_requests();
    next.run(request).await
}
