//! Prometheus metrics endpoint

use axum::response::IntoResponse;
use std::sync::atomic::{AtomicU64, Ordering};

/// HTTP-level counters for Prometheus
#[derive(Default)]
pub struct Metrics {
    /// Total requests processed
    pub requests_total: AtomicU64,
    /// Active WebSocket connections
    ws_connections: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_requests(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_ws_connections(&self) {
        self.ws_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec_ws_connections(&self) {
        self.ws_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn get_metrics(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            ws_connections: self.ws_connections.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub ws_connections: u64,
}

/// GET /metrics
///
/// Returns Prometheus-format metrics
pub async fn prometheus_metrics(
    axum::extract::State(state): axum::extract::State<crate::state::AppState>,
) -> impl IntoResponse {
    let snapshot = state.metrics.get_metrics();
    let engine = state.engine.stats();

    let output = format!(
        r#"# HELP flightpulse_requests_total Total number of HTTP requests processed
# TYPE flightpulse_requests_total counter
flightpulse_requests_total {}

# HELP flightpulse_cache_hits_total Flight-log requests served from a fresh cache entry
# TYPE flightpulse_cache_hits_total counter
flightpulse_cache_hits_total {}

# HELP flightpulse_cache_misses_total Flight-log requests that called the source
# TYPE flightpulse_cache_misses_total counter
flightpulse_cache_misses_total {}

# HELP flightpulse_source_failures_total Source calls that failed or timed out
# TYPE flightpulse_source_failures_total counter
flightpulse_source_failures_total {}

# HELP flightpulse_realtime_updates_total Simulated real-time steps applied
# TYPE flightpulse_realtime_updates_total counter
flightpulse_realtime_updates_total {}

# HELP flightpulse_cached_airports Airports with a cache slot
# TYPE flightpulse_cached_airports gauge
flightpulse_cached_airports {}

# HELP flightpulse_websocket_connections Current number of active WebSocket connections
# TYPE flightpulse_websocket_connections gauge
flightpulse_websocket_connections {}

# HELP flightpulse_info Build information
# TYPE flightpulse_info gauge
flightpulse_info{{version="{}"}} 1
"#,
        snapshot.requests_total,
        engine.cache_hits.load(Ordering::Relaxed),
        engine.cache_misses.load(Ordering::Relaxed),
        engine.source_failures.load(Ordering::Relaxed),
        engine.realtime_updates.load(Ordering::Relaxed),
        state.engine.cached_airport_count(),
        snapshot.ws_connections,
        env!("CARGO_PKG_VERSION"),
    );

    (
        [(axum::http::header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        output,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FlightStatsEngine;
    use crate::routes::router;
    use crate::source::SampleFlightSource;
    use crate::state::AppState;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    #[test]
    fn test_ws_connection_gauge() {
        let metrics = Metrics::new();
        metrics.inc_ws_connections();
        metrics.inc_ws_connections();
        metrics.dec_ws_connections();
        metrics.inc_requests();

        let snapshot = metrics.get_metrics();
        assert_eq!(snapshot.ws_connections, 1);
        assert_eq!(snapshot.requests_total, 1);
    }

    #[tokio::test]
    async fn test_metrics_endpoint_reports_engine_counters() {
        let engine = FlightStatsEngine::new(
            Arc::new(SampleFlightSource::new()),
            Duration::from_secs(300),
            Duration::from_secs(5),
        );
        let state = AppState::new(engine, 8, None);

        let response = router(state.clone())
            .oneshot(
                Request::builder()
                    .uri("/api/v1/airports/JFK/statistics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router(state)
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("flightpulse_cache_misses_total 1\n"));
        assert!(text.contains("flightpulse_cache_hits_total 0\n"));
        assert!(text.contains("flightpulse_cached_airports 1\n"));
        assert!(text.contains("flightpulse_websocket_connections 0\n"));
    }
}
