//! Health and readiness endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Readiness check response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub checks: ReadinessChecks,
}

#[derive(Debug, Serialize)]
pub struct ReadinessChecks {
    pub source: CheckStatus,
    pub cache: CheckStatus,
    pub recommendations: CheckStatus,
}

#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub healthy: bool,
    pub message: String,
}

/// GET /health
///
/// Basic health check - returns 200 if the server is running
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /ready
///
/// Readiness check - verifies the flight-log source is reachable
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    // Check flight-log source
    let source_name = state.engine.source_name();
    let source_check = match state.engine.check_source().await {
        Ok(()) => CheckStatus {
            healthy: true,
            message: format!("{}: reachable", source_name),
        },
        Err(e) => CheckStatus {
            healthy: false,
            message: format!("{}: {}", source_name, e),
        },
    };

    let cache_check = CheckStatus {
        healthy: true,
        message: format!("Airports cached: {}", state.engine.cached_airport_count()),
    };

    let recommendations_check = match &state.recommender {
        Some(generator) => CheckStatus {
            healthy: true,
            message: format!("Generator: {}", generator.name()),
        },
        None => CheckStatus {
            healthy: true, // Recommendations are optional
            message: "Not configured".to_string(),
        },
    };

    let all_healthy = source_check.healthy && cache_check.healthy;
    let status = if all_healthy { "ready" } else { "not_ready" };
    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadinessResponse {
            status,
            checks: ReadinessChecks {
                source: source_check,
                cache: cache_check,
                recommendations: recommendations_check,
            },
        }),
    )
}
