//! Real-time simulation endpoint

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::models::{normalize_airport_code, RealTimeSnapshot};
use crate::state::AppState;

/// Advance an airport's simulated live state and publish the new snapshot.
///
/// Shared by the HTTP endpoint and the background real-time task.
pub async fn publish_real_time(state: &AppState, airport_code: &str) -> Result<Arc<RealTimeSnapshot>> {
    let flights = state.engine.advance_real_time(airport_code).await?;
    let snapshot = Arc::new(RealTimeSnapshot {
        airport_code: airport_code.to_string(),
        generated_at: Utc::now(),
        flights: flights.as_ref().clone(),
    });

    // Ignore send errors (no subscribers connected)
    let receivers = state.broadcast_tx.send(Arc::clone(&snapshot)).unwrap_or(0);
    debug!(airport = %airport_code, receivers = receivers, "Published real-time snapshot");

    Ok(snapshot)
}

/// POST /api/v1/airports/:code/realtime
///
/// Applies one simulation step to the cached log, stores it and returns it.
/// Not idempotent.
pub async fn advance(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<RealTimeSnapshot>> {
    let airport_code = normalize_airport_code(&code)?;
    let snapshot = publish_real_time(&state, &airport_code).await?;
    Ok(Json(snapshot.as_ref().clone()))
}
