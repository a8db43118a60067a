//! Airport analytics API endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::warn;

use crate::airlines::airline_name;
use crate::error::{AppError, Result};
use crate::models::{
    normalize_airport_code, AirlineResponse, AirportStatistics, FlightsResponse, PeakHoursResponse,
};
use crate::services::recommendations::{parse_recommendations, Recommendations};
use crate::state::AppState;

/// GET /api/v1/airports/:code/flights
///
/// Returns the cached flight log, refreshing it when stale.
pub async fn get_flights(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<FlightsResponse>> {
    let airport_code = normalize_airport_code(&code)?;
    let flights = state.engine.get_flight_log(&airport_code).await?;

    Ok(Json(FlightsResponse {
        airport_code,
        count: flights.len(),
        flights: flights.as_ref().clone(),
    }))
}

/// GET /api/v1/airports/:code/statistics
pub async fn get_statistics(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<AirportStatistics>> {
    let airport_code = normalize_airport_code(&code)?;
    let stats = state.engine.get_airport_statistics(&airport_code).await?;
    Ok(Json(stats))
}

/// GET /api/v1/airports/:code/peak-hours
///
/// Hourly flight counts, busiest first. Hours without flights are omitted.
pub async fn get_peak_hours(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<PeakHoursResponse>> {
    let airport_code = normalize_airport_code(&code)?;
    let buckets = state.engine.get_peak_hour_analysis(&airport_code).await?;

    Ok(Json(PeakHoursResponse {
        airport_code,
        buckets,
    }))
}

/// GET /api/v1/airports/:code/recommendations
///
/// Runs the configured generator over the airport's statistics. Malformed
/// generator output yields the fallback recommendations, never an error.
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Recommendations>> {
    let generator = state
        .recommender
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Recommendation generator not configured".into()))?;

    let airport_code = normalize_airport_code(&code)?;
    let stats = state.engine.get_airport_statistics(&airport_code).await?;
    let peak_hours = state.engine.get_peak_hour_analysis(&airport_code).await?;

    let recommendations = match generator.generate(&stats, &peak_hours).await {
        Ok(raw) => parse_recommendations(&raw),
        Err(e) => {
            warn!(
                generator = generator.name(),
                airport = %airport_code,
                error = %e,
                "Recommendation generator failed, using fallback"
            );
            Recommendations::fallback()
        }
    };

    Ok(Json(recommendations))
}

/// GET /api/v1/airlines/:flight_number
pub async fn get_airline(Path(flight_number): Path<String>) -> Json<AirlineResponse> {
    let airline = airline_name(&flight_number);
    Json(AirlineResponse {
        flight_number,
        airline,
    })
}
