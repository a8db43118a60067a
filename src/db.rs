//! Database access layer with SQLx and PostgreSQL

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::models::{FlightRecord, FlightStatus};
use crate::source::FlightLogSource;

/// Database connection pool and flight-log queries
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    pub async fn new(connection_string: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .connect(connection_string)
            .await
            .map_err(|e| AppError::SourceUnavailable(format!("Failed to connect: {}", e)))?;

        info!("Database connection pool established");
        Ok(Self { pool })
    }

    /// Get the underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Load all flights filed under an airport, in departure order
    pub async fn get_flights(&self, airport_code: &str) -> Result<Vec<FlightRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT
                id, flight_number, origin, destination,
                scheduled_departure, scheduled_arrival,
                actual_departure, actual_arrival,
                status, delay_minutes, aircraft, airport_code
            FROM flights
            WHERE airport_code = $1
            ORDER BY scheduled_departure ASC
            "#,
        )
        .bind(airport_code)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_flight).collect()
    }
}

#[async_trait]
impl FlightLogSource for Database {
    async fn fetch_flights(&self, airport_code: &str) -> Result<Vec<FlightRecord>> {
        self.get_flights(airport_code).await
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").fetch_one(self.pool()).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}

/// Decode one `flights` row; the derived fields are recomputed from the
/// scheduled timestamps.
fn row_to_flight(row: &PgRow) -> Result<FlightRecord> {
    let id: String = row.try_get("id")?;
    let status_text: String = row.try_get("status")?;
    let status = string_to_status(&status_text).ok_or_else(|| {
        AppError::SourceUnavailable(format!("Unknown status '{}' for flight {}", status_text, id))
    })?;
    let departure: DateTime<Utc> = row.try_get("scheduled_departure")?;
    let arrival: DateTime<Utc> = row.try_get("scheduled_arrival")?;
    let delay: Option<i32> = row.try_get("delay_minutes")?;

    let mut flight = FlightRecord::new(
        id,
        row.try_get::<String, _>("flight_number")?,
        row.try_get::<String, _>("origin")?,
        row.try_get::<String, _>("destination")?,
        departure,
        arrival,
        status,
        row.try_get::<String, _>("airport_code")?,
    );
    flight.actual_departure = row.try_get("actual_departure")?;
    flight.actual_arrival = row.try_get("actual_arrival")?;
    flight.delay_minutes = delay.map(i64::from);
    flight.aircraft = row.try_get("aircraft")?;

    Ok(flight)
}

/// Convert a database status string to FlightStatus
fn string_to_status(s: &str) -> Option<FlightStatus> {
    let status = FlightStatus::parse(s);
    if status.is_none() {
        warn!(status = s, "Unrecognised flight status in database");
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_to_status() {
        assert_eq!(string_to_status("ARRIVED"), Some(FlightStatus::Arrived));
        assert_eq!(string_to_status("cancelled"), Some(FlightStatus::Cancelled));
        assert_eq!(string_to_status("diverted"), None);
    }
}
