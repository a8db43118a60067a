//! Core domain models for FlightPulse

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Trim and upper-case an airport code, rejecting anything that is not
/// 3-4 ASCII letters.
pub fn normalize_airport_code(raw: &str) -> Result<String> {
    let code = raw.trim().to_ascii_uppercase();
    let valid = (3..=4).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphabetic());
    if !valid {
        return Err(AppError::InvalidRequest(format!(
            "Invalid airport code '{}'",
            raw
        )));
    }
    Ok(code)
}

/// Lifecycle status of a flight leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightStatus {
    /// Flight is on the schedule and has not departed
    Scheduled,
    /// Flight is running late
    Delayed,
    /// Flight has left the gate
    Departed,
    /// Flight has landed
    Arrived,
    /// Flight will not operate
    Cancelled,
}

impl FlightStatus {
    /// Parse a stored status string, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SCHEDULED" => Some(FlightStatus::Scheduled),
            "DELAYED" => Some(FlightStatus::Delayed),
            "DEPARTED" => Some(FlightStatus::Departed),
            "ARRIVED" => Some(FlightStatus::Arrived),
            "CANCELLED" => Some(FlightStatus::Cancelled),
            _ => None,
        }
    }
}

/// A single observed or scheduled flight leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    /// Opaque unique identifier
    pub id: String,
    /// Carrier code followed by digits, e.g. "AA100"
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub scheduled_departure: DateTime<Utc>,
    pub scheduled_arrival: DateTime<Utc>,
    #[serde(default)]
    pub actual_departure: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actual_arrival: Option<DateTime<Utc>>,
    /// Hour of day (0-23) of the scheduled departure
    pub scheduled_hour: u32,
    /// Day of week (0-6, Sunday = 0) of the scheduled departure
    pub day_of_week: u32,
    /// Scheduled arrival minus scheduled departure; negative for malformed legs
    pub duration_minutes: i64,
    pub status: FlightStatus,
    /// Minutes late; absent when unknown
    #[serde(default)]
    pub delay_minutes: Option<i64>,
    #[serde(default)]
    pub aircraft: Option<String>,
    /// Airport whose log this record is filed under
    pub airport_code: String,
}

impl FlightRecord {
    /// Build a record, deriving the hour, weekday and duration fields from
    /// the scheduled timestamps.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        flight_number: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        scheduled_departure: DateTime<Utc>,
        scheduled_arrival: DateTime<Utc>,
        status: FlightStatus,
        airport_code: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            flight_number: flight_number.into(),
            origin: origin.into(),
            destination: destination.into(),
            scheduled_departure,
            scheduled_arrival,
            actual_departure: None,
            actual_arrival: None,
            scheduled_hour: scheduled_departure.hour(),
            day_of_week: scheduled_departure.weekday().num_days_from_sunday(),
            duration_minutes: (scheduled_arrival - scheduled_departure).num_minutes(),
            status,
            delay_minutes: None,
            aircraft: None,
            airport_code: airport_code.into(),
        }
    }

    pub fn with_delay(mut self, delay_minutes: i64) -> Self {
        self.delay_minutes = Some(delay_minutes);
        self
    }

    pub fn with_aircraft(mut self, aircraft: impl Into<String>) -> Self {
        self.aircraft = Some(aircraft.into());
        self
    }

    /// Delay with the "absent means zero" convention applied
    #[inline]
    pub fn delay_or_zero(&self) -> i64 {
        self.delay_minutes.unwrap_or(0)
    }
}

/// Counts of flights by delay magnitude
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayDistribution {
    /// |delay| < 15 minutes, including flights with no recorded delay
    pub minor: usize,
    /// 15 <= |delay| <= 59 minutes
    pub major: usize,
    /// |delay| >= 60 minutes
    pub critical: usize,
}

impl DelayDistribution {
    pub fn total(&self) -> usize {
        self.minor + self.major + self.critical
    }
}

/// Summary statistics for one airport's flight log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportStatistics {
    pub airport_code: String,
    pub total_flights: usize,
    pub delayed_flights: usize,
    /// Mean delay in minutes, rounded to 2 decimals
    pub avg_delay: f64,
    /// Busiest scheduled hour; `None` for an empty log
    pub peak_hour: Option<u32>,
    pub peak_flights: usize,
    pub delay_distribution: DelayDistribution,
    /// Heuristic percentage, rounded to 2 decimals
    pub capacity_utilization: f64,
}

/// Flights scheduled in one hour of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakHourBucket {
    pub hour: u32,
    pub flight_count: usize,
    /// Percentage (0-100) relative to the busiest bucket
    pub utilization: u32,
}

/// Snapshot pushed to real-time subscribers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealTimeSnapshot {
    pub airport_code: String,
    pub generated_at: DateTime<Utc>,
    pub flights: Vec<FlightRecord>,
}

/// Response payload for flight listings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightsResponse {
    pub airport_code: String,
    pub count: usize,
    pub flights: Vec<FlightRecord>,
}

/// Response payload for the peak-hour analysis
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakHoursResponse {
    pub airport_code: String,
    pub buckets: Vec<PeakHourBucket>,
}

/// Response payload for airline lookups
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirlineResponse {
    pub flight_number: String,
    pub airline: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_normalize_airport_code() {
        assert_eq!(normalize_airport_code(" jfk ").unwrap(), "JFK");
        assert_eq!(normalize_airport_code("EGLL").unwrap(), "EGLL");
        assert!(normalize_airport_code("").is_err());
        assert!(normalize_airport_code("J1K").is_err());
        assert!(normalize_airport_code("TOOLONG").is_err());
    }

    #[test]
    fn test_derived_fields() {
        // 2024-03-10 is a Sunday
        let dep = Utc.with_ymd_and_hms(2024, 3, 10, 6, 30, 0).unwrap();
        let arr = Utc.with_ymd_and_hms(2024, 3, 10, 9, 15, 0).unwrap();
        let record = FlightRecord::new("1", "AA100", "JFK", "LAX", dep, arr, FlightStatus::Scheduled, "JFK");

        assert_eq!(record.scheduled_hour, 6);
        assert_eq!(record.day_of_week, 0);
        assert_eq!(record.duration_minutes, 165);
        assert_eq!(record.delay_or_zero(), 0);
    }

    #[test]
    fn test_negative_duration_is_kept() {
        let dep = Utc.with_ymd_and_hms(2024, 3, 11, 10, 0, 0).unwrap();
        let arr = Utc.with_ymd_and_hms(2024, 3, 11, 9, 0, 0).unwrap();
        let record = FlightRecord::new("2", "DL1", "ATL", "JFK", dep, arr, FlightStatus::Scheduled, "ATL");

        assert_eq!(record.duration_minutes, -60);
        assert_eq!(record.day_of_week, 1);
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&FlightStatus::Cancelled).unwrap();
        assert_eq!(json, "\"CANCELLED\"");
        assert_eq!(FlightStatus::parse("delayed"), Some(FlightStatus::Delayed));
        assert_eq!(FlightStatus::parse("boarding"), None);
    }

    #[test]
    fn test_record_uses_camel_case() {
        let dep = Utc.with_ymd_and_hms(2024, 3, 11, 10, 0, 0).unwrap();
        let record = FlightRecord::new("3", "UA9", "ORD", "SFO", dep, dep, FlightStatus::Arrived, "ORD")
            .with_delay(12);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["flightNumber"], "UA9");
        assert_eq!(value["delayMinutes"], 12);
        assert_eq!(value["status"], "ARRIVED");
    }
}
