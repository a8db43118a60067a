//! Flight-log sources consumed by the statistics engine

use async_trait::async_trait;
use chrono::{Duration, NaiveTime, Utc};

use crate::error::Result;
use crate::models::{FlightRecord, FlightStatus};

/// Supplier of the flight log filed under an airport code.
///
/// Implementations must be `Send + Sync`; the engine calls them from request
/// handlers and background tasks concurrently.
#[async_trait]
pub trait FlightLogSource: Send + Sync {
    /// Fetch the complete flight log for `airport_code`.
    ///
    /// # Returns
    /// * `Ok(Vec<FlightRecord>)` - Records in load order
    /// * `Err(AppError::SourceUnavailable)` - If the source could not be read
    async fn fetch_flights(&self, airport_code: &str) -> Result<Vec<FlightRecord>>;

    /// Verify the source can currently serve requests.
    ///
    /// Sources without an external dependency are always healthy.
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Built-in demo log: five morning departures re-dated to the current day.
#[derive(Debug, Clone, Default)]
pub struct SampleFlightSource;

/// (flight number, destination, departure, block minutes, delay, status, aircraft)
const SAMPLE_FLIGHTS: [(&str, &str, (u32, u32), i64, i64, FlightStatus, &str); 5] = [
    ("AA1234", "LAX", (6, 0), 330, 20, FlightStatus::Delayed, "Boeing 737-800"),
    ("DL5678", "ATL", (6, 15), 150, 17, FlightStatus::Delayed, "Airbus A320"),
    ("UA9012", "ORD", (6, 30), 165, 8, FlightStatus::Delayed, "Boeing 757-200"),
    ("B61234", "BOS", (6, 40), 75, 0, FlightStatus::Scheduled, "Airbus A321"),
    ("WN3456", "DEN", (6, 55), 255, 44, FlightStatus::Delayed, "Boeing 737 MAX 8"),
];

impl SampleFlightSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FlightLogSource for SampleFlightSource {
    async fn fetch_flights(&self, airport_code: &str) -> Result<Vec<FlightRecord>> {
        let today = Utc::now().date_naive();

        let flights = SAMPLE_FLIGHTS
            .iter()
            .enumerate()
            .filter_map(|(idx, (number, dest, (hour, minute), block, delay, status, aircraft))| {
                let departure = today
                    .and_time(NaiveTime::from_hms_opt(*hour, *minute, 0)?)
                    .and_utc();
                let arrival = departure + Duration::minutes(*block);

                Some(
                    FlightRecord::new(
                        format!("{}-{}", airport_code, idx + 1),
                        *number,
                        airport_code,
                        *dest,
                        departure,
                        arrival,
                        *status,
                        airport_code,
                    )
                    .with_delay(*delay)
                    .with_aircraft(*aircraft),
                )
            })
            .collect();

        Ok(flights)
    }

    fn name(&self) -> &'static str {
        "sample"
    }
}
