//! Simulated live changes to a flight log

use rand::Rng;

use crate::models::{FlightRecord, FlightStatus};

/// Chance that any one record is touched by a simulation step
pub const UPDATE_PROBABILITY: f64 = 0.1;
/// Largest delay change, in minutes, applied in either direction
pub const MAX_JITTER_MINUTES: i64 = 15;

/// Produce a new log from `flights` with roughly 10% of records jittered.
///
/// A touched record has its delay (absent treated as 0) moved by a uniform
/// integer in `[-15, 15]` and clamped at 0. A positive move marks the
/// flight as delayed. The input is left unchanged.
pub fn simulate_updates<R: Rng>(flights: &[FlightRecord], rng: &mut R) -> Vec<FlightRecord> {
    flights
        .iter()
        .map(|flight| {
            let mut flight = flight.clone();
            if rng.gen_bool(UPDATE_PROBABILITY) {
                let jitter = rng.gen_range(-MAX_JITTER_MINUTES..=MAX_JITTER_MINUTES);
                flight.delay_minutes = Some(flight.delay_or_zero().saturating_add(jitter).max(0));
                if jitter > 0 {
                    flight.status = FlightStatus::Delayed;
                }
            }
            flight
        })
        .collect()
}
