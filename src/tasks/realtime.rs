//! Real-time task - advances simulated flight data and broadcasts it

use std::time::Duration;
use tracing::{debug, error, info};

use crate::routes::realtime::publish_real_time;
use crate::state::AppState;

/// Background task that periodically advances every tracked airport.
///
/// Each tick applies one simulation step per airport and broadcasts the new
/// snapshot to WebSocket subscribers. A failed airport is logged and picked
/// up again on the next tick.
pub async fn realtime_task(state: AppState, airports: Vec<String>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    info!(
        airports = ?airports,
        interval_secs = period.as_secs(),
        "Real-time task started"
    );

    loop {
        interval.tick().await;
        run_tick(&state, &airports).await;
    }
}

/// Advance each airport once; returns how many succeeded
async fn run_tick(state: &AppState, airports: &[String]) -> usize {
    let mut advanced = 0;
    for airport_code in airports {
        match publish_real_time(state, airport_code).await {
            Ok(snapshot) => {
                advanced += 1;
                debug!(
                    airport = %airport_code,
                    flights = snapshot.flights.len(),
                    "Real-time tick applied"
                );
            }
            Err(e) => {
                error!(error = %e, airport = %airport_code, "Real-time tick failed");
            }
        }
    }
    advanced
}
