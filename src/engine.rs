//! Flight statistics engine: cached flight logs plus derived views

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::cache::{CacheGuard, FlightLogCache};
use crate::error::{AppError, Result};
use crate::models::{AirportStatistics, FlightRecord, PeakHourBucket};
use crate::simulation::simulate_updates;
use crate::source::FlightLogSource;
use crate::stats;

/// Cache and source counters exposed on `/metrics`
#[derive(Debug, Default)]
pub struct EngineStats {
    pub cache_hits: AtomicU64,
    pub cache_misses: AtomicU64,
    pub source_failures: AtomicU64,
    pub realtime_updates: AtomicU64,
}

impl EngineStats {
    fn inc(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Owns the per-airport flight-log cache and computes statistics from it.
///
/// Share it behind an `Arc`; all methods take `&self`.
pub struct FlightStatsEngine {
    source: Arc<dyn FlightLogSource>,
    cache: FlightLogCache,
    source_timeout: Duration,
    stats: EngineStats,
}

impl FlightStatsEngine {
    /// Create a new engine
    ///
    /// # Arguments
    /// * `source` - Supplier of flight logs on cache misses
    /// * `freshness` - How long a loaded log is served without refetching
    /// * `source_timeout` - Upper bound on one source call
    pub fn new(source: Arc<dyn FlightLogSource>, freshness: Duration, source_timeout: Duration) -> Self {
        info!(
            source = source.name(),
            freshness_secs = freshness.as_secs(),
            timeout_secs = source_timeout.as_secs(),
            "Flight stats engine ready"
        );
        Self {
            source,
            cache: FlightLogCache::new(freshness),
            source_timeout,
            stats: EngineStats::default(),
        }
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Airports currently known to the cache
    pub fn cached_airports(&self) -> Vec<String> {
        self.cache.airports()
    }

    pub fn cached_airport_count(&self) -> usize {
        self.cache.airport_count()
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Run the flight-log source health check, bounded by the source timeout
    pub async fn check_source(&self) -> Result<()> {
        match tokio::time::timeout(self.source_timeout, self.source.health_check()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(AppError::SourceUnavailable(msg))) => Err(AppError::SourceUnavailable(msg)),
            Ok(Err(other)) => Err(AppError::SourceUnavailable(other.to_string())),
            Err(_) => Err(AppError::SourceUnavailable(format!(
                "{} health check timed out",
                self.source.name()
            ))),
        }
    }

    /// Flight log for an airport, served from cache while fresh.
    ///
    /// On a miss the source is called and the entry replaced wholesale. If
    /// the source fails or times out the previous entry is kept and
    /// `SourceUnavailable` is returned. The returned log is shared with the
    /// cache and is read-only.
    pub async fn get_flight_log(&self, airport_code: &str) -> Result<Arc<Vec<FlightRecord>>> {
        let mut guard = self.cache.lock(airport_code).await;
        self.load(airport_code, &mut guard).await
    }

    /// Summary statistics over the current log
    pub async fn get_airport_statistics(&self, airport_code: &str) -> Result<AirportStatistics> {
        let flights = self.get_flight_log(airport_code).await?;
        Ok(stats::airport_statistics(airport_code, &flights))
    }

    /// Hourly buckets of the current log, busiest first
    pub async fn get_peak_hour_analysis(&self, airport_code: &str) -> Result<Vec<PeakHourBucket>> {
        let flights = self.get_flight_log(airport_code).await?;
        Ok(stats::peak_hour_analysis(&flights))
    }

    /// Replace an airport's cached log and restart its freshness window
    pub async fn store_flight_log(
        &self,
        airport_code: &str,
        flights: Vec<FlightRecord>,
    ) -> Arc<Vec<FlightRecord>> {
        let mut guard = self.cache.lock(airport_code).await;
        debug!(airport = %airport_code, count = flights.len(), "Storing flight log");
        guard.replace(flights)
    }

    /// Advance the simulated live state of an airport.
    ///
    /// This writes: the current log is jittered with [`simulate_updates`]
    /// and stored back under the airport's lock, so concurrent callers
    /// apply their steps one after another.
    pub async fn advance_real_time(&self, airport_code: &str) -> Result<Arc<Vec<FlightRecord>>> {
        let mut guard = self.cache.lock(airport_code).await;
        let current = self.load(airport_code, &mut guard).await?;
        let updated = simulate_updates(&current, &mut rand::thread_rng());

        EngineStats::inc(&self.stats.realtime_updates);
        debug!(airport = %airport_code, count = updated.len(), "Applied real-time step");
        Ok(guard.replace(updated))
    }

    async fn load(&self, airport_code: &str, guard: &mut CacheGuard) -> Result<Arc<Vec<FlightRecord>>> {
        if let Some(flights) = guard.fresh() {
            EngineStats::inc(&self.stats.cache_hits);
            return Ok(flights);
        }

        EngineStats::inc(&self.stats.cache_misses);
        let flights = self.fetch(airport_code).await?;
        info!(
            airport = %airport_code,
            source = self.source.name(),
            count = flights.len(),
            "Flight log refreshed"
        );
        Ok(guard.replace(flights))
    }

    async fn fetch(&self, airport_code: &str) -> Result<Vec<FlightRecord>> {
        let result = tokio::time::timeout(
            self.source_timeout,
            self.source.fetch_flights(airport_code),
        )
        .await;

        let err = match result {
            Ok(Ok(flights)) => return Ok(flights),
            Ok(Err(AppError::SourceUnavailable(msg))) => AppError::SourceUnavailable(msg),
            Ok(Err(other)) => AppError::SourceUnavailable(other.to_string()),
            Err(_) => AppError::SourceUnavailable(format!(
                "{} source timed out after {}s",
                self.source.name(),
                self.source_timeout.as_secs_f64()
            )),
        };

        EngineStats::inc(&self.stats.source_failures);
        warn!(airport = %airport_code, source = self.source.name(), error = %err, "Flight log fetch failed");
        Err(err)
    }
}
