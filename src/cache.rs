//! Per-airport flight-log cache with a freshness window

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::Instant;

use crate::models::FlightRecord;

/// Cached log for one airport.
struct CacheEntry {
    flights: Arc<Vec<FlightRecord>>,
    refreshed_at: Instant,
}

type Slot = Arc<Mutex<Option<CacheEntry>>>;

/// Flight logs keyed by airport code.
///
/// Each airport has its own async mutex, so a refresh or a simulated update
/// for one airport runs to completion before the next caller for the same
/// airport observes the entry. Different airports never contend beyond the
/// short key-map lookup.
pub struct FlightLogCache {
    ttl: Duration,
    slots: RwLock<HashMap<String, Slot>>,
}

impl FlightLogCache {
    /// Create an empty cache whose entries stay fresh for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Acquire exclusive access to one airport's entry, creating an empty
    /// slot on first use.
    pub async fn lock(&self, airport_code: &str) -> CacheGuard {
        let slot = self.slot(airport_code);
        CacheGuard {
            ttl: self.ttl,
            guard: slot.lock_owned().await,
        }
    }

    fn slot(&self, airport_code: &str) -> Slot {
        if let Some(slot) = self.slots.read().get(airport_code) {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write();
        Arc::clone(slots.entry(airport_code.to_string()).or_default())
    }

    /// Airport codes that have been requested at least once
    pub fn airports(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.slots.read().keys().cloned().collect();
        codes.sort();
        codes
    }

    /// Number of airports with a slot
    #[inline]
    pub fn airport_count(&self) -> usize {
        self.slots.read().len()
    }
}

/// Exclusive handle on one airport's cache entry
pub struct CacheGuard {
    ttl: Duration,
    guard: OwnedMutexGuard<Option<CacheEntry>>,
}

impl CacheGuard {
    /// The cached log, if it is younger than the freshness window
    pub fn fresh(&self) -> Option<Arc<Vec<FlightRecord>>> {
        (*self.guard)
            .as_ref()
            .filter(|entry| entry.refreshed_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.flights))
    }

    /// The cached log regardless of age
    pub fn current(&self) -> Option<Arc<Vec<FlightRecord>>> {
        (*self.guard).as_ref().map(|entry| Arc::clone(&entry.flights))
    }

    /// Replace the entry wholesale and restart its freshness window
    pub fn replace(&mut self, flights: Vec<FlightRecord>) -> Arc<Vec<FlightRecord>> {
        let flights = Arc::new(flights);
        *self.guard = Some(CacheEntry {
            flights: Arc::clone(&flights),
            refreshed_at: Instant::now(),
        });
        flights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = FlightLogCache::new(Duration::from_secs(300));

        let mut guard = cache.lock("JFK").await;
        assert!(guard.fresh().is_none());
        let stored = guard.replace(Vec::new());
        let fresh = guard.fresh().unwrap();
        assert!(Arc::ptr_eq(&stored, &fresh));
        drop(guard);

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(cache.lock("JFK").await.fresh().is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        let guard = cache.lock("JFK").await;
        assert!(guard.fresh().is_none());
        assert!(guard.current().is_some());
    }

    #[tokio::test]
    async fn test_slots_are_per_airport() {
        let cache = FlightLogCache::new(Duration::from_secs(60));

        let _jfk = cache.lock("JFK").await;
        // A held JFK guard must not block LAX
        let lax = cache.lock("LAX").await;
        assert!(lax.current().is_none());

        assert_eq!(cache.airports(), vec!["JFK".to_string(), "LAX".to_string()]);
        assert_eq!(cache.airport_count(), 2);
    }
}
