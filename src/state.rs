//! Application state shared across handlers

use crate::engine::FlightStatsEngine;
use crate::models::RealTimeSnapshot;
use crate::routes::metrics::Metrics;
use crate::services::recommendations::RecommendationGenerator;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Flight-log cache and statistics
    pub engine: Arc<FlightStatsEngine>,
    /// Real-time snapshots fanned out to WebSocket subscribers
    pub broadcast_tx: broadcast::Sender<Arc<RealTimeSnapshot>>,
    /// Optional recommendation generator
    pub recommender: Option<Arc<dyn RecommendationGenerator>>,
    /// Application metrics for Prometheus
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Create new application state
    ///
    /// # Arguments
    /// * `engine` - Flight statistics engine
    /// * `broadcast_capacity` - Capacity of the real-time broadcast channel
    /// * `recommender` - Optional recommendation generator
    pub fn new(
        engine: FlightStatsEngine,
        broadcast_capacity: usize,
        recommender: Option<Arc<dyn RecommendationGenerator>>,
    ) -> Self {
        let (broadcast_tx, _) = broadcast::channel(broadcast_capacity);
        Self {
            engine: Arc::new(engine),
            broadcast_tx,
            recommender,
            metrics: Arc::new(Metrics::new()),
        }
    }
}
