//! FlightPulse - airport flight-delay statistics service

use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flight_pulse::config::Config;
use flight_pulse::db::Database;
use flight_pulse::engine::FlightStatsEngine;
use flight_pulse::routes;
use flight_pulse::services::recommendations::{RecommendationGenerator, RuleBasedGenerator};
use flight_pulse::source::{FlightLogSource, SampleFlightSource};
use flight_pulse::state::AppState;
use flight_pulse::tasks::realtime;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flight_pulse=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Invalid configuration")?;

    // Pick the flight-log source
    let source: Arc<dyn FlightLogSource> = match &config.database_url {
        Some(url) => {
            let db = Database::new(url)
                .await
                .context("Failed to connect to database")?;
            info!("Database: {}", url.split('@').last().unwrap_or("***"));
            Arc::new(db)
        }
        None => {
            info!("DATABASE_URL not set, serving the built-in sample flight log");
            Arc::new(SampleFlightSource::new())
        }
    };

    let engine = FlightStatsEngine::new(source, config.cache_ttl, config.source_timeout);
    let recommender: Arc<dyn RecommendationGenerator> = Arc::new(RuleBasedGenerator::new());
    let state = AppState::new(engine, config.broadcast_capacity, Some(recommender));

    // Real-time task - advances tracked airports and broadcasts snapshots
    let rt_state = state.clone();
    let rt_airports = config.tracked_airports.clone();
    let rt_interval = config.realtime_interval;
    tokio::spawn(async move {
        realtime::realtime_task(rt_state, rt_airports, rt_interval).await;
    });

    let app = routes::router(state);

    info!("FlightPulse v{} starting on {}", env!("CARGO_PKG_VERSION"), config.listen_addr);
    info!("Cache freshness: {}s", config.cache_ttl.as_secs());
    info!("Tracked airports: {}", config.tracked_airports.join(", "));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
