//! Service configuration read from the environment

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::models::normalize_airport_code;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    /// Postgres flight-log source; the built-in sample log is used when unset
    pub database_url: Option<String>,
    /// Freshness window of cached flight logs
    pub cache_ttl: Duration,
    /// Upper bound on a single flight-log source call
    pub source_timeout: Duration,
    pub realtime_interval: Duration,
    /// Airports advanced by the real-time task
    pub tracked_airports: Vec<String>,
    pub broadcast_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            database_url: None,
            cache_ttl: Duration::from_secs(300),
            source_timeout: Duration::from_secs(10),
            realtime_interval: Duration::from_secs(5),
            tracked_airports: vec!["JFK".to_string()],
            broadcast_capacity: 1024,
        }
    }
}

impl Config {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` to resolve variable names
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let listen_addr = parse_or(&lookup, "LISTEN_ADDR", defaults.listen_addr)?;
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let cache_ttl = Duration::from_secs(parse_or(
            &lookup,
            "CACHE_TTL_SECS",
            defaults.cache_ttl.as_secs(),
        )?);
        let source_timeout = Duration::from_secs(parse_or(
            &lookup,
            "SOURCE_TIMEOUT_SECS",
            defaults.source_timeout.as_secs(),
        )?);
        let realtime_interval = Duration::from_secs(parse_or(
            &lookup,
            "REALTIME_INTERVAL_SECS",
            defaults.realtime_interval.as_secs(),
        )?);
        let broadcast_capacity =
            parse_or(&lookup, "BROADCAST_CAPACITY", defaults.broadcast_capacity)?;

        if realtime_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "REALTIME_INTERVAL_SECS",
                value: "0".into(),
            });
        }
        if broadcast_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                name: "BROADCAST_CAPACITY",
                value: "0".into(),
            });
        }

        let tracked_airports = match lookup("TRACKED_AIRPORTS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(|code| {
                    normalize_airport_code(code).map_err(|_| ConfigError::InvalidValue {
                        name: "TRACKED_AIRPORTS",
                        value: code.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => defaults.tracked_airports,
        };

        Ok(Self {
            listen_addr,
            database_url,
            cache_ttl,
            source_timeout,
            realtime_interval,
            tracked_airports,
            broadcast_capacity,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}
