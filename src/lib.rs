//! FlightPulse library exports

pub mod airlines;
pub mod cache;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod simulation;
pub mod source;
pub mod state;
pub mod stats;
pub mod tasks;
