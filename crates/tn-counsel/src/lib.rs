pub mod config;
pub mod counselling;
pub mod error;
pub mod telemetry;
