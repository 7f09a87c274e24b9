pub mod config;
pub mod error;
pub mod import;
pub mod leave;
pub mod planner;
pub mod telemetry;
