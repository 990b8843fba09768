pub mod config;
pub mod error;
pub mod scenario;
pub mod storage;
pub mod telemetry;
