//! # Backoffice Shared
//!
//! Shared utilities, configuration, and telemetry for the backoffice services.

pub mod config;
pub mod constants;
pub mod error;
pub mod telemetry;
pub mod utils;

pub use config::AppConfig;
pub use error::AppError;
