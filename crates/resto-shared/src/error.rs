//! Startup errors raised outside the domain layer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Telemetry error: {0}")]
    TelemetryError(String),
}
