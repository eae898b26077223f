pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

use config::AppConfig;
use error::AppError;

/// Load configuration and install the tracing subscriber for a host process.
pub fn bootstrap() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}
