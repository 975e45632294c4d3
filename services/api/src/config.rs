//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables once at startup and
//! validated with fail-fast semantics: a missing or malformed value aborts
//! the process before any request-handling component is built. No other
//! component reads ambient environment state directly. The `.env` file is
//! used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    /// HS256 secret used to verify bearer tokens on mutating routes.
    pub jwt_secret: String,
    /// Maximum accepted token age, matching the issuer's expiration policy.
    pub jwt_expiration_minutes: i64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for
    /// development, but this is skipped in test environments to ensure tests
    /// are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let port = required_var("PORT")?;
        let port = port
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), e.to_string()))?;
        let bind_address = SocketAddr::from(([0, 0, 0, 0], port));

        let database_url = required_var("DATABASE_URL")?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let jwt_secret = required_var("JWT_SECRET")?;

        let jwt_expiration_minutes = required_var("JWT_ACCESS_EXPIRATION_MINUTES")?
            .parse::<i64>()
            .map_err(|e| {
                ConfigError::InvalidValue("JWT_ACCESS_EXPIRATION_MINUTES".to_string(), e.to_string())
            })?;

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            jwt_secret,
            jwt_expiration_minutes,
        })
    }
}

fn required_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
}
