//! Admin configuration loaded from environment variables.
//!
//! Required: `ADMIN_DATABASE_URL`, `ADMIN_BASE_URL`, `ADMIN_SESSION_SECRET`,
//! `MARKET_API_URL`. Optional: `ADMIN_HOST` (127.0.0.1), `ADMIN_PORT`
//! (3001), `MARKET_API_TIMEOUT_SECS` (30), `SENTRY_DSN`,
//! `SENTRY_ENVIRONMENT`.

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    pub session_secret: SecretString,
    /// Market REST API base URL (the admin aggregation endpoints live there)
    pub market_api_url: String,
    pub market_api_timeout_secs: u64,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = SecretString::from(required("ADMIN_DATABASE_URL")?);
        let host = or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let base_url = required("ADMIN_BASE_URL")?;

        let session_secret = SecretString::from(required("ADMIN_SESSION_SECRET")?);
        if session_secret.expose_secret().len() < MIN_SESSION_SECRET_LENGTH {
            return Err(ConfigError::InsecureSecret(
                "ADMIN_SESSION_SECRET".to_string(),
                format!("must be at least {MIN_SESSION_SECRET_LENGTH} characters"),
            ));
        }

        let market_api_url = required("MARKET_API_URL")?;
        let market_api_timeout_secs = or_default("MARKET_API_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("MARKET_API_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            market_api_url,
            market_api_timeout_secs,
            sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            sentry_environment: std::env::var("SENTRY_ENVIRONMENT").ok(),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn required(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
