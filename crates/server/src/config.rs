//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `GREENBASKET_HOST` - Bind address (default: 127.0.0.1)
//! - `GREENBASKET_PORT` - Listen port (default: 3000)
//! - `GREENBASKET_DATA_DIR` - Directory with the JSON collection files (default: data)
//! - `GREENBASKET_TOKEN_SECRET` - Bearer token signing secret (min 32 chars)
//! - `GREENBASKET_TOKEN_TTL_HOURS` - Token lifetime in hours (default: 24)
//! - `GREENBASKET_ENV` - `development` or `production` (default: development)
//! - `GREENBASKET_ALLOWED_ORIGINS` - Comma-separated CORS origins

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Minimum length for the token signing secret.
const MIN_TOKEN_SECRET_LENGTH: usize = 32;

/// Development-only fallback secret. Refused in production.
const DEV_TOKEN_SECRET: &str = "greenbasket-dev-token-secret-not-for-production";

/// Default CORS origins for local mobile-app development.
const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:8081",
    "http://localhost:19006",
];

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

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Whether internal error details may be exposed in responses.
    #[must_use]
    pub const fn expose_internal_errors(self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Directory holding the JSON collection files.
    pub data_dir: PathBuf,
    /// Bearer token signing secret.
    pub token_secret: SecretString,
    /// Token lifetime in hours.
    pub token_ttl_hours: i64,
    /// Deployment environment.
    pub environment: Environment,
    /// Allowed CORS origins.
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable fails to parse, or if the token
    /// secret is missing or too short in production.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = match std::env::var("GREENBASKET_ENV").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        };

        let host = parse_var("GREENBASKET_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_var("GREENBASKET_PORT", 3000)?;
        let token_ttl_hours = parse_var("GREENBASKET_TOKEN_TTL_HOURS", 24)?;

        let data_dir = std::env::var("GREENBASKET_DATA_DIR")
            .map_or_else(|_| PathBuf::from("data"), PathBuf::from);

        let token_secret = load_token_secret(environment)?;

        let allowed_origins = std::env::var("GREENBASKET_ALLOWED_ORIGINS").map_or_else(
            |_| {
                DEFAULT_ALLOWED_ORIGINS
                    .iter()
                    .map(ToString::to_string)
                    .collect()
            },
            |v| v.split(',').map(|s| s.trim().to_string()).collect(),
        );

        Ok(Self {
            host,
            port,
            data_dir,
            token_secret,
            token_ttl_hours,
            environment,
            allowed_origins,
        })
    }

    /// Socket address to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

fn load_token_secret(environment: Environment) -> Result<SecretString, ConfigError> {
    match std::env::var("GREENBASKET_TOKEN_SECRET") {
        Ok(secret) => {
            if secret.len() < MIN_TOKEN_SECRET_LENGTH {
                return Err(ConfigError::InsecureSecret(
                    "GREENBASKET_TOKEN_SECRET".to_string(),
                    format!("must be at least {MIN_TOKEN_SECRET_LENGTH} characters"),
                ));
            }
            Ok(SecretString::from(secret))
        }
        Err(_) if environment == Environment::Development => {
            tracing::warn!("GREENBASKET_TOKEN_SECRET not set, using development fallback");
            Ok(SecretString::from(DEV_TOKEN_SECRET))
        }
        Err(_) => Err(ConfigError::MissingEnvVar(
            "GREENBASKET_TOKEN_SECRET".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_error_exposure() {
        assert!(Environment::Development.expose_internal_errors());
        assert!(!Environment::Production.expose_internal_errors());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 4321,
            data_dir: PathBuf::from("data"),
            token_secret: SecretString::from("x".repeat(32)),
            token_ttl_hours: 24,
            environment: Environment::Development,
            allowed_origins: Vec::new(),
        };
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:4321");
    }
}
