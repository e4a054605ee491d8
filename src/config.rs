//! Application configuration loaded from environment variables.
//!
//! Loaded once at startup and handed to [`crate::AppState`]; nothing reads
//! the environment after that.

use std::env;

/// Deployment platform. Only `dev` unlocks the admin reset endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Dev,
    Production,
}

impl Platform {
    /// Parse the `PLATFORM` value. Anything other than `dev` is production.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("dev") {
            Platform::Dev
        } else {
            Platform::Production
        }
    }

    pub fn is_dev(self) -> bool {
        self == Platform::Dev
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection URL. `None` selects the in-memory datastore.
    pub database_url: Option<String>,
    /// Deployment platform
    pub platform: Platform,
    /// HMAC key for access tokens (raw bytes)
    pub jwt_secret: Vec<u8>,
    /// API key the payment provider presents on webhooks
    pub polka_key: String,
    /// Server port
    pub port: u16,
    /// Directory served under `/app`
    pub filepath_root: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            database_url: None,
            platform: Platform::Dev,
            jwt_secret: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            polka_key: "test_polka_key".to_string(),
            port: 8080,
            filepath_root: "public".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            database_url: env::var("DB_URL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            platform: Platform::parse(&env::var("PLATFORM").unwrap_or_default()),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_SECRET"))?
                .into_bytes(),
            polka_key: env::var("POLKA_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("POLKA_KEY"))?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
            filepath_root: env::var("FILEPATH_ROOT").unwrap_or_else(|_| "public".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
