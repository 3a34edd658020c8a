//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `YUMMEAL_API_URL` - Catalog API base URL (default: <https://yummeal-backend.onrender.com>)
//! - `YUMMEAL_LOCATION` - Location restaurants are fetched for on startup (default: Vijayawada)
//! - `YUMMEAL_TOKEN_PATH` - File holding the session token (default: platform data directory)
//! - `YUMMEAL_ORDER_DELAY_MS` - Simulated payment processing time (default: 2000)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default catalog API host.
pub const DEFAULT_API_URL: &str = "https://yummeal-backend.onrender.com";

/// Location used until the customer picks another one.
pub const DEFAULT_LOCATION: &str = "Vijayawada";

const DEFAULT_ORDER_DELAY_MS: u64 = 2000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the remote catalog API
    pub api_base_url: Url,
    /// Initial location for the restaurant list
    pub default_location: String,
    /// Explicit token file; `None` uses the platform data directory
    pub token_path: Option<PathBuf>,
    /// How long the simulated payment step takes
    pub order_processing_delay: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = parse_api_url(
            "YUMMEAL_API_URL",
            &get_env_or_default("YUMMEAL_API_URL", DEFAULT_API_URL),
        )?;

        let default_location = get_env_or_default("YUMMEAL_LOCATION", DEFAULT_LOCATION);
        if default_location.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "YUMMEAL_LOCATION".to_string(),
                "location cannot be blank".to_string(),
            ));
        }

        let token_path = get_optional_env("YUMMEAL_TOKEN_PATH").map(PathBuf::from);

        let order_delay_ms = get_env_or_default(
            "YUMMEAL_ORDER_DELAY_MS",
            &DEFAULT_ORDER_DELAY_MS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("YUMMEAL_ORDER_DELAY_MS".to_string(), e.to_string())
        })?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            api_base_url,
            default_location,
            token_path,
            order_processing_delay: Duration::from_millis(order_delay_ms),
            sentry_dsn,
        })
    }

    /// Configuration pointing at a specific API host, other values default.
    #[must_use]
    pub fn with_api_url(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            default_location: DEFAULT_LOCATION.to_string(),
            token_path: None,
            order_processing_delay: Duration::from_millis(DEFAULT_ORDER_DELAY_MS),
            sentry_dsn: None,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse and validate the API base URL.
///
/// Only `http` and `https` are accepted, and the URL must name a host.
fn parse_api_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "URL must have a host".to_string(),
        ));
    }

    Ok(url)
}
