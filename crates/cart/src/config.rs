//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ROCKETSHOES_API_URL` - Base URL of the inventory API (serves `/stock/{id}` and `/products/{id}`)
//!
//! ## Optional
//! - `ROCKETSHOES_STORAGE_DIR` - Directory for the local cart store (default: .rocketshoes)
//! - `ROCKETSHOES_STORAGE_KEY` - Key the cart blob is stored under (default: @RocketShoes:cart)
//! - `ROCKETSHOES_REQUEST_TIMEOUT_SECS` - Per-request HTTP timeout (default: 10)
//! - `ROCKETSHOES_PRODUCT_CACHE_TTL_SECS` - Product details cache TTL (default: 300)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::storage::DEFAULT_STORAGE_KEY;

const DEFAULT_STORAGE_DIR: &str = ".rocketshoes";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PRODUCT_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Inventory API configuration
    pub inventory: InventoryConfig,
    /// Directory backing the file store
    pub storage_dir: PathBuf,
    /// Key the serialized cart is stored under
    pub storage_key: String,
}

/// Inventory API client configuration.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Base URL, e.g. `http://localhost:3333`
    pub base_url: Url,
    /// Timeout applied to every request
    pub request_timeout: Duration,
    /// How long product details stay cached
    pub product_cache_ttl: Duration,
}

impl InventoryConfig {
    /// Configuration with default timeout and cache TTL.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            product_cache_ttl: Duration::from_secs(DEFAULT_PRODUCT_CACHE_TTL_SECS),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&lookup);

        let base_url = vars.required("ROCKETSHOES_API_URL")?;
        let base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("ROCKETSHOES_API_URL".to_string(), e.to_string())
        })?;
        let request_timeout =
            vars.seconds("ROCKETSHOES_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        let product_cache_ttl = vars.seconds(
            "ROCKETSHOES_PRODUCT_CACHE_TTL_SECS",
            DEFAULT_PRODUCT_CACHE_TTL_SECS,
        )?;

        let storage_dir = PathBuf::from(vars.or_default("ROCKETSHOES_STORAGE_DIR", DEFAULT_STORAGE_DIR));
        let storage_key = vars.or_default("ROCKETSHOES_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "ROCKETSHOES_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            inventory: InventoryConfig {
                base_url,
                request_timeout,
                product_cache_ttl,
            },
            storage_dir,
            storage_key,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Vars<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Vars<'_, F> {
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        (self.0)(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        (self.0)(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a whole number of seconds, falling back to `default`.
    fn seconds(&self, key: &str, default: u64) -> Result<Duration, ConfigError> {
        let Some(raw) = (self.0)(key) else {
            return Ok(Duration::from_secs(default));
        };
        raw.trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}
