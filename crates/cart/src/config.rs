//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CART_STORAGE_KEY` - Persisted cart key (default: `premium_cart_v2`)
//! - `CART_STORE_DIR` - Directory for the file-backed store (default: `.cart`)
//! - `CART_CURRENCY` - Display currency (default: USD)
//! - `CART_WATCH_INTERVAL_MS` - Poll interval for foreign changes (default: 500)
//! - `CART_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use premium_cart_core::CurrencyCode;
use thiserror::Error;

use crate::manager::DEFAULT_CART_KEY;

const DEFAULT_STORE_DIR: &str = ".cart";
const DEFAULT_WATCH_INTERVAL_MS: u64 = 500;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{other}'")),
        }
    }
}

/// Cart configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Key the cart is persisted under
    pub storage_key: String,
    /// Directory for the file-backed store
    pub store_dir: PathBuf,
    /// Currency for display formatting
    pub currency: CurrencyCode,
    /// How often the file store checks for changes by other processes
    pub watch_interval: Duration,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_CART_KEY.to_string(),
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            currency: CurrencyCode::default(),
            watch_interval: Duration::from_millis(DEFAULT_WATCH_INTERVAL_MS),
            log_format: LogFormat::default(),
            sentry_dsn: None,
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
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let storage_key = match lookup("CART_STORAGE_KEY") {
            Some(key) if key.trim().is_empty() => {
                return Err(ConfigError::InvalidEnvVar(
                    "CART_STORAGE_KEY".to_string(),
                    "must not be empty".to_string(),
                ));
            }
            Some(key) => key,
            None => defaults.storage_key,
        };

        let store_dir = lookup("CART_STORE_DIR").map_or(defaults.store_dir, PathBuf::from);

        let currency = parse_var(&lookup, "CART_CURRENCY")?.unwrap_or(defaults.currency);

        let watch_interval = match parse_var::<u64>(&lookup, "CART_WATCH_INTERVAL_MS")? {
            Some(0) => {
                return Err(ConfigError::InvalidEnvVar(
                    "CART_WATCH_INTERVAL_MS".to_string(),
                    "must be greater than zero".to_string(),
                ));
            }
            Some(ms) => Duration::from_millis(ms),
            None => defaults.watch_interval,
        };

        let log_format = parse_var(&lookup, "CART_LOG_FORMAT")?.unwrap_or(defaults.log_format);

        let sentry_dsn = lookup("SENTRY_DSN").filter(|dsn| !dsn.trim().is_empty());

        Ok(Self {
            storage_key,
            store_dir,
            currency,
            watch_interval,
            log_format,
            sentry_dsn,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional variable, reporting the variable name on failure.
fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}
