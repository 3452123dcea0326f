//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPFRONT_API_URL` - Base URL of the storefront backend (e.g. `https://api.example.com`)
//!
//! ## Optional
//! - `SHOPFRONT_MAX_RETRIES` - Retries for transient failures on listings (default: 3)
//! - `SHOPFRONT_RETRY_DELAY_MS` - Fixed pause between retries (default: 0)
//! - `SHOPFRONT_TIMEOUT_SECS` - Per-request timeout (default: none)

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default number of retries after a transient failure.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL that API paths are resolved against
    pub base_url: Url,
    /// Retries after a transient failure (total attempts = retries + 1)
    pub max_retries: u32,
    /// Pause between retries
    pub retry_delay: Duration,
    /// Per-request timeout; a timeout counts as a transient failure
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Configuration for `base_url` with default retry settings.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::ZERO,
            timeout: None,
        }
    }

    /// Parse a base URL string into a default configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL does not parse or is
    /// not `http`/`https`.
    pub fn parse(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(parse_base_url("SHOPFRONT_API_URL", base_url)?))
    }

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

    /// Load configuration through an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup("SHOPFRONT_API_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("SHOPFRONT_API_URL".to_string()))?;
        let base_url = parse_base_url("SHOPFRONT_API_URL", &raw_url)?;

        let max_retries = parse_optional::<u32>(&lookup, "SHOPFRONT_MAX_RETRIES")?
            .unwrap_or(DEFAULT_MAX_RETRIES);
        let retry_delay = parse_optional::<u64>(&lookup, "SHOPFRONT_RETRY_DELAY_MS")?
            .map_or(Duration::ZERO, Duration::from_millis);
        let timeout = parse_optional::<u64>(&lookup, "SHOPFRONT_TIMEOUT_SECS")?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            base_url,
            max_retries,
            retry_delay,
            timeout,
        })
    }

    /// Set the number of retries after a transient failure.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the pause between retries.
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse and validate a base URL.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Parse an optional variable, treating an empty value as unset.
fn parse_optional<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        _ => Ok(None),
    }
}
