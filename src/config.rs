//! Configuration for the Autotask Search MCP server.
//!
//! `Config` is an immutable value built once at startup and handed to
//! [`BackendClient::new`](crate::backend_client::BackendClient::new). Only
//! [`Config::from_env`] touches the process environment.

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::GatewayError;

/// Base URL used when `AUTOTASK_API_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Request timeout used when `AUTOTASK_TIMEOUT_SECS` is not set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the search backend.
///
/// The API key is kept out of the `Debug` output and must never be logged.
#[derive(Clone)]
pub struct Config {
    /// Base URL of the search service, without trailing slash.
    pub base_url: String,

    /// Bearer token for the search API.
    pub api_key: String,

    /// Per-request deadline.
    pub timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Builds a configuration from explicit values.
    ///
    /// The base URL is normalized and validated; the key is taken as is
    /// (an empty key is rejected later by the backend client).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidConfig` if the base URL is not an
    /// http(s) URL.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, GatewayError> {
        Ok(Config {
            base_url: Self::validate_base_url(base_url)?,
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Replaces the per-request deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Loads configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AUTOTASK_API_KEY` (required): bearer token for the search API
    /// - `AUTOTASK_API_BASE_URL` (default `http://localhost:8000`)
    /// - `AUTOTASK_TIMEOUT_SECS` (default 30)
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::MissingCredential` if the key is absent, blank
    /// or a placeholder, and `GatewayError::InvalidConfig` for a malformed
    /// base URL or timeout.
    pub fn from_env() -> Result<Self, GatewayError> {
        let api_key = env::var("AUTOTASK_API_KEY").unwrap_or_default();
        let base_url =
            env::var("AUTOTASK_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout = env::var("AUTOTASK_TIMEOUT_SECS").ok();

        Self::from_values(&api_key, &base_url, timeout.as_deref())
    }

    /// Shared by `from_env` and the tests, which must not mutate the
    /// process environment.
    fn from_values(
        api_key: &str,
        base_url: &str,
        timeout: Option<&str>,
    ) -> Result<Self, GatewayError> {
        let api_key = api_key.trim();
        Self::validate_api_key(api_key)?;

        let base_url = if base_url.trim().is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        let timeout = match timeout.map(str::trim).filter(|t| !t.is_empty()) {
            Some(raw) => Self::parse_timeout(raw)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self::new(base_url, api_key)?.with_timeout(timeout))
    }

    /// Validates and normalizes the base URL.
    fn validate_base_url(url: &str) -> Result<String, GatewayError> {
        let url = url.trim().trim_end_matches('/');

        let parsed = Url::parse(url).map_err(|e| {
            GatewayError::InvalidConfig(format!("AUTOTASK_API_BASE_URL is not a valid URL: {}", e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GatewayError::InvalidConfig(
                "AUTOTASK_API_BASE_URL must start with http:// or https://".to_string(),
            ));
        }

        Ok(url.to_string())
    }

    /// Rejects missing keys and obvious placeholder values.
    fn validate_api_key(key: &str) -> Result<(), GatewayError> {
        if key.is_empty() {
            return Err(GatewayError::MissingCredential);
        }

        let key_lower = key.to_lowercase();
        let placeholder_patterns = ["your_api_key", "your-api-key", "placeholder", "changeme"];
        if placeholder_patterns.iter().any(|p| key_lower.contains(p)) {
            return Err(GatewayError::MissingCredential);
        }

        Ok(())
    }

    fn parse_timeout(raw: &str) -> Result<Duration, GatewayError> {
        match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(GatewayError::InvalidConfig(format!(
                "AUTOTASK_TIMEOUT_SECS must be a positive number of seconds, got {:?}",
                raw
            ))),
        }
    }
}
