//! Configurator configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ATELIER_API_BASE_URL` - Base URL of the catalog/SKU allocation API
//!   (e.g., <https://product-db.example.com/api/sku>)
//!
//! ## Optional
//! - `ATELIER_API_TOKEN` - Bearer token for the catalog API
//! - `ATELIER_CUTLERY_SKUS` - Enable cutlery SKU generation (default: false)
//! - `ATELIER_CACHE_TTL_SECS` - Reference-data cache TTL (default: 300)
//! - `ATELIER_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use atelier_core::gate::SkuPolicy;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Catalog API connection settings.
    pub api: ApiConfig,
    /// Whether cutlery SKU generation is enabled (see the gate policy).
    pub cutlery_skus: bool,
}

/// Catalog API connection settings.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL all endpoint paths are joined onto. Always stored with a
    /// trailing slash so relative joins keep the full path.
    pub base_url: Url,
    /// Optional bearer token.
    pub api_token: Option<SecretString>,
    /// Reference-data cache time-to-live.
    pub cache_ttl: Duration,
    /// Per-request HTTP timeout.
    pub http_timeout: Duration,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("cache_ttl", &self.cache_ttl)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl StudioConfig {
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

        Ok(Self {
            api: ApiConfig::from_env()?,
            cutlery_skus: get_bool_env("ATELIER_CUTLERY_SKUS", false)?,
        })
    }

    /// The submission policy derived from this configuration.
    #[must_use]
    pub const fn policy(&self) -> SkuPolicy {
        SkuPolicy {
            cutlery_enabled: self.cutlery_skus,
        }
    }
}

impl ApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw_url = get_required_env("ATELIER_API_BASE_URL")?;
        let base_url = parse_base_url(&raw_url)
            .map_err(|e| ConfigError::InvalidEnvVar("ATELIER_API_BASE_URL".to_string(), e))?;

        let cache_ttl = get_secs_env("ATELIER_CACHE_TTL_SECS", 300)?;
        let http_timeout = get_secs_env("ATELIER_HTTP_TIMEOUT_SECS", 30)?;

        Ok(Self {
            base_url,
            api_token: get_optional_env("ATELIER_API_TOKEN").map(SecretString::from),
            cache_ttl,
            http_timeout,
        })
    }
}

/// Parse and normalise the API base URL, appending a trailing slash so that
/// `Url::join` treats the final path segment as a directory.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw).map_err(|e| e.to_string())?;
    if url.cannot_be_a_base() {
        return Err("URL cannot be a base".to_string());
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an optional boolean environment variable.
fn get_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    match get_optional_env(key) {
        None => Ok(default),
        Some(value) => match value.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("expected a boolean, got {other:?}"),
            )),
        },
    }
}

/// Get an optional duration (seconds) environment variable.
fn get_secs_env(key: &str, default_secs: u64) -> Result<Duration, ConfigError> {
    match get_optional_env(key) {
        None => Ok(Duration::from_secs(default_secs)),
        Some(value) => value
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_appends_trailing_slash() {
        let url = parse_base_url("https://example.com/api/sku").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/sku/");

        let joined = url.join("materials").unwrap();
        assert_eq!(joined.as_str(), "https://example.com/api/sku/materials");
    }

    #[test]
    fn test_parse_base_url_keeps_existing_slash() {
        let url = parse_base_url("https://example.com/api/sku/").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/sku/");
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        assert!(parse_base_url("not a url").is_err());
        assert!(parse_base_url("mailto:ops@example.com").is_err());
    }

    #[test]
    fn test_api_config_debug_redacts_token() {
        let config = ApiConfig {
            base_url: parse_base_url("https://example.com/api/sku").unwrap(),
            api_token: Some(SecretString::from("super_secret_token_value")),
            cache_ttl: Duration::from_secs(300),
            http_timeout: Duration::from_secs(30),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_token_value"));
    }

    #[test]
    fn test_policy_reflects_cutlery_flag() {
        let config = StudioConfig {
            api: ApiConfig {
                base_url: parse_base_url("https://example.com/api/sku").unwrap(),
                api_token: None,
                cache_ttl: Duration::from_secs(300),
                http_timeout: Duration::from_secs(30),
            },
            cutlery_skus: true,
        };
        assert!(config.policy().cutlery_enabled);
    }
}
