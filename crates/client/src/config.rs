//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `EMPORIUM_API_URL` - Base URL of the storefront API (default: <http://127.0.0.1:8080>)

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where the client finds the storefront API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
}

impl ClientConfig {
    pub const DEFAULT_API_URL: &'static str = "http://127.0.0.1:8080";

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `EMPORIUM_API_URL` is not a valid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let raw = std::env::var("EMPORIUM_API_URL")
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_API_URL.to_string());

        Self::from_url(&raw)
    }

    /// Build a configuration from an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `raw` does not parse as an absolute URL.
    pub fn from_url(raw: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(raw)
            .map_err(|e| ConfigError::InvalidEnvVar("EMPORIUM_API_URL".to_string(), e.to_string()))?;
        Ok(Self { base_url })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url_accepts_default() {
        let config = ClientConfig::from_url(ClientConfig::DEFAULT_API_URL).unwrap();
        assert_eq!(config.base_url.host_str(), Some("127.0.0.1"));
        assert_eq!(config.base_url.port(), Some(8080));
    }

    #[test]
    fn test_from_url_rejects_relative() {
        let err = ClientConfig::from_url("/api").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "EMPORIUM_API_URL"));
    }
}
