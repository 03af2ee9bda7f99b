//! Client configuration.

use m2x_core::ClientError;
use std::time::Duration;

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api-m2x.att.com/v2";

/// M2X HTTP client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API, without trailing slash (e.g., <https://api-m2x.att.com/v2>)
    pub base_url: String,
    /// API key sent in the `X-M2X-KEY` header; catalog reads work without one
    pub api_key: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// `User-Agent` header value
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            user_agent: format!("m2x-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Configuration for the default endpoint with the given API key.
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `M2X_API_KEY`: API key
    /// - `M2X_BASE_URL`: API base URL
    /// - `M2X_TIMEOUT_SECS`: request timeout in seconds
    ///
    /// # Errors
    ///
    /// Returns error if `M2X_TIMEOUT_SECS` is not a number.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let mut config = Self::default();

        if let Some(key) = lookup("M2X_API_KEY") {
            config.api_key = Some(key);
        }

        if let Some(url) = lookup("M2X_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(secs) = lookup("M2X_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| ClientError::Init(format!("invalid M2X_TIMEOUT_SECS: {secs}")))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
