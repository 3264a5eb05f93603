//! Client configuration options.

use std::time::Duration;

use crate::{Error, Result};

/// Default HCB host.
pub const DEFAULT_BASE_URL: &str = "https://hcb.hackclub.com";

/// Path prefix of the v4 API.
pub const API_PATH: &str = "/api/v4";

/// Configuration for the HCB client.
///
/// # Example
///
/// ```
/// use hcb_rs::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme and host, without the API path
    pub base_url: String,
    /// API path prefix appended to `base_url`
    pub api_path: String,
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Whether to refresh an expired access token before a request
    pub auto_refresh_session: bool,
    /// Treat the token as expired this many seconds early
    pub refresh_buffer_secs: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_path: API_PATH.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("hcb-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            auto_refresh_session: true,
            refresh_buffer_secs: 0,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration, with the base URL taken from `HCB_BASE_URL`
    /// when it is set.
    pub fn from_env() -> Result<Self> {
        let config = Self::default();
        match std::env::var("HCB_BASE_URL") {
            Ok(url) if !url.trim().is_empty() => config.with_base_url(url).validated(),
            _ => Ok(config),
        }
    }

    /// Set the base URL (scheme and host).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the API path prefix.
    pub fn with_api_path(mut self, api_path: impl Into<String>) -> Self {
        self.api_path = api_path.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable or disable automatic token refresh.
    pub fn with_auto_refresh(mut self, enabled: bool) -> Self {
        self.auto_refresh_session = enabled;
        self
    }

    /// Set the buffer time before expiry to refresh.
    pub fn with_refresh_buffer(mut self, secs: i64) -> Self {
        self.refresh_buffer_secs = secs;
        self
    }

    /// The refresh buffer as a duration.
    pub(crate) fn refresh_buffer(&self) -> Result<chrono::Duration> {
        chrono::Duration::try_seconds(self.refresh_buffer_secs).ok_or_else(|| {
            Error::Config(format!(
                "Refresh buffer out of range: {} seconds",
                self.refresh_buffer_secs
            ))
        })
    }

    /// Check that the base URL parses and the refresh buffer is in range.
    pub fn validated(self) -> Result<Self> {
        self.refresh_buffer()?;
        let url = url::Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "Unsupported base URL scheme: {}",
                url.scheme()
            )));
        }
        Ok(self)
    }

    /// Full URL for an API path such as `/user`.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.api_path, path)
    }
}
