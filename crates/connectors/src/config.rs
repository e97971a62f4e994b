//! Source configuration
//!
//! Parsed from the raw `[source]` TOML table provided by the config crate.
//! Every field is optional; the defaults describe the public Jaffle Shop API.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConnectorError;

/// Public Jaffle Shop API
pub const DEFAULT_BASE_URL: &str = "https://jaffle-shop.scalevector.ai/api/v1";

/// Records requested per page (`limit` query parameter)
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Pages fetched per resource before pagination stops regardless of content
pub const DEFAULT_MAX_PAGES: u32 = 100;

/// Jaffle Shop source configuration
///
/// # Example
///
/// ```toml
/// [source]
/// base_url = "https://jaffle-shop.scalevector.ai/api/v1"
/// page_size = 50      # optional, `limit` query parameter
/// timeout_secs = 30   # optional, per-request timeout
/// max_pages = 100     # optional, safety ceiling per resource
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct JaffleShopConfig {
    /// API base URL, endpoints are appended verbatim
    pub base_url: String,

    /// Records per page (default: 50)
    pub page_size: u32,

    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// Page ceiling per resource (default: 100)
    pub max_pages: u32,
}

impl Default for JaffleShopConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl JaffleShopConfig {
    /// Parse config from raw TOML value
    pub fn from_toml(value: &toml::Value) -> Result<Self, ConnectorError> {
        let config: JaffleShopConfig = value
            .clone()
            .try_into()
            .map_err(|e: toml::de::Error| {
                ConnectorError::ConfigError(format!("Invalid source config: {}", e))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Config pointing at another API root, defaults elsewhere
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<(), ConnectorError> {
        if self.base_url.trim().is_empty() {
            return Err(ConnectorError::ConfigError(
                "source base_url is required".to_string(),
            ));
        }
        if self.page_size == 0 {
            return Err(ConnectorError::ConfigError(
                "source page_size must be greater than 0".to_string(),
            ));
        }
        if self.max_pages == 0 {
            return Err(ConnectorError::ConfigError(
                "source max_pages must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
