//! Jaffle Configuration
//!
//! TOML-based configuration loading with defaults that reproduce the fixed
//! Jaffle Shop run: an empty file (or no file at all) is a valid config.
//!
//! # Parsing
//!
//! ```
//! use jaffle_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[pipeline]\ndataset_name = \"shop\"").unwrap();
//! assert_eq!(config.pipeline.dataset_name, "shop");
//! ```
//!
//! # Example Full Config
//!
//! ```toml
//! [log]
//! level = "info"
//! format = "console"
//!
//! [source]
//! base_url = "https://jaffle-shop.scalevector.ai/api/v1"
//! page_size = 50
//! timeout_secs = 30
//! max_pages = 100
//!
//! [pipeline]
//! name = "jaffle_shop"
//! dataset_name = "jaffle_shop_data"
//! progress = "log"
//!
//! [destination]
//! data_dir = "data"
//! ```

mod destination;
mod error;
mod log;
mod pipeline;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use destination::DestinationConfig;
pub use error::{ConfigError, Result};
pub use log::{LogConfig, LogFormat, LogLevel};
pub use pipeline::{PipelineConfig, ProgressMode};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Raw source settings, parsed by the connectors crate
    pub source: toml::Value,

    /// Run identity (pipeline name, dataset, progress reporting)
    pub pipeline: PipelineConfig,

    /// Where loaded tables are persisted
    pub destination: DestinationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            source: toml::Value::Table(toml::map::Map::new()),
            pipeline: PipelineConfig::default(),
            destination: DestinationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or contains invalid TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
