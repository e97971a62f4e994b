//! Pipeline run identity

use serde::Deserialize;

/// Default pipeline name
pub const DEFAULT_PIPELINE_NAME: &str = "jaffle_shop";

/// Default dataset receiving the resource tables
pub const DEFAULT_DATASET_NAME: &str = "jaffle_shop_data";

/// How load progress is reported
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProgressMode {
    /// One info line per loaded batch (default)
    #[default]
    Log,
    /// Batch progress only at debug level
    None,
}

/// Pipeline configuration
///
/// # Example
///
/// ```toml
/// [pipeline]
/// name = "jaffle_shop"
/// dataset_name = "jaffle_shop_data"
/// progress = "log"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Pipeline name, recorded with every load
    pub name: String,

    /// Dataset the resource tables are written to
    pub dataset_name: String,

    /// Progress reporting mode
    pub progress: ProgressMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_PIPELINE_NAME.to_string(),
            dataset_name: DEFAULT_DATASET_NAME.to_string(),
            progress: ProgressMode::Log,
        }
    }
}
