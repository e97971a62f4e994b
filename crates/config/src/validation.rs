//! Configuration validation

use crate::Config;
use crate::error::{ConfigError, Result};

/// Check values that deserialize fine but cannot drive a run
pub(crate) fn validate_config(config: &Config) -> Result<()> {
    if config.pipeline.name.trim().is_empty() {
        return Err(ConfigError::invalid_value(
            "pipeline",
            "name",
            "must not be empty",
        ));
    }

    // Dataset name becomes a file name
    let dataset = &config.pipeline.dataset_name;
    if dataset.is_empty()
        || !dataset
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ConfigError::invalid_value(
            "pipeline",
            "dataset_name",
            format!("'{}' must be non-empty [A-Za-z0-9_-]", dataset),
        ));
    }

    if let Some(dir) = &config.destination.data_dir
        && dir.trim().is_empty()
    {
        return Err(ConfigError::invalid_value(
            "destination",
            "data_dir",
            "must not be empty when set",
        ));
    }

    if !config.source.is_table() {
        return Err(ConfigError::invalid_value(
            "source",
            "section",
            "must be a table",
        ));
    }

    Ok(())
}
