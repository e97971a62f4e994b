//! Destination configuration

use serde::Deserialize;

/// Where the dataset database lives
///
/// # Example
///
/// ```toml
/// [destination]
/// data_dir = "data"   # dataset stored at data/{dataset_name}.db
/// in_memory = false   # true keeps the dataset in memory for the run
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DestinationConfig {
    /// Directory holding one database file per dataset
    pub data_dir: Option<String>,

    /// Keep the dataset in memory (nothing persists after the run)
    pub in_memory: bool,
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            data_dir: Some("data".to_string()),
            in_memory: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_data_dir() {
        let config: DestinationConfig = toml::from_str("").unwrap();
        assert_eq!(config.data_dir.as_deref(), Some("data"));
        assert!(!config.in_memory);
    }

    #[test]
    fn test_in_memory_flag() {
        let config: DestinationConfig = toml::from_str("in_memory = true").unwrap();
        assert!(config.in_memory);
    }
}
