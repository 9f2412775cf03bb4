//! Configuration file loading.

use crate::config::types::ExplorerConfig;
use crate::config::validation::validate_config;
use crate::error::ConfigError;
use std::path::Path;

/// Load and validate configuration from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the YAML is invalid, or any
/// configuration value fails validation.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ExplorerConfig, ConfigError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path_str.clone(),
        source: e,
    })?;

    load_config_from_str(&content, &path_str)
}

/// Load and validate configuration from a YAML string.
pub fn load_config_from_str(
    content: &str,
    source_name: &str,
) -> Result<ExplorerConfig, ConfigError> {
    let config: ExplorerConfig = serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
        path: source_name.to_string(),
        source: e,
    })?;

    validate_config(&config)?;

    Ok(config)
}
