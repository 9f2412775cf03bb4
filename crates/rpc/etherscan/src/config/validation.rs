//! Configuration validation.
//!
//! Collects every error before returning so all problems surface at once.

use crate::config::types::{ExplorerConfig, IndexConfig, PaginationConfig};
use crate::error::ConfigError;

/// Largest accepted read pool.
const MAX_READ_POOL_SIZE: u32 = 64;

/// Validate the entire explorer configuration.
pub fn validate_config(config: &ExplorerConfig) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    validate_index_config(&config.index, &mut errors);
    validate_pagination_config(&config.pagination, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationFailed(errors))
    }
}

fn validate_index_config(config: &IndexConfig, errors: &mut Vec<String>) {
    if config.path.is_empty() {
        errors.push("index.path cannot be empty".to_string());
    }

    if config.read_pool_size == 0 || config.read_pool_size > MAX_READ_POOL_SIZE {
        errors.push(format!(
            "index.read_pool_size must be between 1 and {}, got {}",
            MAX_READ_POOL_SIZE, config.read_pool_size
        ));
    }
}

fn validate_pagination_config(config: &PaginationConfig, errors: &mut Vec<String>) {
    if config.default_page_size == 0 {
        errors.push("pagination.default_page_size must be greater than 0".to_string());
    }

    if config.max_page_size == 0 {
        errors.push("pagination.max_page_size must be greater than 0".to_string());
    }

    if config.default_page_size > config.max_page_size {
        errors.push(format!(
            "pagination.default_page_size ({}) cannot exceed pagination.max_page_size ({})",
            config.default_page_size, config.max_page_size
        ));
    }
}
