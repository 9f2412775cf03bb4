//! Configuration loading and validation.
//!
//! This module provides:
//! - Configuration types with serde support
//! - YAML file loading
//! - Validation that collects all errors

mod loader;
pub mod types;
mod validation;

pub use loader::{load_config, load_config_from_str};
pub use types::{ExplorerConfig, IndexConfig, PaginationConfig};
pub use validation::validate_config;
