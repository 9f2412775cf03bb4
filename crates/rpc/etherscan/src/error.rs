//! Error types for the Etherscan query layer.

use explorer_chain_index::ChainIndexError;
use thiserror::Error;

/// Errors returned by Etherscan query entry points.
///
/// Absence is never an error: listers return empty vectors and lookups
/// return `None`.
#[derive(Debug, Error)]
pub enum EtherscanError {
    /// Query options failed boundary validation.
    #[error("invalid query options: {0}")]
    InvalidOptions(String),

    /// A block's base reward plus fees does not fit in 256 bits.
    #[error("reward of block {number} overflows 256 bits")]
    RewardOverflow { number: u64 },

    /// The chain index failed to answer.
    #[error(transparent)]
    Index(#[from] ChainIndexError),
}

/// Result type for Etherscan queries.
pub type EtherscanResult<T> = Result<T, EtherscanError>;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error when loading config.
    #[error("failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },

    /// YAML parsing error.
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    /// Validation failed with one or more errors.
    #[error("config validation failed:\n{}", .0.join("\n"))]
    ValidationFailed(Vec<String>),
}
