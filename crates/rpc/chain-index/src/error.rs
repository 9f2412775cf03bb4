//! Error types for chain indexing operations.

use thiserror::Error;

/// Errors that can occur during chain indexing operations.
#[derive(Debug, Error)]
pub enum ChainIndexError {
    /// Block referenced by ingested data is not the block being stored.
    #[error("block mismatch: expected block {expected}, got {actual}")]
    BlockMismatch { expected: u64, actual: u64 },

    /// Block reward range with `from_block > to_block`.
    #[error("invalid block reward range: {from_block}..={to_block}")]
    InvalidRewardRange { from_block: u64, to_block: u64 },

    /// Connection pool error.
    #[error("connection pool error: {0}")]
    Pool(String),

    /// SQLite database error.
    #[error("sqlite error: {0}")]
    Sqlite(String),
}

impl From<rusqlite::Error> for ChainIndexError {
    fn from(err: rusqlite::Error) -> Self {
        ChainIndexError::Sqlite(err.to_string())
    }
}

impl From<r2d2::Error> for ChainIndexError {
    fn from(err: r2d2::Error) -> Self {
        ChainIndexError::Pool(err.to_string())
    }
}

/// Result type for chain indexing operations.
pub type ChainIndexResult<T> = Result<T, ChainIndexError>;
