//! Configuration types for the explorer query service.

use explorer_chain_index::{ChainIndexResult, PersistentChainIndex, DEFAULT_READ_POOL_SIZE};
use serde::Deserialize;

/// Root configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExplorerConfig {
    /// Chain index storage configuration.
    pub index: IndexConfig,

    /// Page size limits for list queries.
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// Chain index storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    /// Path to the SQLite database file.
    pub path: String,

    /// Number of pooled read connections. Default: 4.
    #[serde(default = "IndexConfig::default_read_pool_size")]
    pub read_pool_size: u32,
}

impl IndexConfig {
    const fn default_read_pool_size() -> u32 {
        DEFAULT_READ_POOL_SIZE
    }

    /// Open the chain index this configuration describes.
    pub fn open(&self) -> ChainIndexResult<PersistentChainIndex> {
        PersistentChainIndex::with_read_pool_size(&self.path, self.read_pool_size)
    }
}

/// Page size limits for list queries.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaginationConfig {
    /// Page size used when a query does not name one. Default: 10000.
    #[serde(default = "PaginationConfig::default_page_size")]
    pub default_page_size: u64,

    /// Largest page size a query may request. Default: 10000.
    #[serde(default = "PaginationConfig::default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: Self::default_page_size(),
            max_page_size: Self::default_max_page_size(),
        }
    }
}

impl PaginationConfig {
    const fn default_page_size() -> u64 {
        10_000
    }

    const fn default_max_page_size() -> u64 {
        10_000
    }
}
