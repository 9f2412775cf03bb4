//! Entry point of the query layer.
//!
//! The list endpoints are implemented next to their record types in
//! `transactions`, `internal`, `token_transfers` and `blocks`; point lookups
//! in `lookups`.

use std::sync::Arc;

use alloy_primitives::Address;
use explorer_chain_index::{ChainIndex, PersistentChainIndex, StoredToken};

use crate::config::{ExplorerConfig, PaginationConfig};
use crate::error::EtherscanResult;
use crate::options::{ListOptions, OrderDirection, QueryOptions};

/// Etherscan-compatible queries over a [`ChainIndex`].
///
/// Every call is read-only and computes confirmations and rewards afresh, so
/// a single instance can be shared across threads.
pub struct EtherscanApi<I> {
    index: Arc<I>,
    pagination: PaginationConfig,
}

impl<I> Clone for EtherscanApi<I> {
    fn clone(&self) -> Self {
        Self {
            index: Arc::clone(&self.index),
            pagination: self.pagination.clone(),
        }
    }
}

impl<I: ChainIndex> EtherscanApi<I> {
    pub fn new(index: Arc<I>, pagination: PaginationConfig) -> Self {
        Self { index, pagination }
    }

    /// Query layer with the default page size limits.
    pub fn with_defaults(index: Arc<I>) -> Self {
        Self::new(index, PaginationConfig::default())
    }

    pub fn index(&self) -> &Arc<I> {
        &self.index
    }

    pub fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }

    /// Highest indexed block number, `None` while the index is empty.
    pub fn block_number(&self) -> EtherscanResult<Option<u64>> {
        Ok(self.index.max_block_number()?)
    }

    /// Token metadata for a contract.
    pub fn get_token(&self, contract: Address) -> EtherscanResult<Option<StoredToken>> {
        Ok(self.index.get_token(contract)?)
    }

    pub(crate) fn resolve(
        &self,
        options: &QueryOptions,
        default_direction: OrderDirection,
    ) -> EtherscanResult<ListOptions> {
        options.validate(&self.pagination, default_direction)
    }
}

impl EtherscanApi<PersistentChainIndex> {
    /// Open the configured index and build the query layer over it.
    pub fn open(config: &ExplorerConfig) -> EtherscanResult<Self> {
        let index = config.index.open()?;
        Ok(Self::new(Arc::new(index), config.pagination.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexConfig;
    use crate::test_utils::{block, TestChain};

    #[test]
    fn test_block_number_tracks_index() {
        let chain = TestChain::new();
        assert_eq!(chain.api.block_number().unwrap(), None);

        chain.store(block(3, Address::ZERO), vec![], vec![], vec![]);
        chain.store(block(8, Address::ZERO), vec![], vec![], vec![]);
        assert_eq!(chain.api.block_number().unwrap(), Some(8));
    }

    #[test]
    fn test_get_token_passes_through() {
        let chain = TestChain::new();
        let contract = Address::repeat_byte(0x1a);
        assert_eq!(chain.api.get_token(contract).unwrap(), None);

        let token = StoredToken {
            contract_address: contract,
            name: Some("Wrapped Ether".to_string()),
            symbol: Some("WETH".to_string()),
            decimals: Some(18),
        };
        chain.index.store_token(token.clone()).unwrap();
        assert_eq!(chain.api.get_token(contract).unwrap(), Some(token));
    }

    #[test]
    fn test_open_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExplorerConfig {
            index: IndexConfig {
                path: dir.path().join("explorer.sqlite").display().to_string(),
                read_pool_size: 2,
            },
            pagination: PaginationConfig {
                default_page_size: 25,
                max_page_size: 50,
            },
        };

        let api = EtherscanApi::open(&config).unwrap();
        assert_eq!(api.block_number().unwrap(), None);
        assert_eq!(api.pagination().default_page_size, 25);
    }
}
