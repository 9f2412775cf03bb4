//! `tokenbalance` and `getstatus` point lookups.

use alloy_primitives::{Address, B256};
use explorer_chain_index::{ChainIndex, StoredTokenBalance};

use crate::api::EtherscanApi;
use crate::error::EtherscanResult;

impl<I: ChainIndex> EtherscanApi<I> {
    /// Most recent known balance of `holder` in `contract`.
    pub fn get_token_balance(
        &self,
        contract: Address,
        holder: Address,
    ) -> EtherscanResult<Option<StoredTokenBalance>> {
        Ok(self.index().latest_token_balance(contract, holder)?)
    }

    /// Error of the first failed internal transaction of `transaction_hash`.
    pub fn get_transaction_error(&self, transaction_hash: B256) -> EtherscanResult<Option<String>> {
        let internals = self.index().internal_transactions(transaction_hash)?;
        Ok(internals.into_iter().find_map(|row| row.internal.error))
    }
}
