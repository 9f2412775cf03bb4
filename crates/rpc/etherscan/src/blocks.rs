//! `getminedblocks`: blocks mined by an address with their rewards.

use alloy_primitives::{Address, B256, U256};
use explorer_chain_index::{ChainIndex, GasCharge};
use serde::{Deserialize, Serialize};

use crate::api::EtherscanApi;
use crate::error::{EtherscanError, EtherscanResult};
use crate::options::{OrderDirection, QueryOptions};
use crate::pipeline::order_by;

/// A mined block and what its miner earned for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinedBlockRecord {
    pub number: u64,
    pub hash: B256,
    pub timestamp: u64,
    /// Base reward plus the fees of every transaction in the block, in wei.
    pub reward: U256,
}

/// Base reward plus `gas_used * gas_price` summed over `charges`.
///
/// `None` if the total overflows.
pub fn block_reward(base: U256, charges: &[GasCharge]) -> Option<U256> {
    charges
        .iter()
        .try_fold(base, |total, charge| total.checked_add(charge.fee()?))
}

impl<I: ChainIndex> EtherscanApi<I> {
    /// Blocks whose miner is `miner`, newest first unless the options say
    /// otherwise.
    pub fn list_blocks(
        &self,
        miner: Address,
        options: &QueryOptions,
    ) -> EtherscanResult<Vec<MinedBlockRecord>> {
        let options = self.resolve(options, OrderDirection::Desc)?;

        let mut blocks = self.index().blocks_mined_by(miner, options.range)?;
        order_by(&mut blocks, options.direction, |block| block.number);
        let page = options.page.slice(blocks);

        let mut records = Vec::with_capacity(page.len());
        for block in page {
            let base = self
                .index()
                .block_reward_range(block.number)?
                .map_or(U256::ZERO, |range| range.reward);
            let charges = self.index().block_gas_charges(block.number)?;
            let reward = block_reward(base, &charges).ok_or(EtherscanError::RewardOverflow {
                number: block.number,
            })?;
            records.push(MinedBlockRecord {
                number: block.number,
                hash: block.hash,
                timestamp: block.timestamp,
                reward,
            });
        }

        tracing::debug!(
            "Listed {} mined blocks for {} (page {})",
            records.len(),
            miner,
            options.page.number
        );
        Ok(records)
    }
}
