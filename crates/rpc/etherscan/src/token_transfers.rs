//! `tokentx`: token transfers into or out of an address.

use std::collections::BTreeMap;

use alloy_primitives::{Address, Bytes, B256, U256};
use explorer_chain_index::{ChainIndex, StoredToken, StoredTokenTransfer};
use serde::{Deserialize, Serialize};

use crate::api::EtherscanApi;
use crate::error::EtherscanResult;
use crate::options::{OrderDirection, QueryOptions, TOKEN_TRANSFER_ROLES};
use crate::pipeline::{confirmations, order_by, union_by};

/// One row of a token transfer listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransferRecord {
    #[serde(flatten)]
    pub transfer: StoredTokenTransfer,
    pub block_number: u64,
    pub block_hash: B256,
    pub block_timestamp: u64,
    pub nonce: u64,
    pub transaction_index: u32,
    pub gas: u64,
    pub gas_price: U256,
    pub gas_used: u64,
    pub cumulative_gas_used: u64,
    pub input: Bytes,
    /// Token metadata, `None` when the token is not indexed.
    pub token_name: Option<String>,
    pub token_symbol: Option<String>,
    pub token_decimals: Option<u8>,
    pub confirmations: u64,
}

impl<I: ChainIndex> EtherscanApi<I> {
    /// Token transfers sent or received by `address`, optionally limited to
    /// one token contract.
    ///
    /// `filter_by` does not apply here.
    pub fn list_token_transfers(
        &self,
        address: Address,
        contract: Option<Address>,
        options: &QueryOptions,
    ) -> EtherscanResult<Vec<TokenTransferRecord>> {
        let options = self.resolve(options, OrderDirection::Asc)?;

        let mut batches = Vec::with_capacity(TOKEN_TRANSFER_ROLES.len());
        for role in TOKEN_TRANSFER_ROLES {
            batches.push(self.index().token_transfers_by_role(
                address,
                role,
                contract,
                options.range,
            )?);
        }

        let mut rows = union_by(batches, |row| {
            (row.transfer.transaction_hash, row.transfer.log_index)
        });
        order_by(&mut rows, options.direction, |row| {
            (
                row.transaction.block_number,
                row.transaction.transaction_index,
                row.transfer.log_index,
            )
        });
        let page = options.page.slice(rows);

        let max_block = self.index().max_block_number()?;
        // Pages repeat the same few tokens; look each one up once.
        let mut tokens: BTreeMap<Address, Option<StoredToken>> = BTreeMap::new();
        let mut records = Vec::with_capacity(page.len());
        for row in page {
            let contract_address = row.transfer.token_contract_address;
            let token = match tokens.get(&contract_address) {
                Some(token) => token.clone(),
                None => {
                    let token = self.index().get_token(contract_address)?;
                    tokens.insert(contract_address, token.clone());
                    token
                }
            };
            let (token_name, token_symbol, token_decimals) = match token {
                Some(token) => (token.name, token.symbol, token.decimals),
                None => (None, None, None),
            };

            let tx = row.transaction;
            records.push(TokenTransferRecord {
                transfer: row.transfer,
                block_number: tx.block_number,
                block_hash: tx.block_hash,
                block_timestamp: row.block_timestamp,
                nonce: tx.nonce,
                transaction_index: tx.transaction_index,
                gas: tx.gas,
                gas_price: tx.gas_price,
                gas_used: tx.gas_used,
                cumulative_gas_used: tx.cumulative_gas_used,
                input: tx.input,
                token_name,
                token_symbol,
                token_decimals,
                confirmations: confirmations(max_block, tx.block_number),
            });
        }

        tracing::debug!(
            "Listed {} token transfers for {} (page {})",
            records.len(),
            address,
            options.page.number
        );
        Ok(records)
    }
}
