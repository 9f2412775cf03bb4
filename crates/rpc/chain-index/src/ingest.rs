//! Write path of the persistent index.
//!
//! The sync layer feeds mined blocks and token facts through these methods.
//! Every block is written in one SQLite transaction so readers never observe
//! a partially stored block.

use rusqlite::params;

use crate::error::{ChainIndexError, ChainIndexResult};
use crate::index::{u256_to_be_bytes, PersistentChainIndex};
use crate::types::{
    BlockRewardRange, StoredBlock, StoredInternalTransaction, StoredToken, StoredTokenBalance,
    StoredTokenTransfer, StoredTransaction,
};

impl PersistentChainIndex {
    /// Store a block with its transactions, internal transactions and token
    /// transfers.
    ///
    /// Storing a block number again replaces everything previously stored for
    /// it.
    pub fn store_block(
        &self,
        block: StoredBlock,
        transactions: Vec<StoredTransaction>,
        internal_transactions: Vec<StoredInternalTransaction>,
        token_transfers: Vec<StoredTokenTransfer>,
    ) -> ChainIndexResult<()> {
        if let Some(tx) = transactions.iter().find(|tx| tx.block_number != block.number) {
            return Err(ChainIndexError::BlockMismatch {
                expected: block.number,
                actual: tx.block_number,
            });
        }

        let block_number = block.number as i64;
        let mut conn = self.writer.lock();
        let tx = conn.transaction()?;

        // Children first so foreign keys hold while the block is replaced.
        tx.execute(
            "DELETE FROM token_transfers WHERE transaction_hash IN
                 (SELECT hash FROM transactions WHERE block_number = ?1)",
            params![block_number],
        )?;
        tx.execute(
            "DELETE FROM internal_transactions WHERE transaction_hash IN
                 (SELECT hash FROM transactions WHERE block_number = ?1)",
            params![block_number],
        )?;
        tx.execute(
            "DELETE FROM transactions WHERE block_number = ?1",
            params![block_number],
        )?;

        tx.execute(
            "INSERT OR REPLACE INTO blocks
             (number, hash, parent_hash, timestamp, miner, gas_used, gas_limit)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                block_number,
                block.hash.as_slice(),
                block.parent_hash.as_slice(),
                block.timestamp as i64,
                block.miner.as_slice(),
                block.gas_used as i64,
                block.gas_limit as i64,
            ],
        )?;

        for transaction in &transactions {
            insert_transaction(&tx, transaction)?;
        }
        for internal in &internal_transactions {
            insert_internal_transaction(&tx, internal)?;
        }
        for transfer in &token_transfers {
            insert_token_transfer(&tx, transfer)?;
        }

        tx.commit()?;

        tracing::debug!(
            "Stored block {} with {} transactions, {} internal transactions, {} token transfers",
            block.number,
            transactions.len(),
            internal_transactions.len(),
            token_transfers.len()
        );

        Ok(())
    }

    /// Insert or update token metadata.
    pub fn store_token(&self, token: StoredToken) -> ChainIndexResult<()> {
        let conn = self.writer.lock();
        conn.execute(
            "INSERT OR REPLACE INTO tokens (contract_address, name, symbol, decimals)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                token.contract_address.as_slice(),
                token.name,
                token.symbol,
                token.decimals.map(i64::from),
            ],
        )?;
        Ok(())
    }

    /// Record a holder's balance observed at a block.
    pub fn store_token_balance(&self, balance: StoredTokenBalance) -> ChainIndexResult<()> {
        let conn = self.writer.lock();
        conn.execute(
            "INSERT OR REPLACE INTO token_balances
             (token_contract_address, holder_address, block_number, value)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                balance.token_contract_address.as_slice(),
                balance.holder_address.as_slice(),
                balance.block_number as i64,
                &u256_to_be_bytes(balance.value) as &[u8],
            ],
        )?;
        Ok(())
    }

    /// Register the base reward for a range of blocks.
    pub fn store_block_reward(&self, range: BlockRewardRange) -> ChainIndexResult<()> {
        if range.from_block > range.to_block {
            return Err(ChainIndexError::InvalidRewardRange {
                from_block: range.from_block,
                to_block: range.to_block,
            });
        }

        let conn = self.writer.lock();
        conn.execute(
            "INSERT OR REPLACE INTO block_rewards (from_block, to_block, reward)
             VALUES (?1, ?2, ?3)",
            params![
                range.from_block as i64,
                range.to_block as i64,
                &u256_to_be_bytes(range.reward) as &[u8],
            ],
        )?;
        Ok(())
    }
}

fn insert_transaction(
    tx: &rusqlite::Transaction<'_>,
    transaction: &StoredTransaction,
) -> ChainIndexResult<()> {
    tx.execute(
        "INSERT OR REPLACE INTO transactions
         (hash, block_number, block_hash, transaction_index, from_addr, to_addr, value, gas,
          gas_price, gas_used, cumulative_gas_used, nonce, input, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            transaction.hash.as_slice(),
            transaction.block_number as i64,
            transaction.block_hash.as_slice(),
            transaction.transaction_index as i64,
            transaction.from.as_slice(),
            transaction.to.as_ref().map(|a| a.as_slice()),
            &u256_to_be_bytes(transaction.value) as &[u8],
            transaction.gas as i64,
            &u256_to_be_bytes(transaction.gas_price) as &[u8],
            transaction.gas_used as i64,
            transaction.cumulative_gas_used as i64,
            transaction.nonce as i64,
            transaction.input.as_ref(),
            transaction.status.as_i64(),
        ],
    )?;
    Ok(())
}

fn insert_internal_transaction(
    tx: &rusqlite::Transaction<'_>,
    internal: &StoredInternalTransaction,
) -> ChainIndexResult<()> {
    tx.execute(
        "INSERT OR REPLACE INTO internal_transactions
         (transaction_hash, idx, tx_type, from_addr, to_addr, value, gas, gas_used, input,
          created_contract_address, error)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            internal.transaction_hash.as_slice(),
            internal.index as i64,
            internal.tx_type.as_str(),
            internal.from.as_slice(),
            internal.to.as_ref().map(|a| a.as_slice()),
            &u256_to_be_bytes(internal.value) as &[u8],
            internal.gas.map(|g| g as i64),
            internal.gas_used.map(|g| g as i64),
            internal.input.as_ref(),
            internal.created_contract_address.as_ref().map(|a| a.as_slice()),
            internal.error.as_deref(),
        ],
    )?;
    Ok(())
}

fn insert_token_transfer(
    tx: &rusqlite::Transaction<'_>,
    transfer: &StoredTokenTransfer,
) -> ChainIndexResult<()> {
    tx.execute(
        "INSERT OR REPLACE INTO token_transfers
         (transaction_hash, log_index, from_addr, to_addr, token_contract_address, amount)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            transfer.transaction_hash.as_slice(),
            transfer.log_index as i64,
            transfer.from.as_slice(),
            transfer.to.as_slice(),
            transfer.token_contract_address.as_slice(),
            &u256_to_be_bytes(transfer.amount) as &[u8],
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::{make_test_block, make_test_internal, make_test_transaction};
    use crate::index::ChainIndex;
    use crate::types::{AddressRole, BlockRange, InternalTransactionType};
    use alloy_primitives::{Address, B256, U256};

    #[test]
    fn test_restoring_block_replaces_contents() {
        let index = PersistentChainIndex::in_memory().unwrap();
        let alice = Address::repeat_byte(0xa1);
        let miner = Address::repeat_byte(0xee);
        let block = make_test_block(10, miner);

        let first = make_test_transaction(B256::repeat_byte(0x01), &block, 0, alice, None);
        let mut create = make_test_internal(first.hash, 0, InternalTransactionType::Create);
        create.created_contract_address = Some(Address::repeat_byte(0xc0));
        index
            .store_block(block.clone(), vec![first], vec![create], vec![])
            .unwrap();

        let second = make_test_transaction(B256::repeat_byte(0x02), &block, 0, alice, None);
        index
            .store_block(block, vec![second.clone()], vec![], vec![])
            .unwrap();

        let rows = index
            .transactions_by_role(alice, AddressRole::Sender, BlockRange::UNBOUNDED)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction.hash, second.hash);
        assert!(index
            .internal_transactions(B256::repeat_byte(0x01))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_transaction_from_other_block_rejected() {
        let index = PersistentChainIndex::in_memory().unwrap();
        let miner = Address::repeat_byte(0xee);
        let block = make_test_block(10, miner);
        let other = make_test_block(11, miner);
        let tx = make_test_transaction(B256::repeat_byte(0x01), &other, 0, miner, None);

        let err = index.store_block(block, vec![tx], vec![], vec![]).unwrap_err();
        assert!(matches!(
            err,
            ChainIndexError::BlockMismatch {
                expected: 10,
                actual: 11
            }
        ));
        assert_eq!(index.max_block_number().unwrap(), None);
    }

    #[test]
    fn test_orphan_internal_transaction_rolls_back_block() {
        let index = PersistentChainIndex::in_memory().unwrap();
        let block = make_test_block(12, Address::repeat_byte(0xee));
        let orphan = make_test_internal(B256::repeat_byte(0x99), 0, InternalTransactionType::Call);

        let err = index
            .store_block(block, vec![], vec![orphan], vec![])
            .unwrap_err();
        assert!(matches!(err, ChainIndexError::Sqlite(_)));
        assert_eq!(index.max_block_number().unwrap(), None);
    }

    #[test]
    fn test_inverted_reward_range_rejected() {
        let index = PersistentChainIndex::in_memory().unwrap();
        let err = index
            .store_block_reward(BlockRewardRange {
                from_block: 10,
                to_block: 9,
                reward: U256::from(1u64),
            })
            .unwrap_err();
        assert!(matches!(err, ChainIndexError::InvalidRewardRange { .. }));
    }

    #[test]
    fn test_token_upsert_overwrites_metadata() {
        let index = PersistentChainIndex::in_memory().unwrap();
        let contract = Address::repeat_byte(0x1a);
        index
            .store_token(StoredToken {
                contract_address: contract,
                name: None,
                symbol: None,
                decimals: None,
            })
            .unwrap();
        index
            .store_token(StoredToken {
                contract_address: contract,
                name: Some("Example".to_string()),
                symbol: Some("EXM".to_string()),
                decimals: Some(18),
            })
            .unwrap();

        let token = index.get_token(contract).unwrap().unwrap();
        assert_eq!(token.symbol.as_deref(), Some("EXM"));
        assert_eq!(token.decimals, Some(18));
        assert!(index.get_token(Address::ZERO).unwrap().is_none());
    }

    #[test]
    fn test_latest_token_balance_prefers_highest_block() {
        let index = PersistentChainIndex::in_memory().unwrap();
        let contract = Address::repeat_byte(0x1a);
        let holder = Address::repeat_byte(0xa1);

        for (block_number, value) in [(5u64, 50u64), (15, 150), (10, 100)] {
            index
                .store_token_balance(StoredTokenBalance {
                    token_contract_address: contract,
                    holder_address: holder,
                    block_number,
                    value: U256::from(value),
                })
                .unwrap();
        }

        let latest = index.latest_token_balance(contract, holder).unwrap().unwrap();
        assert_eq!(latest.block_number, 15);
        assert_eq!(latest.value, U256::from(150u64));
        assert!(index
            .latest_token_balance(contract, Address::repeat_byte(0xb0))
            .unwrap()
            .is_none());
    }
}
