//! Fixtures for unit tests.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, B256, U256};
use explorer_chain_index::{
    InternalTransactionType, PersistentChainIndex, StoredBlock, StoredInternalTransaction,
    StoredTokenTransfer, StoredTransaction, TransactionStatus,
};

use crate::api::EtherscanApi;

/// In-memory index with a query layer on top.
pub struct TestChain {
    pub index: Arc<PersistentChainIndex>,
    pub api: EtherscanApi<PersistentChainIndex>,
}

impl TestChain {
    pub fn new() -> Self {
        let index = Arc::new(PersistentChainIndex::in_memory().unwrap());
        let api = EtherscanApi::with_defaults(Arc::clone(&index));
        Self { index, api }
    }

    pub fn store(
        &self,
        block: StoredBlock,
        transactions: Vec<StoredTransaction>,
        internals: Vec<StoredInternalTransaction>,
        transfers: Vec<StoredTokenTransfer>,
    ) {
        self.index
            .store_block(block, transactions, internals, transfers)
            .unwrap();
    }
}

pub fn block(number: u64, miner: Address) -> StoredBlock {
    StoredBlock {
        number,
        hash: B256::left_padding_from(&number.to_be_bytes()),
        parent_hash: B256::left_padding_from(&number.saturating_sub(1).to_be_bytes()),
        timestamp: 1_700_000_000 + number * 12,
        miner,
        gas_used: 0,
        gas_limit: 30_000_000,
    }
}

/// Transaction hash derived from a small id.
pub fn tx_hash(id: u64) -> B256 {
    B256::left_padding_from(&id.to_be_bytes())
}

pub fn transaction(
    id: u64,
    block: &StoredBlock,
    index: u32,
    from: Address,
    to: Option<Address>,
) -> StoredTransaction {
    StoredTransaction {
        hash: tx_hash(id),
        block_number: block.number,
        block_hash: block.hash,
        transaction_index: index,
        from,
        to,
        value: U256::from(1_000u64),
        gas: 100_000,
        gas_price: U256::from(1u64),
        gas_used: 1,
        cumulative_gas_used: u64::from(index) + 1,
        nonce: id,
        input: Bytes::new(),
        status: TransactionStatus::Ok,
    }
}

pub fn internal(
    transaction_hash: B256,
    index: u32,
    tx_type: InternalTransactionType,
) -> StoredInternalTransaction {
    StoredInternalTransaction {
        transaction_hash,
        index,
        tx_type,
        from: Address::repeat_byte(0x01),
        to: Some(Address::repeat_byte(0x02)),
        value: U256::ZERO,
        gas: Some(30_000),
        gas_used: Some(21_000),
        input: Bytes::new(),
        created_contract_address: None,
        error: None,
    }
}

pub fn token_transfer(
    transaction: &StoredTransaction,
    log_index: u32,
    from: Address,
    to: Address,
    token: Address,
    amount: u64,
) -> StoredTokenTransfer {
    StoredTokenTransfer {
        transaction_hash: transaction.hash,
        log_index,
        from,
        to,
        token_contract_address: token,
        amount: U256::from(amount),
    }
}
