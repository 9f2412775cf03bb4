//! `txlist`: transactions an address sent, received or deployed.

use alloy_primitives::Address;
use explorer_chain_index::{ChainIndex, StoredTransaction};
use serde::{Deserialize, Serialize};

use crate::api::EtherscanApi;
use crate::error::EtherscanResult;
use crate::options::{OrderDirection, QueryOptions};
use crate::pipeline::{confirmations, order_by, union_by};

/// One row of an address transaction listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(flatten)]
    pub transaction: StoredTransaction,
    pub block_timestamp: u64,
    /// Contract deployed by the transaction, if any.
    pub created_contract_address: Option<Address>,
    pub confirmations: u64,
}

impl<I: ChainIndex> EtherscanApi<I> {
    /// Mined transactions where `address` is the sender, the recipient or the
    /// created contract.
    ///
    /// Ordered by `(block_number, transaction_index)`, ascending unless the
    /// options say otherwise.
    pub fn list_transactions(
        &self,
        address: Address,
        options: &QueryOptions,
    ) -> EtherscanResult<Vec<TransactionRecord>> {
        let options = self.resolve(options, OrderDirection::Asc)?;

        let mut batches = Vec::with_capacity(options.transaction_roles().len());
        for &role in options.transaction_roles() {
            batches.push(
                self.index()
                    .transactions_by_role(address, role, options.range)?,
            );
        }

        let mut rows = union_by(batches, |row| row.transaction.hash);
        order_by(&mut rows, options.direction, |row| {
            (row.transaction.block_number, row.transaction.transaction_index)
        });
        let page = options.page.slice(rows);

        let max_block = self.index().max_block_number()?;
        let records: Vec<TransactionRecord> = page
            .into_iter()
            .map(|row| TransactionRecord {
                confirmations: confirmations(max_block, row.transaction.block_number),
                transaction: row.transaction,
                block_timestamp: row.block_timestamp,
                created_contract_address: row.created_contract_address,
            })
            .collect();

        tracing::debug!(
            "Listed {} transactions for {} (page {})",
            records.len(),
            address,
            options.page.number
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::FilterBy;
    use crate::test_utils::{block, internal, transaction, tx_hash, TestChain};
    use alloy_primitives::B256;
    use explorer_chain_index::InternalTransactionType;

    const ALICE: Address = Address::repeat_byte(0xa1);
    const BOB: Address = Address::repeat_byte(0xb0);
    const MINER: Address = Address::repeat_byte(0xee);

    fn hashes(records: &[TransactionRecord]) -> Vec<B256> {
        records.iter().map(|r| r.transaction.hash).collect()
    }

    /// Alice sends in blocks 1 and 3, receives in block 2, deploys in block 4.
    fn alice_chain() -> (TestChain, Address) {
        let chain = TestChain::new();
        let contract = Address::repeat_byte(0xc0);

        let b1 = block(1, MINER);
        let t1 = transaction(1, &b1, 0, ALICE, Some(BOB));
        chain.store(b1, vec![t1], vec![], vec![]);

        let b2 = block(2, MINER);
        let t2 = transaction(2, &b2, 0, BOB, Some(ALICE));
        chain.store(b2, vec![t2], vec![], vec![]);

        let b3 = block(3, MINER);
        let unrelated = transaction(30, &b3, 0, BOB, Some(MINER));
        let t3 = transaction(3, &b3, 1, ALICE, Some(BOB));
        chain.store(b3, vec![unrelated, t3], vec![], vec![]);

        let b4 = block(4, MINER);
        let t4 = transaction(4, &b4, 0, BOB, None);
        let mut create = internal(t4.hash, 0, InternalTransactionType::Create);
        create.to = None;
        create.created_contract_address = Some(contract);
        chain.store(b4, vec![t4], vec![create], vec![]);

        (chain, contract)
    }

    #[test]
    fn test_unknown_address_is_empty() {
        let (chain, _) = alice_chain();
        let records = chain
            .api
            .list_transactions(Address::repeat_byte(0x99), &QueryOptions::default())
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_sender_and_receiver_ordered_ascending() {
        let (chain, _) = alice_chain();
        let records = chain
            .api
            .list_transactions(ALICE, &QueryOptions::default())
            .unwrap();
        assert_eq!(hashes(&records), vec![tx_hash(1), tx_hash(2), tx_hash(3)]);

        let confirmations: Vec<u64> = records.iter().map(|r| r.confirmations).collect();
        assert_eq!(confirmations, vec![3, 2, 1]);
        assert_eq!(records[1].block_timestamp, block(2, MINER).timestamp);
    }

    #[test]
    fn test_created_contract_lists_its_creation() {
        let (chain, contract) = alice_chain();
        let records = chain
            .api
            .list_transactions(contract, &QueryOptions::default())
            .unwrap();
        assert_eq!(hashes(&records), vec![tx_hash(4)]);
        assert_eq!(records[0].created_contract_address, Some(contract));
        assert_eq!(records[0].confirmations, 0);
    }

    #[test]
    fn test_self_transaction_listed_once() {
        let chain = TestChain::new();
        let b1 = block(1, MINER);
        chain.store(
            b1.clone(),
            vec![transaction(1, &b1, 0, ALICE, Some(ALICE))],
            vec![],
            vec![],
        );

        let records = chain
            .api
            .list_transactions(ALICE, &QueryOptions::default())
            .unwrap();
        assert_eq!(hashes(&records), vec![tx_hash(1)]);
    }

    #[test]
    fn test_filter_by_partitions_listing() {
        let (chain, contract) = alice_chain();
        let from = chain
            .api
            .list_transactions(ALICE, &QueryOptions::default().filter_by(FilterBy::From))
            .unwrap();
        let to = chain
            .api
            .list_transactions(ALICE, &QueryOptions::default().filter_by(FilterBy::To))
            .unwrap();
        assert_eq!(hashes(&from), vec![tx_hash(1), tx_hash(3)]);
        assert_eq!(hashes(&to), vec![tx_hash(2)]);

        let created = chain
            .api
            .list_transactions(contract, &QueryOptions::default().filter_by(FilterBy::To))
            .unwrap();
        assert_eq!(hashes(&created), vec![tx_hash(4)]);
    }

    #[test]
    fn test_descending_block_range_and_pages() {
        let (chain, _) = alice_chain();
        let desc = chain
            .api
            .list_transactions(ALICE, &QueryOptions::default().order(OrderDirection::Desc))
            .unwrap();
        assert_eq!(hashes(&desc), vec![tx_hash(3), tx_hash(2), tx_hash(1)]);

        let bounded = chain
            .api
            .list_transactions(ALICE, &QueryOptions::default().blocks(Some(2), Some(3)))
            .unwrap();
        assert_eq!(hashes(&bounded), vec![tx_hash(2), tx_hash(3)]);

        let second_page = chain
            .api
            .list_transactions(ALICE, &QueryOptions::default().page(2, 2))
            .unwrap();
        assert_eq!(hashes(&second_page), vec![tx_hash(3)]);

        let past_end = chain
            .api
            .list_transactions(ALICE, &QueryOptions::default().page(3, 2))
            .unwrap();
        assert!(past_end.is_empty());
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let (chain, _) = alice_chain();
        let first = chain
            .api
            .list_transactions(ALICE, &QueryOptions::default())
            .unwrap();
        let second = chain
            .api
            .list_transactions(ALICE, &QueryOptions::default())
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_record_serializes_flat() {
        let (chain, _) = alice_chain();
        let records = chain
            .api
            .list_transactions(ALICE, &QueryOptions::default().page(1, 1))
            .unwrap();
        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["confirmations"], 3);
        assert!(json.get("hash").is_some());
        assert!(json.get("transaction").is_none());
    }
}
