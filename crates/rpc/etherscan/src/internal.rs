//! `txlistinternal`: internal transactions of one transaction.

use alloy_primitives::B256;
use explorer_chain_index::{ChainIndex, IndexedInternalTransaction, InternalTransactionType};

use crate::api::EtherscanApi;
use crate::error::EtherscanResult;

/// Whether a transaction's internal transactions include more than one row.
///
/// A lone `call` is the trace of the top-level call itself and carries no
/// information the transaction does not.
pub fn has_internal_transaction_siblings(internals: &[IndexedInternalTransaction]) -> bool {
    internals.len() > 1
}

fn is_listed(row: &IndexedInternalTransaction, has_siblings: bool) -> bool {
    row.internal.tx_type != InternalTransactionType::Call || has_siblings
}

impl<I: ChainIndex> EtherscanApi<I> {
    /// Internal transactions of `transaction_hash` in index order.
    ///
    /// Calls are dropped when they are the transaction's only internal
    /// transaction.
    pub fn list_internal_transactions(
        &self,
        transaction_hash: B256,
    ) -> EtherscanResult<Vec<IndexedInternalTransaction>> {
        let mut rows = self.index().internal_transactions(transaction_hash)?;
        let has_siblings = has_internal_transaction_siblings(&rows);
        rows.retain(|row| is_listed(row, has_siblings));

        tracing::debug!(
            "Listed {} internal transactions for {}",
            rows.len(),
            transaction_hash
        );
        Ok(rows)
    }
}
