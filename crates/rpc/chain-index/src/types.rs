//! Types for explorer chain data storage.
//!
//! Stored types mirror the rows of the index tables. Joined types carry the
//! extra columns a read query pulls in from related tables.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// Stored block header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlock {
    /// Block number/height.
    pub number: u64,
    /// Block hash.
    pub hash: B256,
    /// Parent block hash.
    pub parent_hash: B256,
    /// Block timestamp (Unix seconds).
    pub timestamp: u64,
    /// Address credited with mining the block.
    pub miner: Address,
    /// Total gas used in this block.
    pub gas_used: u64,
    /// Gas limit for this block.
    pub gas_limit: u64,
}

/// Execution outcome of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Ok,
    Error,
}

impl TransactionStatus {
    pub(crate) fn as_i64(self) -> i64 {
        match self {
            Self::Ok => 1,
            Self::Error => 0,
        }
    }

    pub(crate) fn from_i64(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::Ok),
            0 => Some(Self::Error),
            _ => None,
        }
    }
}

/// Stored mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTransaction {
    /// Transaction hash.
    pub hash: B256,
    /// Block number this transaction is in.
    pub block_number: u64,
    /// Block hash.
    pub block_hash: B256,
    /// Index within the block.
    pub transaction_index: u32,
    /// Sender address.
    pub from: Address,
    /// Recipient address (None for contract creation).
    pub to: Option<Address>,
    /// Value transferred.
    pub value: U256,
    /// Gas limit.
    pub gas: u64,
    /// Gas price.
    pub gas_price: U256,
    /// Gas consumed by this transaction.
    pub gas_used: u64,
    /// Gas consumed by this and all preceding transactions of the block.
    pub cumulative_gas_used: u64,
    /// Sender nonce.
    pub nonce: u64,
    /// Input data.
    pub input: Bytes,
    /// Execution status.
    pub status: TransactionStatus,
}

/// Kind of an internal transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InternalTransactionType {
    Call,
    Create,
    Reward,
    Suicide,
}

impl InternalTransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Create => "create",
            Self::Reward => "reward",
            Self::Suicide => "suicide",
        }
    }
}

impl fmt::Display for InternalTransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown internal transaction type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown internal transaction type: {0}")]
pub struct UnknownInternalTransactionType(pub String);

impl FromStr for InternalTransactionType {
    type Err = UnknownInternalTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "call" => Ok(Self::Call),
            "create" => Ok(Self::Create),
            "reward" => Ok(Self::Reward),
            "suicide" => Ok(Self::Suicide),
            other => Err(UnknownInternalTransactionType(other.to_string())),
        }
    }
}

/// Stored internal transaction (trace) of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredInternalTransaction {
    /// Hash of the owning transaction.
    pub transaction_hash: B256,
    /// Position within the owning transaction.
    pub index: u32,
    /// Internal transaction kind.
    pub tx_type: InternalTransactionType,
    pub from: Address,
    pub to: Option<Address>,
    pub value: U256,
    /// Gas limit, absent for rewards and self-destructs.
    pub gas: Option<u64>,
    pub gas_used: Option<u64>,
    pub input: Bytes,
    /// Contract created by a `create` internal transaction.
    pub created_contract_address: Option<Address>,
    /// Error message if execution failed.
    pub error: Option<String>,
}

/// Stored ERC-20 style token transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokenTransfer {
    /// Hash of the transaction that emitted the transfer.
    pub transaction_hash: B256,
    /// Log index within the transaction.
    pub log_index: u32,
    pub from: Address,
    pub to: Address,
    pub token_contract_address: Address,
    pub amount: U256,
}

/// Token metadata keyed by contract address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub contract_address: Address,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
}

/// Token balance of a holder observed at a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokenBalance {
    pub token_contract_address: Address,
    pub holder_address: Address,
    pub block_number: u64,
    pub value: U256,
}

/// Base block reward applicable to every block in `[from_block, to_block]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRewardRange {
    pub from_block: u64,
    pub to_block: u64,
    pub reward: U256,
}

impl BlockRewardRange {
    /// Whether `number` falls inside this range.
    pub fn contains(&self, number: u64) -> bool {
        self.from_block <= number && number <= self.to_block
    }
}

/// Gas consumption of one transaction, the input to fee aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasCharge {
    pub gas_used: u64,
    pub gas_price: U256,
}

impl GasCharge {
    /// Fee paid in wei: `gas_used * gas_price`, `None` on overflow.
    pub fn fee(&self) -> Option<U256> {
        U256::from(self.gas_used).checked_mul(self.gas_price)
    }
}

/// The part an address plays in a transaction or token transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AddressRole {
    /// `from` address.
    Sender,
    /// `to` address.
    Receiver,
    /// Contract created by the transaction's `create` internal transaction.
    Creator,
}

/// Inclusive block number bounds; `None` leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockRange {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

impl BlockRange {
    /// Range with no bounds.
    pub const UNBOUNDED: Self = Self {
        start: None,
        end: None,
    };

    pub fn new(start: Option<u64>, end: Option<u64>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, number: u64) -> bool {
        self.start.is_none_or(|start| number >= start) && self.end.is_none_or(|end| number <= end)
    }

    /// Bounds as SQLite integers. `None` when no stored block can match,
    /// since block numbers never exceed `i64::MAX`.
    pub(crate) fn sql_bounds(&self) -> Option<(Option<i64>, Option<i64>)> {
        let start = match self.start {
            Some(start) => Some(i64::try_from(start).ok()?),
            None => None,
        };
        let end = self
            .end
            .map(|end| i64::try_from(end).unwrap_or(i64::MAX));
        Some((start, end))
    }
}

/// Transaction joined with its block and created contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionWithBlock {
    pub transaction: StoredTransaction,
    /// Timestamp of the containing block.
    pub block_timestamp: u64,
    /// Contract created by the transaction, if any.
    pub created_contract_address: Option<Address>,
}

/// Internal transaction joined with the block of its owning transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedInternalTransaction {
    pub internal: StoredInternalTransaction,
    pub block_number: u64,
    pub block_timestamp: u64,
}

/// Token transfer joined with its transaction and block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransferWithTransaction {
    pub transfer: StoredTokenTransfer,
    pub transaction: StoredTransaction,
    pub block_timestamp: u64,
}
