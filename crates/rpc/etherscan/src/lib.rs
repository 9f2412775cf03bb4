//! Etherscan-compatible account, token and block queries.
//!
//! This crate answers the read side of the Etherscan API (`txlist`,
//! `txlistinternal`, `tokentx`, `getminedblocks`, `tokenbalance`,
//! `getstatus`) over a [`explorer_chain_index::ChainIndex`]. Request routing
//! and response encoding are left to the caller.
//!
//! # Example
//!
//! ```rust,no_run
//! use alloy_primitives::Address;
//! use explorer_etherscan::{load_config, EtherscanApi, OrderDirection, QueryOptions};
//!
//! let config = load_config("explorer.yaml").unwrap();
//! let api = EtherscanApi::open(&config).unwrap();
//!
//! let options = QueryOptions::default()
//!     .order(OrderDirection::Desc)
//!     .page(1, 25);
//! let latest = api
//!     .list_transactions(Address::repeat_byte(0xa1), &options)
//!     .unwrap();
//! ```

pub mod api;
pub mod blocks;
pub mod config;
pub mod error;
pub mod internal;
pub mod lookups;
pub mod options;
mod pipeline;
pub mod token_transfers;
pub mod transactions;

#[cfg(test)]
mod test_utils;

// Re-export key types for convenience
pub use api::EtherscanApi;
pub use blocks::{block_reward, MinedBlockRecord};
pub use config::{load_config, load_config_from_str, ExplorerConfig};
pub use error::{ConfigError, EtherscanError, EtherscanResult};
pub use internal::has_internal_transaction_siblings;
pub use options::{FilterBy, ListOptions, OrderDirection, Page, QueryOptions};
pub use pipeline::confirmations;
pub use token_transfers::TokenTransferRecord;
pub use transactions::TransactionRecord;
