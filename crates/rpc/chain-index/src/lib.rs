//! Chain data indexing and persistence for explorer queries.
//!
//! This crate stores the chain facts an Etherscan-compatible read API needs
//! (blocks, transactions, internal transactions, token transfers, tokens,
//! token balances and block reward ranges) in SQLite, and exposes them through
//! the [`ChainIndex`] read trait.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  Etherscan API                       │
//! │               (explorer_etherscan)                   │
//! └───────────────────────┬─────────────────────────────┘
//!                         │ ChainIndex (reads)
//!           ┌─────────────▼─────────────┐
//!           │   PersistentChainIndex    │ ◄── store_block / store_token
//!           │      (this crate)         │     (sync layer)
//!           └─────────────┬─────────────┘
//!                         │
//!                 ┌───────▼───────┐
//!                 │    SQLite     │
//!                 └───────────────┘
//! ```

pub mod error;
pub mod index;
mod ingest;
pub mod types;

pub use error::{ChainIndexError, ChainIndexResult};
pub use index::{ChainIndex, PersistentChainIndex, DEFAULT_READ_POOL_SIZE};
pub use types::*;
