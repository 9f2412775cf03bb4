//! Chain index trait and persistent implementation.
//!
//! The `ChainIndex` trait defines the read capabilities the explorer query
//! layer depends on. `PersistentChainIndex` implements it using a SQLite
//! database with a connection pool (r2d2) for concurrent reads and a dedicated
//! writer connection for ingestion.

use alloy_primitives::{Address, Bytes, B256, U256};
use parking_lot::Mutex;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection};

use crate::error::ChainIndexResult;
use crate::types::{
    AddressRole, BlockRange, BlockRewardRange, GasCharge, IndexedInternalTransaction,
    InternalTransactionType, StoredBlock, StoredInternalTransaction, StoredToken,
    StoredTokenBalance, StoredTokenTransfer, StoredTransaction, TokenTransferWithTransaction,
    TransactionStatus, TransactionWithBlock,
};

/// Default number of pooled read connections.
pub const DEFAULT_READ_POOL_SIZE: u32 = 4;

/// Read capabilities over indexed chain data.
///
/// All methods are synchronous. Row sets are returned unpaginated; ordering,
/// de-duplication and paging belong to the caller.
pub trait ChainIndex: Send + Sync {
    /// Highest block number in the index.
    fn max_block_number(&self) -> ChainIndexResult<Option<u64>>;

    /// Token metadata by contract address.
    fn get_token(&self, contract: Address) -> ChainIndexResult<Option<StoredToken>>;

    /// Mined transactions in which `address` plays `role`, within `range`.
    fn transactions_by_role(
        &self,
        address: Address,
        role: AddressRole,
        range: BlockRange,
    ) -> ChainIndexResult<Vec<TransactionWithBlock>>;

    /// All internal transactions of a transaction, ordered by index.
    fn internal_transactions(
        &self,
        transaction_hash: B256,
    ) -> ChainIndexResult<Vec<IndexedInternalTransaction>>;

    /// Token transfers in which `address` plays `role`, optionally limited to
    /// one token contract.
    fn token_transfers_by_role(
        &self,
        address: Address,
        role: AddressRole,
        contract: Option<Address>,
        range: BlockRange,
    ) -> ChainIndexResult<Vec<TokenTransferWithTransaction>>;

    /// Blocks whose miner is `miner`, within `range`.
    fn blocks_mined_by(&self, miner: Address, range: BlockRange)
        -> ChainIndexResult<Vec<StoredBlock>>;

    /// Gas consumption of every transaction in a block.
    fn block_gas_charges(&self, number: u64) -> ChainIndexResult<Vec<GasCharge>>;

    /// Reward range covering `number`.
    fn block_reward_range(&self, number: u64) -> ChainIndexResult<Option<BlockRewardRange>>;

    /// Balance row with the highest block number for `(contract, holder)`.
    fn latest_token_balance(
        &self,
        contract: Address,
        holder: Address,
    ) -> ChainIndexResult<Option<StoredTokenBalance>>;
}

/// Persistent chain index backed by SQLite.
///
/// Uses a connection pool for concurrent reads and a dedicated writer connection
/// for serialized writes. SQLite WAL mode allows readers to proceed without
/// blocking the writer and vice versa.
pub struct PersistentChainIndex {
    /// Connection pool for read operations (concurrent).
    read_pool: Pool<SqliteConnectionManager>,
    /// Dedicated connection for write operations (serialized).
    pub(crate) writer: Mutex<Connection>,
}

/// Configure a connection with standard PRAGMAs for WAL mode.
fn configure_connection(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA synchronous=NORMAL;
         PRAGMA foreign_keys=ON;",
    )
}

const BLOCK_COLUMNS: &str = "number, hash, parent_hash, timestamp, miner, gas_used, gas_limit";

/// Transaction columns, always selected first so `row_to_stored_transaction`
/// can read them from fixed positions.
const TRANSACTION_COLUMNS: &str = "t.hash, t.block_number, t.block_hash, t.transaction_index,
    t.from_addr, t.to_addr, t.value, t.gas, t.gas_price, t.gas_used, t.cumulative_gas_used,
    t.nonce, t.input, t.status";
const TRANSACTION_COLUMN_COUNT: usize = 14;

impl PersistentChainIndex {
    /// Create a new persistent chain index backed by an on-disk SQLite database.
    pub fn new(db_path: impl AsRef<std::path::Path>) -> ChainIndexResult<Self> {
        Self::with_read_pool_size(db_path, DEFAULT_READ_POOL_SIZE)
    }

    /// Like [`PersistentChainIndex::new`] with an explicit read pool size.
    pub fn with_read_pool_size(
        db_path: impl AsRef<std::path::Path>,
        read_pool_size: u32,
    ) -> ChainIndexResult<Self> {
        // Writer first: it creates the file the read-only pool opens.
        let writer = Connection::open(&db_path)?;
        configure_connection(&writer)?;
        init_schema(&writer)?;

        let manager = SqliteConnectionManager::file(&db_path)
            .with_flags(
                rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .with_init(|conn| configure_connection(conn));
        let read_pool = Pool::builder().max_size(read_pool_size).build(manager)?;

        tracing::info!(
            "Chain index opened at {} with {} read connections",
            db_path.as_ref().display(),
            read_pool_size
        );

        Ok(Self {
            read_pool,
            writer: Mutex::new(writer),
        })
    }

    /// Create an in-memory chain index for testing.
    ///
    /// In-memory SQLite DBs are per-connection, so a named shared-cache URI
    /// lets the writer and the read pool see the same data.
    pub fn in_memory() -> ChainIndexResult<Self> {
        let uri = format!("file:explorer_{}?mode=memory&cache=shared", unique_id());
        let writer = Connection::open(&uri)?;
        configure_connection(&writer)?;
        init_schema(&writer)?;

        let manager =
            SqliteConnectionManager::file(&uri).with_init(|conn| configure_connection(conn));
        let read_pool = Pool::builder().max_size(2).build(manager)?;

        Ok(Self {
            read_pool,
            writer: Mutex::new(writer),
        })
    }

    /// Get a read connection from the pool.
    fn read_conn(&self) -> ChainIndexResult<r2d2::PooledConnection<SqliteConnectionManager>> {
        Ok(self.read_pool.get()?)
    }
}

fn init_schema(conn: &Connection) -> ChainIndexResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS blocks (
             number INTEGER PRIMARY KEY,
             hash BLOB NOT NULL UNIQUE,
             parent_hash BLOB NOT NULL,
             timestamp INTEGER NOT NULL,
             miner BLOB NOT NULL,
             gas_used INTEGER NOT NULL,
             gas_limit INTEGER NOT NULL
         );
         CREATE INDEX IF NOT EXISTS idx_blocks_miner ON blocks(miner, number);

         CREATE TABLE IF NOT EXISTS transactions (
             hash BLOB PRIMARY KEY,
             block_number INTEGER NOT NULL,
             block_hash BLOB NOT NULL,
             transaction_index INTEGER NOT NULL,
             from_addr BLOB NOT NULL,
             to_addr BLOB,
             value BLOB NOT NULL,
             gas INTEGER NOT NULL,
             gas_price BLOB NOT NULL,
             gas_used INTEGER NOT NULL,
             cumulative_gas_used INTEGER NOT NULL,
             nonce INTEGER NOT NULL,
             input BLOB NOT NULL,
             status INTEGER NOT NULL,
             FOREIGN KEY (block_number) REFERENCES blocks(number)
         );
         CREATE INDEX IF NOT EXISTS idx_tx_block ON transactions(block_number);
         CREATE INDEX IF NOT EXISTS idx_tx_from ON transactions(from_addr);
         CREATE INDEX IF NOT EXISTS idx_tx_to ON transactions(to_addr);

         CREATE TABLE IF NOT EXISTS internal_transactions (
             transaction_hash BLOB NOT NULL,
             idx INTEGER NOT NULL,
             tx_type TEXT NOT NULL,
             from_addr BLOB NOT NULL,
             to_addr BLOB,
             value BLOB NOT NULL,
             gas INTEGER,
             gas_used INTEGER,
             input BLOB NOT NULL,
             created_contract_address BLOB,
             error TEXT,
             PRIMARY KEY (transaction_hash, idx),
             FOREIGN KEY (transaction_hash) REFERENCES transactions(hash)
         );
         CREATE INDEX IF NOT EXISTS idx_itx_created
             ON internal_transactions(created_contract_address);

         CREATE TABLE IF NOT EXISTS token_transfers (
             transaction_hash BLOB NOT NULL,
             log_index INTEGER NOT NULL,
             from_addr BLOB NOT NULL,
             to_addr BLOB NOT NULL,
             token_contract_address BLOB NOT NULL,
             amount BLOB NOT NULL,
             PRIMARY KEY (transaction_hash, log_index),
             FOREIGN KEY (transaction_hash) REFERENCES transactions(hash)
         );
         CREATE INDEX IF NOT EXISTS idx_tt_from ON token_transfers(from_addr);
         CREATE INDEX IF NOT EXISTS idx_tt_to ON token_transfers(to_addr);
         CREATE INDEX IF NOT EXISTS idx_tt_contract ON token_transfers(token_contract_address);

         CREATE TABLE IF NOT EXISTS tokens (
             contract_address BLOB PRIMARY KEY,
             name TEXT,
             symbol TEXT,
             decimals INTEGER
         );

         CREATE TABLE IF NOT EXISTS token_balances (
             token_contract_address BLOB NOT NULL,
             holder_address BLOB NOT NULL,
             block_number INTEGER NOT NULL,
             value BLOB NOT NULL,
             PRIMARY KEY (token_contract_address, holder_address, block_number)
         );

         CREATE TABLE IF NOT EXISTS block_rewards (
             from_block INTEGER NOT NULL,
             to_block INTEGER NOT NULL,
             reward BLOB NOT NULL,
             PRIMARY KEY (from_block, to_block)
         );",
    )?;
    Ok(())
}

impl ChainIndex for PersistentChainIndex {
    fn max_block_number(&self) -> ChainIndexResult<Option<u64>> {
        let conn = self.read_conn()?;
        let max: Option<i64> =
            conn.query_row("SELECT MAX(number) FROM blocks", [], |row| row.get(0))?;
        Ok(max.map(|n| n as u64))
    }

    fn get_token(&self, contract: Address) -> ChainIndexResult<Option<StoredToken>> {
        let conn = self.read_conn()?;
        let result = conn.query_row(
            "SELECT contract_address, name, symbol, decimals FROM tokens
             WHERE contract_address = ?1",
            params![contract.as_slice()],
            |row| {
                let contract_bytes: Vec<u8> = row.get(0)?;
                let decimals: Option<i64> = row.get(3)?;
                let decimals = decimals
                    .map(|d| {
                        u8::try_from(d).map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(
                                3,
                                rusqlite::types::Type::Integer,
                                Box::new(e),
                            )
                        })
                    })
                    .transpose()?;
                Ok(StoredToken {
                    contract_address: address_from_row(&contract_bytes, 0)?,
                    name: row.get(1)?,
                    symbol: row.get(2)?,
                    decimals,
                })
            },
        );

        match result {
            Ok(token) => Ok(Some(token)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn transactions_by_role(
        &self,
        address: Address,
        role: AddressRole,
        range: BlockRange,
    ) -> ChainIndexResult<Vec<TransactionWithBlock>> {
        let predicate = match role {
            AddressRole::Sender => "t.from_addr = ?1",
            AddressRole::Receiver => "t.to_addr = ?1",
            AddressRole::Creator => {
                "t.hash IN (SELECT transaction_hash FROM internal_transactions
                            WHERE tx_type = 'create' AND created_contract_address = ?1)"
            }
        };
        let sql = format!(
            "SELECT {TRANSACTION_COLUMNS}, b.timestamp,
                    (SELECT it.created_contract_address FROM internal_transactions it
                     WHERE it.transaction_hash = t.hash AND it.tx_type = 'create'
                       AND it.created_contract_address IS NOT NULL
                     ORDER BY it.idx LIMIT 1)
             FROM transactions t JOIN blocks b ON b.number = t.block_number
             WHERE {predicate}
               AND (?2 IS NULL OR t.block_number >= ?2)
               AND (?3 IS NULL OR t.block_number <= ?3)
             ORDER BY t.block_number, t.transaction_index"
        );
        let Some((start, end)) = range.sql_bounds() else {
            return Ok(Vec::new());
        };

        let conn = self.read_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows: rusqlite::Result<Vec<TransactionWithBlock>> = stmt
            .query_map(params![address.as_slice(), start, end], |row| {
                let transaction = row_to_stored_transaction(row)?;
                let block_timestamp: i64 = row.get(TRANSACTION_COLUMN_COUNT)?;
                let created_bytes: Option<Vec<u8>> = row.get(TRANSACTION_COLUMN_COUNT + 1)?;
                Ok(TransactionWithBlock {
                    transaction,
                    block_timestamp: block_timestamp as u64,
                    created_contract_address: created_bytes
                        .as_deref()
                        .map(|b| address_from_row(b, TRANSACTION_COLUMN_COUNT + 1))
                        .transpose()?,
                })
            })?
            .collect();

        Ok(rows?)
    }

    fn internal_transactions(
        &self,
        transaction_hash: B256,
    ) -> ChainIndexResult<Vec<IndexedInternalTransaction>> {
        let conn = self.read_conn()?;
        let mut stmt = conn.prepare(
            "SELECT it.transaction_hash, it.idx, it.tx_type, it.from_addr, it.to_addr, it.value,
                    it.gas, it.gas_used, it.input, it.created_contract_address, it.error,
                    t.block_number, b.timestamp
             FROM internal_transactions it
             JOIN transactions t ON t.hash = it.transaction_hash
             JOIN blocks b ON b.number = t.block_number
             WHERE it.transaction_hash = ?1
             ORDER BY it.idx",
        )?;

        let rows: rusqlite::Result<Vec<IndexedInternalTransaction>> = stmt
            .query_map(params![transaction_hash.as_slice()], |row| {
                let internal = row_to_stored_internal_transaction(row)?;
                let block_number: i64 = row.get(11)?;
                let block_timestamp: i64 = row.get(12)?;
                Ok(IndexedInternalTransaction {
                    internal,
                    block_number: block_number as u64,
                    block_timestamp: block_timestamp as u64,
                })
            })?
            .collect();

        Ok(rows?)
    }

    fn token_transfers_by_role(
        &self,
        address: Address,
        role: AddressRole,
        contract: Option<Address>,
        range: BlockRange,
    ) -> ChainIndexResult<Vec<TokenTransferWithTransaction>> {
        let predicate = match role {
            AddressRole::Sender => "tt.from_addr = ?1",
            AddressRole::Receiver => "tt.to_addr = ?1",
            // Token transfers never create contracts.
            AddressRole::Creator => return Ok(Vec::new()),
        };
        let sql = format!(
            "SELECT {TRANSACTION_COLUMNS}, tt.log_index, tt.from_addr, tt.to_addr,
                    tt.token_contract_address, tt.amount, b.timestamp
             FROM token_transfers tt
             JOIN transactions t ON t.hash = tt.transaction_hash
             JOIN blocks b ON b.number = t.block_number
             WHERE {predicate}
               AND (?2 IS NULL OR tt.token_contract_address = ?2)
               AND (?3 IS NULL OR t.block_number >= ?3)
               AND (?4 IS NULL OR t.block_number <= ?4)
             ORDER BY t.block_number, t.transaction_index, tt.log_index"
        );
        let Some((start, end)) = range.sql_bounds() else {
            return Ok(Vec::new());
        };

        let conn = self.read_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows: rusqlite::Result<Vec<TokenTransferWithTransaction>> = stmt
            .query_map(
                params![
                    address.as_slice(),
                    contract.as_ref().map(|a| a.as_slice()),
                    start,
                    end
                ],
                |row| {
                    let transaction = row_to_stored_transaction(row)?;
                    let base = TRANSACTION_COLUMN_COUNT;
                    let log_index: i64 = row.get(base)?;
                    let from_bytes: Vec<u8> = row.get(base + 1)?;
                    let to_bytes: Vec<u8> = row.get(base + 2)?;
                    let contract_bytes: Vec<u8> = row.get(base + 3)?;
                    let amount_bytes: Vec<u8> = row.get(base + 4)?;
                    let block_timestamp: i64 = row.get(base + 5)?;

                    Ok(TokenTransferWithTransaction {
                        transfer: StoredTokenTransfer {
                            transaction_hash: transaction.hash,
                            log_index: log_index as u32,
                            from: address_from_row(&from_bytes, base + 1)?,
                            to: address_from_row(&to_bytes, base + 2)?,
                            token_contract_address: address_from_row(&contract_bytes, base + 3)?,
                            amount: u256_from_row(&amount_bytes, base + 4)?,
                        },
                        transaction,
                        block_timestamp: block_timestamp as u64,
                    })
                },
            )?
            .collect();

        Ok(rows?)
    }

    fn blocks_mined_by(
        &self,
        miner: Address,
        range: BlockRange,
    ) -> ChainIndexResult<Vec<StoredBlock>> {
        let Some((start, end)) = range.sql_bounds() else {
            return Ok(Vec::new());
        };
        let conn = self.read_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {BLOCK_COLUMNS} FROM blocks
             WHERE miner = ?1
               AND (?2 IS NULL OR number >= ?2)
               AND (?3 IS NULL OR number <= ?3)
             ORDER BY number"
        ))?;

        let blocks: rusqlite::Result<Vec<StoredBlock>> = stmt
            .query_map(params![miner.as_slice(), start, end], row_to_stored_block)?
            .collect();

        Ok(blocks?)
    }

    fn block_gas_charges(&self, number: u64) -> ChainIndexResult<Vec<GasCharge>> {
        let conn = self.read_conn()?;
        let mut stmt = conn.prepare(
            "SELECT gas_used, gas_price FROM transactions
             WHERE block_number = ?1 ORDER BY transaction_index",
        )?;

        let charges: rusqlite::Result<Vec<GasCharge>> = stmt
            .query_map(params![number as i64], |row| {
                let gas_used: i64 = row.get(0)?;
                let gas_price_bytes: Vec<u8> = row.get(1)?;
                Ok(GasCharge {
                    gas_used: gas_used as u64,
                    gas_price: u256_from_row(&gas_price_bytes, 1)?,
                })
            })?
            .collect();

        Ok(charges?)
    }

    fn block_reward_range(&self, number: u64) -> ChainIndexResult<Option<BlockRewardRange>> {
        let conn = self.read_conn()?;
        // Overlapping ranges resolve to the one starting closest to the block.
        let result = conn.query_row(
            "SELECT from_block, to_block, reward FROM block_rewards
             WHERE from_block <= ?1 AND to_block >= ?1
             ORDER BY from_block DESC LIMIT 1",
            params![number as i64],
            |row| {
                let from_block: i64 = row.get(0)?;
                let to_block: i64 = row.get(1)?;
                let reward_bytes: Vec<u8> = row.get(2)?;
                Ok(BlockRewardRange {
                    from_block: from_block as u64,
                    to_block: to_block as u64,
                    reward: u256_from_row(&reward_bytes, 2)?,
                })
            },
        );

        match result {
            Ok(range) => Ok(Some(range)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn latest_token_balance(
        &self,
        contract: Address,
        holder: Address,
    ) -> ChainIndexResult<Option<StoredTokenBalance>> {
        let conn = self.read_conn()?;
        let result = conn.query_row(
            "SELECT block_number, value FROM token_balances
             WHERE token_contract_address = ?1 AND holder_address = ?2
             ORDER BY block_number DESC LIMIT 1",
            params![contract.as_slice(), holder.as_slice()],
            |row| {
                let block_number: i64 = row.get(0)?;
                let value_bytes: Vec<u8> = row.get(1)?;
                Ok(StoredTokenBalance {
                    token_contract_address: contract,
                    holder_address: holder,
                    block_number: block_number as u64,
                    value: u256_from_row(&value_bytes, 1)?,
                })
            },
        );

        match result {
            Ok(balance) => Ok(Some(balance)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn row_to_stored_block(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredBlock> {
    let number: i64 = row.get(0)?;
    let hash_bytes: Vec<u8> = row.get(1)?;
    let parent_hash_bytes: Vec<u8> = row.get(2)?;
    let timestamp: i64 = row.get(3)?;
    let miner_bytes: Vec<u8> = row.get(4)?;
    let gas_used: i64 = row.get(5)?;
    let gas_limit: i64 = row.get(6)?;

    Ok(StoredBlock {
        number: number as u64,
        hash: b256_from_row(&hash_bytes, 1)?,
        parent_hash: b256_from_row(&parent_hash_bytes, 2)?,
        timestamp: timestamp as u64,
        miner: address_from_row(&miner_bytes, 4)?,
        gas_used: gas_used as u64,
        gas_limit: gas_limit as u64,
    })
}

fn row_to_stored_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredTransaction> {
    let hash_bytes: Vec<u8> = row.get(0)?;
    let block_number: i64 = row.get(1)?;
    let block_hash_bytes: Vec<u8> = row.get(2)?;
    let transaction_index: i64 = row.get(3)?;
    let from_bytes: Vec<u8> = row.get(4)?;
    let to_bytes: Option<Vec<u8>> = row.get(5)?;
    let value_bytes: Vec<u8> = row.get(6)?;
    let gas: i64 = row.get(7)?;
    let gas_price_bytes: Vec<u8> = row.get(8)?;
    let gas_used: i64 = row.get(9)?;
    let cumulative_gas_used: i64 = row.get(10)?;
    let nonce: i64 = row.get(11)?;
    let input_bytes: Vec<u8> = row.get(12)?;
    let status: i64 = row.get(13)?;

    let to = to_bytes
        .as_deref()
        .map(|b| address_from_row(b, 5))
        .transpose()?;
    let status = TransactionStatus::from_i64(status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            13,
            rusqlite::types::Type::Integer,
            format!("unknown transaction status {status}").into(),
        )
    })?;

    Ok(StoredTransaction {
        hash: b256_from_row(&hash_bytes, 0)?,
        block_number: block_number as u64,
        block_hash: b256_from_row(&block_hash_bytes, 2)?,
        transaction_index: transaction_index as u32,
        from: address_from_row(&from_bytes, 4)?,
        to,
        value: u256_from_row(&value_bytes, 6)?,
        gas: gas as u64,
        gas_price: u256_from_row(&gas_price_bytes, 8)?,
        gas_used: gas_used as u64,
        cumulative_gas_used: cumulative_gas_used as u64,
        nonce: nonce as u64,
        input: Bytes::from(input_bytes),
        status,
    })
}

fn row_to_stored_internal_transaction(
    row: &rusqlite::Row<'_>,
) -> rusqlite::Result<StoredInternalTransaction> {
    let transaction_hash_bytes: Vec<u8> = row.get(0)?;
    let index: i64 = row.get(1)?;
    let tx_type: String = row.get(2)?;
    let from_bytes: Vec<u8> = row.get(3)?;
    let to_bytes: Option<Vec<u8>> = row.get(4)?;
    let value_bytes: Vec<u8> = row.get(5)?;
    let gas: Option<i64> = row.get(6)?;
    let gas_used: Option<i64> = row.get(7)?;
    let input_bytes: Vec<u8> = row.get(8)?;
    let created_bytes: Option<Vec<u8>> = row.get(9)?;
    let error: Option<String> = row.get(10)?;

    let tx_type = tx_type.parse::<InternalTransactionType>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(StoredInternalTransaction {
        transaction_hash: b256_from_row(&transaction_hash_bytes, 0)?,
        index: index as u32,
        tx_type,
        from: address_from_row(&from_bytes, 3)?,
        to: to_bytes
            .as_deref()
            .map(|b| address_from_row(b, 4))
            .transpose()?,
        value: u256_from_row(&value_bytes, 5)?,
        gas: gas.map(|g| g as u64),
        gas_used: gas_used.map(|g| g as u64),
        input: Bytes::from(input_bytes),
        created_contract_address: created_bytes
            .as_deref()
            .map(|b| address_from_row(b, 9))
            .transpose()?,
        error,
    })
}

/// Generate a unique ID for in-memory shared-cache SQLite databases.
fn unique_id() -> u64 {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    COUNTER.fetch_add(1, Ordering::Relaxed)
}

fn b256_from_row(bytes: &[u8], col: usize) -> rusqlite::Result<B256> {
    if bytes.len() != 32 {
        return Err(rusqlite::Error::FromSqlConversionFailure(
            col,
            rusqlite::types::Type::Blob,
            format!("expected 32 bytes for B256, got {}", bytes.len()).into(),
        ));
    }
    Ok(B256::from_slice(bytes))
}

fn address_from_row(bytes: &[u8], col: usize) -> rusqlite::Result<Address> {
    if bytes.len() != 20 {
        return Err(rusqlite::Error::FromSqlConversionFailure(
            col,
            rusqlite::types::Type::Blob,
            format!("expected 20 bytes for Address, got {}", bytes.len()).into(),
        ));
    }
    Ok(Address::from_slice(bytes))
}

fn u256_from_row(bytes: &[u8], col: usize) -> rusqlite::Result<U256> {
    if bytes.len() != 32 {
        return Err(rusqlite::Error::FromSqlConversionFailure(
            col,
            rusqlite::types::Type::Blob,
            format!("expected 32 bytes for U256, got {}", bytes.len()).into(),
        ));
    }
    Ok(U256::from_be_slice(bytes))
}

pub(crate) fn u256_to_be_bytes(value: U256) -> [u8; 32] {
    value.to_be_bytes()
}
