//! Entity store backed by redb
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `commands` | `id` | `Command` (JSON) | Reference data |
//! | `units` | `id` | `Unit` (JSON) | Reference data |
//! | `users` | `id` | `UserRecord` (JSON) | Accounts |
//! | `tickets` | `id` | `TicketRecord` (JSON) | Tickets with embedded comments |
//! | `command_names` | `name` | `id` | Unique command names |
//! | `unit_names` | `(command_id, name)` | `id` | Unique unit names per command |
//! | `usernames` | `username` | `id` | Unique usernames |
//! | `counters` | `name` | `u64` | Id sequences and ticket numbers |
//!
//! redb serializes write transactions, so every read-modify-write done inside
//! one [`WriteTransaction`] is atomic with respect to other writers. Ticket
//! numbers and comment appends rely on this.

pub mod models;
pub mod repository;

use redb::{
    Database, Key, ReadTransaction, ReadableDatabase, ReadableTable, TableDefinition, Value,
    WriteTransaction,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::AppError;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

pub use models::{TicketRecord, UserRecord};

pub(crate) const COMMANDS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("commands");
pub(crate) const UNITS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("units");
pub(crate) const USERS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("users");
pub(crate) const TICKETS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("tickets");

pub(crate) const COMMAND_NAMES_TABLE: TableDefinition<&str, u64> =
    TableDefinition::new("command_names");
pub(crate) const UNIT_NAMES_TABLE: TableDefinition<(u64, &str), u64> =
    TableDefinition::new("unit_names");
pub(crate) const USERNAMES_TABLE: TableDefinition<&str, u64> = TableDefinition::new("usernames");

/// Table for counters: key = sequence name, value = last issued value
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

pub(crate) const COMMAND_SEQ: &str = "command_id";
pub(crate) const UNIT_SEQ: &str = "unit_id";
pub(crate) const USER_SEQ: &str = "user_id";
pub(crate) const TICKET_SEQ: &str = "ticket_id";
pub(crate) const TICKET_NUMBER_SEQ: &str = "ticket_number";

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Store operation failed");
        AppError::database("Database operation failed")
    }
}

/// Uniform table access for read and write transactions
///
/// Lookups used both while validating a write and while serving a read
/// go through this trait so they are written once.
pub trait TableReader {
    fn table<K: Key + 'static, V: Value + 'static>(
        &self,
        def: TableDefinition<'static, K, V>,
    ) -> StoreResult<impl ReadableTable<K, V>>;
}

impl TableReader for WriteTransaction {
    fn table<K: Key + 'static, V: Value + 'static>(
        &self,
        def: TableDefinition<'static, K, V>,
    ) -> StoreResult<impl ReadableTable<K, V>> {
        Ok(self.open_table(def)?)
    }
}

impl TableReader for ReadTransaction {
    fn table<K: Key + 'static, V: Value + 'static>(
        &self,
        def: TableDefinition<'static, K, V>,
    ) -> StoreResult<impl ReadableTable<K, V>> {
        Ok(self.open_table(def)?)
    }
}

/// Entity store
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Store {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(COMMANDS_TABLE)?;
            let _ = write_txn.open_table(UNITS_TABLE)?;
            let _ = write_txn.open_table(USERS_TABLE)?;
            let _ = write_txn.open_table(TICKETS_TABLE)?;
            let _ = write_txn.open_table(COMMAND_NAMES_TABLE)?;
            let _ = write_txn.open_table(UNIT_NAMES_TABLE)?;
            let _ = write_txn.open_table(USERNAMES_TABLE)?;
            let _ = write_txn.open_table(COUNTERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction (blocks while another writer is active)
    pub fn begin_write(&self) -> StoreResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Begin a read transaction over a consistent snapshot
    pub fn begin_read(&self) -> StoreResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    /// Current value of a counter (0 if never incremented)
    pub fn counter(&self, name: &str) -> StoreResult<u64> {
        let txn = self.begin_read()?;
        let table = txn.open_table(COUNTERS_TABLE)?;
        Ok(table.get(name)?.map(|g| g.value()).unwrap_or(0))
    }
}

/// Commit a write transaction, mapping the redb error into [`StoreError`]
pub(crate) fn commit(txn: WriteTransaction) -> StoreResult<()> {
    txn.commit()?;
    Ok(())
}

// ========== Counter Operations ==========

/// Increment a counter inside the transaction and return the new value
pub(crate) fn next_value(txn: &WriteTransaction, name: &str) -> StoreResult<u64> {
    let mut table = txn.open_table(COUNTERS_TABLE)?;
    let current = table.get(name)?.map(|g| g.value()).unwrap_or(0);
    let next = current + 1;
    table.insert(name, next)?;
    Ok(next)
}

// ========== JSON record helpers ==========

pub(crate) fn read_record<T: DeserializeOwned>(
    table: &impl ReadableTable<u64, &'static [u8]>,
    id: u64,
) -> StoreResult<Option<T>> {
    match table.get(id)? {
        Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
        None => Ok(None),
    }
}

pub(crate) fn scan_records<T: DeserializeOwned>(
    table: &impl ReadableTable<u64, &'static [u8]>,
) -> StoreResult<Vec<T>> {
    let mut records = Vec::new();
    for entry in table.iter()? {
        let (_key, value) = entry?;
        records.push(serde_json::from_slice(value.value())?);
    }
    Ok(records)
}

pub(crate) fn write_record<T: Serialize>(
    txn: &WriteTransaction,
    def: TableDefinition<'static, u64, &'static [u8]>,
    id: u64,
    record: &T,
) -> StoreResult<()> {
    let mut table = txn.open_table(def)?;
    let bytes = serde_json::to_vec(record)?;
    table.insert(id, bytes.as_slice())?;
    Ok(())
}

pub(crate) fn remove_record(
    txn: &WriteTransaction,
    def: TableDefinition<'static, u64, &'static [u8]>,
    id: u64,
) -> StoreResult<bool> {
    let mut table = txn.open_table(def)?;
    let removed = table.remove(id)?.is_some();
    Ok(removed)
}
