pub mod migrations;
pub mod user_repository;

use redb::Database as RedbDatabase;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open database: {0}")]
    Open(#[from] redb::DatabaseError),
    #[error("transaction failed: {0}")]
    Transaction(#[from] redb::TransactionError),
    #[error("failed to open table: {0}")]
    Table(#[from] redb::TableError),
    #[error("storage failure: {0}")]
    Storage(#[from] redb::StorageError),
    #[error("failed to commit: {0}")]
    Commit(#[from] redb::CommitError),
    #[error("failed to encode record: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("failed to decode record: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to hash password: {0}")]
    Hash(String),
    #[error("user {0} already exists")]
    Duplicate(String),
}

#[derive(Clone)]
pub struct Database {
    pub db: Arc<RedbDatabase>,
}

impl Database {
    pub fn new(path: &str) -> Result<Self, StoreError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = RedbDatabase::create(path)?;
        Ok(Database { db: Arc::new(db) })
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self, StoreError> {
        let db = RedbDatabase::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Ok(Database { db: Arc::new(db) })
    }

    /// Opens and drops a read transaction; used by the health check.
    pub fn ping(&self) -> Result<(), StoreError> {
        self.db.begin_read()?;
        Ok(())
    }
}
