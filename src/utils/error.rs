use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No data available")]
    NoData,

    #[error("Store not initialized")]
    NotInitialized,

    #[error("Store open failed: {0}")]
    StoreOpen(#[from] redb::DatabaseError),

    #[error("Store transaction failed: {0}")]
    StoreTransaction(#[from] redb::TransactionError),

    #[error("Store table failed: {0}")]
    StoreTable(#[from] redb::TableError),

    #[error("Store access failed: {0}")]
    StoreAccess(#[from] redb::StorageError),

    #[error("Store commit failed: {0}")]
    StoreCommit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, DataError>;
