//! Storage error types.

use thiserror::Error;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database could not be opened.
    #[error("failed to open database: {0}")]
    Open(String),

    /// A transaction could not be started, committed or aborted.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// The backend failed while reading or writing.
    #[error("internal storage error: {0}")]
    Internal(String),

    /// A write was attempted in a read-only transaction.
    #[error("transaction is read-only")]
    ReadOnly,

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A stored key does not follow the key layout.
    #[error("corrupt key: {0}")]
    CorruptKey(String),
}

/// A specialized `Result` type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
