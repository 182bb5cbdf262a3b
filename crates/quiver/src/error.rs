//! Error types for the main crate.

use thiserror::Error;

use crate::backup::BackupError;
use crate::config::ConfigError;

/// Errors that can occur when using Quiver.
#[derive(Debug, Error)]
pub enum Error {
    /// A storage error occurred.
    #[error("storage error: {0}")]
    Storage(#[from] quiver_storage::StorageError),

    /// A value, key or posting was invalid.
    #[error(transparent)]
    Core(#[from] quiver_core::CoreError),

    /// The group configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A backup, restore or verify run failed.
    #[error(transparent)]
    Backup(#[from] BackupError),
}

/// A specialized `Result` type for Quiver operations.
pub type Result<T> = std::result::Result<T, Error>;
