//! Error types for the CLI.

use std::path::PathBuf;

use thiserror::Error;

/// CLI-specific result type.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
pub enum CliError {
    /// No posting store specified.
    #[error("no database specified. Use --db or set QUIVER_DB environment variable")]
    NoDatabaseSpecified,

    /// Posting store file not found.
    #[error("database not found: {0}")]
    DatabaseNotFound(PathBuf),

    /// Backup directory not found.
    #[error("backup directory not found: {0}")]
    BackupNotFound(PathBuf),

    /// Quiver error.
    #[error(transparent)]
    Quiver(#[from] quiver::Error),

    /// Some groups of a backup-all run failed.
    #[error("{failed} of {total} groups failed to back up")]
    GroupsFailed {
        /// Groups that failed.
        failed: usize,
        /// Groups attempted.
        total: usize,
    },
}

impl From<quiver::backup::BackupError> for CliError {
    fn from(e: quiver::backup::BackupError) -> Self {
        Self::Quiver(e.into())
    }
}

impl From<quiver::ConfigError> for CliError {
    fn from(e: quiver::ConfigError) -> Self {
        Self::Quiver(e.into())
    }
}
