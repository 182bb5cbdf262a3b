//! Error types for backup and restore operations.

use std::io;
use std::path::PathBuf;

use quiver_core::{CoreError, Key};
use quiver_storage::StorageError;
use thiserror::Error;

use crate::group::GroupId;

/// Errors that can occur during backup, restore and verify runs.
#[derive(Debug, Error)]
pub enum BackupError {
    /// The store failed at the barrier, while opening a snapshot or mid-scan.
    #[error("group {group}: store unavailable: {source}")]
    StoreUnavailable {
        /// The group being backed up.
        group: GroupId,
        /// The underlying storage error.
        source: StorageError,
    },

    /// A stored posting list could not be decoded.
    #[error("group {group}: corrupt posting list {key}: {source}")]
    CorruptValue {
        /// The group being backed up.
        group: GroupId,
        /// The key of the offending posting list.
        key: Key,
        /// What was wrong with the bytes.
        source: CoreError,
    },

    /// Writing a backup file failed.
    #[error("group {group}: I/O error on {}: {source}", path.display())]
    Io {
        /// The group being backed up.
        group: GroupId,
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The group configuration is unusable; raised before any scan.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The run was cancelled.
    #[error("group {group}: backup cancelled")]
    Cancelled {
        /// The group being backed up.
        group: GroupId,
    },

    /// The worker thread running a group panicked.
    #[error("group {group}: backup worker panicked")]
    WorkerPanicked {
        /// The group being backed up.
        group: GroupId,
    },

    /// Reading a backup file failed.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The file or directory being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// A line of a backup file is not a valid quad.
    #[error("malformed line {line} in {}: {message}", file.display())]
    MalformedLine {
        /// The backup file.
        file: PathBuf,
        /// 1-based line number.
        line: u64,
        /// A description of the malformation.
        message: String,
    },

    /// The store rejected restored postings.
    #[error("restore failed: {0}")]
    Store(#[from] StorageError),
}

impl BackupError {
    /// The group a backup error belongs to, if any.
    #[must_use]
    pub const fn group(&self) -> Option<GroupId> {
        match self {
            Self::StoreUnavailable { group, .. }
            | Self::CorruptValue { group, .. }
            | Self::Io { group, .. }
            | Self::Cancelled { group }
            | Self::WorkerPanicked { group } => Some(*group),
            Self::Configuration(_) | Self::Read { .. } | Self::MalformedLine { .. } | Self::Store(_) => {
                None
            }
        }
    }
}

/// Result type for backup operations.
pub type BackupResult<T> = Result<T, BackupError>;
