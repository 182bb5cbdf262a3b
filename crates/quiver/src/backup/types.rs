//! Options and reports for backup runs.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::group::GroupId;

/// Lines per backup file before a new sequence file starts.
pub const DEFAULT_MAX_LINES_PER_FILE: u64 = 1_000_000;

/// Bytes of formatted text buffered before they are pushed through gzip.
pub const DEFAULT_BUFFER_BYTES: usize = 64 * 1024;

/// Groups backed up at once by `backup_all`.
pub const DEFAULT_MAX_WORKERS: usize = 8;

/// Extension of every backup file.
pub const FILE_EXTENSION: &str = ".rdf.gz";

/// Name of sequence file `seq` of `group`, e.g. `g0000000002-s000000.rdf.gz`.
///
/// Zero padding makes name order equal (group, sequence) order.
#[must_use]
pub fn file_name(group: GroupId, seq: u32) -> String {
    format!("g{group:010}-s{seq:06}{FILE_EXTENSION}")
}

/// Options for a backup run.
#[derive(Debug, Clone)]
pub struct BackupOptions {
    /// Lines written to one file before rotating to the next.
    pub max_lines_per_file: u64,

    /// Size of the text buffer in front of the gzip stream.
    pub buffer_bytes: usize,

    /// Worker threads `backup_all` runs at most; groups beyond that wait.
    pub max_workers: usize,

    /// Checked between keys; once set the run stops with `Cancelled`.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for BackupOptions {
    fn default() -> Self {
        Self {
            max_lines_per_file: DEFAULT_MAX_LINES_PER_FILE,
            buffer_bytes: DEFAULT_BUFFER_BYTES,
            max_workers: DEFAULT_MAX_WORKERS,
            cancel: None,
        }
    }
}

impl BackupOptions {
    /// Set the rotation threshold. Zero is treated as one line per file.
    #[must_use]
    pub fn max_lines_per_file(mut self, lines: u64) -> Self {
        self.max_lines_per_file = lines.max(1);
        self
    }

    /// Set the text buffer size.
    #[must_use]
    pub const fn buffer_bytes(mut self, bytes: usize) -> Self {
        self.buffer_bytes = bytes;
        self
    }

    /// Set the worker limit for `backup_all`. Zero is treated as one.
    #[must_use]
    pub fn max_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers.max(1);
        self
    }

    /// Attach a cancellation flag.
    #[must_use]
    pub fn cancel_on(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Outcome of a successful backup of one group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupReport {
    /// The group that was backed up.
    pub group: GroupId,
    /// Files written, in sequence order.
    pub files: Vec<PathBuf>,
    /// Quad lines written.
    pub lines: u64,
    /// Posting lists written.
    pub keys: u64,
}

/// Counts from a restore or verify run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreStats {
    /// Backup files read.
    pub files: u64,
    /// Quad lines parsed.
    pub lines: u64,
    /// Distinct posting-list keys seen.
    pub keys: u64,
}
