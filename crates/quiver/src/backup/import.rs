//! Backup import (restore) functionality.
//!
//! Reads the `.rdf.gz` files of a backup directory in name order, which is
//! (group, sequence) order, and parses every line back into a posting.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use quiver_core::Key;
use tracing::{debug, info};

use super::error::{BackupError, BackupResult};
use super::types::{RestoreStats, FILE_EXTENSION};
use crate::rdf::{parse_quad, Quad};
use crate::store::PostingStore;

/// Options for controlling the import process.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Lines staged between commit barriers.
    /// Use None to commit once at the end.
    pub batch_size: Option<usize>,

    /// Whether to perform a dry run (parse without writing).
    pub dry_run: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self { batch_size: Some(10_000), dry_run: false }
    }
}

impl ImportOptions {
    /// Create options for a dry run.
    #[must_use]
    pub fn dry_run() -> Self {
        Self { dry_run: true, ..Default::default() }
    }
}

/// The backup files in `dir`, sorted by name.
///
/// # Errors
///
/// Returns [`BackupError::Read`] if the directory cannot be listed.
pub fn backup_files(dir: &Path) -> BackupResult<Vec<PathBuf>> {
    let read_err = |source| BackupError::Read { path: dir.to_path_buf(), source };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let is_backup = entry.file_name().to_str().is_some_and(|name| name.ends_with(FILE_EXTENSION));
        if is_backup && entry.file_type().map_err(read_err)?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Stage every quad of the backup in `dir` into `store`.
///
/// Postings are committed every [`batch_size`](ImportOptions::batch_size)
/// lines and once at the end. With [`dry_run`](ImportOptions::dry_run) set the
/// files are only parsed.
///
/// # Errors
///
/// - [`BackupError::Read`] if a file cannot be read or decompressed
/// - [`BackupError::MalformedLine`] if a line is not a valid quad
/// - [`BackupError::Store`] if the store rejects postings
pub fn restore<S: PostingStore>(store: &S, dir: &Path, options: &ImportOptions) -> BackupResult<RestoreStats> {
    info!(dir = %dir.display(), dry_run = options.dry_run, "starting restore");
    let mut pending = 0usize;
    let stats = for_each_quad(dir, |key, quad| {
        if options.dry_run {
            return Ok(());
        }
        store.stage(key, quad.posting.to_raw())?;
        pending += 1;
        if options.batch_size.is_some_and(|size| pending >= size) {
            store.commit_barrier()?;
            pending = 0;
        }
        Ok(())
    })?;
    if !options.dry_run {
        store.commit_barrier()?;
    }
    info!(files = stats.files, lines = stats.lines, keys = stats.keys, "restore complete");
    Ok(stats)
}

/// Parse every line of the backup in `dir` without writing anything.
///
/// # Errors
///
/// Returns [`BackupError::Read`] or [`BackupError::MalformedLine`].
pub fn verify(dir: &Path) -> BackupResult<RestoreStats> {
    let stats = for_each_quad(dir, |_, _| Ok(()))?;
    info!(files = stats.files, lines = stats.lines, keys = stats.keys, "backup verified");
    Ok(stats)
}

/// Feed every quad of every backup file to `f`.
///
/// A key counts once per run of consecutive lines, which is once per posting
/// list for a backup written in key order.
fn for_each_quad<F>(dir: &Path, mut f: F) -> BackupResult<RestoreStats>
where
    F: FnMut(&Key, Quad) -> BackupResult<()>,
{
    let mut stats = RestoreStats::default();
    let mut last_key: Option<Key> = None;

    for path in backup_files(dir)? {
        debug!(file = %path.display(), "reading backup file");
        let read_err = |source| BackupError::Read { path: path.clone(), source };
        let reader = BufReader::new(MultiGzDecoder::new(File::open(&path).map_err(read_err)?));

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(read_err)?;
            let line_no = index as u64 + 1;
            if line.trim().is_empty() {
                continue;
            }
            let malformed = |message: String| BackupError::MalformedLine {
                file: path.clone(),
                line: line_no,
                message,
            };
            let quad = parse_quad(&line).map_err(|e| malformed(e.to_string()))?;
            let key = quad.key().map_err(|e| malformed(e.to_string()))?;

            stats.lines += 1;
            if last_key.as_ref() != Some(&key) {
                stats.keys += 1;
            }
            f(&key, quad)?;
            last_key = Some(key);
        }
        stats.files += 1;
    }
    Ok(stats)
}
