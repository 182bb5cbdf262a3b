//! Restore and verify command implementations.

use std::path::Path;

use quiver::backup::{self, ImportOptions};

use super::open_or_create_store;
use crate::error::{CliError, Result};

/// Restore a backup directory into the store.
///
/// A dry run only parses the backup; the store is never opened.
pub fn run(db_path: Option<&Path>, from: &Path, batch_size: usize, dry_run: bool) -> Result<()> {
    if !from.is_dir() {
        return Err(CliError::BackupNotFound(from.to_path_buf()));
    }
    if dry_run {
        let stats = backup::verify(from)?;
        println!("checked {} lines for {} posting lists from {} files", stats.lines, stats.keys, stats.files);
        return Ok(());
    }

    let store = open_or_create_store(db_path)?;
    let options = ImportOptions { batch_size: (batch_size > 0).then_some(batch_size), dry_run: false };

    let stats = backup::restore(&store, from, &options)?;
    println!("restored {} lines for {} posting lists from {} files", stats.lines, stats.keys, stats.files);
    Ok(())
}

/// Parse a backup directory without writing.
pub fn verify(from: &Path) -> Result<()> {
    if !from.is_dir() {
        return Err(CliError::BackupNotFound(from.to_path_buf()));
    }
    let stats = backup::verify(from)?;
    println!("ok: {} lines for {} posting lists in {} files", stats.lines, stats.keys, stats.files);
    Ok(())
}
