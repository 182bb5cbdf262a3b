//! Backup command implementations.

use std::path::Path;

use quiver::backup::{self, BackupOptions};
use quiver::group::FingerprintOracle;
use tracing::error;

use super::{load_config, open_store};
use crate::error::{CliError, Result};
use crate::OutputArgs;

fn options(output: OutputArgs) -> BackupOptions {
    BackupOptions::default()
        .max_lines_per_file(output.max_lines_per_file)
        .buffer_bytes(output.buffer_bytes)
        .max_workers(output.workers)
}

/// Back up one group.
pub fn run(
    db_path: Option<&Path>,
    config_path: Option<&Path>,
    group: u32,
    out: &Path,
    output: OutputArgs,
) -> Result<()> {
    let config = load_config(config_path)?;
    let oracle = FingerprintOracle::new(&config)?;
    let store = open_store(db_path)?;

    let report = backup::backup(&store, &oracle, group, out, &options(output))?;
    println!(
        "group {}: {} lines from {} posting lists in {} files",
        report.group,
        report.lines,
        report.keys,
        report.files.len()
    );
    for file in &report.files {
        println!("  {}", file.display());
    }
    Ok(())
}

/// Back up every group of the configuration.
pub fn run_all(
    db_path: Option<&Path>,
    config_path: Option<&Path>,
    out: &Path,
    output: OutputArgs,
) -> Result<()> {
    let config = load_config(config_path)?;
    let store = open_store(db_path)?;

    let results = backup::backup_all(&store, &config, out, &options(output))?;
    let total = results.len();
    let mut failed = 0;
    for result in results {
        match result {
            Ok(report) => println!(
                "group {}: {} lines in {} files",
                report.group,
                report.lines,
                report.files.len()
            ),
            Err(e) => {
                error!(error = %e, "group backup failed");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::GroupsFailed { failed, total });
    }
    Ok(())
}
