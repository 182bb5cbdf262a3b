//! Quiver Command Line Interface
//!
//! Backs up a posting store as group-sharded quad files and restores it.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{backup, groups, restore};

/// Quiver Command Line Interface
///
/// Group-sharded RDF backups of a posting-list store.
#[derive(Parser, Debug)]
#[command(name = "quiver")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the posting store
    #[arg(long = "db", env = "QUIVER_DB", global = true)]
    pub database: Option<PathBuf>,

    /// Group configuration file (TOML); defaults to a single group 0
    #[arg(short, long, env = "QUIVER_GROUPS", global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Back up the posting lists of one group
    Backup {
        /// Group to back up
        #[arg(short, long)]
        group: u32,

        /// Output directory
        #[arg(short, long)]
        out: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Back up every group of the configuration on a bounded pool of threads
    BackupAll {
        /// Output directory
        #[arg(short, long)]
        out: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Restore a backup directory into the posting store
    Restore {
        /// Backup directory
        #[arg(short, long)]
        from: PathBuf,

        /// Lines staged between commits (0 commits once at the end)
        #[arg(long, default_value = "10000")]
        batch_size: usize,

        /// Parse the backup without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Parse every line of a backup directory without writing
    Verify {
        /// Backup directory
        #[arg(short, long)]
        from: PathBuf,
    },

    /// Show which group owns each predicate
    Groups {
        /// Predicates to look up; lists every group when empty
        attrs: Vec<String>,
    },
}

/// Options for backup output files.
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct OutputArgs {
    /// Lines per file before rotating
    #[arg(long, default_value_t = quiver::backup::DEFAULT_MAX_LINES_PER_FILE)]
    pub max_lines_per_file: u64,

    /// Bytes buffered before compression
    #[arg(long, default_value_t = quiver::backup::DEFAULT_BUFFER_BYTES)]
    pub buffer_bytes: usize,

    /// Groups backed up concurrently by backup-all
    #[arg(long, default_value_t = quiver::backup::DEFAULT_MAX_WORKERS)]
    pub workers: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("quiver=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db = cli.database.as_deref();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Backup { group, out, output } => backup::run(db, config, group, &out, output)?,
        Commands::BackupAll { out, output } => backup::run_all(db, config, &out, output)?,
        Commands::Restore { from, batch_size, dry_run } => {
            restore::run(db, &from, batch_size, dry_run)?;
        }
        Commands::Verify { from } => restore::verify(&from)?,
        Commands::Groups { attrs } => groups::run(config, &attrs)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_backup_with_global_options() {
        let cli = Cli::try_parse_from([
            "quiver", "--config", "groups.toml", "backup", "--db", "p.redb", "--group", "2", "--out", "export",
        ])
        .expect("valid arguments");
        assert_eq!(cli.database.as_deref(), Some(std::path::Path::new("p.redb")));
        match cli.command {
            Commands::Backup { group, out, output } => {
                assert_eq!(group, 2);
                assert_eq!(out, PathBuf::from("export"));
                assert_eq!(output.max_lines_per_file, quiver::backup::DEFAULT_MAX_LINES_PER_FILE);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn restore_batch_size_defaults() {
        let cli = Cli::try_parse_from(["quiver", "restore", "--from", "export"]).expect("valid arguments");
        assert!(matches!(cli.command, Commands::Restore { batch_size: 10_000, dry_run: false, .. }));
    }
}
