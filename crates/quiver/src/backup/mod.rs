//! Backup and restore.
//!
//! A backup covers one group: every posting list whose predicate the
//! [`GroupOracle`](crate::group::GroupOracle) assigns to that group, written
//! as gzip-compressed quad lines (see [`rdf`](crate::rdf)).
//!
//! # Files
//!
//! ```text
//! export/
//!   g0000000002-s000000.rdf.gz
//!   g0000000002-s000001.rdf.gz
//!   g0000000007-s000000.rdf.gz
//! ```
//!
//! Lines within a file follow key order and file names sort in read order, so
//! [`import::restore`] replays a backup by reading files in name order.

mod error;
mod export;
pub mod import;
mod types;
mod writer;

pub use error::{BackupError, BackupResult};
pub use export::{backup, backup_all};
pub use import::{backup_files, restore, verify, ImportOptions};
pub use types::{
    file_name, BackupOptions, BackupReport, RestoreStats, DEFAULT_BUFFER_BYTES,
    DEFAULT_MAX_LINES_PER_FILE, DEFAULT_MAX_WORKERS, FILE_EXTENSION,
};
