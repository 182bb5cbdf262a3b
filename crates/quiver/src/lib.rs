//! Quiver
//!
//! Posting-list storage with a group-sharded, gzip-compressed RDF backup.
//!
//! # Overview
//!
//! - [`store`] - The posting store: staged writes, a commit barrier and
//!   point-in-time scans over posting lists
//! - [`group`] - Which group owns a predicate ([`GroupOracle`])
//! - [`config`] - Group configuration loaded from TOML ([`GroupConfig`])
//! - [`rdf`] - Rendering postings as quad lines and parsing them back
//! - [`backup`] - The per-group backup pipeline, plus restore and verify
//!
//! # Example
//!
//! ```no_run
//! use quiver::backup::{backup, BackupOptions};
//! use quiver::group::FingerprintOracle;
//! use quiver::store::KvPostingStore;
//! use quiver::GroupConfig;
//!
//! let store = KvPostingStore::open("postings.redb")?;
//! let config = GroupConfig::load("groups.toml")?;
//! let oracle = FingerprintOracle::new(&config)?;
//!
//! let report = backup(&store, &oracle, 2, "export".as_ref(), &BackupOptions::default())?;
//! println!("wrote {} lines to {} files", report.lines, report.files.len());
//! # Ok::<(), quiver::Error>(())
//! ```

#![deny(clippy::unwrap_used)]

pub mod backup;
pub mod config;
pub mod error;
pub mod group;
pub mod rdf;
pub mod store;

pub use config::{ConfigError, GroupConfig};
pub use error::{Error, Result};
pub use group::{FingerprintOracle, GroupId, GroupOracle};

pub use quiver_core as core;
