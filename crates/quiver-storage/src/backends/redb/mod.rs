//! Redb storage backend.
//!
//! Redb is a pure-Rust embedded database with ACID transactions and MVCC
//! snapshots. The whole keyspace lives in one physical table.
//!
//! # Example
//!
//! ```ignore
//! use quiver_storage::backends::RedbEngine;
//! use quiver_storage::{StorageEngine, Transaction};
//!
//! // Open a database (creates if it doesn't exist)
//! let engine = RedbEngine::open("postings.redb")?;
//!
//! let mut tx = engine.begin_write()?;
//! tx.put(b"key", b"value")?;
//! tx.commit()?;
//! ```
//!
//! For tests, [`RedbEngine::in_memory`] creates a database that is not persisted.

mod engine;
mod transaction;

use redb::TableDefinition;

pub use engine::{RedbConfig, RedbEngine};
pub use transaction::RedbTransaction;

/// The physical table that stores all key-value pairs.
pub(crate) const DATA_TABLE: TableDefinition<'static, &[u8], &[u8]> =
    TableDefinition::new("quiver_data");
