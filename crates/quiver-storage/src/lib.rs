//! Quiver Storage
//!
//! This crate provides the ordered key-value storage abstraction that the
//! posting store is built on, and a backend implementation.
//!
//! # Overview
//!
//! The storage layer is a single ordered keyspace with transactional access.
//! Read transactions are snapshots: a scan started in one never observes
//! writes committed after it began.
//!
//! # Core Traits
//!
//! - [`StorageEngine`] - The main entry point for storage operations
//! - [`Transaction`] - Point reads, writes and batched range reads
//! - [`Cursor`] - Ordered iteration, implemented once for every backend by
//!   [`BatchCursor`]
//!
//! # Example
//!
//! ```
//! use quiver_storage::backends::RedbEngine;
//! use quiver_storage::{StorageEngine, Transaction};
//!
//! let engine = RedbEngine::in_memory()?;
//!
//! let mut tx = engine.begin_write()?;
//! tx.put(b"user:1", b"Alice")?;
//! tx.put(b"user:2", b"Bob")?;
//! tx.commit()?;
//!
//! let tx = engine.begin_read()?;
//! assert_eq!(tx.get(b"user:1")?, Some(b"Alice".to_vec()));
//! let keys: Vec<Vec<u8>> = tx.cursor().map(|kv| kv.map(|(k, _)| k)).collect::<Result<_, _>>()?;
//! assert_eq!(keys, [b"user:1".to_vec(), b"user:2".to_vec()]);
//! # Ok::<(), quiver_storage::StorageError>(())
//! ```

#![deny(clippy::unwrap_used)]

pub mod backends;
pub mod engine;

pub use engine::{
    BatchCursor, Cursor, CursorResult, KeyValue, StorageEngine, StorageError, StorageResult,
    Transaction, DEFAULT_BATCH_SIZE,
};
