//! Storage engine traits and abstractions.
//!
//! - [`StorageEngine`] - Main entry point for creating transactions
//! - [`Transaction`] - get/put/delete and batched range reads
//! - [`Cursor`] - Ordered iteration over key-value pairs
//!
//! All operations return [`StorageResult<T>`].

mod cursor;
mod error;
mod traits;

pub use cursor::{BatchCursor, DEFAULT_BATCH_SIZE};
pub use error::{StorageError, StorageResult};
pub use traits::{Cursor, CursorResult, KeyValue, StorageEngine, Transaction};
