//! Core storage engine traits.
//!
//! - [`StorageEngine`] - The main entry point for storage operations
//! - [`Transaction`] - Transactional access to the keyspace
//! - [`Cursor`] - Ordered iteration over key-value pairs

use std::ops::Bound;
use std::sync::Arc;

use super::cursor::{BatchCursor, DEFAULT_BATCH_SIZE};
use super::StorageError;

/// A key-value pair returned by cursor operations.
pub type KeyValue = (Vec<u8>, Vec<u8>);

/// Result type for cursor operations that return a key-value pair.
pub type CursorResult = Result<Option<KeyValue>, StorageError>;

/// A storage engine that provides transactional key-value operations.
///
/// Implementations must be thread-safe (`Send + Sync`): concurrent readers each
/// open their own read transaction.
pub trait StorageEngine: Send + Sync {
    /// The transaction type for this engine.
    type Transaction<'a>: Transaction
    where
        Self: 'a;

    /// Begin a read-only transaction.
    ///
    /// Read transactions provide a consistent snapshot of the database.
    /// Multiple read transactions can run concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the transaction cannot be started.
    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError>;

    /// Begin a read-write transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the transaction cannot be started.
    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError>;

    /// Flush any buffered data to durable storage.
    ///
    /// The default implementation does nothing, as most backends handle
    /// durability on commit.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the flush fails.
    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// A transaction over the keyspace.
///
/// Write transactions must be explicitly committed; dropping without
/// committing rolls back.
pub trait Transaction: Sized {
    /// Get a value by key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Internal`] if the backend read fails.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// Insert or replace a value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadOnly`] in a read transaction, or
    /// [`StorageError::Internal`] if the write fails.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// Delete a key. Returns `true` if it existed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadOnly`] in a read transaction, or
    /// [`StorageError::Internal`] if the delete fails.
    fn delete(&mut self, key: &[u8]) -> Result<bool, StorageError>;

    /// Read up to `limit` entries in `(start, end)`, in key order.
    ///
    /// This is the single primitive backends implement for iteration;
    /// [`BatchCursor`] builds streaming cursors on top of it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Internal`] if the backend read fails.
    fn scan_batch(
        &self,
        start: Bound<&[u8]>,
        end: Bound<&[u8]>,
        limit: usize,
    ) -> Result<Vec<KeyValue>, StorageError>;

    /// A cursor over every key.
    fn cursor(&self) -> BatchCursor<'_, Self> {
        self.range(Bound::Unbounded, Bound::Unbounded)
    }

    /// A cursor over a range of keys.
    ///
    /// ```ignore
    /// use std::ops::Bound;
    ///
    /// // Scan keys from "a" (inclusive) to "z" (exclusive)
    /// let cursor = tx.range(Bound::Included(b"a".as_slice()), Bound::Excluded(b"z".as_slice()));
    /// ```
    fn range(&self, start: Bound<&[u8]>, end: Bound<&[u8]>) -> BatchCursor<'_, Self> {
        BatchCursor::new(self, start, end, DEFAULT_BATCH_SIZE)
    }

    /// Commit the transaction, making all changes durable.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the commit fails.
    fn commit(self) -> Result<(), StorageError>;

    /// Rollback the transaction, discarding all changes.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the rollback fails.
    fn rollback(self) -> Result<(), StorageError>;

    /// Check if this is a read-only transaction.
    fn is_read_only(&self) -> bool;
}

/// A cursor for ordered iteration over key-value pairs.
///
/// ```ignore
/// let mut cursor = tx.cursor();
///
/// // Position at first key >= "prefix"
/// cursor.seek(b"prefix")?;
///
/// while let Some((key, value)) = cursor.next()? {
///     // Process key-value pair
/// }
/// ```
pub trait Cursor {
    /// Seek to the first key greater than or equal to `key` and return it.
    ///
    /// Seeking before the cursor's range lands on the start of the range.
    fn seek(&mut self, key: &[u8]) -> CursorResult;

    /// Seek to the first key-value pair of the range.
    fn seek_first(&mut self) -> CursorResult;

    /// Move to the next key-value pair.
    ///
    /// Returns `None` once the range is exhausted.
    fn next(&mut self) -> CursorResult;
}

/// Implement `StorageEngine` for `Arc<E>` to allow shared ownership of engines.
impl<E: StorageEngine> StorageEngine for Arc<E> {
    type Transaction<'a>
        = E::Transaction<'a>
    where
        Self: 'a;

    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError> {
        (**self).begin_read()
    }

    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError> {
        (**self).begin_write()
    }

    fn flush(&self) -> Result<(), StorageError> {
        (**self).flush()
    }
}
