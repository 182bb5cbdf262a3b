//! Redb transaction implementation.

use std::ops::Bound;

use redb::{ReadTransaction, ReadableTable, TableError, WriteTransaction};

use crate::engine::{KeyValue, StorageError, Transaction};

use super::DATA_TABLE;

/// A transaction for the Redb storage engine.
///
/// Wraps both read-only and read-write Redb transactions behind the
/// [`Transaction`] trait.
#[allow(clippy::large_enum_variant)]
pub enum RedbTransaction {
    /// A read-only transaction.
    Read(ReadTransaction),
    /// A read-write transaction.
    Write(WriteTransaction),
}

impl RedbTransaction {
    /// Create a new read-only transaction.
    pub const fn new_read(tx: ReadTransaction) -> Self {
        Self::Read(tx)
    }

    /// Create a new read-write transaction.
    pub const fn new_write(tx: WriteTransaction) -> Self {
        Self::Write(tx)
    }
}

fn internal(e: impl std::fmt::Display) -> StorageError {
    StorageError::Internal(e.to_string())
}

fn get_from<T>(table: &T, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    Ok(table.get(key).map_err(internal)?.map(|v| v.value().to_vec()))
}

fn range_from<T>(
    table: &T,
    start: Bound<&[u8]>,
    end: Bound<&[u8]>,
    limit: usize,
) -> Result<Vec<KeyValue>, StorageError>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    let mut entries = Vec::with_capacity(limit.min(1024));
    for result in table.range::<&[u8]>((start, end)).map_err(internal)? {
        if entries.len() >= limit {
            break;
        }
        let (k, v) = result.map_err(internal)?;
        entries.push((k.value().to_vec(), v.value().to_vec()));
    }
    Ok(entries)
}

/// An empty range has nothing to read and would be rejected by the backend.
fn is_empty_range(start: Bound<&[u8]>, end: Bound<&[u8]>) -> bool {
    match (start, end) {
        (Bound::Included(s), Bound::Included(e)) => s > e,
        (Bound::Included(s) | Bound::Excluded(s), Bound::Excluded(e))
        | (Bound::Excluded(s), Bound::Included(e)) => s >= e,
        _ => false,
    }
}

impl Transaction for RedbTransaction {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        match self {
            Self::Read(tx) => match tx.open_table(DATA_TABLE) {
                Ok(t) => get_from(&t, key),
                // No data table means no data, which is not an error
                Err(TableError::TableDoesNotExist(_)) => Ok(None),
                Err(e) => Err(internal(e)),
            },
            Self::Write(tx) => {
                let t = tx.open_table(DATA_TABLE).map_err(internal)?;
                get_from(&t, key)
            }
        }
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let mut t = tx.open_table(DATA_TABLE).map_err(internal)?;
                t.insert(key, value).map_err(internal)?;
                Ok(())
            }
        }
    }

    fn delete(&mut self, key: &[u8]) -> Result<bool, StorageError> {
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let mut t = tx.open_table(DATA_TABLE).map_err(internal)?;
                let removed = t.remove(key).map_err(internal)?.is_some();
                Ok(removed)
            }
        }
    }

    fn scan_batch(
        &self,
        start: Bound<&[u8]>,
        end: Bound<&[u8]>,
        limit: usize,
    ) -> Result<Vec<KeyValue>, StorageError> {
        if limit == 0 || is_empty_range(start, end) {
            return Ok(Vec::new());
        }
        match self {
            Self::Read(tx) => match tx.open_table(DATA_TABLE) {
                Ok(t) => range_from(&t, start, end, limit),
                // Table doesn't exist yet, return empty result (not an error)
                Err(TableError::TableDoesNotExist(_)) => Ok(Vec::new()),
                Err(e) => Err(internal(e)),
            },
            Self::Write(tx) => {
                let t = tx.open_table(DATA_TABLE).map_err(internal)?;
                range_from(&t, start, end, limit)
            }
        }
    }

    fn commit(self) -> Result<(), StorageError> {
        match self {
            // Read transactions don't need explicit commit
            Self::Read(_) => Ok(()),
            Self::Write(tx) => tx.commit().map_err(|e| StorageError::Transaction(e.to_string())),
        }
    }

    fn rollback(self) -> Result<(), StorageError> {
        match self {
            Self::Read(_) => Ok(()),
            Self::Write(tx) => tx.abort().map_err(|e| StorageError::Transaction(e.to_string())),
        }
    }

    fn is_read_only(&self) -> bool {
        matches!(self, Self::Read(_))
    }
}
