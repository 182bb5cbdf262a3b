//! Redb storage engine implementation.

use std::path::Path;

use redb::Database;

use crate::engine::{StorageEngine, StorageError};

use super::transaction::RedbTransaction;

/// Configuration options for the Redb storage engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedbConfig {
    /// Cache size in bytes.
    /// If not set, uses Redb's default.
    pub cache_size: Option<usize>,
}

impl RedbConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache size.
    #[must_use]
    pub const fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = Some(size);
        self
    }
}

/// A storage engine backed by Redb.
pub struct RedbEngine {
    db: Database,
}

impl RedbEngine {
    /// Open or create a database at the given path with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be opened or created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::open_with_config(path, RedbConfig::default())
    }

    /// Open or create a database at the given path with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be opened or created.
    pub fn open_with_config(
        path: impl AsRef<Path>,
        config: RedbConfig,
    ) -> Result<Self, StorageError> {
        let mut builder = Database::builder();

        if let Some(cache_size) = config.cache_size {
            builder.set_cache_size(cache_size);
        }

        let db = builder.create(path.as_ref()).map_err(|e| StorageError::Open(e.to_string()))?;

        Ok(Self { db })
    }

    /// Create an in-memory database.
    ///
    /// The database will be lost when the engine is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be created.
    pub fn in_memory() -> Result<Self, StorageError> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|e| StorageError::Open(e.to_string()))?;

        Ok(Self { db })
    }
}

impl StorageEngine for RedbEngine {
    type Transaction<'a> = RedbTransaction;

    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError> {
        let tx = self.db.begin_read().map_err(|e| StorageError::Transaction(e.to_string()))?;
        Ok(RedbTransaction::new_read(tx))
    }

    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError> {
        let tx = self.db.begin_write().map_err(|e| StorageError::Transaction(e.to_string()))?;
        Ok(RedbTransaction::new_write(tx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Transaction;

    #[test]
    fn in_memory_creation() {
        let engine = RedbEngine::in_memory().expect("failed to create in-memory db");
        let tx = engine.begin_read().expect("failed to begin read");
        assert!(tx.is_read_only());
    }

    #[test]
    fn reads_before_first_write_are_empty() {
        let engine = RedbEngine::in_memory().expect("failed to create in-memory db");
        let tx = engine.begin_read().expect("failed to begin read");
        assert_eq!(tx.get(b"missing").expect("failed to get"), None);
        assert_eq!(tx.cursor().count(), 0);
    }

    #[test]
    fn file_backed_reopen() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("data.redb");
        {
            let engine = RedbEngine::open(&path).expect("failed to open");
            let mut tx = engine.begin_write().expect("failed to begin write");
            tx.put(b"key", b"value").expect("failed to put");
            tx.commit().expect("failed to commit");
        }
        let engine = RedbEngine::open_with_config(&path, RedbConfig::new().cache_size(1 << 20))
            .expect("failed to reopen");
        let tx = engine.begin_read().expect("failed to begin read");
        assert_eq!(tx.get(b"key").expect("failed to get"), Some(b"value".to_vec()));
    }
}
