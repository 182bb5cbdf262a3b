//! [`PostingStore`] over a [`StorageEngine`].

use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use quiver_core::encoding::keys::{
    data_keys_end, decode_data_key, encode_data_key, key_attr, PREFIX_DATA,
};
use quiver_core::encoding::{Decoder, Encoder};
use quiver_core::{Key, PostingList, RawPosting};
use quiver_storage::backends::RedbEngine;
use quiver_storage::{BatchCursor, Cursor, StorageEngine, StorageError, StorageResult, Transaction};
use tracing::debug;

use super::{PostingSnapshot, PostingStore, ScannedList};

/// Posting lists stored as envelopes in a key-value engine.
///
/// Staged postings wait in memory, grouped by key, until the next commit
/// barrier merges them into the stored lists in one write transaction.
pub struct KvPostingStore<E> {
    engine: E,
    staged: Mutex<BTreeMap<Key, Vec<RawPosting>>>,
}

impl KvPostingStore<RedbEngine> {
    /// Open (or create) a store in a redb file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        RedbEngine::open(path).map(Self::new)
    }

    /// A store backed by an in-memory redb database.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be created.
    pub fn in_memory() -> StorageResult<Self> {
        RedbEngine::in_memory().map(Self::new)
    }
}

impl<E: StorageEngine> KvPostingStore<E> {
    /// Wrap an engine.
    pub fn new(engine: E) -> Self {
        Self { engine, staged: Mutex::new(BTreeMap::new()) }
    }

    /// The underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Number of postings staged and not yet committed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Internal`] if the staging lock is poisoned.
    pub fn pending(&self) -> StorageResult<usize> {
        Ok(self.lock()?.values().map(Vec::len).sum())
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, BTreeMap<Key, Vec<RawPosting>>>> {
        self.staged.lock().map_err(|_| StorageError::Internal("staging lock poisoned".to_owned()))
    }
}

impl<E: StorageEngine> PostingStore for KvPostingStore<E> {
    type Snapshot<'a>
        = KvSnapshot<E::Transaction<'a>>
    where
        Self: 'a;

    fn stage(&self, key: &Key, posting: RawPosting) -> StorageResult<()> {
        self.lock()?.entry(key.clone()).or_default().push(posting);
        Ok(())
    }

    fn commit_barrier(&self) -> StorageResult<()> {
        // Held across the commit so postings staged meanwhile land in the next barrier.
        let mut staged = self.lock()?;
        if staged.is_empty() {
            return Ok(());
        }

        let mut tx = self.engine.begin_write()?;
        let mut postings = 0usize;
        for (key, batch) in staged.iter() {
            let raw_key = encode_data_key(key);
            let mut list = match tx.get(&raw_key)? {
                Some(bytes) => PostingList::decode(&bytes)
                    .map_err(|e| StorageError::Serialization(format!("{key}: {e}")))?,
                None => PostingList::default(),
            };
            for posting in batch {
                list.upsert(posting.clone());
                postings += 1;
            }
            let bytes = list.encode().map_err(|e| StorageError::Serialization(e.to_string()))?;
            tx.put(&raw_key, &bytes)?;
        }
        tx.commit()?;
        self.engine.flush()?;

        debug!(keys = staged.len(), postings, "committed staged postings");
        staged.clear();
        Ok(())
    }

    fn snapshot(&self) -> StorageResult<Self::Snapshot<'_>> {
        Ok(KvSnapshot { tx: self.engine.begin_read()? })
    }
}

/// A read transaction over posting lists.
pub struct KvSnapshot<T> {
    tx: T,
}

impl<T: Transaction> PostingSnapshot for KvSnapshot<T> {
    type Scan<'a>
        = KvScan<'a, T>
    where
        Self: 'a;

    fn scan_where<'a>(&'a self, keep: &'a dyn Fn(&str) -> bool) -> Self::Scan<'a> {
        let start = [PREFIX_DATA];
        let end = data_keys_end();
        let cursor = self.tx.range(Bound::Included(start.as_slice()), Bound::Excluded(end.as_slice()));
        KvScan { cursor, keep, done: false }
    }

    fn get_posting_list(&self, key: &Key) -> StorageResult<Option<PostingList>> {
        let Some(bytes) = self.tx.get(&encode_data_key(key))? else {
            return Ok(None);
        };
        PostingList::decode(&bytes)
            .map(Some)
            .map_err(|e| StorageError::Serialization(format!("{key}: {e}")))
    }
}

/// Lazy iterator over the data keyspace of a snapshot.
pub struct KvScan<'a, T: Transaction> {
    cursor: BatchCursor<'a, T>,
    keep: &'a dyn Fn(&str) -> bool,
    done: bool,
}

impl<T: Transaction> Iterator for KvScan<'_, T> {
    type Item = StorageResult<ScannedList>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = loop {
            match Cursor::next(&mut self.cursor) {
                Ok(Some((raw_key, bytes))) => {
                    if key_attr(&raw_key).is_ok_and(|attr| !(self.keep)(attr)) {
                        continue;
                    }
                    break decode_data_key(&raw_key)
                        .map(|key| ScannedList { key, bytes })
                        .map_err(|e| StorageError::CorruptKey(e.to_string()));
                }
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(e) => break Err(e),
            }
        };
        if item.is_err() {
            self.done = true;
        }
        Some(item)
    }
}
