//! The posting store.
//!
//! A [`PostingStore`] accepts staged postings, makes them durable at a
//! [`commit_barrier`](PostingStore::commit_barrier) and hands out
//! point-in-time [`PostingSnapshot`]s for scanning. The backup pipeline only
//! reads through snapshots; [`stage`](PostingStore::stage) exists for restore
//! and tests.

mod kv;

pub use kv::{KvPostingStore, KvScan, KvSnapshot};

use quiver_core::encoding::Decoder;
use quiver_core::{CoreResult, Key, PostingList, RawPosting};
use quiver_storage::StorageResult;

/// A posting-list store with a commit barrier.
pub trait PostingStore: Send + Sync {
    /// A point-in-time read view.
    type Snapshot<'a>: PostingSnapshot
    where
        Self: 'a;

    /// Accept a posting under `key`. It becomes visible to snapshots taken
    /// after the next [`commit_barrier`](Self::commit_barrier).
    ///
    /// # Errors
    ///
    /// Returns a storage error if the posting cannot be accepted.
    fn stage(&self, key: &Key, posting: RawPosting) -> StorageResult<()>;

    /// Make every posting staged before this call durable and visible.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the staged postings cannot be committed.
    fn commit_barrier(&self) -> StorageResult<()>;

    /// Open a read view of everything committed so far.
    ///
    /// # Errors
    ///
    /// Returns a storage error if no read transaction can be started.
    fn snapshot(&self) -> StorageResult<Self::Snapshot<'_>>;
}

/// A consistent read view over committed posting lists.
pub trait PostingSnapshot {
    /// Iterator over posting lists in key order.
    type Scan<'a>: Iterator<Item = StorageResult<ScannedList>>
    where
        Self: 'a;

    /// Posting lists whose predicate passes `keep`, in key order, with their
    /// bytes left undecoded. Rejected keys are skipped on their predicate
    /// alone, without decoding the rest of the key.
    fn scan_where<'a>(&'a self, keep: &'a dyn Fn(&str) -> bool) -> Self::Scan<'a>;

    /// Every posting list, in key order, with its bytes left undecoded.
    fn scan(&self) -> Self::Scan<'_> {
        self.scan_where(&KEEP_ALL)
    }

    /// Every posting-list key, in key order.
    fn scan_keys(&self) -> impl Iterator<Item = StorageResult<Key>> + '_ {
        self.scan().map(|item| item.map(|list| list.key))
    }

    /// The posting list stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read fails or the stored bytes are not a
    /// posting list.
    fn get_posting_list(&self, key: &Key) -> StorageResult<Option<PostingList>>;
}

static KEEP_ALL: fn(&str) -> bool = |_| true;

/// One posting list as it comes off a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedList {
    /// The decoded key.
    pub key: Key,
    /// The stored envelope, not yet decoded.
    pub bytes: Vec<u8>,
}

impl ScannedList {
    /// Decode the envelope.
    ///
    /// # Errors
    ///
    /// Returns a corrupt-value error if the bytes are not a posting list.
    pub fn decode(&self) -> CoreResult<PostingList> {
        PostingList::decode(&self.bytes)
    }
}
