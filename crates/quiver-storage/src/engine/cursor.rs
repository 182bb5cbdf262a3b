//! Batched streaming cursor shared by all backends.
//!
//! Instead of materializing a whole range, the cursor pulls entries from
//! [`Transaction::scan_batch`] in batches, fetching the next batch on demand
//! as it advances. Memory use is bounded by the batch size.

use std::collections::VecDeque;
use std::ops::Bound;

use super::traits::{Cursor, CursorResult, KeyValue, Transaction};
use super::StorageError;

/// Default batch size for cursor operations.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// A forward cursor over a key range of one transaction.
///
/// Also an [`Iterator`] over `Result<KeyValue, StorageError>`. After the
/// first error the iterator ends.
pub struct BatchCursor<'a, T: Transaction> {
    tx: &'a T,
    lower: Bound<Vec<u8>>,
    upper: Bound<Vec<u8>>,
    /// Where the next fetch starts.
    resume: Bound<Vec<u8>>,
    batch: VecDeque<KeyValue>,
    exhausted: bool,
    batch_size: usize,
}

impl<'a, T: Transaction> BatchCursor<'a, T> {
    /// Create a cursor over `(start, end)` that fetches `batch_size` entries at a time.
    pub fn new(tx: &'a T, start: Bound<&[u8]>, end: Bound<&[u8]>, batch_size: usize) -> Self {
        let lower = start.map(<[u8]>::to_vec);
        Self {
            tx,
            resume: lower.clone(),
            lower,
            upper: end.map(<[u8]>::to_vec),
            batch: VecDeque::new(),
            exhausted: false,
            batch_size: batch_size.max(1),
        }
    }

    fn reposition(&mut self, resume: Bound<Vec<u8>>) {
        self.resume = resume;
        self.batch.clear();
        self.exhausted = false;
    }

    fn fill(&mut self) -> Result<(), StorageError> {
        let fetched = self.tx.scan_batch(
            self.resume.as_ref().map(Vec::as_slice),
            self.upper.as_ref().map(Vec::as_slice),
            self.batch_size,
        );
        let fetched = match fetched {
            Ok(fetched) => fetched,
            Err(e) => {
                self.exhausted = true;
                return Err(e);
            }
        };
        if fetched.len() < self.batch_size {
            self.exhausted = true;
        }
        if let Some((last, _)) = fetched.last() {
            self.resume = Bound::Excluded(last.clone());
        }
        self.batch.extend(fetched);
        Ok(())
    }

    fn below_lower(&self, key: &[u8]) -> bool {
        match &self.lower {
            Bound::Included(l) => key < l.as_slice(),
            Bound::Excluded(l) => key <= l.as_slice(),
            Bound::Unbounded => false,
        }
    }
}

impl<T: Transaction> Cursor for BatchCursor<'_, T> {
    fn seek(&mut self, key: &[u8]) -> CursorResult {
        let resume =
            if self.below_lower(key) { self.lower.clone() } else { Bound::Included(key.to_vec()) };
        self.reposition(resume);
        Cursor::next(self)
    }

    fn seek_first(&mut self) -> CursorResult {
        self.reposition(self.lower.clone());
        Cursor::next(self)
    }

    fn next(&mut self) -> CursorResult {
        if self.batch.is_empty() && !self.exhausted {
            self.fill()?;
        }
        Ok(self.batch.pop_front())
    }
}

impl<T: Transaction> Iterator for BatchCursor<'_, T> {
    type Item = Result<KeyValue, StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        Cursor::next(self).transpose()
    }
}
