//! Backup export: one group's posting lists to quad files.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

use tracing::{info, info_span, warn};

use super::error::{BackupError, BackupResult};
use super::types::{BackupOptions, BackupReport};
use super::writer::GroupWriter;
use crate::config::GroupConfig;
use crate::group::{FingerprintOracle, GroupId, GroupOracle};
use crate::store::{PostingSnapshot, PostingStore};

/// Back up every posting list owned by `group` into `dir`.
///
/// The run issues a commit barrier, so every posting staged before the call
/// is included, then scans one snapshot in key order. Lists of other groups
/// are skipped without being decoded. Output goes to
/// `g{group:010}-s{seq:06}.rdf.gz` files, rotated every
/// [`max_lines_per_file`](BackupOptions::max_lines_per_file) lines; a group
/// with no lists writes no files.
///
/// # Errors
///
/// - [`BackupError::StoreUnavailable`] if the barrier, snapshot or scan fails
/// - [`BackupError::CorruptValue`] if a posting list of the group cannot be decoded
/// - [`BackupError::Io`] if a file cannot be written
/// - [`BackupError::Cancelled`] if the cancellation flag is set
///
/// On error the files written so far are closed and left in place.
pub fn backup<S, O>(
    store: &S,
    oracle: &O,
    group: GroupId,
    dir: &Path,
    options: &BackupOptions,
) -> BackupResult<BackupReport>
where
    S: PostingStore,
    O: GroupOracle + ?Sized,
{
    let span = info_span!("backup", group);
    let _enter = span.enter();
    info!(dir = %dir.display(), "starting backup");

    let mut writer = GroupWriter::new(dir, group, options);
    let scanned = scan_group(store, oracle, group, &mut writer, options);
    let closed = writer.close();

    match scanned.and_then(|keys| closed.map(|()| keys)) {
        Ok(keys) => {
            let report =
                BackupReport { group, files: writer.files().to_vec(), lines: writer.lines(), keys };
            info!(files = report.files.len(), lines = report.lines, keys = report.keys, "backup complete");
            Ok(report)
        }
        Err(e) => {
            warn!(error = %e, partial_files = writer.files().len(), "backup failed");
            Err(e)
        }
    }
}

/// Write the group's postings; returns the number of posting lists written.
fn scan_group<S, O>(
    store: &S,
    oracle: &O,
    group: GroupId,
    writer: &mut GroupWriter<'_>,
    options: &BackupOptions,
) -> BackupResult<u64>
where
    S: PostingStore,
    O: GroupOracle + ?Sized,
{
    let unavailable = |source| BackupError::StoreUnavailable { group, source };

    store.commit_barrier().map_err(unavailable)?;
    let snapshot = store.snapshot().map_err(unavailable)?;

    let in_group = |attr: &str| oracle.belongs_to(attr) == group;
    let mut keys = 0u64;
    for item in snapshot.scan_where(&in_group) {
        if options.is_cancelled() {
            return Err(BackupError::Cancelled { group });
        }
        let list = item.map_err(unavailable)?;

        let postings = list
            .decode()
            .and_then(|decoded| decoded.decode_postings())
            .map_err(|source| BackupError::CorruptValue { group, key: list.key.clone(), source })?;
        for posting in &postings {
            writer.write_posting(list.key.entity(), list.key.attr(), posting)?;
        }
        keys += 1;
    }
    Ok(keys)
}

/// Back up every group of `config` into `dir`.
///
/// Groups are handed out to at most `options.max_workers` scoped threads, and
/// each group scans its own snapshot. If no worker thread can be started the
/// groups run on the calling thread. The outer error is raised before any
/// scan when the configuration is unusable; otherwise the result holds one
/// entry per group, in ascending group order.
///
/// # Errors
///
/// Returns [`BackupError::Configuration`] if `config` fails validation.
pub fn backup_all<S: PostingStore>(
    store: &S,
    config: &GroupConfig,
    dir: &Path,
    options: &BackupOptions,
) -> BackupResult<Vec<BackupResult<BackupReport>>> {
    let oracle = FingerprintOracle::new(config).map_err(|e| BackupError::Configuration(e.to_string()))?;
    let groups = config.groups();
    let workers = options.max_workers.max(1).min(groups.len());
    info!(groups = groups.len(), workers, dir = %dir.display(), "starting backup of all groups");

    let oracle = &oracle;
    let next = AtomicUsize::new(0);
    let slots: Vec<Mutex<Option<BackupResult<BackupReport>>>> =
        groups.iter().map(|_| Mutex::new(None)).collect();
    let work = || loop {
        let index = next.fetch_add(1, Ordering::Relaxed);
        let (Some(&group), Some(slot)) = (groups.get(index), slots.get(index)) else {
            break;
        };
        let result = backup(store, oracle, group, dir, options);
        if let Ok(mut slot) = slot.lock() {
            *slot = Some(result);
        }
    };

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for worker in 0..workers {
            match thread::Builder::new().name(format!("backup-{worker}")).spawn_scoped(scope, &work) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    warn!(worker, error = %e, "could not start backup worker");
                    break;
                }
            }
        }
        if handles.is_empty() {
            work();
        }
        // a panic stays a per-group error
        for handle in handles {
            let _ = handle.join();
        }
    });

    // a group whose worker panicked never fills its slot
    let results: Vec<_> = slots
        .into_iter()
        .zip(&groups)
        .map(|(slot, &group)| {
            slot.into_inner()
                .ok()
                .flatten()
                .unwrap_or_else(|| Err(BackupError::WorkerPanicked { group }))
        })
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        warn!(failed, "some groups failed to back up");
    }
    Ok(results)
}
