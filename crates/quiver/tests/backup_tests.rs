//! Integration tests for the backup pipeline.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use flate2::read::GzDecoder;
use quiver::backup::{backup, backup_all, backup_files, file_name, BackupError, BackupOptions};
use quiver::group::{FingerprintOracle, GroupOracle};
use quiver::rdf::format_quad;
use quiver::store::{KvPostingStore, PostingStore};
use quiver::GroupConfig;
use quiver_core::encoding::keys::encode_index_key;
use quiver_core::{DateTime, Facet, Key, Posting, RawPosting, Uid, ValueType};
use quiver_storage::backends::RedbEngine;
use quiver_storage::{StorageEngine, StorageError, StorageResult, Transaction};

type Store = KvPostingStore<RedbEngine>;

/// Create an in-memory store for testing.
fn create_test_store() -> Store {
    KvPostingStore::in_memory().expect("failed to create in-memory store")
}

fn stage(store: &Store, attr: &str, entity: u64, posting: &Posting) {
    let key = Key::new(attr, entity).expect("valid key");
    store.stage(&key, posting.to_raw()).expect("failed to stage");
}

/// Four `friend` edges and two `name` literals.
fn populate_graph(store: &Store) {
    let since = DateTime::parse("2006-01-02T15:04:05Z").expect("valid datetime");
    let friendship = Posting::node(Uid::new(2))
        .with_facet(Facet::new("since", since).expect("valid facet"))
        .with_facet(Facet::new("close", true).expect("valid facet"))
        .with_facet(Facet::new("age", 33).expect("valid facet"));
    stage(store, "friend", 1, &friendship);
    stage(store, "friend", 1, &Posting::node(Uid::new(3)));
    stage(store, "friend", 2, &Posting::node(Uid::new(1)).with_label("author0").expect("valid label"));
    stage(store, "friend", 3, &Posting::node(Uid::new(1)));
    stage(store, "name", 1, &Posting::literal("alice").with_lang("en").expect("valid lang"));
    stage(store, "name", 2, &Posting::literal("bob"));
}

fn read_lines(files: &[PathBuf]) -> Vec<String> {
    let mut lines = Vec::new();
    for path in files {
        let mut text = String::new();
        GzDecoder::new(File::open(path).expect("failed to open"))
            .read_to_string(&mut text)
            .expect("failed to gunzip");
        lines.extend(text.lines().map(str::to_owned));
    }
    lines
}

fn single_group(_: &str) -> u32 {
    0
}

fn options() -> BackupOptions {
    BackupOptions::default()
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn test_backup_splits_predicates_by_group() {
    let store = create_test_store();
    populate_graph(&store);

    let config = GroupConfig::new(10);
    let oracle = FingerprintOracle::new(&config).expect("valid config");
    let (friend_group, name_group) = (2, 7);
    assert_eq!(oracle.belongs_to("friend"), friend_group);
    assert_eq!(oracle.belongs_to("name"), name_group);
    let dir = tempfile::tempdir().expect("failed to create temp dir");

    for group in config.groups() {
        let out = dir.path().join(group.to_string());
        let report = backup(&store, &oracle, group, &out, &options()).expect("backup failed");
        let lines = read_lines(&report.files);

        let friends = lines.iter().filter(|l| l.contains("<friend>")).count();
        let names = lines.iter().filter(|l| l.contains("<name>")).count();
        assert_eq!(friends, if group == friend_group { 4 } else { 0 }, "group {group}");
        assert_eq!(names, if group == name_group { 2 } else { 0 }, "group {group}");
        assert_eq!(report.lines as usize, lines.len());
        if lines.is_empty() {
            assert!(report.files.is_empty());
            assert!(!out.exists() || fs::read_dir(&out).expect("readable").count() == 0);
        }
    }
}

#[test]
fn test_backup_line_format() {
    let store = create_test_store();
    populate_graph(&store);
    let dir = tempfile::tempdir().expect("failed to create temp dir");

    let report = backup(&store, &single_group, 0, dir.path(), &options()).expect("backup failed");
    assert_eq!(report.group, 0);
    assert_eq!(report.files, vec![dir.path().join(file_name(0, 0))]);
    assert_eq!(report.keys, 5);

    // name sorts before friend: shorter predicates first
    assert_eq!(
        read_lines(&report.files),
        [
            "<0x1> <name> \"alice\"@en .",
            "<0x2> <name> \"bob\" .",
            "<0x1> <friend> <0x2> (age=33,close=true,since=2006-01-02T15:04:05Z) .",
            "<0x1> <friend> <0x3> .",
            "<0x2> <friend> <0x1> <author0> .",
            "<0x3> <friend> <0x1> .",
        ]
    );
}

#[test]
fn test_backup_all_is_complete_and_disjoint() {
    let store = create_test_store();
    let mut expected = BTreeSet::new();
    for (i, attr) in ["friend", "name", "age", "follows", "email", "quiver.type", "score"].iter().enumerate() {
        for entity in 1..=4u64 {
            let posting = Posting::literal(format!("{attr}-{entity}"));
            stage(&store, attr, entity + i as u64 * 100, &posting);
            expected.insert(format_quad(Uid::new(entity + i as u64 * 100), attr, &posting));
        }
    }

    let config = GroupConfig::new(4).with_offset(1);
    let oracle = FingerprintOracle::new(&config).expect("valid config");
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let results = backup_all(&store, &config, dir.path(), &options()).expect("valid config");
    assert_eq!(results.len(), 4);

    let mut seen = BTreeSet::new();
    for result in results {
        let report = result.expect("group backup failed");
        for line in read_lines(&report.files) {
            let attr = line.split_whitespace().nth(1).expect("predicate").trim_matches(['<', '>']);
            assert_eq!(oracle.belongs_to(attr), report.group);
            assert!(seen.insert(line), "line written twice");
        }
    }
    assert_eq!(seen, expected);
}

#[test]
fn test_backup_all_with_more_groups_than_workers() {
    let store = create_test_store();
    populate_graph(&store);

    let config = GroupConfig::new(64);
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let options = options().max_workers(2);
    let results = backup_all(&store, &config, dir.path(), &options).expect("valid config");
    assert_eq!(results.len(), 64);

    let mut lines = 0;
    for (expected_group, result) in (0u32..).zip(results) {
        let report = result.expect("group backup failed");
        assert_eq!(report.group, expected_group);
        lines += report.lines;
    }
    assert_eq!(lines, 6);
}

#[test]
fn test_backup_all_rejects_bad_config() {
    let store = create_test_store();
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let err = backup_all(&store, &GroupConfig::new(0), dir.path(), &options()).unwrap_err();
    assert!(matches!(err, BackupError::Configuration(_)));
}

// ============================================================================
// Consistency
// ============================================================================

#[test]
fn test_staged_postings_are_included() {
    let store = create_test_store();
    stage(&store, "friend", 1, &Posting::node(Uid::new(2)));
    assert_eq!(store.pending().expect("pending"), 1);

    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let report = backup(&store, &single_group, 0, dir.path(), &options()).expect("backup failed");
    assert_eq!(report.lines, 1);
    assert_eq!(store.pending().expect("pending"), 0);
}

#[test]
fn test_index_keys_are_skipped() {
    let store = create_test_store();
    populate_graph(&store);
    store.commit_barrier().expect("barrier failed");
    let mut tx = store.engine().begin_write().expect("failed to begin write");
    tx.put(&encode_index_key("name", b"alice").expect("valid index key"), b"\x01").expect("put failed");
    tx.commit().expect("commit failed");

    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let report = backup(&store, &single_group, 0, dir.path(), &options()).expect("backup failed");
    assert_eq!(report.lines, 6);
}

#[test]
fn test_rerun_is_byte_identical() {
    let store = create_test_store();
    populate_graph(&store);
    let dir = tempfile::tempdir().expect("failed to create temp dir");

    let first = backup(&store, &single_group, 0, dir.path(), &options()).expect("backup failed");
    let before = fs::read(&first.files[0]).expect("readable");
    fs::remove_file(&first.files[0]).expect("removable");

    let second = backup(&store, &single_group, 0, dir.path(), &options()).expect("backup failed");
    assert_eq!(second.files, first.files);
    assert_eq!(fs::read(&second.files[0]).expect("readable"), before);
}

#[test]
fn test_rotation_preserves_order() {
    let store = create_test_store();
    populate_graph(&store);
    let whole = tempfile::tempdir().expect("failed to create temp dir");
    let split = tempfile::tempdir().expect("failed to create temp dir");

    let single = backup(&store, &single_group, 0, whole.path(), &options()).expect("backup failed");
    let rotated = backup(&store, &single_group, 0, split.path(), &options().max_lines_per_file(4).buffer_bytes(1))
        .expect("backup failed");

    assert_eq!(rotated.files.len(), 2);
    assert_eq!(backup_files(split.path()).expect("listable"), rotated.files);
    assert_eq!(read_lines(&rotated.files), read_lines(&single.files));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_corrupt_posting_is_reported_with_key() {
    let store = create_test_store();
    stage(&store, "age", 1, &Posting::literal(30));
    let bad = RawPosting {
        uid: 0,
        val_type: ValueType::Int32.tag(),
        value: vec![1, 2, 3],
        lang: String::new(),
        label: String::new(),
        facets: Vec::new(),
    };
    store.stage(&Key::new("age", 2).expect("valid key"), bad).expect("failed to stage");

    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let err = backup(&store, &single_group, 0, dir.path(), &options()).unwrap_err();
    match &err {
        BackupError::CorruptValue { group, key, source } => {
            assert_eq!(*group, 0);
            assert_eq!(key, &Key::new("age", 2).expect("valid key"));
            assert!(source.is_corrupt());
        }
        other => panic!("expected CorruptValue, got {other}"),
    }

    // the partial file is closed and readable
    let files = backup_files(dir.path()).expect("listable");
    assert_eq!(read_lines(&files), ["<0x1> <age> \"30\"^^<xs:int> ."]);
}

#[test]
fn test_other_groups_skip_corrupt_lists() {
    let store = create_test_store();
    store
        .stage(
            &Key::new("broken", 1).expect("valid key"),
            RawPosting {
                uid: 7,
                val_type: ValueType::Uid.tag(),
                value: vec![9],
                lang: String::new(),
                label: String::new(),
                facets: Vec::new(),
            },
        )
        .expect("failed to stage");
    stage(&store, "name", 1, &Posting::literal("ok"));

    let oracle = |attr: &str| u32::from(attr == "broken");
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let report = backup(&store, &oracle, 0, dir.path(), &options()).expect("backup failed");
    assert_eq!(report.lines, 1);
    assert!(backup(&store, &oracle, 1, dir.path(), &options()).is_err());
}

/// A store whose barrier always fails.
struct UnavailableStore(Store);

impl PostingStore for UnavailableStore {
    type Snapshot<'a>
        = <Store as PostingStore>::Snapshot<'a>
    where
        Self: 'a;

    fn stage(&self, key: &Key, posting: RawPosting) -> StorageResult<()> {
        self.0.stage(key, posting)
    }

    fn commit_barrier(&self) -> StorageResult<()> {
        Err(StorageError::Transaction("replica lost quorum".to_owned()))
    }

    fn snapshot(&self) -> StorageResult<Self::Snapshot<'_>> {
        self.0.snapshot()
    }
}

#[test]
fn test_barrier_failure_is_fatal() {
    let store = UnavailableStore(create_test_store());
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let err = backup(&store, &single_group, 0, dir.path(), &options()).unwrap_err();
    assert!(matches!(err, BackupError::StoreUnavailable { group: 0, .. }));
    assert_eq!(err.group(), Some(0));
    assert!(backup_files(dir.path()).map(|f| f.is_empty()).unwrap_or(true));
}

#[test]
fn test_cancelled_run_stops() {
    let store = create_test_store();
    populate_graph(&store);
    let flag = Arc::new(AtomicBool::new(true));
    let dir = tempfile::tempdir().expect("failed to create temp dir");

    let err = backup(&store, &single_group, 3, dir.path(), &options().cancel_on(flag)).unwrap_err();
    assert!(matches!(err, BackupError::Cancelled { group: 3 }));
}

#[test]
fn test_unwritable_directory_is_io_error() {
    let store = create_test_store();
    populate_graph(&store);
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, b"").expect("writable");

    let err = backup(&store, &single_group, 0, &blocker, &options()).unwrap_err();
    assert!(matches!(err, BackupError::Io { group: 0, .. }));
}
