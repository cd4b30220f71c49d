use super::log_harness::{raw_log, seed, store_in, texts, ts};
use gossip::CompactAction;
use gossip::store::MentionRecord;

const KEY: &str = "#rust";

#[test]
fn appended_records_read_back_in_order_and_unread() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());
    seed(
        &store,
        KEY,
        &[
            ("2024-03-01-08-00-00", "<a> first"),
            ("2024-03-01-09-00-00", "<b> second: with \"quotes\""),
            ("2024-03-01-10-00-00", "<c> third\twith tab"),
        ],
    );

    let records = store.read(KEY).unwrap();
    assert_eq!(
        records,
        vec![
            MentionRecord::unread(ts("2024-03-01-08-00-00"), KEY, "<a> first"),
            MentionRecord::unread(ts("2024-03-01-09-00-00"), KEY, "<b> second: with \"quotes\""),
            MentionRecord::unread(ts("2024-03-01-10-00-00"), KEY, "<c> third\twith tab"),
        ]
    );
}

#[test]
fn report_all_leaves_log_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());
    seed(
        &store,
        KEY,
        &[
            ("2024-03-01-08-00-00", "<a> one"),
            ("2024-03-02-08-00-00", "<a> two"),
        ],
    );
    let before = raw_log(&store, KEY);

    let first = store
        .compact(KEY, CompactAction::ReportAll, Some(ts("9999-12-31")))
        .unwrap();
    let second = store
        .compact(KEY, CompactAction::ReportAll, Some(ts("9999-12-31")))
        .unwrap();

    assert_eq!(first.reported, vec!["<a> one", "<a> two"]);
    assert_eq!(first.reported, second.reported);
    assert_eq!(raw_log(&store, KEY), before);
}

#[test]
fn cutoff_is_inclusive() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());
    seed(
        &store,
        KEY,
        &[
            ("2024-03-01-08-00-00", "<a> at cutoff"),
            ("2024-03-01-08-00-01", "<a> one second later"),
        ],
    );

    let outcome = store
        .compact(
            KEY,
            CompactAction::ReportUnreadOnly,
            Some(ts("2024-03-01-08-00-00")),
        )
        .unwrap();
    assert_eq!(outcome.reported, vec!["<a> at cutoff"]);
}

#[test]
fn delete_with_far_future_cutoff_removes_everything() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());
    seed(
        &store,
        KEY,
        &[
            ("2024-03-01-08-00-00", "<a> one"),
            ("2030-01-01-00-00-00", "<a> future"),
        ],
    );

    let outcome = store
        .compact(
            KEY,
            CompactAction::Delete,
            Some(ts("9999-12-31-23-59-59")),
        )
        .unwrap();

    assert_eq!(outcome.dropped, 2);
    assert!(store.read(KEY).unwrap().is_empty());
    assert!(!store.store_path(KEY).unwrap().exists());
    assert!(store.keys().unwrap().is_empty());
}

#[test]
fn delete_keeps_newer_records_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());
    seed(
        &store,
        KEY,
        &[
            ("2024-03-01-08-00-00", "<a> old"),
            ("2024-03-05-08-00-00", "<a> new"),
        ],
    );

    let outcome = store
        .compact(KEY, CompactAction::Delete, Some(ts("2024-03-02")))
        .unwrap();

    assert_eq!(outcome.dropped, 1);
    assert!(outcome.reported.is_empty());
    assert_eq!(texts(&store.read(KEY).unwrap()), vec!["<a> new"]);
}

#[test]
fn read_flags_never_go_back_to_unread() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());
    seed(
        &store,
        KEY,
        &[
            ("2024-03-01-08-00-00", "<a> one"),
            ("2024-03-02-08-00-00", "<a> two"),
        ],
    );

    store
        .compact(
            KEY,
            CompactAction::MarkReadAndReport,
            Some(ts("2024-03-01-12-00-00")),
        )
        .unwrap();

    for action in [
        CompactAction::ReportUnreadOnly,
        CompactAction::ReportAll,
        CompactAction::MarkReadAndReport,
    ] {
        store.compact(KEY, action, Some(ts("2024-03-01"))).unwrap();
        let first = &store.read(KEY).unwrap()[0];
        assert!(first.read, "{action} flipped a read record back");
    }
}

#[test]
fn every_action_preserves_surviving_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());
    seed(
        &store,
        KEY,
        &[
            ("2024-03-01-08-00-00", "<a> 1"),
            ("2024-03-02-08-00-00", "<a> 2"),
            ("2024-03-03-08-00-00", "<a> 3"),
            ("2024-03-04-08-00-00", "<a> 4"),
        ],
    );

    store
        .compact(
            KEY,
            CompactAction::MarkReadAndReport,
            Some(ts("2024-03-02-08-00-00")),
        )
        .unwrap();
    assert_eq!(
        texts(&store.read(KEY).unwrap()),
        vec!["<a> 1", "<a> 2", "<a> 3", "<a> 4"]
    );

    store
        .compact(KEY, CompactAction::Delete, Some(ts("2024-03-01-08-00-00")))
        .unwrap();
    assert_eq!(
        texts(&store.read(KEY).unwrap()),
        vec!["<a> 2", "<a> 3", "<a> 4"]
    );
}
