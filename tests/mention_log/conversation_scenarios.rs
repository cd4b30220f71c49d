use super::log_harness::{seed, store_in, ts};
use gossip::CompactAction;

const T1: &str = "2024-01-01-10-00-00";
const T2: &str = "2024-01-02-10-00-00";

#[test]
fn report_unread_only_leaves_flags_alone() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());
    seed(&store, "#chan", &[(T1, "<x> hi"), (T2, "<y> later")]);

    let outcome = store
        .compact("#chan", CompactAction::ReportUnreadOnly, Some(ts(T1)))
        .unwrap();
    assert_eq!(outcome.reported, vec!["<x> hi"]);

    let records = store.read("#chan").unwrap();
    assert!(!records[0].read);
    assert!(!records[1].read);

    let again = store
        .compact("#chan", CompactAction::ReportUnreadOnly, Some(ts(T1)))
        .unwrap();
    assert_eq!(again.reported, vec!["<x> hi"]);
}

#[test]
fn mark_read_reports_once() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());
    seed(&store, "#chan", &[(T1, "<x> hi"), (T2, "<y> later")]);

    let first = store
        .compact("#chan", CompactAction::MarkReadAndReport, Some(ts(T1)))
        .unwrap();
    assert_eq!(first.reported, vec!["<x> hi"]);
    assert_eq!(first.marked_read, 1);

    let second = store
        .compact("#chan", CompactAction::MarkReadAndReport, Some(ts(T1)))
        .unwrap();
    assert!(second.reported.is_empty());

    let records = store.read("#chan").unwrap();
    assert!(records[0].read);
    assert!(!records[1].read);
}

#[test]
fn conversations_do_not_share_logs() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());
    seed(&store, "#chan", &[(T1, "<x> in channel")]);
    seed(&store, "alice", &[(T1, "<alice> in private")]);

    store
        .compact("#chan", CompactAction::Delete, Some(ts(T2)))
        .unwrap();

    assert!(store.read("#chan").unwrap().is_empty());
    assert_eq!(store.read("alice").unwrap().len(), 1);
    assert_eq!(store.keys().unwrap(), vec!["alice"]);
}
