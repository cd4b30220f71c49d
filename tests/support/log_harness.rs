use std::fs;
use std::path::Path;

use gossip::store::MentionRecord;
use gossip::{CorruptPolicy, MentionLogStore, Timestamp};

pub fn ts(raw: &str) -> Timestamp {
    raw.parse().expect("test timestamp should parse")
}

pub fn store_in(dir: &Path) -> MentionLogStore {
    MentionLogStore::new(dir.join("hlogs"), CorruptPolicy::Abort)
}

/// Append `(timestamp, text)` pairs to `key` in order.
pub fn seed(store: &MentionLogStore, key: &str, entries: &[(&str, &str)]) {
    for (at, text) in entries {
        store
            .append(key, text, ts(at))
            .expect("append should succeed");
    }
}

pub fn texts(records: &[MentionRecord]) -> Vec<&str> {
    records.iter().map(|record| record.text.as_str()).collect()
}

pub fn raw_log(store: &MentionLogStore, key: &str) -> Vec<u8> {
    let path = store.store_path(key).expect("key should be valid");
    fs::read(path).expect("log should exist")
}
