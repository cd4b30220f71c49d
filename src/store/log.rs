use super::compaction::{CompactAction, CompactOutcome, CorruptPolicy, compact_lines};
use super::key::ConversationKey;
use super::record::{MentionRecord, Timestamp};
use crate::error::StoreError;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// One append-only mention log per conversation key.
///
/// Layout:
///   logs_dir/<urlsafe-base64(key)>.log      one JSON record per line
///   logs_dir/<urlsafe-base64(key)>.log.tmp  compaction scratch file
///
/// Calls for the same key are serialized; different keys never share a file
/// and may run in parallel.
pub struct MentionLogStore {
    logs_dir: PathBuf,
    on_corrupt: CorruptPolicy,
    locks: Mutex<HashMap<ConversationKey, Arc<Mutex<()>>>>,
}

impl MentionLogStore {
    pub fn new(logs_dir: impl Into<PathBuf>, on_corrupt: CorruptPolicy) -> Self {
        Self {
            logs_dir: logs_dir.into(),
            on_corrupt,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    pub fn store_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        Ok(ConversationKey::new(key)?.store_path(&self.logs_dir))
    }

    /// Per-key lock. Entries nobody else holds are pruned on the way in.
    fn key_lock(&self, key: &ConversationKey) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        Arc::clone(locks.entry(key.clone()).or_default())
    }

    #[cfg(test)]
    pub(super) fn tracked_locks(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Append an unread record for `key`, creating the directory and log as needed.
    pub fn append(&self, key: &str, text: &str, now: Timestamp) -> Result<(), StoreError> {
        let key = ConversationKey::new(key)?;
        let lock = self.key_lock(&key);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        // create_dir_all already treats an existing directory as success.
        fs::create_dir_all(&self.logs_dir).map_err(|e| StoreError::io(key.as_str(), e))?;

        let path = key.store_path(&self.logs_dir);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| StoreError::io(key.as_str(), e))?;

        let line = MentionRecord::unread(now, key.as_str(), text)
            .to_line()
            .map_err(|e| StoreError::encode(key.as_str(), e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| StoreError::io(key.as_str(), e))?;

        tracing::debug!(key = %key, path = %path.display(), "appended mention");
        Ok(())
    }

    /// Every record of the log in file order. A missing log reads as empty.
    pub fn read(&self, key: &str) -> Result<Vec<MentionRecord>, StoreError> {
        let key = ConversationKey::new(key)?;
        let lock = self.key_lock(&key);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let Some(file) = open_existing(&key, &key.store_path(&self.logs_dir))? else {
            return Ok(Vec::new());
        };

        let mut records = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| match e.kind() {
                ErrorKind::InvalidData => StoreError::CorruptRecord {
                    key: key.to_string(),
                    line: idx + 1,
                    reason: e.to_string(),
                },
                _ => StoreError::io(key.as_str(), e),
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let record = MentionRecord::parse_line(&line).map_err(|reason| {
                StoreError::CorruptRecord {
                    key: key.to_string(),
                    line: idx + 1,
                    reason,
                }
            })?;
            records.push(record);
        }
        Ok(records)
    }

    /// Conversation keys that currently have a log, sorted.
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        let dir = match fs::read_dir(&self.logs_dir) {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io("*", e)),
        };

        let mut keys = Vec::new();
        for entry in dir {
            let entry = entry.map_err(|e| StoreError::io("*", e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(key) = ConversationKey::from_file_name(name) {
                keys.push(key.as_str().to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    /// Single forward pass over the log for `key`, written to a scratch file
    /// that then replaces the original. `cutoff` defaults to now.
    pub fn compact(
        &self,
        key: &str,
        action: CompactAction,
        cutoff: Option<Timestamp>,
    ) -> Result<CompactOutcome, StoreError> {
        let key = ConversationKey::new(key)?;
        let cutoff = cutoff.unwrap_or_else(Timestamp::now);
        let lock = self.key_lock(&key);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let path = key.store_path(&self.logs_dir);
        let Some(source) = open_existing(&key, &path)? else {
            tracing::debug!(key = %key, "no log to compact");
            return Ok(CompactOutcome::default());
        };

        let temp_path = self.logs_dir.join(format!("{}.tmp", key.file_name()));
        let outcome = match self.write_compacted(&key, source, &temp_path, action, cutoff) {
            Ok(outcome) => outcome,
            Err(err) => {
                let _ = fs::remove_file(&temp_path);
                return Err(err);
            }
        };

        if action == CompactAction::Delete && outcome.is_empty_log() {
            let _ = fs::remove_file(&temp_path);
            fs::remove_file(&path).map_err(|e| StoreError::CompactionFailed {
                key: key.to_string(),
                source: e,
            })?;
            tracing::info!(key = %key, dropped = outcome.dropped, "deleted every mention, log removed");
            return Ok(outcome);
        }

        replace_log(&key, &temp_path, &path)?;

        tracing::info!(
            key = %key,
            action = %action,
            cutoff = %cutoff,
            reported = outcome.reported.len(),
            retained = outcome.retained,
            dropped = outcome.dropped,
            skipped_corrupt = outcome.skipped_corrupt,
            "compacted mention log"
        );
        Ok(outcome)
    }

    fn write_compacted(
        &self,
        key: &ConversationKey,
        source: File,
        temp_path: &Path,
        action: CompactAction,
        cutoff: Timestamp,
    ) -> Result<CompactOutcome, StoreError> {
        let temp = File::create(temp_path).map_err(|e| StoreError::io(key.as_str(), e))?;
        let mut writer = BufWriter::new(temp);

        let outcome = compact_lines(
            key.as_str(),
            BufReader::new(source),
            &mut writer,
            action,
            cutoff,
            self.on_corrupt,
        )?;

        let temp = writer
            .into_inner()
            .map_err(|e| StoreError::io(key.as_str(), e.into_error()))?;
        temp.sync_all()
            .map_err(|e| StoreError::io(key.as_str(), e))?;
        Ok(outcome)
    }
}

/// Rename `temp_path` over `path`. On failure the scratch file is removed and
/// the log at `path` is left as it was.
pub(super) fn replace_log(
    key: &ConversationKey,
    temp_path: &Path,
    path: &Path,
) -> Result<(), StoreError> {
    fs::rename(temp_path, path).map_err(|source| {
        let _ = fs::remove_file(temp_path);
        StoreError::CompactionFailed {
            key: key.to_string(),
            source,
        }
    })
}

fn open_existing(key: &ConversationKey, path: &Path) -> Result<Option<File>, StoreError> {
    match File::open(path) {
        Ok(file) => Ok(Some(file)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(key.as_str(), e)),
    }
}
