use super::record::{MentionRecord, Timestamp};
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

/// What a compaction pass does to records at or before the cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum CompactAction {
    /// Drop old records.
    #[strum(to_string = "d", serialize = "delete")]
    Delete,
    /// Report unread old records and flip them to read.
    #[strum(to_string = "ru", serialize = "mark_read_and_report")]
    MarkReadAndReport,
    /// Report unread old records, leave the flag alone.
    #[strum(to_string = "r", serialize = "report_unread_only")]
    ReportUnreadOnly,
    /// Report every old record.
    #[strum(to_string = "ra", serialize = "report_all")]
    ReportAll,
}

impl CompactAction {
    pub fn reports(self) -> bool {
        !matches!(self, Self::Delete)
    }
}

/// How a pass treats a line that does not parse as a record.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CorruptPolicy {
    /// Stop, keep the original log untouched, surface `CorruptRecord`.
    #[default]
    Abort,
    /// Copy the line through unchanged, count it, keep going.
    Skip,
}

/// Result of one compaction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompactOutcome {
    /// Texts of affected records, in log order.
    pub reported: Vec<String>,
    /// Lines written to the new log (records plus skipped corrupt lines).
    pub retained: usize,
    pub dropped: usize,
    pub marked_read: usize,
    pub skipped_corrupt: usize,
    /// Records still flagged unread in the new log.
    pub unread_remaining: usize,
}

impl CompactOutcome {
    /// The new log holds nothing at all.
    pub fn is_empty_log(&self) -> bool {
        self.retained == 0
    }

    /// Nothing unread is left in the log for this key.
    pub fn all_read(&self) -> bool {
        self.unread_remaining == 0
    }
}

/// Stream `input` into `output`, applying `action` to records at or before
/// `cutoff`. Unchanged lines are copied byte-for-byte.
///
/// I/O errors are tagged with `key`; the caller owns cleanup of `output`.
pub(crate) fn compact_lines<R: BufRead, W: Write>(
    key: &str,
    mut input: R,
    output: &mut W,
    action: CompactAction,
    cutoff: Timestamp,
    policy: CorruptPolicy,
) -> Result<CompactOutcome, StoreError> {
    let mut outcome = CompactOutcome::default();
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        let read = input
            .read_until(b'\n', &mut buf)
            .map_err(|e| StoreError::io(key, e))?;
        if read == 0 {
            break;
        }
        line_no += 1;
        if !buf.ends_with(b"\n") {
            buf.push(b'\n');
        }

        let parsed = std::str::from_utf8(&buf)
            .map_err(|e| e.to_string())
            .and_then(|line| {
                if line.trim().is_empty() {
                    Ok(None)
                } else {
                    MentionRecord::parse_line(line).map(Some)
                }
            });

        let record = match parsed {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::debug!(key, line = line_no, "dropping blank line");
                continue;
            }
            Err(reason) => match policy {
                CorruptPolicy::Abort => {
                    return Err(StoreError::CorruptRecord {
                        key: key.to_string(),
                        line: line_no,
                        reason,
                    });
                }
                CorruptPolicy::Skip => {
                    tracing::warn!(key, line = line_no, %reason, "skipping corrupt record");
                    write_bytes(key, output, &buf)?;
                    outcome.skipped_corrupt += 1;
                    outcome.retained += 1;
                    continue;
                }
            },
        };

        if record.timestamp > cutoff {
            write_bytes(key, output, &buf)?;
            outcome.retained += 1;
            outcome.unread_remaining += usize::from(!record.read);
            continue;
        }

        match action {
            CompactAction::Delete => {
                outcome.dropped += 1;
                continue;
            }
            CompactAction::MarkReadAndReport if !record.read => {
                let flipped = MentionRecord {
                    read: true,
                    ..record
                };
                let encoded = flipped.to_line().map_err(|e| StoreError::encode(key, e))?;
                write_bytes(key, output, encoded.as_bytes())?;
                outcome.reported.push(flipped.text);
                outcome.marked_read += 1;
            }
            CompactAction::ReportUnreadOnly if !record.read => {
                write_bytes(key, output, &buf)?;
                outcome.reported.push(record.text);
                outcome.unread_remaining += 1;
            }
            CompactAction::ReportAll => {
                write_bytes(key, output, &buf)?;
                outcome.unread_remaining += usize::from(!record.read);
                outcome.reported.push(record.text);
            }
            CompactAction::MarkReadAndReport | CompactAction::ReportUnreadOnly => {
                write_bytes(key, output, &buf)?;
            }
        }
        outcome.retained += 1;
    }

    Ok(outcome)
}

fn write_bytes<W: Write>(key: &str, output: &mut W, bytes: &[u8]) -> Result<(), StoreError> {
    output.write_all(bytes).map_err(|e| StoreError::io(key, e))
}
