use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `gossip`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; the binary wraps them in `anyhow` for
/// context chains.
#[derive(Debug, Error)]
pub enum GossipError {
    // ── Mention log store ───────────────────────────────────────────────
    #[error("store: {0}")]
    Store(#[from] StoreError),

    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Preferences ─────────────────────────────────────────────────────
    #[error("preferences: {0}")]
    Preferences(#[from] PreferenceError),

    // ── Commands ────────────────────────────────────────────────────────
    #[error("command: {0}")]
    Command(#[from] CommandError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Store errors ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid conversation key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("corrupt record in log {key:?} at line {line}: {reason}")]
    CorruptRecord {
        key: String,
        line: usize,
        reason: String,
    },

    #[error("compaction of log {key:?} failed, original left intact: {source}")]
    CompactionFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode record for log {key:?}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("io on log {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(key: &str, source: std::io::Error) -> Self {
        Self::Io {
            key: key.to_string(),
            source,
        }
    }

    pub(crate) fn encode(key: &str, source: serde_json::Error) -> Self {
        Self::Encode {
            key: key.to_string(),
            source,
        }
    }
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Preference errors ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("failed to parse preferences at {path}: {message}")]
    Parse { path: String, message: String },

    #[error("failed to write preferences at {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Command errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command; try `help`")]
    Empty,

    #[error("unknown command `{0}`; try `help`")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid {what} `{value}`")]
    InvalidArgument { what: &'static str, value: String },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, GossipError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_record_names_line() {
        let err = GossipError::Store(StoreError::CorruptRecord {
            key: "#rust".into(),
            line: 7,
            reason: "missing field `ts`".into(),
        });
        let rendered = err.to_string();
        assert!(rendered.contains("line 7"));
        assert!(rendered.contains("#rust"));
    }

    #[test]
    fn compaction_failed_says_original_intact() {
        let err = StoreError::CompactionFailed {
            key: "alice".into(),
            source: std::io::Error::other("rename refused"),
        };
        assert!(err.to_string().contains("original left intact"));
        assert!(err.to_string().contains("rename refused"));
    }

    #[test]
    fn encode_failure_names_log() {
        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let err = StoreError::encode("#rust", source);
        assert!(matches!(err, StoreError::Encode { .. }));
        assert!(err.to_string().contains("\"#rust\""));
    }

    #[test]
    fn anyhow_interop() {
        let anyhow_err = anyhow::anyhow!("something went wrong");
        let gossip_err: GossipError = anyhow_err.into();
        assert!(gossip_err.to_string().contains("something went wrong"));
    }

    #[test]
    fn command_usage_displays_hint() {
        let err = GossipError::Command(CommandError::Usage("delete <key> [cutoff]"));
        assert!(err.to_string().contains("delete <key> [cutoff]"));
    }
}
