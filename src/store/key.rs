use crate::error::StoreError;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use std::path::{Path, PathBuf};

/// Extension carried by every log file.
pub const LOG_EXTENSION: &str = "log";

/// Longest key accepted, in bytes. Base64 inflates by 4/3, so this keeps the
/// encoded filename (plus extension) under the usual 255-byte limit.
pub const MAX_KEY_BYTES: usize = 180;

/// A validated conversation key: a channel name or a private correspondent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversationKey(String);

impl ConversationKey {
    pub fn new(raw: &str) -> Result<Self, StoreError> {
        let invalid = |reason: &str| StoreError::InvalidKey {
            key: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw.is_empty() {
            return Err(invalid("key is empty"));
        }
        if raw.len() > MAX_KEY_BYTES {
            return Err(invalid("key is longer than 180 bytes"));
        }
        if raw.chars().any(char::is_control) {
            return Err(invalid("key contains control characters"));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URL-safe base64 of the key's UTF-8 bytes.
    pub fn encoded(&self) -> String {
        URL_SAFE.encode(self.0.as_bytes())
    }

    /// Filename of this key's log inside the logs directory.
    pub fn file_name(&self) -> String {
        format!("{}.{LOG_EXTENSION}", self.encoded())
    }

    pub fn store_path(&self, logs_dir: &Path) -> PathBuf {
        logs_dir.join(self.file_name())
    }

    /// Inverse of [`ConversationKey::file_name`]. Returns `None` for anything
    /// that is not a log file written by this crate.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(&format!(".{LOG_EXTENSION}"))?;
        let bytes = URL_SAFE.decode(stem).ok()?;
        let raw = String::from_utf8(bytes).ok()?;
        Self::new(&raw).ok()
    }
}

impl std::fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ConversationKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_name_encodes_to_safe_filename() {
        let key = ConversationKey::new("#rust").unwrap();
        let name = key.file_name();
        assert_eq!(name, "I3J1c3Q=.log");
        assert!(!name.contains('/'));
        assert!(!name.contains('#'));
    }

    #[test]
    fn path_separators_cannot_escape_logs_dir() {
        let key = ConversationKey::new("../../etc/passwd").unwrap();
        let path = key.store_path(Path::new("/var/gossip"));
        assert_eq!(path.parent(), Some(Path::new("/var/gossip")));
    }

    #[test]
    fn unicode_keys_round_trip_through_file_name() {
        let key = ConversationKey::new("#café/日本").unwrap();
        let decoded = ConversationKey::from_file_name(&key.file_name()).unwrap();
        assert_eq!(decoded, key);
    }

    #[test]
    fn empty_key_rejected() {
        let err = ConversationKey::new("").unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey { .. }));
    }

    #[test]
    fn control_characters_rejected() {
        assert!(ConversationKey::new("#chan\n").is_err());
        assert!(ConversationKey::new("nick\0").is_err());
    }

    #[test]
    fn overlong_key_rejected() {
        let raw = "a".repeat(MAX_KEY_BYTES + 1);
        assert!(ConversationKey::new(&raw).is_err());

        let longest = ConversationKey::new(&"a".repeat(MAX_KEY_BYTES)).unwrap();
        assert!(longest.file_name().len() < 255);
    }

    #[test]
    fn foreign_file_names_are_ignored() {
        assert!(ConversationKey::from_file_name("I3J1c3Q=.log.tmp").is_none());
        assert!(ConversationKey::from_file_name("notes.txt").is_none());
        assert!(ConversationKey::from_file_name("!!!.log").is_none());
    }
}
