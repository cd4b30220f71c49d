//! Toggles and the pending-notification set, persisted through an injected
//! [`PreferenceStore`].

mod file;

pub use file::JsonFilePreferenceStore;

use crate::error::PreferenceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

/// Conversation keys holding at least one unread mention.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingSet(BTreeSet<String>);

impl PendingSet {
    /// Returns `true` when the key was not already pending.
    pub fn insert(&mut self, key: &str) -> bool {
        self.0.insert(key.to_string())
    }

    /// Returns `true` when the key was pending.
    pub fn remove(&mut self, key: &str) -> bool {
        self.0.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// One-line "what's new" summary.
    pub fn summary(&self) -> String {
        if self.0.is_empty() {
            return "no unread mentions".to_string();
        }
        let keys: Vec<&str> = self.iter().collect();
        format!("unread mentions in: {}", keys.join(", "))
    }
}

/// Persisted plugin state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub mentions_enabled: bool,
    pub pms_enabled: bool,
    pub pending: PendingSet,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            mentions_enabled: true,
            pms_enabled: true,
            pending: PendingSet::default(),
        }
    }
}

/// Load-on-start / save-on-change persistence for [`Preferences`].
pub trait PreferenceStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Preferences>, PreferenceError>;

    fn save(&self, prefs: &Preferences) -> Result<(), PreferenceError>;
}

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    saved: Mutex<Option<Preferences>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(prefs: Preferences) -> Self {
        Self {
            saved: Mutex::new(Some(prefs)),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Option<Preferences>, PreferenceError> {
        Ok(self
            .saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, prefs: &Preferences) -> Result<(), PreferenceError> {
        *self.saved.lock().unwrap_or_else(PoisonError::into_inner) = Some(prefs.clone());
        Ok(())
    }
}
