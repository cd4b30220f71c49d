use crate::error::ConfigError;
use crate::prefs::Preferences;
use crate::store::{CorruptPolicy, MentionLogStore};
use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DATA_DIR_NAME: &str = ".gossip";
const CONFIG_FILE: &str = "config.toml";
const PREFERENCES_FILE: &str = "preferences.json";
const DEFAULT_LOGS_DIR: &str = "hlogs";

// ── Top-level config ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    /// Directory holding config, preferences and (by default) the logs
    #[serde(skip)]
    pub data_dir: PathBuf,

    /// Where mention logs live. `~` is expanded; relative paths resolve
    /// against the data directory. Defaults to `<data_dir>/hlogs`.
    pub logs_dir: Option<String>,
    /// Our IRC nick, used to spot highlights in `watch` mode.
    pub nick: Option<String>,
    /// Initial toggle values, used until preferences have been saved.
    pub mentions_enabled: bool,
    pub pms_enabled: bool,
    /// What compaction does with a line it cannot parse.
    pub on_corrupt: CorruptPolicy,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            config_path: data_dir.join(CONFIG_FILE),
            data_dir,
            logs_dir: None,
            nick: None,
            mentions_enabled: true,
            pms_enabled: true,
            on_corrupt: CorruptPolicy::Abort,
        }
    }
}

fn default_data_dir() -> PathBuf {
    UserDirs::new().map_or_else(
        || PathBuf::from(DATA_DIR_NAME),
        |u| u.home_dir().join(DATA_DIR_NAME),
    )
}

impl Config {
    /// Load `~/.gossip/config.toml`, writing defaults on first run.
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Self::load_or_init_at(&home.join(DATA_DIR_NAME).join(CONFIG_FILE))
    }

    /// Same as [`Config::load_or_init`] for an explicit config file; its
    /// parent directory becomes the data directory.
    pub fn load_or_init_at(config_path: &Path) -> Result<Self> {
        let data_dir = config_path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).with_context(|| {
                format!("Failed to create data directory {}", data_dir.display())
            })?;
        }

        let config = if config_path.exists() {
            let contents = fs::read_to_string(config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.config_path = config_path.to_path_buf();
            config.data_dir = data_dir;
            config
        } else {
            let config = Self {
                config_path: config_path.to_path_buf(),
                data_dir,
                ..Self::default()
            };
            config.save()?;
            tracing::info!(path = %config_path.display(), "wrote default config");
            config
        };

        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        // Logs directory: GOSSIP_LOGS_DIR
        if let Ok(dir) = std::env::var("GOSSIP_LOGS_DIR") {
            if !dir.is_empty() {
                self.logs_dir = Some(dir);
            }
        }

        // Nick: GOSSIP_NICK
        if let Ok(nick) = std::env::var("GOSSIP_NICK") {
            if !nick.is_empty() {
                self.nick = Some(nick);
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(dir) = &self.logs_dir {
            if dir.trim().is_empty() {
                return Err(ConfigError::Validation("logs_dir must not be empty".into()));
            }
        }
        if let Some(nick) = &self.nick {
            if nick.is_empty() || nick.contains(char::is_whitespace) {
                return Err(ConfigError::Validation(format!(
                    "nick {nick:?} must be a single non-empty word"
                )));
            }
        }
        Ok(())
    }

    /// Resolved mention log directory.
    pub fn logs_path(&self) -> PathBuf {
        let raw = self.logs_dir.as_deref().unwrap_or(DEFAULT_LOGS_DIR);
        let expanded = PathBuf::from(shellexpand::tilde(raw).as_ref());
        if expanded.is_absolute() {
            expanded
        } else {
            self.data_dir.join(expanded)
        }
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join(PREFERENCES_FILE)
    }

    /// Preferences to start from when none have been saved.
    pub fn default_preferences(&self) -> Preferences {
        Preferences {
            mentions_enabled: self.mentions_enabled,
            pms_enabled: self.pms_enabled,
            ..Preferences::default()
        }
    }

    pub fn open_store(&self) -> MentionLogStore {
        MentionLogStore::new(self.logs_path(), self.on_corrupt)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}
