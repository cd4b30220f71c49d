use super::{PreferenceStore, Preferences};
use crate::error::PreferenceError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Preferences kept as pretty JSON in a single file.
pub struct JsonFilePreferenceStore {
    path: PathBuf,
}

impl JsonFilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn load(&self) -> Result<Option<Preferences>, PreferenceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| PreferenceError::Parse {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })
    }

    fn save(&self, prefs: &Preferences) -> Result<(), PreferenceError> {
        let json = serde_json::to_string_pretty(prefs).map_err(|e| PreferenceError::Parse {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        write_atomic(&self.path, &json)
    }
}

fn write_atomic(path: &Path, content: &str) -> Result<(), PreferenceError> {
    let write_err = |source| PreferenceError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(write_err)?;

    if let Err(rename_error) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(write_err(rename_error));
    }

    Ok(())
}
