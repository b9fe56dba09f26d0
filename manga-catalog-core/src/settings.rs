//! Shared application settings (database path, artifact root).
//!
//! The settings file is always `~/.config/manga-catalog/settings.toml`, so
//! every frontend resolves the catalog database the same way.

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Canonical path to the shared settings file.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("manga-catalog").join("settings.toml")
}

/// Default catalog database location when nothing is configured.
pub fn default_database_path() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data.join("manga-catalog").join("catalog.db")
}

/// Typed view of the settings file. Missing sections read as empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DatabaseSettings {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StorageSettings {
    pub artifact_root: Option<PathBuf>,
}

impl Settings {
    /// Read settings from `path`. A missing or unparsable file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|contents| toml::from_str(&contents).ok())
            .unwrap_or_default()
    }

    pub fn load() -> Self {
        Self::load_from(&settings_path())
    }

    /// Resolve the database path using a priority chain:
    ///
    /// 1. CLI override (if `Some`)
    /// 2. `database.path` in the settings file
    /// 3. [`default_database_path`]
    pub fn resolve_database_path(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override
            .or_else(|| self.database.path.clone())
            .unwrap_or_else(default_database_path)
    }
}

/// Set (or clear) a single `[section] key` string value in the settings file.
///
/// Uses `toml::Value` for a surgical update so unrelated keys are preserved,
/// and writes through a temp file + rename.
pub fn save_setting(
    settings: &Path,
    section: &str,
    key: &str,
    value: Option<&Path>,
) -> io::Result<()> {
    let mut doc: toml::Value = if let Ok(contents) = std::fs::read_to_string(settings) {
        contents
            .parse()
            .unwrap_or_else(|_| toml::Value::Table(Default::default()))
    } else {
        toml::Value::Table(Default::default())
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let section_value = table
        .entry(section)
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let section_table = section_value
        .as_table_mut()
        .ok_or_else(|| io::Error::other(format!("[{section}] is not a table")))?;

    match value {
        Some(p) => {
            section_table.insert(
                key.to_string(),
                toml::Value::String(p.to_string_lossy().into_owned()),
            );
        }
        None => {
            section_table.remove(key);
        }
    }

    if let Some(parent) = settings.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = settings.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, settings)?;

    Ok(())
}

/// Load the settings file as a pretty-printed TOML string for display.
pub fn load_settings_string(path: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(path).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}
