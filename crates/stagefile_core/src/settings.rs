//! Filing configuration surface and persistence.
//!
//! # Responsibility
//! - Define the watched/archive/excluded folder configuration.
//! - Load and save settings as JSON, merging partial files over
//!   defaults.
//!
//! # Invariants
//! - A missing settings file yields the defaults, never an error.
//! - Fields absent from a settings file keep their default values.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::Path;

pub type SettingsResult<T> = Result<T, SettingsError>;

#[derive(Debug)]
pub enum SettingsError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "settings file error: {err}"),
            Self::Parse(err) => write!(f, "settings parse error: {err}"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<io::Error> for SettingsError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// User-editable configuration for stage-based filing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageFilingSettings {
    /// Folder subtrees whose notes are monitored for stage transitions.
    pub watched_folders: Vec<String>,
    /// Destination folder for archived notes.
    pub archive_folder: String,
    /// Folder subtrees omitted from destination suggestions.
    pub excluded_folders: Vec<String>,
}

impl Default for StageFilingSettings {
    fn default() -> Self {
        Self {
            watched_folders: vec!["clippings".to_string(), "inbox".to_string()],
            archive_folder: "bin".to_string(),
            excluded_folders: Vec::new(),
        }
    }
}

impl StageFilingSettings {
    /// Loads settings from a JSON file, merging over defaults.
    pub fn load(path: &Path) -> SettingsResult<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    /// Saves settings as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> SettingsResult<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }
}

/// Splits a comma-separated folder-list field: trim entries, drop
/// empties. Shared by settings editors so every host parses the same
/// way.
pub fn parse_folder_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
