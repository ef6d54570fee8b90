use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use photo_edit_core::filtering::infrastructure::filter_factory::FilterSettings;
use photo_edit_core::segmentation::domain::background_remover::BackgroundSettings;
use photo_edit_core::shared::constants::{DEFAULT_HISTORY_CAPACITY, DEFAULT_HISTORY_MEMORY_BYTES};

/// Defaults for every tunable the CLI does not set explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub filters: FilterSettings,
    pub background: BackgroundSettings,
    pub history_capacity: usize,
    /// Memory cap for undo snapshots in MiB; `null` removes the cap.
    pub history_memory_mb: Option<usize>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            filters: FilterSettings::default(),
            background: BackgroundSettings::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            history_memory_mb: Some(DEFAULT_HISTORY_MEMORY_BYTES / (1024 * 1024)),
        }
    }
}

impl EditorSettings {
    pub fn history_memory_bytes(&self) -> Option<usize> {
        self.history_memory_mb.map(|mb| mb.saturating_mul(1024 * 1024))
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("photo-edit").join("settings.json"))
    }

    /// Loads the user's settings file, falling back to defaults when it is
    /// missing or unreadable.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => {
                log::debug!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::debug!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring invalid settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }
}
