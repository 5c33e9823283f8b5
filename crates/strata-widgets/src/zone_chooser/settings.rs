//! Persisted settings for the zone chooser
//!
//! The three broadcast checkboxes survive application restarts; they are
//! stored next to the rest of the editor configuration as YAML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const CHOOSER_SETTINGS_FILENAME: &str = "zone_chooser.yaml";

/// Broadcast toggles controlling how far a zone edit propagates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChooserSettings {
    /// Repeat each edit on the paired stereo channel's leaf
    pub modify_both_channels: bool,
    /// Repeat each edit across every dimension-region combination sharing
    /// the edited zone
    pub modify_all_dim_regions: bool,
    /// Repeat each edit across all regions of the instrument with an
    /// identically shaped dimension
    pub modify_all_regions: bool,
}

pub fn chooser_settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CHOOSER_SETTINGS_FILENAME)
}

/// Load chooser settings; missing or unreadable files fall back to defaults.
pub fn load_chooser_settings(config_dir: &Path) -> ChooserSettings {
    let path = chooser_settings_path(config_dir);
    if !path.exists() {
        return ChooserSettings::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => match serde_yaml::from_str::<ChooserSettings>(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("load_chooser_settings: failed to parse {:?}: {}", path, e);
                ChooserSettings::default()
            }
        },
        Err(e) => {
            log::warn!("load_chooser_settings: failed to read {:?}: {}", path, e);
            ChooserSettings::default()
        }
    }
}

pub fn save_chooser_settings(settings: &ChooserSettings, config_dir: &Path) -> Result<(), String> {
    if let Err(e) = std::fs::create_dir_all(config_dir) {
        return Err(format!("failed to create config directory: {}", e));
    }
    let yaml = serde_yaml::to_string(settings)
        .map_err(|e| format!("failed to serialize settings: {}", e))?;
    std::fs::write(chooser_settings_path(config_dir), yaml)
        .map_err(|e| format!("failed to write settings: {}", e))
}

/// Default config directory for strata tools
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("strata")
}
