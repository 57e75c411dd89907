//! Runtime settings
//!
//! Read from a JSON file next to the binary (or wherever
//! `BALANCE_ARCADE_CONFIG` points). Profile records live separately under
//! `data_dir`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Default settings file name
pub const SETTINGS_FILE: &str = "balance-arcade.json";
/// Overrides the settings file location
pub const SETTINGS_ENV: &str = "BALANCE_ARCADE_CONFIG";

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Frame rate the loop paces to
    pub target_fps: u32,
    /// Directory holding one record file per profile
    pub data_dir: PathBuf,
    /// Player names, left to right on the player select screen
    pub profiles: Vec<String>,
    /// Fixed RNG seed (random when absent)
    pub seed: Option<u64>,
    /// Recorded sensor session to play back
    pub replay_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_fps: 60,
            data_dir: PathBuf::from("."),
            profiles: default_profiles().to_vec(),
            seed: None,
            replay_path: None,
        }
    }
}

fn default_profiles() -> [String; 3] {
    ["Player 1".into(), "Player 2".into(), "Player 3".into()]
}

impl Settings {
    /// Settings file location, honoring the env override
    pub fn path() -> PathBuf {
        std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
    }

    /// Load from [`Settings::path`]. A missing or unreadable file falls back
    /// to defaults; only invalid values are an error.
    pub fn load() -> Result<Self, SettingsError> {
        let path = Self::path();
        let settings = match Self::load_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.target_fps == 0 {
            return Err(SettingsError::Invalid("target_fps must be positive".into()));
        }
        if self.profiles.len() != 3 {
            return Err(SettingsError::Invalid(format!(
                "expected 3 profiles, got {}",
                self.profiles.len()
            )));
        }
        Ok(())
    }

    /// Profile names for the three selection zones
    pub fn profile_names(&self) -> [String; 3] {
        self.profiles
            .clone()
            .try_into()
            .unwrap_or_else(|_| default_profiles())
    }

    /// Seconds per frame at the target rate
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("balance-arcade-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.profile_names()[0], "Player 1");
        assert!((settings.frame_dt() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_fps = Settings {
            target_fps: 0,
            ..Default::default()
        };
        assert!(matches!(zero_fps.validate(), Err(SettingsError::Invalid(_))));

        let two_profiles = Settings {
            profiles: vec!["a".into(), "b".into()],
            ..Default::default()
        };
        assert!(matches!(two_profiles.validate(), Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial.json");
        std::fs::write(&path, r#"{"target_fps": 30, "seed": 9}"#).unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.target_fps, 30);
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.profiles.len(), 3);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("saved.json");
        let settings = Settings {
            profiles: vec!["Ana".into(), "Ben".into(), "Cy".into()],
            replay_path: Some(PathBuf::from("session.jsonl")),
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let path = temp_path("corrupt.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Settings::load_from(&path), Err(SettingsError::Parse(_))));
        std::fs::remove_file(&path).ok();
    }
}
