use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::lesson::LessonSettings;
use crate::ui::theme::ThemePreset;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub appearance: AppearanceConfig,
    #[serde(default)]
    pub lessons: LessonConfig,
}

/// Look and feel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppearanceConfig {
    /// Color theme preset
    #[serde(default)]
    pub theme: ThemePreset,
    /// Skip staggered reveals and show everything at once
    #[serde(default)]
    pub reduce_motion: bool,
}

/// Lesson pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonConfig {
    /// How long step prompts stay on screen
    #[serde(default = "default_popup_duration")]
    pub popup_duration_ms: u64,
    /// Show the intro panel when a lesson opens
    #[serde(default = "default_true")]
    pub show_intro: bool,
    /// Fixed seed for mini-game targets
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for LessonConfig {
    fn default() -> Self {
        Self {
            popup_duration_ms: default_popup_duration(),
            show_intro: true,
            seed: None,
        }
    }
}

fn default_popup_duration() -> u64 {
    3500
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "electronics-universe", "Electronics Universe")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, falling back to defaults if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::info!("Loaded configuration from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Lesson knobs derived from the `[lessons]` table
    pub fn lesson_settings(&self) -> LessonSettings {
        LessonSettings {
            popup_duration: Duration::from_millis(self.lessons.popup_duration_ms),
            show_intro: self.lessons.show_intro,
            seed: self.lessons.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.lessons.popup_duration_ms, 3500);
        assert!(config.lessons.show_intro);
        assert_eq!(config.appearance.theme, ThemePreset::Cosmic);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.appearance.theme = ThemePreset::Catppuccin;
        config.appearance.reduce_motion = true;
        config.lessons.seed = Some(42);
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[lessons]\nshow_intro = false\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(!config.lessons.show_intro);
        assert_eq!(config.lessons.popup_duration_ms, 3500);
        assert!(!config.appearance.reduce_motion);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[appearance]\ntheme = \"neon\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_lesson_settings() {
        let mut config = Config::default();
        config.lessons.popup_duration_ms = 1200;
        config.lessons.seed = Some(3);
        let settings = config.lesson_settings();
        assert_eq!(settings.popup_duration, Duration::from_millis(1200));
        assert_eq!(settings.seed, Some(3));
        assert!(settings.show_intro);
    }
}
