//! Configuration management commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use crate::cli::output::{OutputFormat, print_formatted, print_success};
use crate::config::Config;
use crate::ui::theme::ThemePreset;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Get a specific config value
    Get {
        /// Config key (e.g., "appearance.theme", "lessons.seed")
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., "appearance.theme", "lessons.seed")
        key: String,

        /// Value to set ("none" clears the seed)
        value: String,
    },

    /// Show config file path
    Path,
}

#[derive(Serialize)]
struct ConfigPathResult {
    path: String,
    exists: bool,
}

pub fn run(command: ConfigCommands, format: OutputFormat, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Show => show(format),
        ConfigCommands::Get { key } => get(&key, format),
        ConfigCommands::Set { key, value } => set(&key, &value, quiet),
        ConfigCommands::Path => path(format),
    }
}

fn show(format: OutputFormat) -> Result<()> {
    let config = Config::load()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => println!("{}", toml::to_string_pretty(&config)?),
    }

    Ok(())
}

fn get(key: &str, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let value = get_config_value(&config, key)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&value)?),
        OutputFormat::Text => println!("{}", value),
    }

    Ok(())
}

fn get_config_value(config: &Config, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["appearance", "theme"] => Ok(config.appearance.theme.key().to_string()),
        ["appearance", "reduce_motion"] => Ok(config.appearance.reduce_motion.to_string()),
        ["lessons", "popup_duration_ms"] => Ok(config.lessons.popup_duration_ms.to_string()),
        ["lessons", "show_intro"] => Ok(config.lessons.show_intro.to_string()),
        ["lessons", "seed"] => Ok(config
            .lessons
            .seed
            .map(|seed| seed.to_string())
            .unwrap_or_else(|| "<not set>".to_string())),
        _ => anyhow::bail!("Unknown config key: {}", key),
    }
}

fn set(key: &str, value: &str, quiet: bool) -> Result<()> {
    let mut config = Config::load()?;

    set_config_value(&mut config, key, value)?;
    config.save()?;

    print_success(&format!("Set {} = {}", key, value), quiet);
    Ok(())
}

fn set_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["appearance", "theme"] => {
            config.appearance.theme = ThemePreset::from_key(value).ok_or_else(|| {
                let known: Vec<&str> = ThemePreset::all().iter().map(|p| p.key()).collect();
                anyhow::anyhow!("Unknown theme '{}', expected one of: {}", value, known.join(", "))
            })?;
        }
        ["appearance", "reduce_motion"] => {
            config.appearance.reduce_motion = value.parse()?;
        }
        ["lessons", "popup_duration_ms"] => {
            config.lessons.popup_duration_ms = value.parse()?;
        }
        ["lessons", "show_intro"] => {
            config.lessons.show_intro = value.parse()?;
        }
        ["lessons", "seed"] => {
            config.lessons.seed = match value {
                "none" | "" => None,
                seed => Some(seed.parse()?),
            };
        }
        _ => anyhow::bail!("Unknown config key: {}", key),
    }

    Ok(())
}

fn path(format: OutputFormat) -> Result<()> {
    let path = Config::config_path()?;
    let exists = path.exists();

    let result = ConfigPathResult {
        path: path.to_string_lossy().to_string(),
        exists,
    };

    print_formatted(&result, format, |r| {
        format!("{}{}", r.path, if r.exists { "" } else { " (not found)" })
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_known_keys() {
        let config = Config::default();
        assert_eq!(get_config_value(&config, "appearance.theme").unwrap(), "cosmic");
        assert_eq!(get_config_value(&config, "lessons.popup_duration_ms").unwrap(), "3500");
        assert_eq!(get_config_value(&config, "lessons.seed").unwrap(), "<not set>");
        assert!(get_config_value(&config, "lessons").is_err());
    }

    #[test]
    fn test_set_values() {
        let mut config = Config::default();
        set_config_value(&mut config, "appearance.theme", "green").unwrap();
        set_config_value(&mut config, "lessons.show_intro", "false").unwrap();
        set_config_value(&mut config, "lessons.seed", "99").unwrap();
        assert_eq!(config.appearance.theme, ThemePreset::Green);
        assert!(!config.lessons.show_intro);
        assert_eq!(config.lessons.seed, Some(99));

        set_config_value(&mut config, "lessons.seed", "none").unwrap();
        assert_eq!(config.lessons.seed, None);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(set_config_value(&mut config, "appearance.theme", "neon").is_err());
        assert!(set_config_value(&mut config, "lessons.popup_duration_ms", "soon").is_err());
        assert!(set_config_value(&mut config, "lessons.colour", "red").is_err());
        assert_eq!(config, Config::default());
    }
}
