use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub colors: Colors,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

/// Colour names or `#rrggbb` values used by the calendar screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Colors {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    /// Period colour for tasks not yet done
    #[serde(default = "default_incomplete")]
    pub incomplete: String,
    /// Period colour for completed tasks
    #[serde(default = "default_complete")]
    pub complete: String,
    #[serde(default = "default_selected")]
    pub selected: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_new")]
    pub new: String,
    #[serde(default = "default_edit")]
    pub edit: String,
    #[serde(default = "default_delete")]
    pub delete: String,
    #[serde(default = "default_toggle_complete")]
    pub toggle_complete: String,
    #[serde(default = "default_prev_month")]
    pub prev_month: String,
    #[serde(default = "default_next_month")]
    pub next_month: String,
    #[serde(default = "default_today")]
    pub today: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_logout")]
    pub logout: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            log_level: default_log_level(),
            colors: Colors::default(),
            key_bindings: KeyBindings::default(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            incomplete: default_incomplete(),
            complete: default_complete(),
            selected: default_selected(),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            new: default_new(),
            edit: default_edit(),
            delete: default_delete(),
            toggle_complete: default_toggle_complete(),
            prev_month: default_prev_month(),
            next_month: default_next_month(),
            today: default_today(),
            help: default_help(),
            logout: default_logout(),
        }
    }
}

// Default value functions
fn default_database_path() -> String {
    Config::default_database_path_for_profile(utils::Profile::Prod)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "blue".to_string()
}

fn default_incomplete() -> String {
    "#50cebb".to_string()
}

fn default_complete() -> String {
    "#a9a9a9".to_string()
}

fn default_selected() -> String {
    "#00adf5".to_string()
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_new() -> String {
    "n".to_string()
}

fn default_edit() -> String {
    "e".to_string()
}

fn default_delete() -> String {
    "d".to_string()
}

fn default_toggle_complete() -> String {
    "Space".to_string()
}

fn default_prev_month() -> String {
    "[".to_string()
}

fn default_next_month() -> String {
    "]".to_string()
}

fn default_today() -> String {
    "t".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_logout() -> String {
    "Ctrl+l".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
}

impl Config {
    /// Load configuration for a profile, creating the default file if missing
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        Self::load_from_path(&config_path, profile)
    }

    /// Load configuration from an explicit file, creating it with defaults if missing.
    /// The database path always follows the profile.
    pub fn load_from_path(config_path: &Path, profile: utils::Profile) -> Result<Self, ConfigError> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)
                .map_err(|e| ConfigError::ReadError(e.to_string()))?;
            let mut config: Config = toml::from_str(&contents)?;
            config.database_path = Self::default_database_path_for_profile(profile);
            Ok(config)
        } else {
            let mut config = Config::default();
            config.database_path = Self::default_database_path_for_profile(profile);
            config.save_to_path(config_path)?;
            Ok(config)
        }
    }

    /// Write configuration to a file, creating parent directories
    pub fn save_to_path(&mut self, config_path: &Path) -> Result<(), ConfigError> {
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, toml_string).map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile)
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    fn default_database_path_for_profile(profile: utils::Profile) -> String {
        match utils::get_data_dir(profile) {
            Some(data_dir) => data_dir.join("tasks.db").to_string_lossy().to_string(),
            None => match profile {
                utils::Profile::Dev => "~/.local/share/warayaki-dev/tasks.db".to_string(),
                utils::Profile::Prod => "~/.local/share/warayaki/tasks.db".to_string(),
            },
        }
    }

    /// Get the expanded database path (with ~ expansion)
    pub fn get_database_path(&self) -> PathBuf {
        utils::expand_path(&self.database_path)
    }

    /// Directory log files are written to: next to the database
    pub fn get_log_dir(&self) -> PathBuf {
        let db_path = self.get_database_path();
        match db_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join("logs"),
            _ => PathBuf::from("logs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = toml::from_str("log_level = \"debug\"\n[colors]\ncomplete = \"gray\"\n").unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.colors.complete, "gray");
        assert_eq!(config.colors.incomplete, default_incomplete());
        assert_eq!(config.key_bindings.quit, "q");
    }

    #[test]
    fn load_from_path_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from_path(&path, utils::Profile::Dev).unwrap();
        assert!(path.exists());
        assert_eq!(config.config_version, Some(CURRENT_CONFIG_VERSION));

        let reloaded = Config::load_from_path(&path, utils::Profile::Dev).unwrap();
        assert_eq!(reloaded.key_bindings.new, config.key_bindings.new);
        assert_eq!(reloaded.database_path, config.database_path);
    }
}
