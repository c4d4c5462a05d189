//! Configuration management for sandbox.
//!
//! This crate provides configuration loading, saving, and validation
//! with support for TOML format and XDG directory conventions.

mod settings;
mod xdg;

pub use settings::{
    Config, ConsoleSettings, EditorSettings, EvaluatorSettings, GeneralSettings, LayoutSettings,
    LoggingSettings,
};
pub use xdg::{get_cache_dir, get_config_dir};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Default values as constants
pub mod defaults {
    pub const THEME_NAME: &str = "tomorrow-night-eighties";
    pub const TAB_SIZE: usize = 2;
    pub const SHOW_LINE_NUMBERS: bool = true;
    pub const DIVIDER_SYMBOL: &str = "│";
    pub const INTERPRETER: &str = "node";
    pub const EVAL_TIMEOUT_MS: u64 = 2000;
    pub const EVAL_DEBOUNCE_MS: u64 = 300;
    pub const CONSOLE_MAX_ENTRIES: usize = 500;
    pub const MIN_LOG_LEVEL: &str = "info";
}

/// Runtime constants that are not user-configurable.
pub mod constants {
    /// Event poll interval (tick rate), in milliseconds
    pub const EVENT_HANDLER_INTERVAL_MS: u64 = 50;
    /// Diagnostic log entries kept in memory
    pub const MAX_LOG_ENTRIES: usize = 1000;
    /// Log file name inside the cache directory
    pub const LOG_FILE_NAME: &str = "sandbox.log";
}

impl Config {
    /// Load configuration from the XDG config directory.
    ///
    /// On first run, creates the config file with default values.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        let config = Self::load_from(&config_path)?;
        Self::ensure_themes_dir()?;
        Ok(config)
    }

    /// Load configuration from `path`.
    ///
    /// Missing keys are filled with defaults and the normalized file is
    /// written back. A missing file is created with defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let original_content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&original_content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        let normalized_content = toml::to_string_pretty(&config)?;
        if original_content != normalized_content {
            config.save_to(path)?;
        }

        Ok(config)
    }

    /// Save configuration to the XDG config file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Get path to config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(get_config_dir()?.join("config.toml"))
    }

    /// Get path to themes directory.
    pub fn get_themes_dir() -> Result<PathBuf> {
        Ok(get_config_dir()?.join("themes"))
    }

    /// Default log file path.
    pub fn default_log_path() -> Result<PathBuf> {
        Ok(get_cache_dir()?.join(constants::LOG_FILE_NAME))
    }

    /// Validate config content.
    pub fn validate_content(content: &str) -> Result<Config> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("{}", e))
    }

    fn ensure_themes_dir() -> Result<()> {
        let themes_dir = Self::get_themes_dir()?;
        if !themes_dir.exists() {
            std::fs::create_dir_all(themes_dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sandbox_core::Language;

    #[test]
    fn test_first_load_creates_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
        assert_eq!(config.evaluator.interpreter, "node");
        assert_eq!(config.general.language, Language::JavaScript);
    }

    #[test]
    fn test_partial_file_is_completed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[general]\ntheme = \"nord\"\nlanguage = \"typescript\"\n\n[evaluator]\ntimeout_ms = 500\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.general.theme, "nord");
        assert_eq!(config.general.language, Language::TypeScript);
        assert_eq!(config.evaluator.timeout_ms, 500);
        assert_eq!(config.evaluator.debounce_ms, defaults::EVAL_DEBOUNCE_MS);

        let rewritten = std::fs::read_to_string(&path).unwrap();
        assert!(rewritten.contains("debounce_ms"));
        assert!(rewritten.contains("[console]"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[general]\nlanguage = \"cobol\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_save_roundtrip_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.layout.divider_symbol = "┃".to_string();
        config.evaluator.interpreter_args = vec!["--no-warnings".to_string()];
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_validate_content() {
        assert!(Config::validate_content("[editor]\ntab_size = 4\n").is_ok());
        assert!(Config::validate_content("[editor]\ntab_size = \"four\"\n").is_err());
    }
}
