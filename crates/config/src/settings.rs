//! Configuration structures for sandbox settings.

use sandbox_core::Language;
use serde::{Deserialize, Serialize};

use crate::defaults;

/// Application configuration with nested sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// General application settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// Editor settings
    #[serde(default)]
    pub editor: EditorSettings,

    /// Split layout settings
    #[serde(default)]
    pub layout: LayoutSettings,

    /// Evaluator settings
    #[serde(default)]
    pub evaluator: EvaluatorSettings,

    /// Console log settings
    #[serde(default)]
    pub console: ConsoleSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// General application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Selected theme name
    #[serde(default = "default_theme_name")]
    pub theme: String,

    /// Editor language at startup
    #[serde(default)]
    pub language: Language,
}

/// Editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Tab size (number of spaces)
    #[serde(default = "default_tab_size")]
    pub tab_size: usize,

    /// Show line numbers gutter
    #[serde(default = "default_show_line_numbers")]
    pub show_line_numbers: bool,
}

/// Split layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Glyph drawn for divider handles
    #[serde(default = "default_divider_symbol")]
    pub divider_symbol: String,
}

/// Evaluator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorSettings {
    /// Script interpreter executable (javascript and typescript)
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Extra arguments passed before the prelude
    #[serde(default)]
    pub interpreter_args: Vec<String>,

    /// Hard limit for one evaluation, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Quiet period after an edit before evaluating, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

/// Console log settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Maximum captured console entries kept
    #[serde(default = "default_console_max_entries")]
    pub max_entries: usize,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log file path (optional, defaults to the cache directory)
    #[serde(default)]
    pub file_path: Option<String>,

    /// Minimum log level (debug, info, warn, error)
    #[serde(default = "default_min_level")]
    pub min_level: String,
}

// Default value functions for serde
fn default_theme_name() -> String {
    defaults::THEME_NAME.to_string()
}

fn default_tab_size() -> usize {
    defaults::TAB_SIZE
}

fn default_show_line_numbers() -> bool {
    defaults::SHOW_LINE_NUMBERS
}

fn default_divider_symbol() -> String {
    defaults::DIVIDER_SYMBOL.to_string()
}

fn default_interpreter() -> String {
    defaults::INTERPRETER.to_string()
}

fn default_timeout_ms() -> u64 {
    defaults::EVAL_TIMEOUT_MS
}

fn default_debounce_ms() -> u64 {
    defaults::EVAL_DEBOUNCE_MS
}

fn default_console_max_entries() -> usize {
    defaults::CONSOLE_MAX_ENTRIES
}

fn default_min_level() -> String {
    defaults::MIN_LOG_LEVEL.to_string()
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
            language: Language::default(),
        }
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tab_size: default_tab_size(),
            show_line_numbers: default_show_line_numbers(),
        }
    }
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            divider_symbol: default_divider_symbol(),
        }
    }
}

impl Default for EvaluatorSettings {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            interpreter_args: Vec::new(),
            timeout_ms: default_timeout_ms(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            max_entries: default_console_max_entries(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file_path: None,
            min_level: default_min_level(),
        }
    }
}
