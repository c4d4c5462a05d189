//! Theme system for sandbox.
//!
//! Built-in themes are embedded TOML files; user themes are read from the
//! themes directory and take precedence over built-ins of the same name.

mod colors;
mod loader;

pub use colors::Theme;
pub use loader::{load_theme, load_theme_from_str};

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

/// Theme used when nothing else is configured.
pub const DEFAULT_THEME: &str = "tomorrow-night-eighties";

// Embedded at compile time, in selector order
const BUILTIN_THEMES: &[(&str, &str)] = &[
    ("vs-dark", include_str!("../themes/vs-dark.toml")),
    ("vs-light", include_str!("../themes/vs-light.toml")),
    ("hc-black", include_str!("../themes/hc-black.toml")),
    (
        "tomorrow-night-eighties",
        include_str!("../themes/tomorrow-night-eighties.toml"),
    ),
    ("monokai", include_str!("../themes/monokai.toml")),
    ("dracula", include_str!("../themes/dracula.toml")),
    ("nord", include_str!("../themes/nord.toml")),
    ("solarized-dark", include_str!("../themes/solarized-dark.toml")),
];

static BUILTIN: OnceLock<Vec<Theme>> = OnceLock::new();

// Cache for user-loaded themes
static USER_THEMES: OnceLock<Mutex<HashMap<String, &'static Theme>>> = OnceLock::new();

// Themes directory path (set by app on startup)
static THEMES_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Set the themes directory path (call this at app startup).
pub fn set_themes_dir(path: PathBuf) {
    let _ = THEMES_DIR.set(path);
}

/// Hardcoded fallback in case an embedded theme fails to parse.
fn fallback_theme(name: &'static str) -> Theme {
    Theme {
        name,
        bg: Color::Black,
        fg: Color::White,
        accented_bg: Color::DarkGray,
        accented_fg: Color::Cyan,
        selected_bg: Color::Blue,
        selected_fg: Color::White,
        disabled: Color::Gray,
        success: Color::Green,
        warning: Color::Yellow,
        error: Color::Red,
    }
}

fn builtin_themes() -> &'static [Theme] {
    BUILTIN.get_or_init(|| {
        BUILTIN_THEMES
            .iter()
            .map(|&(name, content)| {
                loader::load_theme_from_str(content, name).unwrap_or_else(|e| {
                    eprintln!(
                        "Failed to parse built-in theme '{}': {}. Using fallback theme.",
                        name, e
                    );
                    fallback_theme(name)
                })
            })
            .collect()
    })
}

fn find_builtin(name: &str) -> Option<&'static Theme> {
    builtin_themes().iter().find(|t| t.name == name)
}

/// Try to load user theme from the themes directory.
fn try_load_user_theme(name: &str) -> Option<&'static Theme> {
    let cache = USER_THEMES.get_or_init(|| Mutex::new(HashMap::new()));

    {
        let cache_lock = cache.lock().ok()?;
        if let Some(theme) = cache_lock.get(name) {
            return Some(*theme);
        }
    }

    let theme_path = THEMES_DIR.get()?.join(format!("{}.toml", name));
    if !theme_path.exists() {
        return None;
    }
    let theme = load_theme(&theme_path).ok()?;
    let static_theme: &'static Theme = Box::leak(Box::new(theme));

    if let Ok(mut cache_lock) = cache.lock() {
        cache_lock.insert(name.to_string(), static_theme);
    }
    Some(static_theme)
}

impl Theme {
    /// Get theme by name.
    ///
    /// User themes first, then built-ins, then the default theme.
    pub fn get_by_name(name: &str) -> &'static Theme {
        if let Some(theme) = try_load_user_theme(name) {
            return theme;
        }
        find_builtin(name)
            .or_else(|| find_builtin(DEFAULT_THEME))
            .unwrap_or(&builtin_themes()[0])
    }

    /// Names of the built-in themes in selector order.
    pub fn all_theme_names() -> Vec<&'static str> {
        BUILTIN_THEMES.iter().map(|&(name, _)| name).collect()
    }

    /// Name of the theme after `name` in selector order, wrapping around.
    pub fn next_name(name: &str) -> &'static str {
        let names = Self::all_theme_names();
        let idx = names.iter().position(|n| *n == name);
        match idx {
            Some(i) => names[(i + 1) % names.len()],
            None => names[0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_themes_parse() {
        for name in Theme::all_theme_names() {
            let theme = Theme::get_by_name(name);
            assert_eq!(theme.name, name);
            assert_ne!(*theme, fallback_theme(name), "{} fell back", name);
        }
    }

    #[test]
    fn test_unknown_theme_falls_back_to_default() {
        assert_eq!(Theme::get_by_name("nonexistent").name, DEFAULT_THEME);
        assert_eq!(Theme::default().name, DEFAULT_THEME);
    }

    #[test]
    fn test_next_name_cycles() {
        let names = Theme::all_theme_names();
        assert_eq!(Theme::next_name(names[0]), names[1]);
        assert_eq!(Theme::next_name(names[names.len() - 1]), names[0]);
        assert_eq!(Theme::next_name("nonexistent"), names[0]);
    }
}
