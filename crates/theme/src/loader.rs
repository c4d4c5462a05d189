//! Theme loading from TOML files.

use anyhow::{bail, Context, Result};
use ratatui::style::Color;
use serde::Deserialize;
use std::path::Path;

use crate::Theme;

/// Color representation in TOML: a named ANSI color, `#rrggbb`, or `{ rgb = [r, g, b] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TomlColor {
    Named(String),
    Rgb { rgb: [u8; 3] },
}

impl TomlColor {
    fn to_color(&self) -> Result<Color> {
        match self {
            TomlColor::Rgb { rgb } => Ok(Color::Rgb(rgb[0], rgb[1], rgb[2])),
            TomlColor::Named(name) => {
                if let Some(hex) = name.strip_prefix('#') {
                    return parse_hex(hex).with_context(|| format!("Invalid hex color: {}", name));
                }
                let color = match name.as_str() {
                    "Black" => Color::Black,
                    "Red" => Color::Red,
                    "Green" => Color::Green,
                    "Yellow" => Color::Yellow,
                    "Blue" => Color::Blue,
                    "Magenta" => Color::Magenta,
                    "Cyan" => Color::Cyan,
                    "Gray" => Color::Gray,
                    "DarkGray" => Color::DarkGray,
                    "LightRed" => Color::LightRed,
                    "LightGreen" => Color::LightGreen,
                    "LightYellow" => Color::LightYellow,
                    "LightBlue" => Color::LightBlue,
                    "LightMagenta" => Color::LightMagenta,
                    "LightCyan" => Color::LightCyan,
                    "White" => Color::White,
                    other => bail!("Unknown color name: {}", other),
                };
                Ok(color)
            }
        }
    }
}

fn parse_hex(hex: &str) -> Result<Color> {
    if hex.len() != 6 {
        bail!("expected 6 hex digits");
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
    Ok(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

#[derive(Debug, Clone, Deserialize)]
struct TomlColors {
    bg: TomlColor,
    fg: TomlColor,
    accented_bg: TomlColor,
    accented_fg: TomlColor,
    selected_bg: TomlColor,
    selected_fg: TomlColor,
    disabled: TomlColor,
    success: TomlColor,
    warning: TomlColor,
    error: TomlColor,
}

#[derive(Debug, Clone, Deserialize)]
struct TomlTheme {
    name: String,
    colors: TomlColors,
}

impl TomlTheme {
    fn into_theme(self, name: &'static str) -> Result<Theme> {
        let c = &self.colors;
        Ok(Theme {
            name,
            bg: c.bg.to_color()?,
            fg: c.fg.to_color()?,
            accented_bg: c.accented_bg.to_color()?,
            accented_fg: c.accented_fg.to_color()?,
            selected_bg: c.selected_bg.to_color()?,
            selected_fg: c.selected_fg.to_color()?,
            disabled: c.disabled.to_color()?,
            success: c.success.to_color()?,
            warning: c.warning.to_color()?,
            error: c.error.to_color()?,
        })
    }
}

/// Load theme from a TOML file.
///
/// The name string is leaked to get a `'static` lifetime; user themes are
/// loaded once and cached.
pub fn load_theme(path: &Path) -> Result<Theme> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read theme {}", path.display()))?;
    let toml_theme: TomlTheme = toml::from_str(&content)?;
    let name: &'static str = Box::leak(toml_theme.name.clone().into_boxed_str());
    toml_theme.into_theme(name)
}

/// Load theme from TOML string with a static name.
pub fn load_theme_from_str(content: &str, name: &'static str) -> Result<Theme> {
    let toml_theme: TomlTheme = toml::from_str(content)?;
    toml_theme.into_theme(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
name = "sample"

[colors]
bg = "#1e1e1e"
fg = "White"
accented_bg = { rgb = [1, 2, 3] }
accented_fg = "Cyan"
selected_bg = "Blue"
selected_fg = "White"
disabled = "DarkGray"
success = "Green"
warning = "Yellow"
error = "Red"
"##;

    #[test]
    fn test_load_theme_from_str() {
        let theme = load_theme_from_str(SAMPLE, "sample").unwrap();
        assert_eq!(theme.bg, Color::Rgb(0x1e, 0x1e, 0x1e));
        assert_eq!(theme.accented_bg, Color::Rgb(1, 2, 3));
        assert_eq!(theme.accented_fg, Color::Cyan);
    }

    #[test]
    fn test_unknown_color_is_an_error() {
        let broken = SAMPLE.replace("\"Cyan\"", "\"Chartreuse\"");
        assert!(load_theme_from_str(&broken, "broken").is_err());

        let bad_hex = SAMPLE.replace("#1e1e1e", "#12");
        assert!(load_theme_from_str(&bad_hex, "bad").is_err());
    }

    #[test]
    fn test_load_theme_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        let theme = load_theme(&path).unwrap();
        assert_eq!(theme.name, "sample");
    }
}
