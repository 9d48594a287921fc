use std::fs;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default)]
    pub colors: ThemeColors,
}

/// Hex colors; any field left out of a user theme keeps its default.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub revealed: String,
    pub answered: String,
    pub blank: String,
    pub cursor_bg: String,
    pub cursor_fg: String,
    pub incorrect: String,
    pub incorrect_bg: String,
    pub accent: String,
    pub dim: String,
    pub border: String,
    pub header_bg: String,
    pub header_fg: String,
    pub success: String,
}

impl Theme {
    /// `<config_dir>/recitalist/theme.toml` if present and valid, else the
    /// built-in palette.
    pub fn load() -> Self {
        let Some(path) = dirs::config_dir().map(|d| d.join("recitalist").join("theme.toml")) else {
            return Self::default();
        };
        let Ok(content) = fs::read_to_string(&path) else {
            return Self::default();
        };
        toml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "ignoring invalid theme");
            Self::default()
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1e1e2e".to_string(),
            fg: "#cdd6f4".to_string(),
            revealed: "#cdd6f4".to_string(),
            answered: "#a6e3a1".to_string(),
            blank: "#585b70".to_string(),
            cursor_bg: "#f5e0dc".to_string(),
            cursor_fg: "#1e1e2e".to_string(),
            incorrect: "#f38ba8".to_string(),
            incorrect_bg: "#45273a".to_string(),
            accent: "#89b4fa".to_string(),
            dim: "#6c7086".to_string(),
            border: "#45475a".to_string(),
            header_bg: "#313244".to_string(),
            header_fg: "#cdd6f4".to_string(),
            success: "#a6e3a1".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn revealed(&self) -> Color { Self::parse_color(&self.revealed) }
    pub fn answered(&self) -> Color { Self::parse_color(&self.answered) }
    pub fn blank(&self) -> Color { Self::parse_color(&self.blank) }
    pub fn cursor_bg(&self) -> Color { Self::parse_color(&self.cursor_bg) }
    pub fn cursor_fg(&self) -> Color { Self::parse_color(&self.cursor_fg) }
    pub fn incorrect(&self) -> Color { Self::parse_color(&self.incorrect) }
    pub fn incorrect_bg(&self) -> Color { Self::parse_color(&self.incorrect_bg) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn dim(&self) -> Color { Self::parse_color(&self.dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(ThemeColors::parse_color("#ff0080"), Color::Rgb(255, 0, 128));
        assert_eq!(ThemeColors::parse_color("nonsense"), Color::White);
    }

    #[test]
    fn test_partial_theme_keeps_defaults() {
        let theme: Theme = toml::from_str("[colors]\naccent = \"#000000\"\n").unwrap();
        assert_eq!(theme.colors.accent, "#000000");
        assert_eq!(theme.colors.bg, ThemeColors::default().bg);
    }
}
