// Codepad - Terminal Code Editor
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Configuration system for Codepad
//!
//! User preferences live in `~/.codepad.toml` (or wherever `CODEPAD_CONFIG`
//! points). Missing sections and keys fall back to defaults, so a file may
//! hold only the settings the user cares about.

use codepad_common::{env::CODEPAD_CONFIG, Language};
use codepad_engine::AiConfig;
use eyre::{Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// AI endpoint settings
    pub ai: AiConfig,
    /// Editor behaviour
    pub editor: EditorConfig,
    /// Current theme configuration
    pub theme: ThemeConfig,
}

/// Editor settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Show line numbers in the gutter
    pub show_line_numbers: bool,
    /// Spaces inserted for Tab in insert mode
    pub tab_width: usize,
    /// Language used for buffers that are not backed by a file
    pub default_language: Language,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self { show_line_numbers: true, tab_width: 4, default_language: Language::JavaScript }
    }
}

/// Theme configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Current active theme name
    pub active: String,
    /// Available themes
    pub themes: HashMap<String, Theme>,
}

/// Individual theme definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Theme display name
    pub name: String,
    /// Theme description
    pub description: String,
    /// Color scheme for different UI elements
    pub colors: ColorScheme,
}

/// Color scheme definition, stored as color names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScheme {
    /// Focused panel border color
    pub focused_border: String,
    /// Unfocused panel border color
    pub unfocused_border: String,
    /// Selected item background
    pub selected_bg: String,
    /// Selected item foreground
    pub selected_fg: String,
    /// Background of the line the simulated run is on
    pub execution_bg: String,
    /// Breakpoint marker color
    pub breakpoint: String,
    /// Line number color
    pub line_number: String,
    /// Keyword color
    pub keyword: String,
    /// String literal color
    pub string: String,
    /// Number literal color
    pub number: String,
    /// Comment color
    pub comment: String,
    /// Help text color
    pub help_text: String,
    /// Success/positive color
    pub success: String,
    /// Error/negative color
    pub error: String,
    /// Warning color
    pub warning: String,
    /// Information color
    pub info: String,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            focused_border: "cyan".to_string(),
            unfocused_border: "gray".to_string(),
            selected_bg: "blue".to_string(),
            selected_fg: "white".to_string(),
            execution_bg: "dark_gray".to_string(),
            breakpoint: "red".to_string(),
            line_number: "dark_gray".to_string(),
            keyword: "magenta".to_string(),
            string: "green".to_string(),
            number: "light_yellow".to_string(),
            comment: "dark_gray".to_string(),
            help_text: "yellow".to_string(),
            success: "green".to_string(),
            error: "red".to_string(),
            warning: "yellow".to_string(),
            info: "cyan".to_string(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        let mut themes = HashMap::new();

        themes.insert(
            "default".to_string(),
            Theme {
                name: "Default".to_string(),
                description: "Default Codepad theme with cyan accents".to_string(),
                colors: ColorScheme::default(),
            },
        );

        themes.insert(
            "dark".to_string(),
            Theme {
                name: "Dark".to_string(),
                description: "Dark theme with minimal colors".to_string(),
                colors: ColorScheme {
                    focused_border: "white".to_string(),
                    unfocused_border: "dark_gray".to_string(),
                    selected_bg: "dark_gray".to_string(),
                    execution_bg: "black".to_string(),
                    keyword: "white".to_string(),
                    string: "gray".to_string(),
                    number: "gray".to_string(),
                    help_text: "gray".to_string(),
                    info: "white".to_string(),
                    ..ColorScheme::default()
                },
            },
        );

        themes.insert(
            "light".to_string(),
            Theme {
                name: "Light".to_string(),
                description: "Light theme with dark text on light backgrounds".to_string(),
                colors: ColorScheme {
                    focused_border: "blue".to_string(),
                    selected_bg: "light_blue".to_string(),
                    selected_fg: "black".to_string(),
                    execution_bg: "light_yellow".to_string(),
                    line_number: "gray".to_string(),
                    keyword: "blue".to_string(),
                    number: "magenta".to_string(),
                    comment: "gray".to_string(),
                    help_text: "dark_gray".to_string(),
                    info: "blue".to_string(),
                    ..ColorScheme::default()
                },
            },
        );

        themes.insert(
            "monokai".to_string(),
            Theme {
                name: "Monokai".to_string(),
                description: "Popular dark theme with vibrant colors".to_string(),
                colors: ColorScheme {
                    focused_border: "magenta".to_string(),
                    unfocused_border: "dark_gray".to_string(),
                    selected_bg: "magenta".to_string(),
                    selected_fg: "black".to_string(),
                    keyword: "light_red".to_string(),
                    string: "light_yellow".to_string(),
                    number: "light_magenta".to_string(),
                    help_text: "cyan".to_string(),
                    ..ColorScheme::default()
                },
            },
        );

        Self { active: "default".to_string(), themes }
    }
}

impl Config {
    /// Get the config file path: `$CODEPAD_CONFIG`, else `~/.codepad.toml`
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CODEPAD_CONFIG).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        let home =
            dirs::home_dir().ok_or_else(|| eyre::eyre!("Unable to determine home directory"))?;
        Ok(home.join(".codepad.toml"))
    }

    /// Load configuration from the default path, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from_path(Self::config_path()?)
    }

    /// Load configuration from `path`, creating a default file there if missing
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let config_path = path.as_ref();

        if !config_path.exists() {
            info!("Config file not found, creating default at {:?}", config_path);
            let default_config = Self::default();
            default_config.save_to_path(config_path)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {config_path:?}"))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file as TOML: {config_path:?}"))?;

        debug!("Loaded configuration from {:?}", config_path);
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to_path(Self::config_path()?)
    }

    /// Save configuration to `path`
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let config_path = path.as_ref();
        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config to TOML")?;

        fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {config_path:?}"))?;

        debug!("Saved configuration to {:?}", config_path);
        Ok(())
    }

    /// Get the currently active theme
    pub fn get_active_theme(&self) -> Option<&Theme> {
        self.theme.themes.get(&self.theme.active)
    }

    /// Colors of the active theme, or the defaults when the name is unknown
    pub fn colors(&self) -> ColorScheme {
        self.get_active_theme().map(|t| t.colors.clone()).unwrap_or_default()
    }

    /// Switch to a different theme
    pub fn set_theme(&mut self, theme_name: &str) -> Result<()> {
        if !self.theme.themes.contains_key(theme_name) {
            return Err(eyre::eyre!("Theme '{}' not found", theme_name));
        }

        self.theme.active = theme_name.to_string();
        info!("Switched to theme: {}", theme_name);
        Ok(())
    }

    /// List available themes, sorted by key
    pub fn list_themes(&self) -> Vec<(&String, &Theme)> {
        let mut themes: Vec<_> = self.theme.themes.iter().collect();
        themes.sort_by(|a, b| a.0.cmp(b.0));
        themes
    }

    /// Convert color string to ratatui Color
    pub fn parse_color(color_str: &str) -> Color {
        match color_str.to_lowercase().as_str() {
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "gray" | "light_gray" => Color::Gray,
            "dark_gray" => Color::DarkGray,
            "light_red" => Color::LightRed,
            "light_green" => Color::LightGreen,
            "light_yellow" => Color::LightYellow,
            "light_blue" => Color::LightBlue,
            "light_magenta" => Color::LightMagenta,
            "light_cyan" => Color::LightCyan,
            "white" => Color::White,
            _ => {
                warn!("Unknown color '{}', using default gray", color_str);
                Color::Gray
            }
        }
    }
}

impl ColorScheme {
    /// Get focused border color
    pub fn focused_border(&self) -> Color {
        Config::parse_color(&self.focused_border)
    }

    /// Get unfocused border color
    pub fn unfocused_border(&self) -> Color {
        Config::parse_color(&self.unfocused_border)
    }

    /// Get selected background color
    pub fn selected_bg(&self) -> Color {
        Config::parse_color(&self.selected_bg)
    }

    /// Get selected foreground color
    pub fn selected_fg(&self) -> Color {
        Config::parse_color(&self.selected_fg)
    }

    /// Get execution line background color
    pub fn execution_bg(&self) -> Color {
        Config::parse_color(&self.execution_bg)
    }

    /// Get breakpoint marker color
    pub fn breakpoint(&self) -> Color {
        Config::parse_color(&self.breakpoint)
    }

    /// Get line number color
    pub fn line_number(&self) -> Color {
        Config::parse_color(&self.line_number)
    }

    /// Get keyword color
    pub fn keyword(&self) -> Color {
        Config::parse_color(&self.keyword)
    }

    /// Get string literal color
    pub fn string(&self) -> Color {
        Config::parse_color(&self.string)
    }

    /// Get number literal color
    pub fn number(&self) -> Color {
        Config::parse_color(&self.number)
    }

    /// Get comment color
    pub fn comment(&self) -> Color {
        Config::parse_color(&self.comment)
    }

    /// Get help text color
    pub fn help_text(&self) -> Color {
        Config::parse_color(&self.help_text)
    }

    /// Get success color
    pub fn success(&self) -> Color {
        Config::parse_color(&self.success)
    }

    /// Get error color
    pub fn error(&self) -> Color {
        Config::parse_color(&self.error)
    }

    /// Get warning color
    pub fn warning(&self) -> Color {
        Config::parse_color(&self.warning)
    }

    /// Get info color
    pub fn info(&self) -> Color {
        Config::parse_color(&self.info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codepad_engine::AiProvider;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codepad.toml");

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let reloaded = Config::load_from_path(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codepad.toml");
        fs::write(
            &path,
            "[ai]\nprovider = \"gemini\"\nmodel = \"gemini-pro\"\n\n[editor]\ntab_width = 2\n",
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.ai.provider, AiProvider::Gemini);
        assert_eq!(config.ai.model(), "gemini-pro");
        assert_eq!(config.editor.tab_width, 2);
        assert!(config.editor.show_line_numbers);
        assert_eq!(config.theme.active, "default");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codepad.toml");
        fs::write(&path, "[editor\n").unwrap();
        assert!(Config::load_from_path(&path).is_err());
    }

    #[test]
    fn test_set_theme() {
        let mut config = Config::default();
        config.set_theme("monokai").unwrap();
        assert_eq!(config.colors().keyword(), Color::LightRed);
        assert!(config.set_theme("nope").is_err());
        assert_eq!(config.theme.active, "monokai");

        let names: Vec<&str> = config.list_themes().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["dark", "default", "light", "monokai"]);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(Config::parse_color("Dark_Gray"), Color::DarkGray);
        assert_eq!(Config::parse_color("light_gray"), Color::Gray);
        assert_eq!(Config::parse_color("chartreuse"), Color::Gray);
    }
}
