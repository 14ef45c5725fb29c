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

//! Panel borders
//!
//! Rounded borders by default, with the focused panel's title wrapped in a
//! matching corner ornament so focus is visible even without colors.

use crate::config::ColorScheme;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

/// Border styles for panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnhancedBorderStyle {
    /// Rounded corners
    Rounded,
    /// Double-line borders for emphasis
    Double,
}

/// Border builder for panels
#[derive(Debug, Clone)]
pub struct EnhancedBorder {
    style: EnhancedBorderStyle,
    focused: bool,
    title: Option<String>,
    focused_color: Color,
    unfocused_color: Color,
}

impl EnhancedBorder {
    /// Create a new border
    pub fn new(style: EnhancedBorderStyle) -> Self {
        Self {
            style,
            focused: false,
            title: None,
            focused_color: Color::Cyan,
            unfocused_color: Color::Gray,
        }
    }

    /// Create a rounded border
    pub fn rounded() -> Self {
        Self::new(EnhancedBorderStyle::Rounded)
    }

    /// Create a double-line border
    pub fn double() -> Self {
        Self::new(EnhancedBorderStyle::Double)
    }

    /// Set focus state
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Set border title
    pub fn title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Take both border colors from a color scheme
    pub fn colors(mut self, colors: &ColorScheme) -> Self {
        self.focused_color = colors.focused_border();
        self.unfocused_color = colors.unfocused_border();
        self
    }

    /// Build the Block widget
    pub fn build(self) -> Block<'static> {
        let (border_color, modifier) = if self.focused {
            (self.focused_color, Modifier::BOLD)
        } else {
            (self.unfocused_color, Modifier::empty())
        };

        let border_type = match self.style {
            EnhancedBorderStyle::Rounded => BorderType::Rounded,
            EnhancedBorderStyle::Double => BorderType::Double,
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(border_type)
            .border_style(Style::default().fg(border_color).add_modifier(modifier));

        if let Some(title) = self.title {
            let title = if self.focused {
                match self.style {
                    EnhancedBorderStyle::Rounded => format!("╭─ {title} ─╮"),
                    EnhancedBorderStyle::Double => format!("╔═ {title} ═╗"),
                }
            } else {
                title
            };
            block = block.title(title);
        }

        block
    }
}

/// Border presets per panel
pub struct BorderPresets;

impl BorderPresets {
    /// Editor border, double-line for emphasis
    pub fn editor(focused: bool, title: String, colors: &ColorScheme) -> Block<'static> {
        EnhancedBorder::double().focused(focused).title(title).colors(colors).build()
    }

    /// Border shared by the files, debug and chat panels
    pub fn side(focused: bool, title: String, colors: &ColorScheme) -> Block<'static> {
        EnhancedBorder::rounded().focused(focused).title(title).colors(colors).build()
    }
}
