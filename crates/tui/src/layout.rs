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

//! Adaptive layout management
//!
//! This module handles responsive layout switching based on terminal size
//! and computes where each panel goes.

use crate::panels::PanelType;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Layout types for different terminal sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutType {
    /// Files | editor | chat over debug (≥120 columns)
    Full,
    /// Editor over debug with chat beside (80-119 columns)
    Compact,
    /// Single panel mode with F-key switching (<80 columns)
    Mobile,
}

/// Where each panel is drawn; `None` when hidden
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutAreas {
    /// Status line
    pub status: Rect,
    /// Files panel
    pub files: Option<Rect>,
    /// Editor panel
    pub editor: Option<Rect>,
    /// Debug panel
    pub debug: Option<Rect>,
    /// Chat panel
    pub chat: Option<Rect>,
}

impl LayoutAreas {
    /// Area of `panel`, if visible
    pub fn get(&self, panel: PanelType) -> Option<Rect> {
        match panel {
            PanelType::Files => self.files,
            PanelType::Editor => self.editor,
            PanelType::Debug => self.debug,
            PanelType::Chat => self.chat,
        }
    }
}

/// Layout manager for responsive design
#[derive(Debug)]
pub struct LayoutManager {
    current_layout: LayoutType,
    terminal_width: u16,
    terminal_height: u16,
}

impl LayoutManager {
    /// Create a new layout manager with default values
    pub fn new() -> Self {
        Self { current_layout: LayoutType::Full, terminal_width: 80, terminal_height: 24 }
    }

    /// Update terminal dimensions and recalculate layout
    pub fn update_size(&mut self, width: u16, height: u16) {
        self.terminal_width = width;
        self.terminal_height = height;
        self.current_layout = self.calculate_layout_type();
    }

    fn calculate_layout_type(&self) -> LayoutType {
        if self.terminal_width >= 120 {
            LayoutType::Full
        } else if self.terminal_width >= 80 {
            LayoutType::Compact
        } else {
            LayoutType::Mobile
        }
    }

    /// Get current layout type
    pub fn layout_type(&self) -> LayoutType {
        self.current_layout
    }

    /// Get current terminal width
    pub fn width(&self) -> u16 {
        self.terminal_width
    }

    /// Get current terminal height
    pub fn height(&self) -> u16 {
        self.terminal_height
    }

    /// Check if current layout supports multiple visible panels
    pub fn supports_multiple_panels(&self) -> bool {
        matches!(self.current_layout, LayoutType::Full | LayoutType::Compact)
    }

    /// Get minimum width for this layout type
    pub fn min_width_for_layout(layout: LayoutType) -> u16 {
        match layout {
            LayoutType::Full => 120,
            LayoutType::Compact => 80,
            LayoutType::Mobile => 1,
        }
    }

    /// Panels drawn while `focused` has focus, in Tab order
    ///
    /// The compact layout shares one slot between files and editor; it shows
    /// the file tree only while the tree is focused.
    pub fn visible_panels(&self, focused: PanelType) -> Vec<PanelType> {
        match self.current_layout {
            LayoutType::Full => {
                vec![PanelType::Files, PanelType::Editor, PanelType::Chat, PanelType::Debug]
            }
            LayoutType::Compact => {
                let main =
                    if focused == PanelType::Files { PanelType::Files } else { PanelType::Editor };
                vec![main, PanelType::Debug, PanelType::Chat]
            }
            LayoutType::Mobile => vec![focused],
        }
    }

    /// Split `area` for the current layout type
    pub fn split(&self, area: Rect, focused: PanelType) -> LayoutAreas {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Fill(1)])
            .split(area);
        let mut areas = LayoutAreas { status: rows[0], ..Default::default() };
        let body = rows[1];

        match self.current_layout {
            LayoutType::Full => {
                let main = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
                    .split(body);
                let top = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([
                        Constraint::Percentage(20),
                        Constraint::Percentage(50),
                        Constraint::Percentage(30),
                    ])
                    .split(main[0]);
                areas.files = Some(top[0]);
                areas.editor = Some(top[1]);
                areas.chat = Some(top[2]);
                areas.debug = Some(main[1]);
            }
            LayoutType::Compact => {
                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                    .split(body);
                let left = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                    .split(columns[0]);
                if focused == PanelType::Files {
                    areas.files = Some(left[0]);
                } else {
                    areas.editor = Some(left[0]);
                }
                areas.debug = Some(left[1]);
                areas.chat = Some(columns[1]);
            }
            LayoutType::Mobile => match focused {
                PanelType::Files => areas.files = Some(body),
                PanelType::Editor => areas.editor = Some(body),
                PanelType::Debug => areas.debug = Some(body),
                PanelType::Chat => areas.chat = Some(body),
            },
        }

        areas
    }
}

impl Default for LayoutManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_calculation() {
        let mut manager = LayoutManager::new();

        manager.update_size(120, 30);
        assert_eq!(manager.layout_type(), LayoutType::Full);

        manager.update_size(100, 30);
        assert_eq!(manager.layout_type(), LayoutType::Compact);

        manager.update_size(60, 20);
        assert_eq!(manager.layout_type(), LayoutType::Mobile);
    }

    #[test]
    fn test_multiple_panels_support() {
        let mut manager = LayoutManager::new();

        manager.update_size(120, 30);
        assert!(manager.supports_multiple_panels());

        manager.update_size(100, 30);
        assert!(manager.supports_multiple_panels());

        manager.update_size(60, 20);
        assert!(!manager.supports_multiple_panels());
    }

    #[test]
    fn test_min_widths() {
        assert_eq!(LayoutManager::min_width_for_layout(LayoutType::Full), 120);
        assert_eq!(LayoutManager::min_width_for_layout(LayoutType::Compact), 80);
        assert_eq!(LayoutManager::min_width_for_layout(LayoutType::Mobile), 1);
    }

    #[test]
    fn test_full_split_shows_every_panel() {
        let mut manager = LayoutManager::new();
        manager.update_size(150, 40);
        let areas = manager.split(Rect::new(0, 0, 150, 40), PanelType::Editor);

        assert_eq!(areas.status.height, 1);
        let files = areas.files.unwrap();
        let editor = areas.editor.unwrap();
        let chat = areas.chat.unwrap();
        let debug = areas.debug.unwrap();
        assert!(files.x < editor.x && editor.x < chat.x);
        assert_eq!(debug.width, 150);
        assert!(debug.y > editor.y);
    }

    #[test]
    fn test_compact_split_shares_main_slot() {
        let mut manager = LayoutManager::new();
        manager.update_size(100, 30);
        let area = Rect::new(0, 0, 100, 30);

        let areas = manager.split(area, PanelType::Chat);
        assert!(areas.files.is_none());
        assert!(areas.editor.is_some());
        assert_eq!(
            manager.visible_panels(PanelType::Chat),
            vec![PanelType::Editor, PanelType::Debug, PanelType::Chat]
        );

        let areas = manager.split(area, PanelType::Files);
        assert_eq!(areas.files, manager.split(area, PanelType::Editor).editor);
        assert!(areas.editor.is_none());
    }

    #[test]
    fn test_mobile_split_shows_focused_only() {
        let mut manager = LayoutManager::new();
        manager.update_size(60, 20);
        let areas = manager.split(Rect::new(0, 0, 60, 20), PanelType::Debug);

        assert_eq!(areas.debug, Some(Rect::new(0, 1, 60, 19)));
        assert!(areas.files.is_none() && areas.editor.is_none() && areas.chat.is_none());
        assert_eq!(manager.visible_panels(PanelType::Debug), vec![PanelType::Debug]);
    }
}
