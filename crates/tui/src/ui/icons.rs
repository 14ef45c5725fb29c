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

//! Unicode icons and symbols used throughout the TUI

/// Collection of Unicode icons
#[derive(Debug, Clone)]
pub struct Icons;

impl Icons {
    // Status indicators
    /// Successful operations
    pub const SUCCESS: &'static str = "✔";
    /// Errors and failed operations
    pub const ERROR: &'static str = "✘";
    /// Warnings and validation markers
    pub const WARNING: &'static str = "⚠";
    /// Work in progress
    pub const PROCESSING: &'static str = "↻";

    // Editor gutter
    /// Breakpoint marker
    pub const BREAKPOINT: &'static str = "●";
    /// Line the simulated run is on
    pub const CURRENT_LINE: &'static str = "►";
    /// Gutter separator
    pub const GUTTER: &'static str = "│";

    // File tree
    /// Regular file
    pub const FILE: &'static str = "▤";
    /// Expanded folder
    pub const EXPANDED: &'static str = "▼";
    /// Collapsed folder
    pub const COLLAPSED: &'static str = "▶";
    /// Unsaved changes
    pub const MODIFIED: &'static str = "✎";

    // Chat
    /// User message prefix
    pub const USER: &'static str = "›";
    /// Assistant message prefix
    pub const ASSISTANT: &'static str = "✦";

    // Special characters
    /// Bullet point for lists
    pub const BULLET: &'static str = "•";
    /// Block cursor
    pub const CURSOR: &'static str = "█";
}
