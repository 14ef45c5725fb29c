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

//! Status line pieces
//!
//! Each piece knows its icon, color and text; [`StatusBar`] joins the pieces
//! that are present into a single line.

use crate::ui::icons::Icons;
use ratatui::style::Color;

/// State of the AI gateway as seen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiStatus {
    /// No request in flight
    Idle,
    /// Waiting for a reply
    Thinking,
    /// The last request failed
    Failed,
}

impl AiStatus {
    /// Icon for this status
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Idle => Icons::BULLET,
            Self::Thinking => Icons::PROCESSING,
            Self::Failed => Icons::ERROR,
        }
    }

    /// Color for this status
    pub fn color(&self) -> Color {
        match self {
            Self::Idle => Color::Gray,
            Self::Thinking => Color::Blue,
            Self::Failed => Color::Red,
        }
    }

    /// Icon, provider label and state
    pub fn display(&self, provider: &str) -> String {
        match self {
            Self::Idle => format!("{} AI: {provider}", self.icon()),
            Self::Thinking => format!("{} AI: {provider} thinking", self.icon()),
            Self::Failed => format!("{} AI: {provider} failed", self.icon()),
        }
    }
}

/// State of the simulated run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No run
    Idle,
    /// Paused on a line
    Paused(usize),
    /// The buffer has markers, so a run would be refused
    Blocked(usize),
}

impl SessionStatus {
    /// Icon for this status
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Idle => Icons::BULLET,
            Self::Paused(_) => Icons::CURRENT_LINE,
            Self::Blocked(_) => Icons::WARNING,
        }
    }

    /// Color for this status
    pub fn color(&self) -> Color {
        match self {
            Self::Idle => Color::Gray,
            Self::Paused(_) => Color::Green,
            Self::Blocked(_) => Color::Yellow,
        }
    }

    /// Formatted display text
    pub fn display(&self) -> String {
        match self {
            Self::Idle => format!("{} Ready", self.icon()),
            Self::Paused(line) => format!("{} Line {line}", self.icon()),
            Self::Blocked(1) => format!("{} 1 issue", self.icon()),
            Self::Blocked(n) => format!("{} {n} issues", self.icon()),
        }
    }
}

/// State of the buffer relative to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Matches the file on disk
    Saved,
    /// Has unsaved edits
    Modified,
    /// Not backed by a file
    Scratch,
}

impl FileStatus {
    /// Icon for this status
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Saved => Icons::FILE,
            Self::Modified => Icons::MODIFIED,
            Self::Scratch => Icons::BULLET,
        }
    }

    /// Color for this status
    pub fn color(&self) -> Color {
        match self {
            Self::Saved => Color::Green,
            Self::Modified => Color::Yellow,
            Self::Scratch => Color::Gray,
        }
    }

    /// Icon and file name
    pub fn display(&self, filename: &str) -> String {
        format!("{} {}", self.icon(), filename)
    }
}

/// Status line builder
#[derive(Debug, Default)]
pub struct StatusBar {
    file: Option<(FileStatus, String)>,
    session: Option<SessionStatus>,
    ai: Option<(AiStatus, String)>,
    current_panel: Option<String>,
    messages: Vec<String>,
}

impl StatusBar {
    /// Create an empty status line
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the file piece
    pub fn file(mut self, status: FileStatus, name: impl Into<String>) -> Self {
        self.file = Some((status, name.into()));
        self
    }

    /// Set the session piece
    pub fn session(mut self, status: SessionStatus) -> Self {
        self.session = Some(status);
        self
    }

    /// Set the AI piece
    pub fn ai(mut self, status: AiStatus, provider: impl Into<String>) -> Self {
        self.ai = Some((status, provider.into()));
        self
    }

    /// Set the focused panel name
    pub fn current_panel(mut self, panel: impl Into<String>) -> Self {
        self.current_panel = Some(panel.into());
        self
    }

    /// Add a free-form message
    pub fn message<S: Into<String>>(mut self, msg: S) -> Self {
        self.messages.push(msg.into());
        self
    }

    /// Join the pieces with `" | "`
    pub fn build(&self) -> String {
        let mut parts = Vec::new();

        if let Some((status, name)) = &self.file {
            parts.push(status.display(name));
        }
        if let Some(session) = self.session {
            parts.push(session.display());
        }
        if let Some((status, provider)) = &self.ai {
            parts.push(status.display(provider));
        }
        if let Some(panel) = &self.current_panel {
            parts.push(format!("Panel: {panel}"));
        }
        parts.extend(self.messages.iter().cloned());

        parts.join(" | ")
    }
}
