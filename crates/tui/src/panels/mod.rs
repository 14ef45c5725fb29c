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

//! Panel implementations for the TUI
//!
//! Panels render from a read-only [`ViewContext`] and never touch the
//! workspace themselves. A key press either stays inside the panel
//! (cursor movement, text input) or comes back as an [`EventResponse`]
//! that the app turns into a workspace action or a command.

use crate::config::{ColorScheme, EditorConfig};
use codepad_engine::{Action, Project, Workspace};
use crossterm::event::{KeyCode, KeyEvent};
use eyre::Result;
use ratatui::{layout::Rect, Frame};
use std::fmt::Debug;

/// Panel types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelType {
    /// Project file tree
    Files,
    /// Source editor
    Editor,
    /// Issues, debug output and variables
    Debug,
    /// AI chat
    Chat,
}

impl PanelType {
    /// Panel selected by F1-F4
    pub fn from_function_key(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Files),
            2 => Some(Self::Editor),
            3 => Some(Self::Debug),
            4 => Some(Self::Chat),
            _ => None,
        }
    }
}

/// Work the app performs on behalf of a panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Load a file node into the editor
    OpenNode(String),
    /// Create an empty file under a folder
    CreateFile {
        /// Folder node id
        parent_id: String,
        /// New file name
        name: String,
    },
    /// Create a folder under a folder
    CreateFolder {
        /// Folder node id
        parent_id: String,
        /// New folder name
        name: String,
    },
    /// Walk the project again
    RefreshProject,
    /// Write the buffer to the open file
    Save,
    /// Ask the AI to fix the first validation marker
    AiFix,
    /// Ask the AI to write code from a description
    AiGenerate(String),
    /// Ask the AI a question about the buffer
    AiAsk(String),
    /// Replace the buffer with the last code reply
    AcceptLastCode,
    /// Ask the AI to explain the last code reply
    ExplainLastCode,
}

/// Response from panel event handling
#[derive(Debug)]
pub enum EventResponse {
    /// Event was handled, no further action needed
    Handled,
    /// Event was not handled, pass to next handler
    NotHandled,
    /// Request focus change to another panel
    ChangeFocus(PanelType),
    /// Request application exit
    Exit,
    /// Apply an action to the workspace
    Dispatch(Action),
    /// Run a command
    Command(Command),
}

/// Everything a panel may read while rendering or handling a key
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    /// Authoritative editor state
    pub workspace: &'a Workspace,
    /// Open project, if any
    pub project: Option<&'a Project>,
    /// Active color scheme
    pub colors: &'a ColorScheme,
    /// Editor settings
    pub editor: &'a EditorConfig,
    /// Spinner text while an AI request is in flight, empty otherwise
    pub ai_activity: &'a str,
}

/// Trait for UI panels
pub trait PanelTr: Debug + Send {
    /// Get the panel type
    fn panel_type(&self) -> PanelType;

    /// Get panel title for display
    fn title(&self, ctx: &ViewContext<'_>) -> String;

    /// Render the panel content
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ctx: &ViewContext<'_>);

    /// Handle keyboard events
    fn handle_key_event(&mut self, event: KeyEvent, ctx: &ViewContext<'_>)
        -> Result<EventResponse>;

    /// Whether the panel wants `event` before global shortcuts see it,
    /// e.g. while the user is typing text
    fn captures_key(&self, event: &KeyEvent) -> bool {
        let _ = event;
        false
    }

    /// Called when this panel gains focus
    fn on_focus(&mut self) {}

    /// Called when this panel loses focus
    fn on_blur(&mut self) {}
}

/// True for keys that never belong to a text field
pub(crate) fn is_navigation_key(event: &KeyEvent) -> bool {
    matches!(event.code, KeyCode::F(_))
}

pub mod chat;
pub mod debug;
pub mod editor;
pub mod files;

pub use chat::ChatPanel;
pub use debug::DebugPanel;
pub use editor::{EditorMode, EditorPanel};
pub use files::FilesPanel;
