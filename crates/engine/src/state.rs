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

//! Application state and its reducer.
//!
//! Everything a front end shows (buffer, markers, breakpoints, debug session,
//! chat history) lives in one [`Workspace`]. Front ends never mutate it field
//! by field; they dispatch an [`Action`] and receive the next state together
//! with an [`Outcome`] describing what happened.

use crate::{
    breakpoints::BreakpointSet,
    debugger::{DebugSession, StartOutcome, StepOutcome},
    surface::EditorSurface,
    validate::DelimiterValidator,
};
use codepad_common::{ChatMessage, Language, SourceBuffer, ValidationMarker};
use std::path::PathBuf;
use tracing::{debug, info};

/// The file currently shown in the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenFile {
    /// Node id in the project
    pub id: String,
    /// Path on disk
    pub path: PathBuf,
    /// Whether the buffer differs from what was last saved
    pub dirty: bool,
}

/// A state transition request.
#[derive(Debug, Clone)]
pub enum Action {
    /// Switch the buffer language
    SelectLanguage(Language),
    /// The user edited the buffer
    ContentChanged(SourceBuffer),
    /// Markers reported by an external checker, replacing the current ones
    Validated(Vec<ValidationMarker>),
    /// Flip a breakpoint
    ToggleBreakpoint(usize),
    /// Begin a simulated run
    StartDebugging,
    /// Advance the simulated run
    Step,
    /// End the simulated run
    StopDebugging,
    /// Replace the whole buffer, e.g. with accepted AI output
    ReplaceContent(String),
    /// Append a chat message
    PushChat(ChatMessage),
    /// Load a file into the editor
    OpenFile {
        /// Node id in the project
        id: String,
        /// Path on disk
        path: PathBuf,
        /// File text
        content: String,
    },
    /// The open file was written to disk
    Saved,
}

/// What an [`Action`] did, for callers that need more than the new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing worth reporting
    Applied,
    /// A breakpoint was toggled
    Breakpoint {
        /// Toggled line
        line: usize,
        /// Whether it is set afterwards
        present: bool,
    },
    /// Result of a start request
    Started(StartOutcome),
    /// Result of a step request
    Stepped(StepOutcome),
}

/// Authoritative editor state.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    language: Language,
    buffer: SourceBuffer,
    markers: Vec<ValidationMarker>,
    breakpoints: BreakpointSet,
    session: DebugSession,
    chat: Vec<ChatMessage>,
    open_file: Option<OpenFile>,
    revision: u64,
}

impl Workspace {
    /// An empty workspace for `language`.
    pub fn new(language: Language) -> Self {
        Self { language, buffer: SourceBuffer::from_text(""), ..Default::default() }
    }

    /// A workspace holding `text`, already validated.
    pub fn with_content(language: Language, text: &str) -> Self {
        let mut workspace = Self::new(language);
        workspace.buffer = SourceBuffer::from_text(text);
        workspace.revalidate();
        workspace
    }

    /// Apply `action`, consuming the current state.
    pub fn apply(mut self, action: Action, surface: &mut dyn EditorSurface) -> (Self, Outcome) {
        let outcome = match action {
            Action::SelectLanguage(language) => {
                debug!(%language, "Language selected");
                self.language = language;
                self.revalidate();
                Outcome::Applied
            }
            Action::ContentChanged(buffer) => {
                self.buffer = buffer;
                self.revalidate();
                if let Some(file) = self.open_file.as_mut() {
                    file.dirty = true;
                }
                Outcome::Applied
            }
            Action::Validated(markers) => {
                self.markers = markers;
                Outcome::Applied
            }
            Action::ToggleBreakpoint(line) => {
                let present = self.breakpoints.toggle(line, surface);
                Outcome::Breakpoint { line, present }
            }
            Action::StartDebugging => Outcome::Started(self.session.start(
                &self.buffer,
                self.language,
                &self.markers,
                &self.breakpoints,
                surface,
            )),
            Action::Step => Outcome::Stepped(self.session.step(&self.breakpoints, surface)),
            Action::StopDebugging => {
                self.session.stop(surface);
                Outcome::Applied
            }
            Action::ReplaceContent(text) => {
                info!(bytes = text.len(), "Replacing buffer content");
                self.buffer = SourceBuffer::from_text(&text);
                self.revalidate();
                self.revision += 1;
                if let Some(file) = self.open_file.as_mut() {
                    file.dirty = true;
                }
                Outcome::Applied
            }
            Action::PushChat(message) => {
                self.chat.push(message);
                Outcome::Applied
            }
            Action::OpenFile { id, path, content } => {
                info!(path = %path.display(), "Opening file");
                self.session.stop(surface);
                if let Some(name) = path.file_name() {
                    self.language = Language::from_file_name(&name.to_string_lossy());
                }
                self.buffer = SourceBuffer::from_text(&content);
                self.revalidate();
                self.revision += 1;
                self.open_file = Some(OpenFile { id, path, dirty: false });
                self.breakpoints.decorate(surface);
                Outcome::Applied
            }
            Action::Saved => {
                if let Some(file) = self.open_file.as_mut() {
                    file.dirty = false;
                }
                Outcome::Applied
            }
        };

        (self, outcome)
    }

    fn revalidate(&mut self) {
        self.markers = DelimiterValidator::new().validate(&self.buffer, self.language);
    }

    /// Selected language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Current buffer.
    pub fn buffer(&self) -> &SourceBuffer {
        &self.buffer
    }

    /// Current validation markers.
    pub fn markers(&self) -> &[ValidationMarker] {
        &self.markers
    }

    /// Breakpoints.
    pub fn breakpoints(&self) -> &BreakpointSet {
        &self.breakpoints
    }

    /// The simulated run.
    pub fn session(&self) -> &DebugSession {
        &self.session
    }

    /// Chat history, oldest first.
    pub fn chat(&self) -> &[ChatMessage] {
        &self.chat
    }

    /// Most recent assistant reply that carries code.
    pub fn last_code_reply(&self) -> Option<&ChatMessage> {
        self.chat.iter().rev().find(|m| m.is_code_reply())
    }

    /// File shown in the editor, if any.
    pub fn open_file(&self) -> Option<&OpenFile> {
        self.open_file.as_ref()
    }

    /// Bumped whenever the buffer is replaced from outside the editor, so
    /// the editor knows to reload its text.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
