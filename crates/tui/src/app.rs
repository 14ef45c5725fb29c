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

//! Main application state and logic
//!
//! The app owns the [`Workspace`] and is the only place it changes. Panels
//! hand back actions and commands; actions go straight through the
//! workspace reducer with the editor panel as the surface, commands do file
//! or AI work first. Slow work (AI requests, project walks) runs on tokio
//! tasks that report back through the jobs channel, so results are applied
//! on the event loop in arrival order.

use crate::config::{ColorScheme, Config};
use crate::layout::{LayoutAreas, LayoutManager, LayoutType};
use crate::panels::{
    ChatPanel, Command, DebugPanel, EditorPanel, EventResponse, FilesPanel, PanelTr, PanelType,
    ViewContext,
};
use crate::ui::{AiSpinner, AiStatus, FileStatus, SessionStatus, StatusBar};
use codepad_common::{ChatMessage, Language, MessageKind};
use codepad_engine::{
    contains_code_block, extract_code_block, Action, AiClient, AiError, AiRequest, Outcome,
    Project, ProjectError, StartOutcome, StepOutcome, Workspace,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use eyre::{bail, eyre, Result, WrapErr};
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::path::Path;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// What an AI request was sent for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiPurpose {
    /// Repair the buffer
    Fix,
    /// Write new code into the buffer
    Generate,
    /// Answer a chat question
    Ask,
    /// Explain a code reply
    Explain,
}

/// Result of background work, delivered to the event loop
#[derive(Debug)]
pub enum JobResult {
    /// An AI request finished
    Ai {
        /// Why it was sent
        purpose: AiPurpose,
        /// Reply text or failure
        result: Result<String, AiError>,
    },
    /// A project walk finished
    ProjectLoaded(Result<Project, ProjectError>),
}

/// Main application state
#[derive(Debug)]
pub struct App {
    config: Config,
    colors: ColorScheme,
    layout_manager: LayoutManager,
    /// Areas from the last render, for mouse hit tests
    last_areas: LayoutAreas,
    current_panel: PanelType,
    files: FilesPanel,
    editor: EditorPanel,
    debug: DebugPanel,
    chat: ChatPanel,
    workspace: Workspace,
    project: Option<Project>,
    ai: AiClient,
    spinner: AiSpinner,
    ai_status: AiStatus,
    /// AI requests still in flight
    pending_ai: usize,
    jobs_tx: UnboundedSender<JobResult>,
    status_message: Option<String>,
    should_exit: bool,
}

impl App {
    /// Create the app, opening `path` when given
    ///
    /// A directory becomes the project. A file opens its parent directory
    /// as the project and loads the file into the editor.
    pub fn new(
        config: Config,
        path: Option<&Path>,
        language: Option<Language>,
        jobs_tx: UnboundedSender<JobResult>,
    ) -> Result<Self> {
        let ai = AiClient::new(config.ai.clone()).wrap_err("Failed to create AI client")?;
        let default_language = language.unwrap_or(config.editor.default_language);

        let mut app = Self {
            colors: config.colors(),
            config,
            layout_manager: LayoutManager::new(),
            last_areas: LayoutAreas::default(),
            current_panel: PanelType::Editor,
            files: FilesPanel::new(),
            editor: EditorPanel::new(),
            debug: DebugPanel::new(),
            chat: ChatPanel::new(),
            workspace: Workspace::new(default_language),
            project: None,
            ai,
            spinner: AiSpinner::new(),
            ai_status: AiStatus::Idle,
            pending_ai: 0,
            jobs_tx,
            status_message: None,
            should_exit: false,
        };
        app.editor.sync(&app.workspace);

        if let Some(path) = path {
            app.open_path(path)?;
            if let Some(language) = language {
                app.dispatch(Action::SelectLanguage(language));
            }
        }
        app.update_panel_focus();
        Ok(app)
    }

    fn open_path(&mut self, path: &Path) -> Result<()> {
        if path.is_dir() {
            let project = Project::open(path)
                .wrap_err_with(|| format!("Failed to open project {}", path.display()))?;
            self.project = Some(project);
            self.current_panel = PanelType::Files;
        } else if path.is_file() {
            let file = path.canonicalize().wrap_err("Failed to resolve file path")?;
            let parent = file.parent().ok_or_else(|| eyre!("{} has no parent", file.display()))?;
            let project = Project::open(parent)
                .wrap_err_with(|| format!("Failed to open project {}", parent.display()))?;
            let id = project.find_by_path(&file).map(|n| n.id.clone());
            self.project = Some(project);
            match id {
                Some(id) => self.open_node(&id)?,
                None => bail!("{} is not part of its project tree", file.display()),
            }
        } else {
            bail!("{} does not exist", path.display());
        }
        Ok(())
    }

    /// Apply `action` to the workspace with the editor as surface
    pub fn dispatch(&mut self, action: Action) -> Outcome {
        let workspace = std::mem::take(&mut self.workspace);
        let (workspace, outcome) = workspace.apply(action, &mut self.editor);
        self.workspace = workspace;
        self.editor.sync(&self.workspace);
        self.report(outcome);
        outcome
    }

    fn report(&mut self, outcome: Outcome) {
        let message = match outcome {
            Outcome::Applied => return,
            Outcome::Breakpoint { line, present: true } => format!("Breakpoint set at line {line}"),
            Outcome::Breakpoint { line, present: false } => {
                format!("Breakpoint removed from line {line}")
            }
            Outcome::Started(StartOutcome::Started { line }) => format!("Paused at line {line}"),
            Outcome::Started(StartOutcome::RefusedDueToErrors { count }) => {
                format!("Cannot start: {count} issue(s) in buffer")
            }
            Outcome::Started(StartOutcome::AlreadyActive) => "Already debugging".to_string(),
            Outcome::Stepped(StepOutcome::Moved(line)) => format!("Paused at line {line}"),
            Outcome::Stepped(StepOutcome::Finished) => "Debugging finished".to_string(),
            Outcome::Stepped(StepOutcome::Inactive) => "No debug session".to_string(),
        };
        debug!(?outcome, "{message}");
        self.status_message = Some(message);
    }

    fn open_node(&mut self, id: &str) -> Result<()> {
        let Some(project) = self.project.as_ref() else {
            bail!("No project open");
        };
        let node = project.find(id).ok_or_else(|| ProjectError::UnknownNode(id.to_string()))?;
        let path = node.path.clone();
        let content = project.read_file(id)?;
        self.files.reveal(project, id);
        self.dispatch(Action::OpenFile { id: id.to_string(), path, content });
        self.change_focus(PanelType::Editor);
        Ok(())
    }

    fn run_command(&mut self, command: Command) -> Result<()> {
        debug!(?command, "Running command");
        match command {
            Command::OpenNode(id) => self.open_node(&id)?,
            Command::CreateFile { parent_id, name } => {
                let Some(project) = self.project.as_mut() else {
                    bail!("No project open");
                };
                let node = project.create_file(&parent_id, &name, "")?;
                self.status_message = Some(format!("Created {}", node.name));
                self.open_node(&node.id)?;
            }
            Command::CreateFolder { parent_id, name } => {
                let Some(project) = self.project.as_mut() else {
                    bail!("No project open");
                };
                let node = project.create_folder(&parent_id, &name)?;
                self.files.reveal(project, &node.id);
                self.status_message = Some(format!("Created folder {}", node.name));
            }
            Command::RefreshProject => {
                let Some(project) = self.project.clone() else {
                    bail!("No project open");
                };
                let tx = self.jobs_tx.clone();
                self.status_message = Some("Refreshing...".to_string());
                tokio::task::spawn_blocking(move || {
                    let mut project = project;
                    let result = project.refresh().map(|()| project);
                    if tx.send(JobResult::ProjectLoaded(result)).is_err() {
                        debug!("Event loop closed before refresh finished");
                    }
                });
            }
            Command::Save => self.save()?,
            Command::AiFix => {
                let Some(marker) = self.workspace.markers().first().cloned() else {
                    self.status_message = Some("No issues to fix".to_string());
                    return Ok(());
                };
                let request = AiRequest::Fix {
                    marker,
                    code: self.workspace.buffer().text(),
                    language: self.workspace.language(),
                };
                self.spawn_ai(AiPurpose::Fix, request);
            }
            Command::AiGenerate(prompt) => {
                let request = AiRequest::Generate { prompt, language: self.workspace.language() };
                self.spawn_ai(AiPurpose::Generate, request);
            }
            Command::AiAsk(question) => {
                self.dispatch(Action::PushChat(ChatMessage::user(question.clone())));
                let request = AiRequest::Ask {
                    question,
                    code: self.workspace.buffer().text(),
                    language: self.workspace.language(),
                };
                self.spawn_ai(AiPurpose::Ask, request);
            }
            Command::AcceptLastCode => {
                let Some(reply) = self.workspace.last_code_reply() else {
                    self.status_message = Some("No code reply to accept".to_string());
                    return Ok(());
                };
                let code = extract_code_block(&reply.content).to_string();
                self.dispatch(Action::ReplaceContent(code));
                self.status_message = Some("Accepted code from chat".to_string());
            }
            Command::ExplainLastCode => {
                let Some(reply) = self.workspace.last_code_reply() else {
                    self.status_message = Some("No code reply to explain".to_string());
                    return Ok(());
                };
                let code = extract_code_block(&reply.content).to_string();
                self.dispatch(Action::PushChat(ChatMessage::user("Explain it")));
                let request = AiRequest::Explain { code, language: self.workspace.language() };
                self.spawn_ai(AiPurpose::Explain, request);
            }
        }
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        let Some(open) = self.workspace.open_file().cloned() else {
            self.status_message = Some("Buffer is not backed by a file".to_string());
            return Ok(());
        };
        let Some(project) = self.project.as_ref() else {
            bail!("No project open");
        };
        project.write_file(&open.id, &self.workspace.buffer().text())?;
        self.dispatch(Action::Saved);
        info!(path = %open.path.display(), "Saved file");
        self.status_message = Some(format!("Saved {}", open.path.display()));
        Ok(())
    }

    fn spawn_ai(&mut self, purpose: AiPurpose, request: AiRequest) {
        info!(kind = request.kind(), "Sending AI request");
        let client = self.ai.clone();
        let tx = self.jobs_tx.clone();
        self.pending_ai += 1;
        self.ai_status = AiStatus::Thinking;
        self.spinner.start_loading("Thinking...");

        tokio::spawn(async move {
            let result = client.send(&request).await;
            if tx.send(JobResult::Ai { purpose, result }).is_err() {
                debug!("Event loop closed before AI reply arrived");
            }
        });
    }

    /// Apply the result of background work
    pub fn handle_job_result(&mut self, job: JobResult) {
        match job {
            JobResult::Ai { purpose, result } => {
                self.pending_ai = self.pending_ai.saturating_sub(1);
                if self.pending_ai == 0 {
                    self.spinner.finish_loading();
                }
                match result {
                    Ok(text) => {
                        self.ai_status = AiStatus::Idle;
                        self.apply_ai_reply(purpose, text);
                    }
                    Err(e) => {
                        warn!(?purpose, error = %e, "AI request failed");
                        self.ai_status = AiStatus::Failed;
                        let message = ChatMessage::assistant(format!("Error: {e}"), MessageKind::Text);
                        self.dispatch(Action::PushChat(message));
                    }
                }
            }
            JobResult::ProjectLoaded(Ok(project)) => {
                self.project = Some(project);
                self.status_message = Some("Project refreshed".to_string());
            }
            JobResult::ProjectLoaded(Err(e)) => {
                warn!(error = %e, "Project refresh failed");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    fn apply_ai_reply(&mut self, purpose: AiPurpose, text: String) {
        match purpose {
            AiPurpose::Fix | AiPurpose::Generate => {
                let code = extract_code_block(&text).to_string();
                self.dispatch(Action::ReplaceContent(code));
                self.status_message = Some(match purpose {
                    AiPurpose::Fix => "Applied AI fix".to_string(),
                    _ => "Inserted generated code".to_string(),
                });
            }
            AiPurpose::Ask | AiPurpose::Explain => {
                let kind =
                    if contains_code_block(&text) { MessageKind::Code } else { MessageKind::Text };
                self.dispatch(Action::PushChat(ChatMessage::assistant(text, kind)));
            }
        }
    }

    /// Advance animations
    pub fn tick(&mut self) {
        self.spinner.tick();
    }

    /// Render the application
    pub fn render(&mut self, frame: &mut Frame<'_>) {
        let area = frame.area();
        self.layout_manager.update_size(area.width, area.height);
        self.update_panel_focus();

        let areas = self.layout_manager.split(area, self.current_panel);
        self.last_areas = areas;
        self.render_status_bar(frame, areas.status);

        let activity = self.spinner.display_text();
        let ctx = ViewContext {
            workspace: &self.workspace,
            project: self.project.as_ref(),
            colors: &self.colors,
            editor: &self.config.editor,
            ai_activity: &activity,
        };
        if let Some(rect) = areas.files {
            self.files.render(frame, rect, &ctx);
        }
        if let Some(rect) = areas.editor {
            self.editor.render(frame, rect, &ctx);
        }
        if let Some(rect) = areas.debug {
            self.debug.render(frame, rect, &ctx);
        }
        if let Some(rect) = areas.chat {
            self.chat.render(frame, rect, &ctx);
        }
    }

    fn render_status_bar(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let file = match self.workspace.open_file() {
            Some(open) => {
                let name = open
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let status = if open.dirty { FileStatus::Modified } else { FileStatus::Saved };
                (status, name)
            }
            None => (FileStatus::Scratch, "untitled".to_string()),
        };
        let session = match self.workspace.session().current_line() {
            Some(line) => SessionStatus::Paused(line),
            None if !self.workspace.markers().is_empty() => {
                SessionStatus::Blocked(self.workspace.markers().len())
            }
            None => SessionStatus::Idle,
        };

        let mut bar = StatusBar::new()
            .file(file.0, file.1.clone())
            .session(session)
            .ai(self.ai_status, self.config.ai.provider.to_string())
            .current_panel(format!("{:?}", self.current_panel));
        if let Some(message) = &self.status_message {
            bar = bar.message(message.clone());
        } else {
            bar = bar.message("Tab: Switch | q: Quit");
        }

        let mut spans = vec![Span::styled(bar.build(), Style::default().fg(Color::White))];
        if self.spinner.is_loading() {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(self.spinner.display_text(), Style::default().fg(Color::Cyan)));
        }
        let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
        frame.render_widget(status, area);
    }

    fn update_panel_focus(&mut self) {
        let current = self.current_panel;
        let panels: [&mut dyn PanelTr; 4] =
            [&mut self.files, &mut self.editor, &mut self.debug, &mut self.chat];
        for panel in panels {
            if panel.panel_type() == current {
                panel.on_focus();
            } else {
                panel.on_blur();
            }
        }
    }

    fn focused_panel(&self) -> &dyn PanelTr {
        match self.current_panel {
            PanelType::Files => &self.files,
            PanelType::Editor => &self.editor,
            PanelType::Debug => &self.debug,
            PanelType::Chat => &self.chat,
        }
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<EventResponse> {
        if key.kind != KeyEventKind::Press {
            return Ok(EventResponse::NotHandled);
        }
        debug!("Key pressed: {:?}", key);

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.should_exit = true;
            return Ok(EventResponse::Exit);
        }

        let response = if self.focused_panel().captures_key(&key) {
            self.forward_key(key)?
        } else {
            match key.code {
                KeyCode::F(n @ 1..=4) => match PanelType::from_function_key(n) {
                    Some(panel) => EventResponse::ChangeFocus(panel),
                    None => EventResponse::NotHandled,
                },
                KeyCode::F(5) => EventResponse::Dispatch(Action::StartDebugging),
                KeyCode::F(6) => EventResponse::Dispatch(Action::StopDebugging),
                KeyCode::F(10) => EventResponse::Dispatch(Action::Step),
                KeyCode::Tab => {
                    self.cycle_panels(false);
                    EventResponse::Handled
                }
                KeyCode::BackTab => {
                    self.cycle_panels(true);
                    EventResponse::Handled
                }
                KeyCode::Char('q') if !ctrl => EventResponse::Exit,
                _ => self.forward_key(key)?,
            }
        };

        Ok(self.process_response(response))
    }

    fn forward_key(&mut self, key: KeyEvent) -> Result<EventResponse> {
        let activity = self.spinner.display_text();
        let ctx = ViewContext {
            workspace: &self.workspace,
            project: self.project.as_ref(),
            colors: &self.colors,
            editor: &self.config.editor,
            ai_activity: &activity,
        };
        match self.current_panel {
            PanelType::Files => self.files.handle_key_event(key, &ctx),
            PanelType::Editor => self.editor.handle_key_event(key, &ctx),
            PanelType::Debug => self.debug.handle_key_event(key, &ctx),
            PanelType::Chat => self.chat.handle_key_event(key, &ctx),
        }
    }

    /// Turn a panel response into state changes; what remains is for the
    /// event loop (`Exit`) or informational
    fn process_response(&mut self, response: EventResponse) -> EventResponse {
        match response {
            EventResponse::Dispatch(action) => {
                self.dispatch(action);
                EventResponse::Handled
            }
            EventResponse::Command(command) => {
                if let Err(e) = self.run_command(command) {
                    warn!(error = %e, "Command failed");
                    self.status_message = Some(format!("Error: {e}"));
                }
                EventResponse::Handled
            }
            EventResponse::ChangeFocus(panel) => {
                self.change_focus(panel);
                EventResponse::Handled
            }
            EventResponse::Exit => {
                self.should_exit = true;
                EventResponse::Exit
            }
            other => other,
        }
    }

    /// Move focus to `panel`
    pub fn change_focus(&mut self, panel: PanelType) {
        if self.current_panel != panel {
            debug!("Switched to panel: {:?}", panel);
        }
        self.current_panel = panel;
        self.update_panel_focus();
    }

    fn cycle_panels(&mut self, reversed: bool) {
        let order = match self.layout_manager.layout_type() {
            LayoutType::Mobile => {
                vec![PanelType::Files, PanelType::Editor, PanelType::Debug, PanelType::Chat]
            }
            _ => self.layout_manager.visible_panels(self.current_panel),
        };
        let position = order.iter().position(|p| *p == self.current_panel).unwrap_or(0);
        let next = if reversed {
            (position + order.len() - 1) % order.len()
        } else {
            (position + 1) % order.len()
        };
        self.change_focus(order[next]);
    }

    /// Handle terminal resize
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.layout_manager.update_size(width, height);
        debug!("Terminal resized to {}x{}", width, height);
    }

    /// Focus the panel under a left click
    pub fn handle_mouse_event(&mut self, event: MouseEvent) {
        if !matches!(event.kind, MouseEventKind::Down(_)) {
            return;
        }
        let position = Position::new(event.column, event.row);
        let panels = [PanelType::Files, PanelType::Editor, PanelType::Debug, PanelType::Chat];
        if let Some(panel) = panels
            .into_iter()
            .find(|p| self.last_areas.get(*p).is_some_and(|rect| rect.contains(position)))
        {
            self.change_focus(panel);
        }
    }

    /// Authoritative editor state
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Open project, if any
    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    /// The editor panel
    pub fn editor(&self) -> &EditorPanel {
        &self.editor
    }

    /// Last status line message
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Whether an AI request is in flight
    pub fn is_busy(&self) -> bool {
        self.pending_ai > 0
    }

    /// Get current panel for external access
    pub fn current_panel(&self) -> PanelType {
        self.current_panel
    }

    /// Check if the app should exit
    pub fn should_exit(&self) -> bool {
        self.should_exit
    }
}
