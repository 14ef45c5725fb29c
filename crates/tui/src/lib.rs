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

//! Terminal User Interface for Codepad
//!
//! This crate provides a terminal-based editor on top of the Codepad engine:
//! a file tree, a modal editor, the simulated debugger and an AI chat.

mod app;
mod config;
mod layout;
mod panels;
mod ui;

pub use app::{AiPurpose, App, JobResult};
pub use config::{ColorScheme, Config, EditorConfig, Theme, ThemeConfig};
pub use layout::{LayoutAreas, LayoutManager, LayoutType};
pub use panels::{Command, EditorMode, EditorPanel, EventResponse, PanelType};
pub use ui::{AiStatus, FileStatus, SessionStatus, Spinner, SpinnerStyles, StatusBar};

use codepad_common::Language;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use eyre::Result;
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, path::PathBuf, time::Duration};
use tokio::{
    select,
    sync::mpsc::{unbounded_channel, UnboundedReceiver},
    time::interval,
};
use tracing::{debug, info};

/// Configuration for the TUI
#[derive(Debug, Clone)]
pub struct TuiConfig {
    /// File or directory to open
    pub path: Option<PathBuf>,
    /// Language override for the initial buffer
    pub language: Option<Language>,
    /// Terminal refresh interval
    pub refresh_interval: Duration,
    /// Enable mouse support
    pub enable_mouse: bool,
    /// Loaded user configuration
    pub config: Config,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            path: None,
            language: None,
            refresh_interval: Duration::from_millis(50),
            enable_mouse: false,
            config: Config::default(),
        }
    }
}

/// Main TUI runner that manages the terminal interface and event loop
pub struct Tui {
    /// The main application state and panel management
    app: App,
    /// Terminal backend for rendering and input handling
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    /// Configuration settings for the TUI behavior
    config: TuiConfig,
    /// Results of background AI and project work
    jobs_rx: UnboundedReceiver<JobResult>,
}

impl Tui {
    /// Create a new TUI instance
    pub fn new(config: TuiConfig) -> Result<Self> {
        info!("Initializing TUI with config: {:?}", config);

        // The app may fail on a bad path; do that before touching the terminal
        let (jobs_tx, jobs_rx) = unbounded_channel();
        let app = App::new(config.config.clone(), config.path.as_deref(), config.language, jobs_tx)?;

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if config.enable_mouse {
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        } else {
            execute!(stdout, EnterAlternateScreen)?;
        }

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { app, terminal, config, jobs_rx })
    }

    /// Run the main TUI event loop
    pub async fn run(mut self) -> Result<()> {
        info!("Starting TUI event loop");

        let mut event_stream = EventStream::new();
        let mut ticker = interval(self.config.refresh_interval);

        let result = loop {
            if let Err(e) = self.terminal.draw(|frame| self.app.render(frame)) {
                break Err(e.into());
            }

            select! {
                event_result = event_stream.next() => {
                    match event_result {
                        Some(Ok(event)) => {
                            debug!("Received event: {:?}", event);
                            match event {
                                Event::Key(key_event) => {
                                    if self.handle_key_event(key_event)? {
                                        break Ok(());
                                    }
                                }
                                Event::Mouse(mouse_event) if self.config.enable_mouse => {
                                    self.app.handle_mouse_event(mouse_event);
                                }
                                Event::Resize(width, height) => self.handle_resize(width, height),
                                _ => {}
                            }
                        }
                        Some(Err(e)) => break Err(e.into()),
                        None => break Ok(()),
                    }
                }

                Some(job) = self.jobs_rx.recv() => {
                    self.app.handle_job_result(job);
                }

                _ = ticker.tick() => {
                    self.app.tick();
                }
            }

            if self.app.should_exit() {
                info!("App requested exit");
                break Ok(());
            }
        };

        info!("TUI event loop ended");
        result
    }

    // Handle a single resize event
    fn handle_resize(&mut self, width: u16, height: u16) {
        debug!("Terminal resized: {}x{}", width, height);
        self.app.handle_resize(width, height);
    }

    // Handle a single key event, returning true if the app should exit
    fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<bool> {
        match self.app.handle_key_event(key_event)? {
            EventResponse::Exit => {
                info!("Exit requested");
                Ok(true)
            }
            EventResponse::NotHandled => {
                debug!("Unhandled key event: {:?}", key_event);
                Ok(false)
            }
            _ => Ok(false),
        }
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        if self.config.enable_mouse {
            let _ =
                execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture);
        } else {
            let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        }
        let _ = self.terminal.show_cursor();
    }
}

/// Public API for the TUI module
pub mod api {
    use super::*;

    /// Start the TUI with the given configuration
    pub async fn start_tui(config: TuiConfig) -> Result<()> {
        let tui = Tui::new(config)?;
        tui.run().await
    }

    /// Start the TUI on an empty scratch buffer
    pub async fn start_default_tui() -> Result<()> {
        start_tui(TuiConfig::default()).await
    }
}
