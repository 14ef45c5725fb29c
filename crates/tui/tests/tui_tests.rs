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

//! App-level behavior: key routing, rendering and background jobs

use codepad_common::{Language, MessageKind, Role};
use codepad_engine::{Action, AiConfig, AiProvider};
use codepad_tui::{App, Config, EditorMode, JobResult, PanelType};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::info;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn new_app(config: Config) -> (App, UnboundedReceiver<JobResult>) {
    let (tx, rx) = unbounded_channel();
    let app = App::new(config, None, None, tx).unwrap();
    (app, rx)
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn screen(app: &mut App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| app.render(frame)).unwrap();
    terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
}

fn ollama_config(endpoint: String) -> Config {
    let mut config = Config::default();
    config.ai = AiConfig {
        endpoint: Some(endpoint),
        model: Some("test-model".to_string()),
        ..AiConfig::for_provider(AiProvider::Ollama)
    };
    config
}

#[test]
fn test_renders_at_every_layout_size() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let (mut app, _rx) = new_app(Config::default());
    for (width, height) in [(160, 48), (100, 30), (50, 20)] {
        let text = screen(&mut app, width, height);
        assert!(text.contains("untitled"), "missing buffer name at {width}x{height}");
    }

    let full = screen(&mut app, 160, 48);
    assert!(full.contains("Chat (0)"));
}

#[test]
fn test_typing_updates_workspace_and_markers() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let (mut app, _rx) = new_app(Config::default());
    assert_eq!(app.current_panel(), PanelType::Editor);
    assert_eq!(app.workspace().language(), Language::JavaScript);

    press(&mut app, KeyCode::Char('i'));
    assert_eq!(app.editor().mode(), EditorMode::Insert);
    type_text(&mut app, "f(1");
    assert_eq!(app.workspace().buffer().text(), "f(1");
    assert_eq!(app.workspace().markers().len(), 1);

    // 'q' is text while inserting
    type_text(&mut app, "q)");
    assert!(!app.should_exit());
    assert!(app.workspace().markers().is_empty());

    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Char('q'));
    assert!(app.should_exit());
}

#[test]
fn test_breakpoint_and_function_keys_drive_session() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let (mut app, _rx) = new_app(Config::default());
    app.dispatch(Action::SelectLanguage(Language::Python));
    app.dispatch(Action::ReplaceContent("a = 1\nb = 2\nc = 3".to_string()));

    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char('b'));
    assert!(app.workspace().breakpoints().contains(2));
    assert_eq!(app.status_message(), Some("Breakpoint set at line 2"));

    press(&mut app, KeyCode::F(5));
    assert_eq!(app.workspace().session().current_line(), Some(2));
    assert_eq!(app.editor().execution_lines(), &[2]);

    press(&mut app, KeyCode::F(10));
    assert_eq!(app.workspace().session().current_line(), Some(3));

    press(&mut app, KeyCode::F(10));
    assert!(!app.workspace().session().is_active());
    assert!(app.editor().execution_lines().is_empty());
    assert_eq!(app.status_message(), Some("Debugging finished"));
}

#[test]
fn test_start_refused_with_syntax_errors() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let (mut app, _rx) = new_app(Config::default());
    app.dispatch(Action::ReplaceContent("let a = (1;".to_string()));
    press(&mut app, KeyCode::F(5));

    assert!(!app.workspace().session().is_active());
    assert_eq!(app.status_message(), Some("Cannot start: 1 issue(s) in buffer"));
}

#[test]
fn test_open_file_edit_and_save() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let dir = TempDir::new().unwrap();
    let file = dir.path().join("main.py");
    fs::write(&file, "x = 1\n").unwrap();

    let (tx, _rx) = unbounded_channel();
    let mut app = App::new(Config::default(), Some(&file), None, tx).unwrap();
    assert!(app.project().is_some());
    assert_eq!(app.current_panel(), PanelType::Editor);
    assert_eq!(app.workspace().language(), Language::Python);
    assert_eq!(app.editor().text(), "x = 1\n");

    press(&mut app, KeyCode::Char('i'));
    type_text(&mut app, "y = 0; ");
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.workspace().open_file().map(|f| f.dirty), Some(true));

    app.handle_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)).unwrap();
    assert_eq!(app.workspace().open_file().map(|f| f.dirty), Some(false));
    assert_eq!(fs::read_to_string(&file).unwrap(), "y = 0; x = 1\n");
}

#[test]
fn test_missing_path_is_an_error() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let dir = TempDir::new().unwrap();
    let (tx, _rx) = unbounded_channel();
    let missing = dir.path().join("nope.rs");
    assert!(App::new(Config::default(), Some(&missing), None, tx).is_err());
}

#[test]
fn test_directory_opens_file_tree() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("README.md"), "# hi\n").unwrap();

    let (tx, _rx) = unbounded_channel();
    let mut app = App::new(Config::default(), Some(dir.path()), Some(Language::Go), tx).unwrap();
    assert_eq!(app.current_panel(), PanelType::Files);
    assert_eq!(app.workspace().language(), Language::Go);

    press(&mut app, KeyCode::Tab);
    assert_ne!(app.current_panel(), PanelType::Files);
    press(&mut app, KeyCode::F(1));
    assert_eq!(app.current_panel(), PanelType::Files);
}

#[tokio::test]
async fn test_chat_round_trip() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Try this:\n```javascript\nconsole.log(1);\n```"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (mut app, mut rx) = new_app(ollama_config(server.uri()));
    press(&mut app, KeyCode::F(4));
    assert_eq!(app.current_panel(), PanelType::Chat);

    type_text(&mut app, "how do I log?");
    press(&mut app, KeyCode::Enter);
    assert!(app.is_busy());
    assert_eq!(app.workspace().chat().len(), 1);

    let job = rx.recv().await.unwrap();
    app.handle_job_result(job);
    assert!(!app.is_busy());

    let chat = app.workspace().chat();
    assert_eq!(chat.len(), 2);
    assert_eq!(chat[1].role, Role::Assistant);
    assert_eq!(chat[1].kind, MessageKind::Code);

    // Accept the reply into the editor
    app.handle_key_event(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL)).unwrap();
    assert_eq!(app.editor().text(), "console.log(1);\n");
}

#[tokio::test]
async fn test_unreachable_provider_reports_in_chat() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    // Nothing listens on the discard port
    let (mut app, mut rx) = new_app(ollama_config("http://127.0.0.1:9".to_string()));
    press(&mut app, KeyCode::F(4));
    type_text(&mut app, "hello");
    press(&mut app, KeyCode::Enter);

    let job = rx.recv().await.unwrap();
    app.handle_job_result(job);

    let last = app.workspace().chat().last().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert!(last.content.starts_with("Error:"));
    assert!(!app.is_busy());
}
