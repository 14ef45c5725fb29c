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

//! Chat panel
//!
//! Conversation with the AI assistant. The history shown here is the
//! workspace's chat log; the panel itself only owns the input line, the
//! list of questions already sent (browsable with Up/Down) and the scroll
//! position.

use super::{is_navigation_key, Command, EventResponse, PanelTr, PanelType, ViewContext};
use crate::ui::{BorderPresets, Icons};
use codepad_common::{MessageKind, Role};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use eyre::Result;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::collections::VecDeque;
use tracing::debug;

/// Maximum number of sent questions kept for Up/Down browsing
const MAX_INPUT_HISTORY: usize = 100;

/// Chat panel implementation
#[derive(Debug, Default)]
pub struct ChatPanel {
    /// Current input buffer
    input_buffer: String,
    /// Cursor position in input buffer, in chars
    cursor_position: usize,
    /// Questions already sent, oldest first
    input_history: VecDeque<String>,
    /// Current position in input history (None = no history browsing)
    history_position: Option<usize>,
    /// Lines scrolled up from the bottom of the conversation
    scroll_from_bottom: usize,
    /// Whether this panel is focused
    focused: bool,
}

impl ChatPanel {
    /// Create a new chat panel
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn input(&self) -> &str {
        &self.input_buffer
    }

    fn byte_index(&self) -> usize {
        self.input_buffer
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len())
    }

    fn input_len(&self) -> usize {
        self.input_buffer.chars().count()
    }

    fn set_input(&mut self, text: String) {
        self.input_buffer = text;
        self.cursor_position = self.input_len();
    }

    fn submit(&mut self) -> EventResponse {
        let question = self.input_buffer.trim().to_string();
        self.input_buffer.clear();
        self.cursor_position = 0;
        self.history_position = None;
        if question.is_empty() {
            return EventResponse::Handled;
        }

        if self.input_history.back() != Some(&question) {
            if self.input_history.len() >= MAX_INPUT_HISTORY {
                self.input_history.pop_front();
            }
            self.input_history.push_back(question.clone());
        }
        self.scroll_from_bottom = 0;
        EventResponse::Command(Command::AiAsk(question))
    }

    fn history_up(&mut self) {
        if self.input_history.is_empty() {
            return;
        }
        let position = match self.history_position {
            None => self.input_history.len() - 1,
            Some(0) => 0,
            Some(p) => p - 1,
        };
        self.history_position = Some(position);
        self.set_input(self.input_history[position].clone());
    }

    fn history_down(&mut self) {
        match self.history_position {
            Some(p) if p + 1 < self.input_history.len() => {
                self.history_position = Some(p + 1);
                self.set_input(self.input_history[p + 1].clone());
            }
            Some(_) => {
                self.history_position = None;
                self.set_input(String::new());
            }
            None => {}
        }
    }

    /// Conversation lines wrapped to `width` columns
    fn conversation_lines(&self, ctx: &ViewContext<'_>, width: usize) -> Vec<Line<'static>> {
        let colors = ctx.colors;
        let mut lines = Vec::new();

        for message in ctx.workspace.chat() {
            let (prefix, prefix_style) = match message.role {
                Role::User => (Icons::USER, Style::default().fg(colors.info())),
                Role::Assistant => (Icons::ASSISTANT, Style::default().fg(colors.success())),
            };
            let body_style = match (message.role, message.kind) {
                (Role::Assistant, _) if message.content.starts_with("Error: ") => {
                    Style::default().fg(colors.error())
                }
                (Role::Assistant, MessageKind::Code) => Style::default().fg(colors.string()),
                _ => Style::default(),
            };

            lines.push(Line::from(Span::styled(
                format!("{prefix} {}", role_label(message.role)),
                prefix_style.add_modifier(Modifier::BOLD),
            )));
            for text in message.content.lines() {
                for chunk in wrap(text, width.max(1)) {
                    lines.push(Line::from(Span::styled(chunk, body_style)));
                }
            }
            lines.push(Line::default());
        }

        if !ctx.ai_activity.is_empty() {
            lines.push(Line::from(Span::styled(
                ctx.ai_activity.to_string(),
                Style::default().fg(colors.help_text()),
            )));
        }
        lines
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "Assistant",
    }
}

/// Split `text` into pieces of at most `width` chars; an empty line stays one
/// empty piece
fn wrap(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars.chunks(width).map(|c| c.iter().collect()).collect()
}

impl PanelTr for ChatPanel {
    fn panel_type(&self) -> PanelType {
        PanelType::Chat
    }

    fn title(&self, ctx: &ViewContext<'_>) -> String {
        format!("Chat ({})", ctx.workspace.chat().len())
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ctx: &ViewContext<'_>) {
        let block = BorderPresets::side(self.focused, self.title(ctx), ctx.colors);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(inner);

        let lines = self.conversation_lines(ctx, chunks[0].width as usize);
        let visible = chunks[0].height as usize;
        let max_scroll = lines.len().saturating_sub(visible);
        self.scroll_from_bottom = self.scroll_from_bottom.min(max_scroll);
        let top = max_scroll - self.scroll_from_bottom;

        let history = if lines.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "Ask about the code. Ctrl+A accepts code, Ctrl+E explains it.",
                Style::default().fg(ctx.colors.help_text()),
            )))
        } else {
            Paragraph::new(lines).scroll((top.min(u16::MAX as usize) as u16, 0))
        };
        frame.render_widget(history, chunks[0]);

        let mut input = vec![
            Span::styled(format!("{} ", Icons::USER), Style::default().fg(ctx.colors.info())),
            Span::raw(self.input_buffer.clone()),
        ];
        if self.focused {
            input.push(Span::styled(Icons::CURSOR, Style::default().fg(ctx.colors.info())));
        }
        let border_color = if self.focused {
            ctx.colors.focused_border()
        } else {
            ctx.colors.unfocused_border()
        };
        let input = Paragraph::new(Line::from(input)).block(
            Block::default()
                .title("Message")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        );
        frame.render_widget(input, chunks[1]);
    }

    fn handle_key_event(
        &mut self,
        event: KeyEvent,
        _ctx: &ViewContext<'_>,
    ) -> Result<EventResponse> {
        if event.kind != KeyEventKind::Press {
            return Ok(EventResponse::NotHandled);
        }
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);

        let response = match event.code {
            KeyCode::Char('a') if ctrl => EventResponse::Command(Command::AcceptLastCode),
            KeyCode::Char('e') if ctrl => EventResponse::Command(Command::ExplainLastCode),
            KeyCode::Char('u') if ctrl => {
                self.set_input(String::new());
                EventResponse::Handled
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                if self.cursor_position > 0 {
                    self.cursor_position -= 1;
                    let at = self.byte_index();
                    self.input_buffer.remove(at);
                    self.history_position = None;
                }
                EventResponse::Handled
            }
            KeyCode::Delete => {
                if self.cursor_position < self.input_len() {
                    let at = self.byte_index();
                    self.input_buffer.remove(at);
                    self.history_position = None;
                }
                EventResponse::Handled
            }
            KeyCode::Left => {
                self.cursor_position = self.cursor_position.saturating_sub(1);
                EventResponse::Handled
            }
            KeyCode::Right => {
                self.cursor_position = (self.cursor_position + 1).min(self.input_len());
                EventResponse::Handled
            }
            KeyCode::Home => {
                self.cursor_position = 0;
                EventResponse::Handled
            }
            KeyCode::End => {
                self.cursor_position = self.input_len();
                EventResponse::Handled
            }
            KeyCode::Up => {
                self.history_up();
                EventResponse::Handled
            }
            KeyCode::Down => {
                self.history_down();
                EventResponse::Handled
            }
            KeyCode::PageUp => {
                self.scroll_from_bottom += 5;
                EventResponse::Handled
            }
            KeyCode::PageDown => {
                self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(5);
                EventResponse::Handled
            }
            KeyCode::Char(c) if !ctrl => {
                let at = self.byte_index();
                self.input_buffer.insert(at, c);
                self.cursor_position += 1;
                self.history_position = None;
                EventResponse::Handled
            }
            _ => EventResponse::NotHandled,
        };
        Ok(response)
    }

    fn captures_key(&self, event: &KeyEvent) -> bool {
        !is_navigation_key(event)
            && matches!(event.code, KeyCode::Char(_))
            && !event.modifiers.contains(KeyModifiers::CONTROL)
    }

    fn on_focus(&mut self) {
        if !self.focused {
            debug!("Chat panel gained focus");
        }
        self.focused = true;
    }

    fn on_blur(&mut self) {
        self.focused = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColorScheme, EditorConfig};
    use codepad_common::Language;
    use codepad_engine::Workspace;

    fn press(panel: &mut ChatPanel, code: KeyCode) -> EventResponse {
        let workspace = Workspace::new(Language::Python);
        let colors = ColorScheme::default();
        let editor = EditorConfig::default();
        let ctx = ViewContext {
            workspace: &workspace,
            project: None,
            colors: &colors,
            editor: &editor,
            ai_activity: "",
        };
        panel.handle_key_event(KeyEvent::from(code), &ctx).unwrap()
    }

    fn type_text(panel: &mut ChatPanel, text: &str) {
        for c in text.chars() {
            press(panel, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_enter_sends_trimmed_question() {
        let mut panel = ChatPanel::new();
        type_text(&mut panel, "  why? ");
        match press(&mut panel, KeyCode::Enter) {
            EventResponse::Command(Command::AiAsk(q)) => assert_eq!(q, "why?"),
            other => panic!("unexpected response: {other:?}"),
        }
        assert!(panel.input().is_empty());

        assert!(matches!(press(&mut panel, KeyCode::Enter), EventResponse::Handled));
    }

    #[test]
    fn test_editing_with_multibyte_chars() {
        let mut panel = ChatPanel::new();
        type_text(&mut panel, "héllo");
        press(&mut panel, KeyCode::Left);
        press(&mut panel, KeyCode::Backspace);
        press(&mut panel, KeyCode::Home);
        press(&mut panel, KeyCode::Delete);
        assert_eq!(panel.input(), "élo");
    }

    #[test]
    fn test_history_browsing() {
        let mut panel = ChatPanel::new();
        type_text(&mut panel, "first");
        press(&mut panel, KeyCode::Enter);
        type_text(&mut panel, "second");
        press(&mut panel, KeyCode::Enter);

        press(&mut panel, KeyCode::Up);
        assert_eq!(panel.input(), "second");
        press(&mut panel, KeyCode::Up);
        assert_eq!(panel.input(), "first");
        press(&mut panel, KeyCode::Down);
        assert_eq!(panel.input(), "second");
        press(&mut panel, KeyCode::Down);
        assert_eq!(panel.input(), "");
    }

    #[test]
    fn test_captures_plain_characters_only() {
        let panel = ChatPanel::new();
        assert!(panel.captures_key(&KeyEvent::from(KeyCode::Char('q'))));
        assert!(!panel.captures_key(&KeyEvent::from(KeyCode::Tab)));
        assert!(!panel.captures_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(wrap("", 4), vec![""]);
    }
}
