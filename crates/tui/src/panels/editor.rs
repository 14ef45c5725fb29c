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

//! Editor panel
//!
//! A small modal text editor. The panel owns the text while the user types
//! and reports every edit to the workspace as a `ContentChanged` action;
//! when the workspace replaces the buffer from elsewhere (opening a file,
//! accepting AI output) its revision changes and [`EditorPanel::sync`]
//! reloads the text.
//!
//! The panel is also the engine's [`EditorSurface`]: breakpoint and
//! execution-line decorations land here and are drawn in the gutter.

use super::{is_navigation_key, Command, EventResponse, PanelTr, PanelType, ViewContext};
use crate::ui::{BorderPresets, Icons, SyntaxHighlighter};
use codepad_common::SourceBuffer;
use codepad_engine::{Action, DecorationLayer, EditorSurface, Workspace};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use eyre::Result;
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::{debug, trace};

/// Editing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    /// Keys are commands
    #[default]
    Normal,
    /// Keys insert text
    Insert,
    /// Typing a description for code generation
    Prompt,
}

/// Editor panel implementation
#[derive(Debug)]
pub struct EditorPanel {
    lines: Vec<String>,
    /// Cursor row, 0-based
    cursor_row: usize,
    /// Cursor column in chars, 0-based
    cursor_col: usize,
    /// First visible row
    scroll: usize,
    /// Rows available at the last render
    viewport_height: usize,
    mode: EditorMode,
    prompt: String,
    breakpoint_lines: Vec<usize>,
    execution_lines: Vec<usize>,
    /// Workspace revision the text was last loaded from
    seen_revision: Option<u64>,
    highlighter: SyntaxHighlighter,
    focused: bool,
}

impl EditorPanel {
    /// Create an empty editor
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_row: 0,
            cursor_col: 0,
            scroll: 0,
            viewport_height: 20,
            mode: EditorMode::Normal,
            prompt: String::new(),
            breakpoint_lines: Vec::new(),
            execution_lines: Vec::new(),
            seen_revision: None,
            highlighter: SyntaxHighlighter::new(),
            focused: false,
        }
    }

    /// Reload the text if the workspace buffer was replaced
    pub fn sync(&mut self, workspace: &Workspace) {
        if self.seen_revision == Some(workspace.revision()) {
            return;
        }
        debug!(revision = workspace.revision(), "Reloading editor text");
        self.lines = workspace.buffer().lines().to_vec();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.seen_revision = Some(workspace.revision());
        self.cursor_row = self.cursor_row.min(self.lines.len() - 1);
        self.clamp_col();
        self.scroll_to_cursor();
    }

    /// Current mode
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Cursor as 1-based (line, column)
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row + 1, self.cursor_col + 1)
    }

    /// Current text
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Lines decorated with a breakpoint marker
    pub fn breakpoint_lines(&self) -> &[usize] {
        &self.breakpoint_lines
    }

    /// Lines decorated as the current execution line
    pub fn execution_lines(&self) -> &[usize] {
        &self.execution_lines
    }

    /// First visible line, 1-based
    pub fn first_visible_line(&self) -> usize {
        self.scroll + 1
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |l| l.chars().count())
    }

    fn byte_index(line: &str, col: usize) -> usize {
        line.char_indices().nth(col).map(|(i, _)| i).unwrap_or(line.len())
    }

    fn clamp_col(&mut self) {
        self.cursor_col = self.cursor_col.min(self.line_len(self.cursor_row));
    }

    fn scroll_to_cursor(&mut self) {
        let height = self.viewport_height.max(1);
        if self.cursor_row < self.scroll {
            self.scroll = self.cursor_row;
        } else if self.cursor_row >= self.scroll + height {
            self.scroll = self.cursor_row + 1 - height;
        }
    }

    fn move_to(&mut self, row: usize, col: usize) {
        self.cursor_row = row.min(self.lines.len() - 1);
        self.cursor_col = col;
        self.clamp_col();
        self.scroll_to_cursor();
    }

    fn content_changed(&self) -> EventResponse {
        EventResponse::Dispatch(Action::ContentChanged(SourceBuffer::from_lines(
            self.lines.iter().cloned(),
        )))
    }

    fn insert_str(&mut self, text: &str) {
        let line = &mut self.lines[self.cursor_row];
        let at = Self::byte_index(line, self.cursor_col);
        line.insert_str(at, text);
        self.cursor_col += text.chars().count();
    }

    fn split_line(&mut self) {
        let line = &mut self.lines[self.cursor_row];
        let at = Self::byte_index(line, self.cursor_col);
        let rest = line.split_off(at);
        self.lines.insert(self.cursor_row + 1, rest);
        self.move_to(self.cursor_row + 1, 0);
    }

    fn backspace(&mut self) -> bool {
        if self.cursor_col > 0 {
            let line = &mut self.lines[self.cursor_row];
            let at = Self::byte_index(line, self.cursor_col - 1);
            line.remove(at);
            self.cursor_col -= 1;
            true
        } else if self.cursor_row > 0 {
            let line = self.lines.remove(self.cursor_row);
            let row = self.cursor_row - 1;
            let col = self.line_len(row);
            self.lines[row].push_str(&line);
            self.move_to(row, col);
            true
        } else {
            false
        }
    }

    fn delete(&mut self) -> bool {
        if self.cursor_col < self.line_len(self.cursor_row) {
            let line = &mut self.lines[self.cursor_row];
            let at = Self::byte_index(line, self.cursor_col);
            line.remove(at);
            true
        } else if self.cursor_row + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_row + 1);
            self.lines[self.cursor_row].push_str(&next);
            true
        } else {
            false
        }
    }

    /// Cursor movement shared by normal and insert mode
    fn handle_motion(&mut self, code: KeyCode) -> bool {
        let page = self.viewport_height.max(1);
        match code {
            KeyCode::Left => self.move_to(self.cursor_row, self.cursor_col.saturating_sub(1)),
            KeyCode::Right => self.move_to(self.cursor_row, self.cursor_col + 1),
            KeyCode::Up => self.move_to(self.cursor_row.saturating_sub(1), self.cursor_col),
            KeyCode::Down => self.move_to(self.cursor_row + 1, self.cursor_col),
            KeyCode::Home => self.move_to(self.cursor_row, 0),
            KeyCode::End => self.move_to(self.cursor_row, usize::MAX),
            KeyCode::PageUp => self.move_to(self.cursor_row.saturating_sub(page), self.cursor_col),
            KeyCode::PageDown => self.move_to(self.cursor_row + page, self.cursor_col),
            _ => return false,
        }
        true
    }

    fn handle_normal(&mut self, event: KeyEvent, ctx: &ViewContext<'_>) -> EventResponse {
        if self.handle_motion(event.code) {
            return EventResponse::Handled;
        }
        let handled = match event.code {
            KeyCode::Char('h') => self.handle_motion(KeyCode::Left),
            KeyCode::Char('l') => self.handle_motion(KeyCode::Right),
            KeyCode::Char('k') => self.handle_motion(KeyCode::Up),
            KeyCode::Char('j') | KeyCode::Enter => self.handle_motion(KeyCode::Down),
            KeyCode::Char('0') => self.handle_motion(KeyCode::Home),
            KeyCode::Char('$') => self.handle_motion(KeyCode::End),
            KeyCode::Char('G') => {
                self.move_to(self.lines.len() - 1, 0);
                true
            }
            KeyCode::Char('i') => {
                self.mode = EditorMode::Insert;
                true
            }
            KeyCode::Char('a') => {
                self.mode = EditorMode::Insert;
                self.move_to(self.cursor_row, self.cursor_col + 1);
                true
            }
            KeyCode::Char('o') => {
                self.mode = EditorMode::Insert;
                self.lines.insert(self.cursor_row + 1, String::new());
                self.move_to(self.cursor_row + 1, 0);
                return self.content_changed();
            }
            KeyCode::Char('b') => {
                return EventResponse::Dispatch(Action::ToggleBreakpoint(self.cursor_row + 1))
            }
            KeyCode::Char('n') => return EventResponse::Dispatch(Action::Step),
            KeyCode::Char('x') => return EventResponse::Dispatch(Action::StopDebugging),
            KeyCode::Char('f') => return EventResponse::Command(Command::AiFix),
            KeyCode::Char('g') => {
                self.mode = EditorMode::Prompt;
                self.prompt.clear();
                true
            }
            KeyCode::Char('L') => {
                let next = ctx.workspace.language().next();
                return EventResponse::Dispatch(Action::SelectLanguage(next));
            }
            _ => false,
        };
        if handled {
            EventResponse::Handled
        } else {
            EventResponse::NotHandled
        }
    }

    fn handle_insert(&mut self, event: KeyEvent, ctx: &ViewContext<'_>) -> EventResponse {
        if self.handle_motion(event.code) {
            return EventResponse::Handled;
        }
        let edited = match event.code {
            KeyCode::Esc => {
                self.mode = EditorMode::Normal;
                return EventResponse::Handled;
            }
            KeyCode::Char(c) if !event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert_str(c.encode_utf8(&mut [0; 4]));
                true
            }
            KeyCode::Tab => {
                self.insert_str(&" ".repeat(ctx.editor.tab_width.max(1)));
                true
            }
            KeyCode::Enter => {
                self.split_line();
                true
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            _ => return EventResponse::NotHandled,
        };
        self.scroll_to_cursor();
        if edited {
            self.content_changed()
        } else {
            EventResponse::Handled
        }
    }

    fn handle_prompt(&mut self, event: KeyEvent) -> EventResponse {
        match event.code {
            KeyCode::Esc => {
                self.mode = EditorMode::Normal;
                self.prompt.clear();
            }
            KeyCode::Enter => {
                self.mode = EditorMode::Normal;
                let prompt = std::mem::take(&mut self.prompt);
                let prompt = prompt.trim();
                if !prompt.is_empty() {
                    return EventResponse::Command(Command::AiGenerate(prompt.to_string()));
                }
            }
            KeyCode::Backspace => {
                self.prompt.pop();
            }
            KeyCode::Char(c) if !event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.prompt.push(c);
            }
            _ => return EventResponse::NotHandled,
        }
        EventResponse::Handled
    }

    fn gutter_spans(
        &self,
        line_no: usize,
        width: usize,
        ctx: &ViewContext<'_>,
    ) -> Vec<Span<'static>> {
        let colors = ctx.colors;
        let mut spans = Vec::with_capacity(4);

        if ctx.editor.show_line_numbers {
            let has_marker = ctx.workspace.markers().iter().any(|m| m.start_line == line_no);
            let color = if has_marker { colors.error() } else { colors.line_number() };
            spans.push(Span::styled(format!("{line_no:>width$} "), Style::default().fg(color)));
        }

        if self.breakpoint_lines.contains(&line_no) {
            spans.push(Span::styled(Icons::BREAKPOINT, Style::default().fg(colors.breakpoint())));
        } else {
            spans.push(Span::raw(" "));
        }

        if self.execution_lines.contains(&line_no) {
            spans.push(Span::styled(
                Icons::CURRENT_LINE,
                Style::default().fg(colors.success()).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(" "));
        }

        spans.push(Span::styled(
            format!(" {} ", Icons::GUTTER),
            Style::default().fg(colors.unfocused_border()),
        ));
        spans
    }
}

impl Default for EditorPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSurface for EditorPanel {
    fn reveal_line(&mut self, line: usize) {
        let row = line.saturating_sub(1).min(self.lines.len() - 1);
        let height = self.viewport_height.max(1);
        if row < self.scroll {
            self.scroll = row;
        } else if row >= self.scroll + height {
            self.scroll = row + 1 - height;
        }
        trace!(line, scroll = self.scroll, "Revealed line");
    }

    fn set_decorations(&mut self, layer: DecorationLayer, lines: &[usize]) {
        match layer {
            DecorationLayer::Breakpoints => self.breakpoint_lines = lines.to_vec(),
            DecorationLayer::ExecutionLine => self.execution_lines = lines.to_vec(),
        }
    }
}

impl PanelTr for EditorPanel {
    fn panel_type(&self) -> PanelType {
        PanelType::Editor
    }

    fn title(&self, ctx: &ViewContext<'_>) -> String {
        let name = ctx
            .workspace
            .open_file()
            .and_then(|f| f.path.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string());
        let modified = if ctx.workspace.open_file().is_some_and(|f| f.dirty) {
            format!(" {}", Icons::MODIFIED)
        } else {
            String::new()
        };
        let mode = match self.mode {
            EditorMode::Normal => "",
            EditorMode::Insert => " -- INSERT --",
            EditorMode::Prompt => " -- GENERATE --",
        };
        format!("{name}{modified} [{}]{mode}", ctx.workspace.language())
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ctx: &ViewContext<'_>) {
        let block = BorderPresets::editor(self.focused, self.title(ctx), ctx.colors);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let (text_area, prompt_area) = if self.mode == EditorMode::Prompt && inner.height > 1 {
            let text = Rect { height: inner.height - 1, ..inner };
            let prompt = Rect { y: inner.y + inner.height - 1, height: 1, ..inner };
            (text, Some(prompt))
        } else {
            (inner, None)
        };

        self.viewport_height = text_area.height as usize;
        let max_scroll = self.lines.len().saturating_sub(1);
        self.scroll = self.scroll.min(max_scroll);

        let number_width = self.lines.len().to_string().len().max(3);
        let gutter_width = if ctx.editor.show_line_numbers { number_width + 1 } else { 0 } + 5;
        let language = ctx.workspace.language();

        let rendered: Vec<Line<'static>> = self
            .lines
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(self.viewport_height)
            .map(|(row, text)| {
                let line_no = row + 1;
                let base = if self.execution_lines.contains(&line_no) {
                    Style::default().bg(ctx.colors.execution_bg())
                } else {
                    Style::default()
                };
                let mut spans = self.gutter_spans(line_no, number_width, ctx);
                spans.extend(self.highlighter.highlight_line(text, language, ctx.colors, base));
                Line::from(spans).style(base)
            })
            .collect();
        frame.render_widget(Paragraph::new(rendered), text_area);

        if let Some(prompt_area) = prompt_area {
            let prompt = Line::from(vec![
                Span::styled("Generate: ", Style::default().fg(ctx.colors.help_text())),
                Span::raw(self.prompt.clone()),
                Span::styled(Icons::CURSOR, Style::default().fg(ctx.colors.info())),
            ]);
            frame.render_widget(Paragraph::new(prompt), prompt_area);
        } else if self.focused
            && self.cursor_row >= self.scroll
            && self.cursor_row < self.scroll + self.viewport_height
        {
            let x = text_area.x as usize + gutter_width + self.cursor_col;
            let y = text_area.y as usize + (self.cursor_row - self.scroll);
            if x < (text_area.x + text_area.width) as usize {
                frame.set_cursor_position(Position::new(x as u16, y as u16));
            }
        }
    }

    fn handle_key_event(
        &mut self,
        event: KeyEvent,
        ctx: &ViewContext<'_>,
    ) -> Result<EventResponse> {
        if event.kind != KeyEventKind::Press {
            return Ok(EventResponse::NotHandled);
        }

        if self.mode != EditorMode::Prompt
            && event.code == KeyCode::Char('s')
            && event.modifiers.contains(KeyModifiers::CONTROL)
        {
            return Ok(EventResponse::Command(Command::Save));
        }

        let response = match self.mode {
            EditorMode::Normal => self.handle_normal(event, ctx),
            EditorMode::Insert => self.handle_insert(event, ctx),
            EditorMode::Prompt => self.handle_prompt(event),
        };
        Ok(response)
    }

    fn captures_key(&self, event: &KeyEvent) -> bool {
        self.mode != EditorMode::Normal
            && !is_navigation_key(event)
            && !(event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL))
    }

    fn on_focus(&mut self) {
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

    struct Harness {
        workspace: Workspace,
        colors: ColorScheme,
        editor: EditorConfig,
    }

    impl Harness {
        fn new(text: &str) -> Self {
            Self {
                workspace: Workspace::with_content(Language::Python, text),
                colors: ColorScheme::default(),
                editor: EditorConfig::default(),
            }
        }

        fn press(&self, panel: &mut EditorPanel, event: KeyEvent) -> EventResponse {
            let ctx = ViewContext {
                workspace: &self.workspace,
                project: None,
                colors: &self.colors,
                editor: &self.editor,
                ai_activity: "",
            };
            panel.handle_key_event(event, &ctx).unwrap()
        }

        fn key(&self, panel: &mut EditorPanel, code: KeyCode) -> EventResponse {
            self.press(panel, KeyEvent::from(code))
        }
    }

    fn buffer_of(response: EventResponse) -> Vec<String> {
        match response {
            EventResponse::Dispatch(Action::ContentChanged(buffer)) => buffer.lines().to_vec(),
            other => panic!("expected content change, got {other:?}"),
        }
    }

    #[test]
    fn test_sync_loads_workspace_text_once_per_revision() {
        let h = Harness::new("a = 1\nb = 2");
        let mut panel = EditorPanel::new();
        panel.sync(&h.workspace);
        assert_eq!(panel.text(), "a = 1\nb = 2");

        h.key(&mut panel, KeyCode::Char('i'));
        h.key(&mut panel, KeyCode::Char('x'));
        panel.sync(&h.workspace);
        assert_eq!(panel.text(), "xa = 1\nb = 2");
    }

    #[test]
    fn test_insert_mode_edits_report_content() {
        let h = Harness::new("ab");
        let mut panel = EditorPanel::new();
        panel.sync(&h.workspace);

        assert!(matches!(h.key(&mut panel, KeyCode::Char('i')), EventResponse::Handled));
        assert_eq!(panel.mode(), EditorMode::Insert);
        h.key(&mut panel, KeyCode::Right);
        assert_eq!(buffer_of(h.key(&mut panel, KeyCode::Enter)), vec!["a", "b"]);
        assert_eq!(panel.cursor(), (2, 1));
        assert_eq!(buffer_of(h.key(&mut panel, KeyCode::Backspace)), vec!["ab"]);
        assert_eq!(buffer_of(h.key(&mut panel, KeyCode::Tab)), vec!["a    b"]);
        assert_eq!(buffer_of(h.key(&mut panel, KeyCode::Char('é'))), vec!["a    éb"]);
        assert_eq!(buffer_of(h.key(&mut panel, KeyCode::Delete)), vec!["a    é"]);

        h.key(&mut panel, KeyCode::Esc);
        assert_eq!(panel.mode(), EditorMode::Normal);
    }

    #[test]
    fn test_normal_mode_commands() {
        let h = Harness::new("a = 1\nb = 2\nc = 3");
        let mut panel = EditorPanel::new();
        panel.sync(&h.workspace);

        h.key(&mut panel, KeyCode::Char('j'));
        match h.key(&mut panel, KeyCode::Char('b')) {
            EventResponse::Dispatch(Action::ToggleBreakpoint(line)) => assert_eq!(line, 2),
            other => panic!("unexpected response: {other:?}"),
        }
        assert!(matches!(
            h.key(&mut panel, KeyCode::Char('n')),
            EventResponse::Dispatch(Action::Step)
        ));
        assert!(matches!(
            h.key(&mut panel, KeyCode::Char('f')),
            EventResponse::Command(Command::AiFix)
        ));
        match h.key(&mut panel, KeyCode::Char('L')) {
            EventResponse::Dispatch(Action::SelectLanguage(lang)) => {
                assert_eq!(lang, Language::Python.next())
            }
            other => panic!("unexpected response: {other:?}"),
        }
        assert!(matches!(
            h.press(&mut panel, KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            EventResponse::Command(Command::Save)
        ));
    }

    #[test]
    fn test_generate_prompt() {
        let h = Harness::new("");
        let mut panel = EditorPanel::new();
        h.key(&mut panel, KeyCode::Char('g'));
        assert_eq!(panel.mode(), EditorMode::Prompt);
        assert!(panel.captures_key(&KeyEvent::from(KeyCode::Char('q'))));

        for c in "sort a list".chars() {
            h.key(&mut panel, KeyCode::Char(c));
        }
        match h.key(&mut panel, KeyCode::Enter) {
            EventResponse::Command(Command::AiGenerate(p)) => assert_eq!(p, "sort a list"),
            other => panic!("unexpected response: {other:?}"),
        }
        assert_eq!(panel.mode(), EditorMode::Normal);
        assert!(!panel.captures_key(&KeyEvent::from(KeyCode::Char('q'))));
    }

    #[test]
    fn test_surface_decorations_and_reveal() {
        let text: Vec<String> = (1..=100).map(|i| format!("v{i} = {i}")).collect();
        let h = Harness::new(&text.join("\n"));
        let mut panel = EditorPanel::new();
        panel.sync(&h.workspace);

        panel.set_decorations(DecorationLayer::Breakpoints, &[3, 50]);
        panel.set_decorations(DecorationLayer::ExecutionLine, &[50]);
        panel.reveal_line(50);
        assert_eq!(panel.breakpoint_lines(), &[3, 50]);
        assert_eq!(panel.execution_lines(), &[50]);
        assert!(panel.first_visible_line() <= 50);
        assert!(panel.first_visible_line() + panel.viewport_height > 50);

        panel.clear_decorations(DecorationLayer::ExecutionLine);
        assert!(panel.execution_lines().is_empty());
    }
}
