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

//! Debug panel
//!
//! Three stacked views of the simulated run: validation issues for the
//! current buffer, the session's output log and the variables extracted
//! when the session started.

use super::{EventResponse, PanelTr, PanelType, ViewContext};
use crate::ui::{BorderPresets, Icons};
use codepad_engine::{Action, MSG_REFUSED};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use eyre::Result;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

/// Debug panel implementation
#[derive(Debug, Default)]
pub struct DebugPanel {
    /// First variable row shown
    variable_scroll: usize,
    focused: bool,
}

impl DebugPanel {
    /// Create a new debug panel
    pub fn new() -> Self {
        Self::default()
    }

    fn section(&self, title: &str, ctx: &ViewContext<'_>) -> Block<'static> {
        Block::default()
            .title(title.to_string())
            .borders(Borders::TOP)
            .border_style(Style::default().fg(ctx.colors.unfocused_border()))
    }

    fn render_issues(&self, frame: &mut Frame<'_>, area: Rect, ctx: &ViewContext<'_>) {
        let markers = ctx.workspace.markers();
        let lines: Vec<Line<'static>> = if markers.is_empty() {
            vec![Line::from(Span::styled(
                format!("{} No issues", Icons::SUCCESS),
                Style::default().fg(ctx.colors.success()),
            ))]
        } else {
            markers
                .iter()
                .map(|m| {
                    Line::from(vec![
                        Span::styled(
                            format!("{} {}:{} ", Icons::WARNING, m.start_line, m.start_column),
                            Style::default().fg(ctx.colors.warning()),
                        ),
                        Span::raw(m.message.clone()),
                    ])
                })
                .collect()
        };
        let title = format!("Issues ({})", markers.len());
        frame.render_widget(Paragraph::new(lines).block(self.section(&title, ctx)), area);
    }

    fn render_output(&self, frame: &mut Frame<'_>, area: Rect, ctx: &ViewContext<'_>) {
        let output = ctx.workspace.session().output();
        let inner_height = area.height.saturating_sub(1) as usize;
        let skip = output.len().saturating_sub(inner_height);
        let lines: Vec<Line<'static>> = output
            .iter()
            .skip(skip)
            .map(|line| {
                let style = if line == MSG_REFUSED {
                    Style::default().fg(ctx.colors.error())
                } else {
                    Style::default().fg(ctx.colors.info())
                };
                Line::from(Span::styled(line.clone(), style))
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).block(self.section("Output", ctx)), area);
    }

    fn render_variables(&mut self, frame: &mut Frame<'_>, area: Rect, ctx: &ViewContext<'_>) {
        let variables = ctx.workspace.session().variables();
        self.variable_scroll = self.variable_scroll.min(variables.len().saturating_sub(1));

        let current = ctx.workspace.session().current_line();
        let rows = variables.iter().skip(self.variable_scroll).map(|v| {
            let style = if Some(v.line) == current {
                Style::default().add_modifier(Modifier::BOLD).fg(ctx.colors.success())
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(v.line.to_string()),
                Cell::from(v.name.clone()),
                Cell::from(v.value.as_str().to_string()),
            ])
            .style(style)
        });

        let header = Row::new(vec!["Line", "Name", "Value"])
            .style(Style::default().fg(ctx.colors.help_text()).add_modifier(Modifier::BOLD));
        let table = Table::new(
            rows,
            [Constraint::Length(6), Constraint::Percentage(30), Constraint::Fill(1)],
        )
        .header(header)
        .block(self.section(&format!("Variables ({})", variables.len()), ctx));
        frame.render_widget(table, area);
    }
}

impl PanelTr for DebugPanel {
    fn panel_type(&self) -> PanelType {
        PanelType::Debug
    }

    fn title(&self, ctx: &ViewContext<'_>) -> String {
        match ctx.workspace.session().current_line() {
            Some(line) => format!("Debug {} line {line}", Icons::CURRENT_LINE),
            None => "Debug".to_string(),
        }
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ctx: &ViewContext<'_>) {
        let block = BorderPresets::side(self.focused, self.title(ctx), ctx.colors);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let issue_rows = ctx.workspace.markers().len().clamp(1, 4) as u16 + 1;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(issue_rows),
                Constraint::Min(2),
                Constraint::Percentage(45),
            ])
            .split(inner);

        self.render_issues(frame, chunks[0], ctx);
        self.render_output(frame, chunks[1], ctx);
        self.render_variables(frame, chunks[2], ctx);
    }

    fn handle_key_event(
        &mut self,
        event: KeyEvent,
        _ctx: &ViewContext<'_>,
    ) -> Result<EventResponse> {
        if event.kind != KeyEventKind::Press {
            return Ok(EventResponse::NotHandled);
        }
        let response = match event.code {
            KeyCode::Char('s') => EventResponse::Dispatch(Action::StartDebugging),
            KeyCode::Char('n') => EventResponse::Dispatch(Action::Step),
            KeyCode::Char('x') => EventResponse::Dispatch(Action::StopDebugging),
            KeyCode::Up | KeyCode::Char('k') => {
                self.variable_scroll = self.variable_scroll.saturating_sub(1);
                EventResponse::Handled
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.variable_scroll += 1;
                EventResponse::Handled
            }
            _ => EventResponse::NotHandled,
        };
        Ok(response)
    }

    fn on_focus(&mut self) {
        self.focused = true;
    }

    fn on_blur(&mut self) {
        self.focused = false;
    }
}
