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

//! Files panel
//!
//! Shows the project forest as an indented tree. Folders expand and
//! collapse in place; choosing a file asks the app to open it. New files
//! and folders are named in an input line at the bottom of the panel.

use super::{is_navigation_key, Command, EventResponse, PanelTr, PanelType, ViewContext};
use crate::ui::{BorderPresets, Icons};
use codepad_common::{FileNode, NodeKind};
use codepad_engine::{Project, ROOT_ID};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use eyre::Result;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};
use std::collections::HashSet;
use tracing::debug;

/// One visible line of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
struct TreeRow {
    id: String,
    name: String,
    depth: usize,
    kind: NodeKind,
    parent_id: Option<String>,
    expanded: bool,
}

/// Pending name for a new node
#[derive(Debug, Clone)]
struct NameInput {
    kind: NodeKind,
    parent_id: String,
    buffer: String,
}

/// Files panel implementation
#[derive(Debug)]
pub struct FilesPanel {
    expanded: HashSet<String>,
    selected: String,
    input: Option<NameInput>,
    focused: bool,
}

impl FilesPanel {
    /// Create a panel with only the root expanded
    pub fn new() -> Self {
        Self {
            expanded: HashSet::from([ROOT_ID.to_string()]),
            selected: ROOT_ID.to_string(),
            input: None,
            focused: false,
        }
    }

    #[cfg(test)]
    fn selected(&self) -> &str {
        &self.selected
    }

    #[cfg(test)]
    fn is_naming(&self) -> bool {
        self.input.is_some()
    }

    /// Select `id` and expand every folder above it
    pub fn reveal(&mut self, project: &Project, id: &str) {
        let mut parent = project.find(id).and_then(|n| n.parent_id.clone());
        while let Some(parent_id) = parent {
            parent = project.find(&parent_id).and_then(|n| n.parent_id.clone());
            self.expanded.insert(parent_id);
        }
        self.selected = id.to_string();
    }

    fn rows(&self, project: &Project) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        self.push_rows(project, project.root(), 0, &mut rows);
        rows
    }

    fn push_rows(
        &self,
        project: &Project,
        node: &FileNode,
        depth: usize,
        rows: &mut Vec<TreeRow>,
    ) {
        let expanded = node.is_folder() && self.expanded.contains(&node.id);
        rows.push(TreeRow {
            id: node.id.clone(),
            name: node.name.clone(),
            depth,
            kind: node.kind,
            parent_id: node.parent_id.clone(),
            expanded,
        });
        if expanded {
            for child in project.children(&node.id) {
                self.push_rows(project, child, depth + 1, rows);
            }
        }
    }

    fn selected_index(&self, rows: &[TreeRow]) -> usize {
        rows.iter().position(|r| r.id == self.selected).unwrap_or(0)
    }

    /// Folder that new nodes go into: the selection itself or its parent
    fn target_folder(&self, rows: &[TreeRow]) -> String {
        match rows.get(self.selected_index(rows)) {
            Some(row) if row.kind == NodeKind::Folder => row.id.clone(),
            Some(row) => row.parent_id.clone().unwrap_or_else(|| ROOT_ID.to_string()),
            None => ROOT_ID.to_string(),
        }
    }

    fn handle_input(&mut self, event: KeyEvent) -> EventResponse {
        let Some(input) = self.input.as_mut() else {
            return EventResponse::NotHandled;
        };
        match event.code {
            KeyCode::Esc => self.input = None,
            KeyCode::Backspace => {
                input.buffer.pop();
            }
            KeyCode::Char(c) => input.buffer.push(c),
            KeyCode::Enter => {
                let Some(input) = self.input.take() else {
                    return EventResponse::Handled;
                };
                let name = input.buffer.trim().to_string();
                if name.is_empty() {
                    return EventResponse::Handled;
                }
                self.expanded.insert(input.parent_id.clone());
                let command = match input.kind {
                    NodeKind::File => Command::CreateFile { parent_id: input.parent_id, name },
                    NodeKind::Folder => Command::CreateFolder { parent_id: input.parent_id, name },
                };
                return EventResponse::Command(command);
            }
            _ => return EventResponse::NotHandled,
        }
        EventResponse::Handled
    }
}

impl Default for FilesPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelTr for FilesPanel {
    fn panel_type(&self) -> PanelType {
        PanelType::Files
    }

    fn title(&self, ctx: &ViewContext<'_>) -> String {
        match ctx.project {
            Some(project) => format!("Files - {}", project.root().name),
            None => "Files".to_string(),
        }
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ctx: &ViewContext<'_>) {
        let block = BorderPresets::side(self.focused, self.title(ctx), ctx.colors);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(project) = ctx.project else {
            let hint = Paragraph::new(Line::from(Span::styled(
                "No project open",
                Style::default().fg(ctx.colors.help_text()),
            )));
            frame.render_widget(hint, inner);
            return;
        };

        let (list_area, input_area) = if self.input.is_some() && inner.height > 1 {
            let list = Rect { height: inner.height - 1, ..inner };
            let input = Rect { y: inner.y + inner.height - 1, height: 1, ..inner };
            (list, Some(input))
        } else {
            (inner, None)
        };

        let rows = self.rows(project);
        let open_id = ctx.workspace.open_file().map(|f| f.id.as_str());
        let items: Vec<ListItem<'_>> = rows
            .iter()
            .map(|row| {
                let icon = match (row.kind, row.expanded) {
                    (NodeKind::Folder, true) => Icons::EXPANDED,
                    (NodeKind::Folder, false) => Icons::COLLAPSED,
                    (NodeKind::File, _) => Icons::FILE,
                };
                let mut style = Style::default();
                if row.kind == NodeKind::Folder {
                    style = style.fg(ctx.colors.info());
                }
                if open_id == Some(row.id.as_str()) {
                    style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                }
                ListItem::new(Line::from(Span::styled(
                    format!("{}{icon} {}", "  ".repeat(row.depth), row.name),
                    style,
                )))
            })
            .collect();

        let highlight = if self.focused {
            Style::default().bg(ctx.colors.selected_bg()).fg(ctx.colors.selected_fg())
        } else {
            Style::default().add_modifier(Modifier::REVERSED)
        };
        let list = List::new(items).highlight_style(highlight);
        let mut state = ListState::default().with_selected(Some(self.selected_index(&rows)));
        frame.render_stateful_widget(list, list_area, &mut state);

        if let (Some(input), Some(input_area)) = (&self.input, input_area) {
            let label = match input.kind {
                NodeKind::File => "New file: ",
                NodeKind::Folder => "New folder: ",
            };
            let line = Line::from(vec![
                Span::styled(label, Style::default().fg(ctx.colors.help_text())),
                Span::raw(input.buffer.clone()),
                Span::styled(Icons::CURSOR, Style::default().fg(ctx.colors.info())),
            ]);
            frame.render_widget(Paragraph::new(line), input_area);
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
        if self.input.is_some() {
            return Ok(self.handle_input(event));
        }
        let Some(project) = ctx.project else {
            return Ok(EventResponse::NotHandled);
        };

        let rows = self.rows(project);
        let index = self.selected_index(&rows);
        let Some(row) = rows.get(index) else {
            return Ok(EventResponse::NotHandled);
        };

        let response = match event.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = rows[index.saturating_sub(1)].id.clone();
                EventResponse::Handled
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = rows[(index + 1).min(rows.len() - 1)].id.clone();
                EventResponse::Handled
            }
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => match row.kind {
                NodeKind::File => EventResponse::Command(Command::OpenNode(row.id.clone())),
                NodeKind::Folder if row.expanded && event.code == KeyCode::Enter => {
                    self.expanded.remove(&row.id);
                    EventResponse::Handled
                }
                NodeKind::Folder => {
                    self.expanded.insert(row.id.clone());
                    EventResponse::Handled
                }
            },
            KeyCode::Left | KeyCode::Char('h') => {
                if row.expanded {
                    self.expanded.remove(&row.id);
                } else if let Some(parent) = &row.parent_id {
                    self.selected = parent.clone();
                }
                EventResponse::Handled
            }
            KeyCode::Char(c @ ('a' | 'A')) => {
                let kind = if c == 'a' { NodeKind::File } else { NodeKind::Folder };
                let parent_id = self.target_folder(&rows);
                debug!(?kind, %parent_id, "Naming new node");
                self.input = Some(NameInput { kind, parent_id, buffer: String::new() });
                EventResponse::Handled
            }
            KeyCode::Char('r') => EventResponse::Command(Command::RefreshProject),
            _ => EventResponse::NotHandled,
        };
        Ok(response)
    }

    fn captures_key(&self, event: &KeyEvent) -> bool {
        self.input.is_some() && !is_navigation_key(event)
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
    use codepad_engine::Workspace;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> (TempDir, Project) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/main.rs"), "fn main() {}\n").unwrap();
        fs::write(dir.path().join("README.md"), "# demo\n").unwrap();
        let project = Project::open(dir.path()).unwrap();
        (dir, project)
    }

    fn press(panel: &mut FilesPanel, project: &Project, code: KeyCode) -> EventResponse {
        let workspace = Workspace::new(Language::PlainText);
        let colors = ColorScheme::default();
        let editor = EditorConfig::default();
        let ctx = ViewContext {
            workspace: &workspace,
            project: Some(project),
            colors: &colors,
            editor: &editor,
            ai_activity: "",
        };
        panel.handle_key_event(KeyEvent::from(code), &ctx).unwrap()
    }

    fn names(panel: &FilesPanel, project: &Project) -> Vec<String> {
        panel.rows(project).into_iter().map(|r| r.name).collect()
    }

    #[test]
    fn test_expand_and_open() {
        let (_dir, project) = project();
        let mut panel = FilesPanel::new();
        let root = project.root().name.clone();
        assert_eq!(names(&panel, &project), vec![root.clone(), "README.md".into(), "src".into()]);

        press(&mut panel, &project, KeyCode::Down);
        press(&mut panel, &project, KeyCode::Down);
        assert_eq!(panel.selected(), "root/src");
        press(&mut panel, &project, KeyCode::Enter);
        assert_eq!(
            names(&panel, &project),
            vec![root, "README.md".into(), "src".into(), "main.rs".into()]
        );

        press(&mut panel, &project, KeyCode::Down);
        match press(&mut panel, &project, KeyCode::Enter) {
            EventResponse::Command(Command::OpenNode(id)) => assert_eq!(id, "root/src/main-rs"),
            other => panic!("unexpected response: {other:?}"),
        }

        press(&mut panel, &project, KeyCode::Left);
        assert_eq!(panel.selected(), "root/src");
        press(&mut panel, &project, KeyCode::Left);
        assert_eq!(names(&panel, &project).len(), 3);
    }

    #[test]
    fn test_new_file_goes_into_selected_folder() {
        let (_dir, project) = project();
        let mut panel = FilesPanel::new();
        panel.reveal(&project, "root/src/main-rs");
        assert_eq!(panel.selected(), "root/src/main-rs");

        press(&mut panel, &project, KeyCode::Char('a'));
        assert!(panel.is_naming());
        assert!(panel.captures_key(&KeyEvent::from(KeyCode::Char('q'))));
        for c in "lib.rs".chars() {
            press(&mut panel, &project, KeyCode::Char(c));
        }
        match press(&mut panel, &project, KeyCode::Enter) {
            EventResponse::Command(Command::CreateFile { parent_id, name }) => {
                assert_eq!(parent_id, "root/src");
                assert_eq!(name, "lib.rs");
            }
            other => panic!("unexpected response: {other:?}"),
        }
        assert!(!panel.is_naming());
    }

    #[test]
    fn test_new_folder_cancelled() {
        let (_dir, project) = project();
        let mut panel = FilesPanel::new();
        press(&mut panel, &project, KeyCode::Char('A'));
        press(&mut panel, &project, KeyCode::Char('x'));
        assert!(matches!(press(&mut panel, &project, KeyCode::Esc), EventResponse::Handled));
        assert!(!panel.is_naming());
        assert!(matches!(
            press(&mut panel, &project, KeyCode::Char('r')),
            EventResponse::Command(Command::RefreshProject)
        ));
    }
}
