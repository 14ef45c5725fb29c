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

//! End-to-end simulated debugging through the workspace reducer

use codepad_common::{Language, SourceBuffer, VariableValue};
use codepad_engine::{
    Action, BreakpointSet, DebugSession, NullSurface, Outcome, RecordingSurface, StartOutcome,
    StepOutcome, Workspace, MSG_FINISHED, MSG_STARTED,
};
use tracing::info;

fn run_to_end(mut ws: Workspace, surface: &mut RecordingSurface) -> (Workspace, Vec<usize>) {
    let mut visited = Vec::new();
    let (next, outcome) = ws.apply(Action::StartDebugging, surface);
    ws = next;
    if let Outcome::Started(StartOutcome::Started { line }) = outcome {
        visited.push(line);
    }

    loop {
        let (next, outcome) = ws.apply(Action::Step, surface);
        ws = next;
        match outcome {
            Outcome::Stepped(StepOutcome::Moved(line)) => visited.push(line),
            _ => break,
        }
    }
    (ws, visited)
}

#[test]
fn test_linear_walk_without_breakpoints() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    for n in 1..=6 {
        let text = (1..=n).map(|i| format!("x{i} = {i}")).collect::<Vec<_>>().join("\n");
        let ws = Workspace::with_content(Language::Python, &text);
        let mut surface = RecordingSurface::default();

        let (ws, visited) = run_to_end(ws, &mut surface);
        assert_eq!(visited, (1..=n).collect::<Vec<_>>());
        assert_eq!(ws.session().current_line(), None);
        assert!(!ws.session().is_active());
        assert!(surface.execution.is_empty());
    }
}

#[test]
fn test_breakpoints_fast_forward() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let text = (1..=20).map(|i| format!("let v{i} = {i};")).collect::<Vec<_>>().join("\n");
    let mut ws = Workspace::with_content(Language::JavaScript, &text);
    let mut surface = RecordingSurface::default();
    for line in [4, 15, 99] {
        ws = ws.apply(Action::ToggleBreakpoint(line), &mut surface).0;
    }
    assert_eq!(surface.breakpoints, vec![4, 15, 99]);

    let (ws, visited) = run_to_end(ws, &mut surface);
    // 99 is the next target after 15 and lies past the end
    assert_eq!(visited, vec![4, 15]);
    assert_eq!(ws.session().variables().len(), 20);
    assert_eq!(ws.session().output().first().map(String::as_str), Some(MSG_STARTED));
    assert_eq!(ws.session().output().last().map(String::as_str), Some(MSG_FINISHED));
}

#[test]
fn test_unreachable_breakpoint_starts_on_line_one() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let buffer = SourceBuffer::from_lines(["a", "b", "c"]);
    let breakpoints: BreakpointSet = [5].into_iter().collect();
    let mut session = DebugSession::new();

    let outcome =
        session.start(&buffer, Language::PlainText, &[], &breakpoints, &mut NullSurface);
    assert_eq!(outcome, StartOutcome::Started { line: 1 });
    assert_eq!(session.step(&breakpoints, &mut NullSurface), StepOutcome::Finished);
    assert_eq!(session.current_line(), None);
    assert!(!session.is_active());
}

#[test]
fn test_step_to_breakpoint_past_end_finishes() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let buffer = SourceBuffer::from_lines(["a", "b", "c"]);
    let breakpoints: BreakpointSet = [2, 5].into_iter().collect();
    let mut session = DebugSession::new();

    let outcome =
        session.start(&buffer, Language::PlainText, &[], &breakpoints, &mut NullSurface);
    assert_eq!(outcome, StartOutcome::Started { line: 2 });
    assert_eq!(session.step(&breakpoints, &mut NullSurface), StepOutcome::Finished);
    assert_eq!(session.output().last().map(String::as_str), Some(MSG_FINISHED));
}

#[test]
fn test_variables_are_raw_text_and_not_deduplicated() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let ws = Workspace::with_content(Language::JavaScript, "let x = 5;\nlet x = x * 2;\nx++;");
    let (ws, _) = ws.apply(Action::StartDebugging, &mut NullSurface);

    let vars = ws.session().variables();
    assert_eq!(vars.len(), 2);
    assert_eq!(vars[0].name, "x");
    assert_eq!(vars[0].value, VariableValue::RawText("5".to_string()));
    assert_eq!(vars[1].value.as_str(), "x * 2");
    assert_eq!(vars[1].line, 2);
}

#[test]
fn test_edits_during_session_do_not_affect_frozen_buffer() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let ws = Workspace::with_content(Language::Python, "a = 1\nb = 2");
    let (ws, _) = ws.apply(Action::StartDebugging, &mut NullSurface);
    let (ws, _) = ws.apply(
        Action::ContentChanged(SourceBuffer::from_text("a = 1\nb = 2\nc = 3\nd = 4")),
        &mut NullSurface,
    );

    assert_eq!(ws.session().frozen().line_count(), 2);
    let (ws, outcome) = ws.apply(Action::Step, &mut NullSurface);
    assert_eq!(outcome, Outcome::Stepped(StepOutcome::Moved(2)));
    let (_, outcome) = ws.apply(Action::Step, &mut NullSurface);
    assert_eq!(outcome, Outcome::Stepped(StepOutcome::Finished));
}
