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

//! Debug command - run the simulated debugger without a terminal UI

use codepad_common::Language;
use codepad_engine::{Action, NullSurface, Outcome, StartOutcome, StepOutcome, Workspace};
use eyre::{bail, Result, WrapErr};
use std::{fs, path::Path};

/// Validate `file`, start a session and step until it finishes or `steps`
/// steps were taken, then print the log and the variables
pub fn debug_file(
    file: &Path,
    language: Option<Language>,
    breakpoints: &[usize],
    steps: Option<usize>,
) -> Result<()> {
    let text = fs::read_to_string(file)
        .wrap_err_with(|| format!("Failed to read {}", file.display()))?;
    let language = language.unwrap_or_else(|| {
        Language::from_file_name(&file.file_name().map(|n| n.to_string_lossy()).unwrap_or_default())
    });
    tracing::info!(file = %file.display(), %language, "Starting headless debug session");

    let mut surface = NullSurface;
    let mut workspace = Workspace::with_content(language, &text);
    for line in breakpoints {
        (workspace, _) = workspace.apply(Action::ToggleBreakpoint(*line), &mut surface);
    }

    let (next, outcome) = workspace.apply(Action::StartDebugging, &mut surface);
    workspace = next;
    if let Outcome::Started(StartOutcome::RefusedDueToErrors { count }) = outcome {
        for marker in workspace.markers() {
            eprintln!(
                "{}:{}:{}: {}",
                file.display(),
                marker.start_line,
                marker.start_column,
                marker.message
            );
        }
        print!("{}", render_log(&workspace));
        bail!("{count} syntax issue(s) in {}", file.display());
    }

    let mut taken = 0;
    while steps.is_none_or(|limit| taken < limit) {
        let (next, outcome) = workspace.apply(Action::Step, &mut surface);
        workspace = next;
        taken += 1;
        if !matches!(outcome, Outcome::Stepped(StepOutcome::Moved(_))) {
            break;
        }
    }

    print!("{}", render_log(&workspace));
    if let Some(line) = workspace.session().current_line() {
        println!("Paused at line {line}");
    }
    println!();
    print!("{}", render_variables(&workspace));
    Ok(())
}

fn render_log(workspace: &Workspace) -> String {
    workspace.session().output().iter().map(|line| format!("{line}\n")).collect()
}

/// Variables as an aligned three-column table
fn render_variables(workspace: &Workspace) -> String {
    let variables = workspace.session().variables();
    if variables.is_empty() {
        return "No variables\n".to_string();
    }

    let name_width = variables.iter().map(|v| v.name.len()).max().unwrap_or(0).max(4);
    let mut out = format!("{:>4}  {:<name_width$}  VALUE\n", "LINE", "NAME");
    for var in variables {
        out.push_str(&format!("{:>4}  {:<name_width$}  {}\n", var.line, var.name, var.value));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_table_alignment() {
        let workspace =
            Workspace::with_content(Language::JavaScript, "let total = 1;\nconst x = 'a';");
        let (workspace, _) = workspace.apply(Action::StartDebugging, &mut NullSurface);

        let table = render_variables(&workspace);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "LINE  NAME   VALUE");
        assert_eq!(lines[1], "   1  total  1");
        assert_eq!(lines[2], "   2  x      'a'");
    }

    #[test]
    fn test_no_variables() {
        let workspace = Workspace::with_content(Language::PlainText, "hello");
        assert_eq!(render_variables(&workspace), "No variables\n");
    }
}
