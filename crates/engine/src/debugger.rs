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

//! Simulated step-through session.
//!
//! Nothing is executed. A session walks a line pointer over a frozen copy of
//! the buffer, jumping to the next breakpoint when one lies ahead, and shows
//! the assignments the [extractor](crate::extract) found.
//!
//! ```text
//!          start (no markers)             step past last line / stop
//!   Idle ───────────────────────▶ Running ───────────────────────────▶ Idle
//!     ▲  start (markers present)    │ step
//!     └──────── refused ────────────┘ (next line or next breakpoint)
//! ```
//!
//! None of the operations fail. Unmet preconditions are no-ops or a short
//! line in the output log, reported through [`StartOutcome`] and
//! [`StepOutcome`].

use crate::{
    breakpoints::BreakpointSet,
    extract::extract,
    surface::{DecorationLayer, EditorSurface},
};
use codepad_common::{Language, SourceBuffer, ValidationMarker, VariableRecord};
use tracing::{debug, info};

/// Log line written when a session starts.
pub const MSG_STARTED: &str = "Debugging started...";
/// Log line written when a session ends.
pub const MSG_FINISHED: &str = "Debugging finished";
/// Log line written when validation markers block a start.
pub const MSG_REFUSED: &str = "Cannot start debugging with syntax errors";

/// Result of [`DebugSession::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The session is running, positioned on `line`
    Started {
        /// First line visited
        line: usize,
    },
    /// Validation markers were present; the session is idle
    RefusedDueToErrors {
        /// Number of markers that blocked the start
        count: usize,
    },
    /// A session was already running and was left untouched
    AlreadyActive,
}

/// Result of [`DebugSession::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The pointer moved to this line
    Moved(usize),
    /// No line remained; the session stopped
    Finished,
    /// No session was running
    Inactive,
}

/// State of the simulated run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugSession {
    active: bool,
    current_line: Option<usize>,
    output: Vec<String>,
    variables: Vec<VariableRecord>,
    frozen: SourceBuffer,
}

impl DebugSession {
    /// An idle session with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a run over `buffer`.
    ///
    /// Any validation marker refuses the start: the session is reset to
    /// idle and the log holds only the refusal line. Otherwise the buffer is
    /// frozen, the log restarts with a single line, variables are extracted
    /// for `language` and the pointer is placed on the first breakpoint that
    /// lies inside the buffer, or on line 1 when there is none.
    pub fn start(
        &mut self,
        buffer: &SourceBuffer,
        language: Language,
        markers: &[ValidationMarker],
        breakpoints: &BreakpointSet,
        surface: &mut dyn EditorSurface,
    ) -> StartOutcome {
        if !markers.is_empty() {
            info!(count = markers.len(), "Refusing to start: buffer has validation markers");
            let was_active = self.active;
            self.active = false;
            self.current_line = None;
            self.output = vec![MSG_REFUSED.to_string()];
            if was_active {
                surface.clear_decorations(DecorationLayer::ExecutionLine);
            }
            return StartOutcome::RefusedDueToErrors { count: markers.len() };
        }

        if self.active {
            debug!("Start requested while a session is running");
            return StartOutcome::AlreadyActive;
        }

        self.frozen = buffer.clone();
        let line_count = self.frozen.line_count();
        let line = breakpoints.first_within(line_count).unwrap_or(1);

        self.active = true;
        self.current_line = Some(line);
        self.output = vec![MSG_STARTED.to_string()];
        self.variables = extract(self.frozen.lines(), language);

        info!(line, line_count, variables = self.variables.len(), "Debug session started");
        surface.reveal_line(line);
        surface.set_decorations(DecorationLayer::ExecutionLine, &[line]);

        StartOutcome::Started { line }
    }

    /// Advance one step.
    ///
    /// The next line is `current + 1` unless a breakpoint lies further
    /// ahead, in which case the pointer jumps straight to the nearest one.
    /// A target past the last line stops the session.
    pub fn step(
        &mut self,
        breakpoints: &BreakpointSet,
        surface: &mut dyn EditorSurface,
    ) -> StepOutcome {
        let Some(current) = self.current_line.filter(|_| self.active) else {
            return StepOutcome::Inactive;
        };

        let line_count = self.frozen.line_count();
        let next = breakpoints.next_after(current).unwrap_or(current + 1);

        if next > line_count {
            self.stop(surface);
            return StepOutcome::Finished;
        }

        self.current_line = Some(next);
        self.output.push(format!("Executing line {next}"));
        debug!(from = current, to = next, "Stepped");

        surface.reveal_line(next);
        surface.set_decorations(DecorationLayer::ExecutionLine, &[next]);

        StepOutcome::Moved(next)
    }

    /// End the run. Calling it on an idle session does nothing.
    pub fn stop(&mut self, surface: &mut dyn EditorSurface) {
        if !self.active {
            return;
        }

        self.active = false;
        self.current_line = None;
        self.output.push(MSG_FINISHED.to_string());
        info!("Debug session finished");

        surface.clear_decorations(DecorationLayer::ExecutionLine);
    }

    /// Whether a run is in progress.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Line the run is on, `None` while idle.
    pub fn current_line(&self) -> Option<usize> {
        self.current_line
    }

    /// Log lines, oldest first.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// The log joined into a single string.
    pub fn output_text(&self) -> String {
        self.output.join("\n")
    }

    /// Variables extracted at the last successful start.
    pub fn variables(&self) -> &[VariableRecord] {
        &self.variables
    }

    /// Buffer frozen at the last successful start.
    pub fn frozen(&self) -> &SourceBuffer {
        &self.frozen
    }
}
