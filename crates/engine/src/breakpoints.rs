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

//! Line breakpoints.
//!
//! Breakpoints are plain line numbers. They are never checked against the
//! buffer length: a breakpoint past the end of the file is kept but never
//! reached.

use crate::surface::{DecorationLayer, EditorSurface};
use std::collections::BTreeSet;
use tracing::debug;

/// Set of breakpoint lines (1-based), iterated in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakpointSet {
    lines: BTreeSet<usize>,
}

impl BreakpointSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the breakpoint on `line` and redraw the whole gutter layer.
    ///
    /// Returns `true` if the line holds a breakpoint afterwards.
    pub fn toggle(&mut self, line: usize, surface: &mut dyn EditorSurface) -> bool {
        let present = if self.lines.remove(&line) {
            false
        } else {
            self.lines.insert(line);
            true
        };

        debug!(line, present, "Toggled breakpoint");
        self.decorate(surface);
        present
    }

    /// Push the full set to the gutter layer of `surface`.
    pub fn decorate(&self, surface: &mut dyn EditorSurface) {
        let lines: Vec<usize> = self.lines.iter().copied().collect();
        surface.set_decorations(DecorationLayer::Breakpoints, &lines);
    }

    /// Whether `line` holds a breakpoint.
    pub fn contains(&self, line: usize) -> bool {
        self.lines.contains(&line)
    }

    /// Smallest breakpoint within `1..=line_count`.
    pub fn first_within(&self, line_count: usize) -> Option<usize> {
        self.lines.range(1..=line_count).next().copied()
    }

    /// Smallest breakpoint strictly after `line`, however far ahead.
    pub fn next_after(&self, line: usize) -> Option<usize> {
        self.lines.range(line + 1..).next().copied()
    }

    /// Breakpoints in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines.iter().copied()
    }

    /// Number of breakpoints.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl FromIterator<usize> for BreakpointSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self { lines: iter.into_iter().collect() }
    }
}
