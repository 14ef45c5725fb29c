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

//! The editor widget as seen from the engine.
//!
//! The engine never draws anything. It asks whatever implements
//! [`EditorSurface`] to scroll to a line or to replace the set of decorated
//! lines for one layer.

/// A group of line decorations that is always replaced as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecorationLayer {
    /// Breakpoint markers in the gutter
    Breakpoints,
    /// The line the simulated run is on
    ExecutionLine,
}

/// Operations the engine may request from the editor widget.
pub trait EditorSurface {
    /// Scroll so that `line` (1-based) is visible.
    fn reveal_line(&mut self, line: usize);

    /// Replace every decoration of `layer` with one per entry of `lines`.
    fn set_decorations(&mut self, layer: DecorationLayer, lines: &[usize]);

    /// Remove every decoration of `layer`.
    fn clear_decorations(&mut self, layer: DecorationLayer) {
        self.set_decorations(layer, &[]);
    }
}

/// A surface that ignores every request. Used by headless callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl EditorSurface for NullSurface {
    fn reveal_line(&mut self, _line: usize) {}

    fn set_decorations(&mut self, _layer: DecorationLayer, _lines: &[usize]) {}
}

/// A surface that remembers the last state of each layer.
///
/// Handy for headless front ends and for tests that need to check what the
/// editor would show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSurface {
    /// Lines passed to [`EditorSurface::reveal_line`], oldest first
    pub revealed: Vec<usize>,
    /// Current breakpoint decorations
    pub breakpoints: Vec<usize>,
    /// Current execution line decorations
    pub execution: Vec<usize>,
}

impl EditorSurface for RecordingSurface {
    fn reveal_line(&mut self, line: usize) {
        self.revealed.push(line);
    }

    fn set_decorations(&mut self, layer: DecorationLayer, lines: &[usize]) {
        let target = match layer {
            DecorationLayer::Breakpoints => &mut self.breakpoints,
            DecorationLayer::ExecutionLine => &mut self.execution,
        };
        *target = lines.to_vec();
    }
}
