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

//! Codepad engine: everything the editor does that is not drawing.
//!
//! The front ends (terminal UI and CLI) own a [`Workspace`] and talk to the
//! editor widget through [`EditorSurface`]; network and disk access live in
//! [`ai`] and [`project`].

pub mod ai;
pub use ai::*;

pub mod breakpoints;
pub use breakpoints::*;

pub mod debugger;
pub use debugger::*;

pub mod extract;
pub use extract::*;

pub mod project;
pub use project::*;

pub mod state;
pub use state::*;

pub mod surface;
pub use surface::*;

pub mod validate;
pub use validate::*;
