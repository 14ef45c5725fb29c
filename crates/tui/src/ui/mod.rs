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

//! UI utilities and visual components
//!
//! Reusable widgets and visual helpers shared by the panels: borders,
//! icons, spinners, status line pieces and syntax highlighting.

pub mod borders;
pub mod icons;
pub mod spinner;
pub mod status;
pub mod syntax;

pub use borders::BorderPresets;
pub use icons::Icons;
pub use spinner::{AiSpinner, Spinner, SpinnerStyles};
pub use status::{AiStatus, FileStatus, SessionStatus, StatusBar};
pub use syntax::SyntaxHighlighter;
