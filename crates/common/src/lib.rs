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

//! Codepad Common - Shared functionality for Codepad components
//!
//! This crate holds the data model passed between the engine, the terminal
//! UI and the command line, plus the logging setup every binary uses.

/// Environment variable names recognized by Codepad
pub mod env;
/// Logging setup and utilities for consistent logging across Codepad components
pub mod logging;
/// Plain data types: languages, buffers, variables, markers, files, chat messages
pub mod types;

pub use types::*;
