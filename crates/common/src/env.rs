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

//! Environment variable name constants for Codepad configuration.
//!
//! # Environment Variables
//!
//! ## Configuration
//! - [`CODEPAD_CONFIG`] - Path of the TOML configuration file
//!
//! ## AI endpoint
//! - [`CODEPAD_AI_PROVIDER`] - Which backend to talk to
//! - [`CODEPAD_AI_ENDPOINT`] - Base URL of the backend
//! - [`CODEPAD_AI_MODEL`] - Model name sent to the backend
//! - [`GEMINI_API_KEY`] - Default variable holding the Gemini key

/// Environment variable pointing at the configuration file.
///
/// # Default
///
/// When not set, `~/.codepad.toml` is used and created with defaults on first
/// start.
pub const CODEPAD_CONFIG: &str = "CODEPAD_CONFIG";

/// Environment variable selecting the AI provider (`ollama` or `gemini`).
pub const CODEPAD_AI_PROVIDER: &str = "CODEPAD_AI_PROVIDER";

/// Environment variable overriding the AI endpoint base URL.
///
/// # Examples
///
/// ```bash
/// CODEPAD_AI_ENDPOINT=http://gpu-box:11434 codepad edit .
/// ```
pub const CODEPAD_AI_ENDPOINT: &str = "CODEPAD_AI_ENDPOINT";

/// Environment variable overriding the model name.
pub const CODEPAD_AI_MODEL: &str = "CODEPAD_AI_MODEL";

/// Environment variable read for the Gemini API key unless the configuration
/// names another one.
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
