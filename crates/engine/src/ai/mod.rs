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

//! AI request gateway.
//!
//! - [`prompt`] turns a structured [`AiRequest`] into prompt text
//! - [`client`] sends prompts to Ollama or Gemini
//! - [`fence`] pulls code out of fenced blocks in the reply

pub mod client;
pub mod fence;
pub mod prompt;

pub use client::{AiClient, AiConfig, AiError, AiProvider, GEMINI_KEY_HEADER};
pub use fence::{contains_code_block, extract_code_block};
pub use prompt::{build_prompt, AiRequest};
