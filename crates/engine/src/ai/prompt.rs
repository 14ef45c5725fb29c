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

//! Prompt construction.
//!
//! Every call to the AI endpoint is stateless: whatever context the model
//! needs is embedded in the prompt built here. Keeping this separate from
//! the HTTP client lets the wording be tested without a network.

use codepad_common::{Language, ValidationMarker};

/// A structured request for the AI endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiRequest {
    /// Repair the buffer so that `marker` goes away
    Fix {
        /// The diagnostic to resolve
        marker: ValidationMarker,
        /// Full buffer text
        code: String,
        /// Buffer language
        language: Language,
    },
    /// Write new code from a description
    Generate {
        /// What the user asked for
        prompt: String,
        /// Target language
        language: Language,
    },
    /// Answer a question about the buffer
    Ask {
        /// The user's question
        question: String,
        /// Full buffer text
        code: String,
        /// Buffer language
        language: Language,
    },
    /// Explain a piece of code
    Explain {
        /// Code to explain
        code: String,
        /// Its language
        language: Language,
    },
    /// Send the prompt verbatim
    Raw {
        /// Prompt text
        prompt: String,
    },
}

impl AiRequest {
    /// Short name for logs and spinners.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fix { .. } => "fix",
            Self::Generate { .. } => "generate",
            Self::Ask { .. } => "ask",
            Self::Explain { .. } => "explain",
            Self::Raw { .. } => "raw",
        }
    }

    /// Build the prompt text for this request.
    pub fn prompt(&self) -> String {
        build_prompt(self)
    }
}

/// Render `request` into the text sent to the model.
pub fn build_prompt(request: &AiRequest) -> String {
    match request {
        AiRequest::Fix { marker, code, language } => format!(
            "Solve the following issue in my code written in {language} and return only the \
             resolved code, without explanations or comments.\n\
             Issue (line {}, column {}): {}\n\
             My code:\n{code}",
            marker.start_line, marker.start_column, marker.message
        ),
        AiRequest::Generate { prompt, language } => format!(
            "Only return code, with no other text and no code block formatting, for the \
             following prompt using programming language {language}:\n{prompt}"
        ),
        AiRequest::Ask { question, code, language } => format!(
            "Answer precisely and without comments, with reference to the code provided. \
             Generate code only if asked, and if code is asked return nothing but code.\n\
             Question: {question}\n\
             Programming language: {language}\n\
             Code:\n{code}"
        ),
        AiRequest::Explain { code, language } => format!(
            "Explain the following code precisely and very briefly.\n\
             Programming language: {language}\n\
             Code:\n{code}"
        ),
        AiRequest::Raw { prompt } => prompt.clone(),
    }
}
