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

//! Core data types shared by the engine, the TUI and the CLI.
//!
//! Everything in this module is plain data: no I/O, no locking. Values are
//! created by the engine and handed to the UI layer, which owns them.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr};

/// Languages the editor knows about.
///
/// Only a subset of them has a variable extraction pattern; see
/// `codepad_engine::extract` for details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// JavaScript (and JSX)
    #[default]
    JavaScript,
    /// TypeScript (and TSX)
    TypeScript,
    /// Python
    Python,
    /// Java
    Java,
    /// C
    C,
    /// C++
    Cpp,
    /// C#
    CSharp,
    /// Go
    Go,
    /// Ruby
    Ruby,
    /// PHP
    Php,
    /// Rust
    Rust,
    /// Swift
    Swift,
    /// Kotlin
    Kotlin,
    /// SQL
    Sql,
    /// HTML
    Html,
    /// CSS
    Css,
    /// JSON
    Json,
    /// Markdown
    Markdown,
    /// YAML
    Yaml,
    /// XML
    Xml,
    /// Shell scripts
    Shell,
    /// Anything else
    PlainText,
}

impl Language {
    /// Every language, in the order the language picker cycles through them.
    pub const ALL: [Self; 22] = [
        Self::JavaScript,
        Self::TypeScript,
        Self::Python,
        Self::Java,
        Self::C,
        Self::Cpp,
        Self::CSharp,
        Self::Go,
        Self::Ruby,
        Self::Php,
        Self::Rust,
        Self::Swift,
        Self::Kotlin,
        Self::Sql,
        Self::Html,
        Self::Css,
        Self::Json,
        Self::Markdown,
        Self::Yaml,
        Self::Xml,
        Self::Shell,
        Self::PlainText,
    ];

    /// Lowercase identifier used in prompts, config files and the CLI.
    pub fn id(&self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Python => "python",
            Self::Java => "java",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::CSharp => "csharp",
            Self::Go => "go",
            Self::Ruby => "ruby",
            Self::Php => "php",
            Self::Rust => "rust",
            Self::Swift => "swift",
            Self::Kotlin => "kotlin",
            Self::Sql => "sql",
            Self::Html => "html",
            Self::Css => "css",
            Self::Json => "json",
            Self::Markdown => "markdown",
            Self::Yaml => "yaml",
            Self::Xml => "xml",
            Self::Shell => "shell",
            Self::PlainText => "plaintext",
        }
    }

    /// Guess the language of a file from its extension.
    ///
    /// Unknown or missing extensions map to [`Language::PlainText`].
    pub fn from_file_name(name: &str) -> Self {
        let Some((_, ext)) = name.rsplit_once('.') else {
            return Self::PlainText;
        };

        match ext.to_ascii_lowercase().as_str() {
            "js" | "jsx" => Self::JavaScript,
            "ts" | "tsx" => Self::TypeScript,
            "py" => Self::Python,
            "html" => Self::Html,
            "css" => Self::Css,
            "json" => Self::Json,
            "md" => Self::Markdown,
            "java" => Self::Java,
            "c" => Self::C,
            "cpp" => Self::Cpp,
            "cs" => Self::CSharp,
            "go" => Self::Go,
            "rb" => Self::Ruby,
            "php" => Self::Php,
            "rs" => Self::Rust,
            "swift" => Self::Swift,
            "kt" => Self::Kotlin,
            "sql" => Self::Sql,
            "yaml" | "yml" => Self::Yaml,
            "xml" => Self::Xml,
            "sh" | "bash" => Self::Shell,
            _ => Self::PlainText,
        }
    }

    /// The language that follows this one in [`Language::ALL`], wrapping around.
    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|l| l == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Token that starts a line comment, if the language has one.
    pub fn line_comment(&self) -> Option<&'static str> {
        match self {
            Self::Python | Self::Ruby | Self::Shell | Self::Yaml => Some("#"),
            Self::Sql => Some("--"),
            Self::Html | Self::Xml | Self::Markdown | Self::Json | Self::PlainText => None,
            _ => Some("//"),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when a language identifier is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLanguage(pub String);

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown language '{}'", self.0)
    }
}

impl std::error::Error for UnknownLanguage {}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        // A few aliases people actually type
        let lowered = match lowered.as_str() {
            "js" => "javascript",
            "ts" => "typescript",
            "py" => "python",
            "c++" => "cpp",
            "c#" | "cs" => "csharp",
            "text" | "txt" => "plaintext",
            "sh" | "bash" => "shell",
            "md" => "markdown",
            "yml" => "yaml",
            other => other,
        };

        Self::ALL
            .iter()
            .copied()
            .find(|l| l.id() == lowered)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

/// The ordered lines of the editor buffer.
///
/// The buffer is replaced wholesale when AI output is accepted; it is never
/// patched line by line by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBuffer {
    lines: Vec<String>,
}

impl SourceBuffer {
    /// Split `text` into lines on `\n`, stripping a trailing `\r` from each.
    ///
    /// An empty text yields a single empty line, so a buffer always has at
    /// least one line.
    pub fn from_text(text: &str) -> Self {
        let lines = text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l).to_string()).collect();
        Self { lines }
    }

    /// Build a buffer from already split lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if lines.is_empty() {
            Self { lines: vec![String::new()] }
        } else {
            Self { lines }
        }
    }

    /// The lines of the buffer.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines, never less than one for a buffer built with the
    /// constructors above.
    pub fn line_count(&self) -> usize {
        self.lines.len().max(1)
    }

    /// Join the lines back into text.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// The right-hand side of an extracted assignment.
///
/// The text is never evaluated; the tag makes that explicit wherever a value
/// is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text")]
pub enum VariableValue {
    /// Unevaluated source text, trimmed of surrounding whitespace.
    RawText(String),
}

impl VariableValue {
    /// Borrow the raw text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::RawText(text) => text,
        }
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An assignment found by the variable extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableRecord {
    /// Identifier on the left-hand side
    pub name: String,
    /// Unevaluated right-hand side
    pub value: VariableValue,
    /// 1-based line the assignment was found on
    pub line: usize,
}

impl VariableRecord {
    /// Convenience constructor wrapping `value` as raw text.
    pub fn new(name: impl Into<String>, value: impl Into<String>, line: usize) -> Self {
        Self { name: name.into(), value: VariableValue::RawText(value.into()), line }
    }
}

/// A diagnostic reported against the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMarker {
    /// 1-based line
    pub start_line: usize,
    /// 1-based column
    pub start_column: usize,
    /// Human readable description
    pub message: String,
}

impl ValidationMarker {
    /// Create a marker.
    pub fn new(start_line: usize, start_column: usize, message: impl Into<String>) -> Self {
        Self { start_line, start_column, message: message.into() }
    }
}

impl fmt::Display for ValidationMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.start_line, self.start_column, self.message)
    }
}

/// Whether a [`FileNode`] is a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Regular file
    File,
    /// Directory
    Folder,
}

/// One entry of the project forest.
///
/// Nodes link to their parent by id; the forest is stored as a flat list in
/// depth-first order, each folder before its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    /// Deterministic id derived from the parent id and the sanitized name
    pub id: String,
    /// File or folder name as it appears on disk
    pub name: String,
    /// File or folder
    pub kind: NodeKind,
    /// Parent id, `None` for the root
    pub parent_id: Option<String>,
    /// Absolute path on disk
    pub path: PathBuf,
    /// File content, when it has been loaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl FileNode {
    /// Whether this node is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Language guessed from the file name.
    pub fn language(&self) -> Language {
        Language::from_file_name(&self.name)
    }
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person at the keyboard
    User,
    /// The AI endpoint
    Assistant,
}

/// How a chat message should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Prose
    Text,
    /// Contains a fenced code block
    Code,
}

/// A single chat bubble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote it
    pub role: Role,
    /// Raw message text
    pub content: String,
    /// Rendering hint
    pub kind: MessageKind,
    /// When the message was created
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    /// A message typed by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            kind: MessageKind::Text,
            timestamp: Local::now(),
        }
    }

    /// A reply from the assistant with the given rendering hint.
    pub fn assistant(content: impl Into<String>, kind: MessageKind) -> Self {
        Self { role: Role::Assistant, content: content.into(), kind, timestamp: Local::now() }
    }

    /// Whether this is an assistant reply carrying code.
    pub fn is_code_reply(&self) -> bool {
        self.role == Role::Assistant && self.kind == MessageKind::Code
    }
}
