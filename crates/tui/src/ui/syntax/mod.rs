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

//! Syntax highlighting for the editor panel
//!
//! A line is tokenized with a handful of regexes. Comments and string
//! literals are claimed first, earliest match wins; numbers and keywords
//! may only fill what is left. Everything unclaimed renders as plain text.

mod keywords;

use crate::config::ColorScheme;
use codepad_common::Language;
use ratatui::{
    style::{Color, Style},
    text::Span,
};
use regex::Regex;
use std::{collections::HashMap, sync::OnceLock};

/// Token categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// Language keyword
    Keyword,
    /// String literal
    String,
    /// Numeric literal
    Number,
    /// Line comment
    Comment,
}

/// A highlighted byte range of a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxToken {
    /// Start byte offset
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Category
    pub token_type: TokenType,
}

struct CommonPatterns {
    strings: Regex,
    numbers: Regex,
}

struct LanguagePatterns {
    keywords: Option<Regex>,
    comment: Option<Regex>,
}

fn common_patterns() -> &'static CommonPatterns {
    static PATTERNS: OnceLock<CommonPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| CommonPatterns {
        strings: Regex::new(r#""(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'|`(?:[^`\\]|\\.)*`"#)
            .expect("string pattern is valid"),
        numbers: Regex::new(r"\b(?:0[xX][0-9a-fA-F]+|\d+(?:\.\d+)?)\b")
            .expect("number pattern is valid"),
    })
}

fn language_patterns(language: Language) -> &'static LanguagePatterns {
    static PATTERNS: OnceLock<HashMap<Language, LanguagePatterns>> = OnceLock::new();
    let table = PATTERNS.get_or_init(|| {
        Language::ALL
            .iter()
            .map(|&lang| {
                let words = keywords::keywords_for(lang);
                let keywords = (!words.is_empty()).then(|| {
                    Regex::new(&format!(r"\b(?:{})\b", words.join("|")))
                        .expect("keyword pattern is valid")
                });
                let comment = lang.line_comment().map(|token| {
                    Regex::new(&format!("{}.*$", regex::escape(token)))
                        .expect("comment pattern is valid")
                });
                (lang, LanguagePatterns { keywords, comment })
            })
            .collect()
    });
    &table[&language]
}

/// Regex-based highlighter
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxHighlighter;

impl SyntaxHighlighter {
    /// Create a new highlighter
    pub fn new() -> Self {
        Self
    }

    /// Tokenize one line, returning non-overlapping tokens sorted by start
    pub fn tokenize(&self, line: &str, language: Language) -> Vec<SyntaxToken> {
        if language == Language::PlainText {
            return Vec::new();
        }
        let common = common_patterns();
        let patterns = language_patterns(language);

        // Comments and strings compete by position
        let mut tokens: Vec<SyntaxToken> = Vec::new();
        let mut pos = 0;
        while pos < line.len() {
            let string = common.strings.find_at(line, pos);
            let comment = patterns
                .comment
                .as_ref()
                .and_then(|c| c.find_at(line, pos));
            match (string, comment) {
                (Some(s), Some(c)) if c.start() < s.start() => {
                    tokens.push(SyntaxToken {
                        start: c.start(),
                        end: c.end(),
                        token_type: TokenType::Comment,
                    });
                    break;
                }
                (Some(s), _) => {
                    tokens.push(SyntaxToken {
                        start: s.start(),
                        end: s.end(),
                        token_type: TokenType::String,
                    });
                    pos = s.end().max(s.start() + 1);
                }
                (None, Some(c)) => {
                    tokens.push(SyntaxToken {
                        start: c.start(),
                        end: c.end(),
                        token_type: TokenType::Comment,
                    });
                    break;
                }
                (None, None) => break,
            }
        }

        let fill = [
            (Some(&common.numbers), TokenType::Number),
            (patterns.keywords.as_ref(), TokenType::Keyword),
        ];
        for (pattern, token_type) in fill {
            let Some(pattern) = pattern else { continue };
            for m in pattern.find_iter(line) {
                if !overlaps(&tokens, m.start(), m.end()) {
                    tokens.push(SyntaxToken { start: m.start(), end: m.end(), token_type });
                }
            }
        }

        tokens.sort_by_key(|t| t.start);
        tokens
    }

    /// Tokenize and style one line for rendering
    pub fn highlight_line(
        &self,
        line: &str,
        language: Language,
        colors: &ColorScheme,
        base: Style,
    ) -> Vec<Span<'static>> {
        let mut spans = Vec::new();
        let mut last = 0;

        for token in self.tokenize(line, language) {
            if token.start > last {
                spans.push(Span::styled(line[last..token.start].to_string(), base));
            }
            let color: Color = match token.token_type {
                TokenType::Keyword => colors.keyword(),
                TokenType::String => colors.string(),
                TokenType::Number => colors.number(),
                TokenType::Comment => colors.comment(),
            };
            spans.push(Span::styled(line[token.start..token.end].to_string(), base.fg(color)));
            last = token.end;
        }

        if last < line.len() {
            spans.push(Span::styled(line[last..].to_string(), base));
        }
        spans
    }
}

fn overlaps(tokens: &[SyntaxToken], start: usize, end: usize) -> bool {
    tokens.iter().any(|t| start < t.end && end > t.start)
}
