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

//! Regex based variable extraction.
//!
//! The extractor scans each line for assignments and records the identifier
//! together with the raw right-hand side text. Nothing is evaluated.
//!
//! Two patterns are supported:
//!
//! - **declarations** (JavaScript, TypeScript): `let|var|const name = value`,
//!   where the value runs up to the next `;` or the end of the line. A line
//!   may hold several declarations.
//! - **bare assignments** (Python): `name = value`, where the value runs to
//!   the end of the line.
//!
//! Every other language yields no records at all.

use codepad_common::{Language, VariableRecord};
use regex::{Captures, Regex};
use std::sync::OnceLock;
use tracing::trace;

/// Which extraction pattern applies to a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentPattern {
    /// `let`/`var`/`const` declarations terminated by `;`
    Declaration,
    /// `identifier = rest of line`
    BareAssignment,
}

impl AssignmentPattern {
    /// Pattern used for `language`, or `None` when the language is not covered.
    pub fn for_language(language: Language) -> Option<Self> {
        match language {
            Language::JavaScript | Language::TypeScript => Some(Self::Declaration),
            Language::Python => Some(Self::BareAssignment),
            _ => None,
        }
    }

    fn regex(&self) -> &'static Regex {
        let patterns = get_patterns();
        match self {
            Self::Declaration => &patterns.declaration,
            Self::BareAssignment => &patterns.bare_assignment,
        }
    }
}

struct ExtractPatterns {
    declaration: Regex,
    bare_assignment: Regex,
}

fn get_patterns() -> &'static ExtractPatterns {
    static PATTERNS: OnceLock<ExtractPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| ExtractPatterns {
        declaration: Regex::new(
            r"\b(let|var|const)\s+([a-zA-Z_$][a-zA-Z0-9_$]*)\s*=\s*([^;]+)",
        )
        .expect("declaration pattern is valid"),
        bare_assignment: Regex::new(r"([a-zA-Z_][a-zA-Z0-9_]*)\s*=\s*(.+)")
            .expect("assignment pattern is valid"),
    })
}

/// Extract variable records from `lines`.
///
/// Lines are numbered from 1. Matches within a line are reported left to
/// right. Records sharing a name are all kept. A match whose captures cannot
/// be read is skipped.
pub fn extract<S: AsRef<str>>(lines: &[S], language: Language) -> Vec<VariableRecord> {
    let Some(pattern) = AssignmentPattern::for_language(language) else {
        return Vec::new();
    };

    let regex = pattern.regex();
    let mut records = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        records.extend(
            regex
                .captures_iter(line.as_ref())
                .filter_map(|caps| record_from_captures(&caps, pattern, line_no)),
        );
    }

    trace!(language = %language, count = records.len(), "Extracted variables");
    records
}

fn record_from_captures(
    caps: &Captures<'_>,
    pattern: AssignmentPattern,
    line: usize,
) -> Option<VariableRecord> {
    let (name_group, value_group) = match pattern {
        AssignmentPattern::Declaration => (2, 3),
        AssignmentPattern::BareAssignment => (1, 2),
    };

    let name = caps.get(name_group)?.as_str();
    let value = caps.get(value_group)?.as_str().trim();
    Some(VariableRecord::new(name, value, line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_declaration() {
        let records = extract(&["let x = 5;"], Language::JavaScript);
        assert_eq!(records, vec![VariableRecord::new("x", "5", 1)]);
    }

    #[test]
    fn test_multiple_declarations_on_one_line() {
        let records = extract(&["const a = 1; var b = a * 2;"], Language::TypeScript);
        assert_eq!(
            records,
            vec![VariableRecord::new("a", "1", 1), VariableRecord::new("b", "a * 2", 1)]
        );
    }

    #[test]
    fn test_declaration_without_semicolon_runs_to_end_of_line() {
        let records = extract(&["let greeting =   'hi there'   "], Language::JavaScript);
        assert_eq!(records, vec![VariableRecord::new("greeting", "'hi there'", 1)]);
    }

    #[test]
    fn test_declaration_keyword_must_be_a_word() {
        assert!(extract(&["outlet x = 5;"], Language::JavaScript).is_empty());
    }

    #[test]
    fn test_value_is_not_evaluated() {
        let records = extract(&["let total = price * (1 + tax);"], Language::JavaScript);
        assert_eq!(records[0].value.as_str(), "price * (1 + tax)");
    }

    #[test]
    fn test_python_assignments() {
        let lines = ["x = 10", "name = 'bob'  ", "print(x)"];
        let records = extract(&lines, Language::Python);
        assert_eq!(
            records,
            vec![VariableRecord::new("x", "10", 1), VariableRecord::new("name", "'bob'", 2)]
        );
    }

    #[test]
    fn test_duplicate_names_are_kept() {
        let lines = ["x = 1", "x = 2"];
        let records = extract(&lines, Language::Python);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line, 1);
        assert_eq!(records[1].line, 2);
    }

    #[test]
    fn test_lines_without_equals_yield_nothing() {
        assert!(extract(&["console.log(a);"], Language::JavaScript).is_empty());
        assert!(extract(&["return value"], Language::Python).is_empty());
    }

    #[test]
    fn test_uncovered_language_yields_nothing() {
        assert!(extract(&["int x = 5;"], Language::Java).is_empty());
        assert!(extract(&["let x = 5;"], Language::Rust).is_empty());
        assert!(extract(&["x = 5"], Language::PlainText).is_empty());
    }

    #[test]
    fn test_extraction_is_pure() {
        let lines = vec!["let a = 1;".to_string(), "let b = a + 1;".to_string()];
        assert_eq!(extract(&lines, Language::JavaScript), extract(&lines, Language::JavaScript));
    }
}
