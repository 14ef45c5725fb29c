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

//! Lightweight buffer validation.
//!
//! A terminal has no embedded language service, so markers come from a small
//! scanner that checks delimiter balance and string termination. It knows
//! just enough about comments and string literals to stay quiet on ordinary
//! code; it does not parse anything.

use codepad_common::{Language, SourceBuffer, ValidationMarker};
use tracing::trace;

/// How one quote character behaves in a language.
#[derive(Debug, Clone, Copy)]
struct QuoteRule {
    quote: char,
    /// Whether the literal may continue on the next line
    multiline: bool,
}

const fn q(quote: char, multiline: bool) -> QuoteRule {
    QuoteRule { quote, multiline }
}

/// Scanner rules for one language.
#[derive(Debug, Clone, Copy)]
struct Rules {
    quotes: &'static [QuoteRule],
    line_comment: Option<&'static str>,
    block_comments: bool,
    triple_quotes: bool,
}

fn rules_for(language: Language) -> Option<Rules> {
    const C_QUOTES: &[QuoteRule] = &[q('"', false), q('\'', false)];
    const BACKTICK_QUOTES: &[QuoteRule] = &[q('"', false), q('\'', false), q('`', true)];
    const RUST_QUOTES: &[QuoteRule] = &[q('"', true)];
    const JSON_QUOTES: &[QuoteRule] = &[q('"', false)];

    let rules = match language {
        Language::JavaScript | Language::TypeScript => Rules {
            quotes: BACKTICK_QUOTES,
            line_comment: Some("//"),
            block_comments: true,
            triple_quotes: false,
        },
        Language::Python => Rules {
            quotes: C_QUOTES,
            line_comment: Some("#"),
            block_comments: false,
            triple_quotes: true,
        },
        // Lifetimes make single quotes ambiguous
        Language::Rust => Rules {
            quotes: RUST_QUOTES,
            line_comment: Some("//"),
            block_comments: true,
            triple_quotes: false,
        },
        Language::Go => Rules {
            quotes: BACKTICK_QUOTES,
            line_comment: Some("//"),
            block_comments: true,
            triple_quotes: false,
        },
        Language::Ruby => Rules {
            quotes: C_QUOTES,
            line_comment: Some("#"),
            block_comments: false,
            triple_quotes: false,
        },
        Language::Sql => Rules {
            quotes: C_QUOTES,
            line_comment: Some("--"),
            block_comments: true,
            triple_quotes: false,
        },
        Language::Css => Rules {
            quotes: C_QUOTES,
            line_comment: None,
            block_comments: true,
            triple_quotes: false,
        },
        Language::Json => Rules {
            quotes: JSON_QUOTES,
            line_comment: None,
            block_comments: false,
            triple_quotes: false,
        },
        Language::Java
        | Language::C
        | Language::Cpp
        | Language::CSharp
        | Language::Php
        | Language::Swift
        | Language::Kotlin => Rules {
            quotes: C_QUOTES,
            line_comment: Some("//"),
            block_comments: true,
            triple_quotes: false,
        },
        Language::Html
        | Language::Xml
        | Language::Markdown
        | Language::Yaml
        | Language::Shell
        | Language::PlainText => return None,
    };
    Some(rules)
}

/// What the scanner is currently inside of.
#[derive(Debug, Clone, Copy)]
enum Mode {
    Code,
    Str { rule: QuoteRule, line: usize, column: usize },
    Triple { quote: char, line: usize, column: usize },
    BlockComment { line: usize, column: usize },
}

/// Checks bracket balance and string termination.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimiterValidator;

impl DelimiterValidator {
    /// Create a validator.
    pub fn new() -> Self {
        Self
    }

    /// Produce markers for `buffer`, ordered by position.
    ///
    /// Languages without a rule set (markup, prose, shell) never produce
    /// markers.
    pub fn validate(&self, buffer: &SourceBuffer, language: Language) -> Vec<ValidationMarker> {
        let Some(rules) = rules_for(language) else {
            return Vec::new();
        };

        let mut markers = Vec::new();
        let mut stack: Vec<(char, usize, usize)> = Vec::new();
        let mut mode = Mode::Code;

        for (idx, text) in buffer.lines().iter().enumerate() {
            let line = idx + 1;
            let chars: Vec<char> = text.chars().collect();
            let mut i = 0;

            while i < chars.len() {
                let c = chars[i];
                let column = i + 1;

                match mode {
                    Mode::Str { rule, .. } => {
                        if c == '\\' {
                            i += 2;
                            continue;
                        }
                        if c == rule.quote {
                            mode = Mode::Code;
                        }
                    }
                    Mode::Triple { quote, .. } => {
                        if c == '\\' {
                            i += 2;
                            continue;
                        }
                        if starts_triple(&chars, i, quote) {
                            mode = Mode::Code;
                            i += 3;
                            continue;
                        }
                    }
                    Mode::BlockComment { .. } => {
                        if c == '*' && chars.get(i + 1) == Some(&'/') {
                            mode = Mode::Code;
                            i += 2;
                            continue;
                        }
                    }
                    Mode::Code => {
                        if let Some(token) = rules.line_comment {
                            if starts_with_at(&chars, i, token) {
                                break;
                            }
                        }
                        if rules.block_comments && c == '/' && chars.get(i + 1) == Some(&'*') {
                            mode = Mode::BlockComment { line, column };
                            i += 2;
                            continue;
                        }
                        if rules.triple_quotes && (c == '"' || c == '\'') && starts_triple(&chars, i, c)
                        {
                            mode = Mode::Triple { quote: c, line, column };
                            i += 3;
                            continue;
                        }
                        if let Some(rule) = rules.quotes.iter().find(|r| r.quote == c) {
                            mode = Mode::Str { rule: *rule, line, column };
                        } else {
                            check_delimiter(c, line, column, &mut stack, &mut markers);
                        }
                    }
                }

                i += 1;
            }

            // Single-line literals cannot run past the end of their line
            if let Mode::Str { rule, line: start_line, column: start_column } = mode {
                if !rule.multiline {
                    markers.push(ValidationMarker::new(
                        start_line,
                        start_column,
                        "Unterminated string literal",
                    ));
                    mode = Mode::Code;
                }
            }
        }

        match mode {
            Mode::Str { line, column, .. } | Mode::Triple { line, column, .. } => {
                markers.push(ValidationMarker::new(line, column, "Unterminated string literal"));
            }
            Mode::BlockComment { line, column } => {
                markers.push(ValidationMarker::new(line, column, "Unterminated comment"));
            }
            Mode::Code => {}
        }

        for (open, line, column) in stack {
            markers.push(ValidationMarker::new(line, column, format!("Unclosed '{open}'")));
        }

        markers.sort_by_key(|m| (m.start_line, m.start_column));
        trace!(language = %language, count = markers.len(), "Validated buffer");
        markers
    }
}

fn check_delimiter(
    c: char,
    line: usize,
    column: usize,
    stack: &mut Vec<(char, usize, usize)>,
    markers: &mut Vec<ValidationMarker>,
) {
    match c {
        '(' | '[' | '{' => stack.push((c, line, column)),
        ')' | ']' | '}' => {
            let expected_open = match c {
                ')' => '(',
                ']' => '[',
                _ => '{',
            };
            match stack.pop() {
                Some((open, ..)) if open == expected_open => {}
                Some((open, ..)) => markers.push(ValidationMarker::new(
                    line,
                    column,
                    format!("Expected '{}' but found '{c}'", closer_for(open)),
                )),
                None => markers.push(ValidationMarker::new(line, column, format!("Unexpected '{c}'"))),
            }
        }
        _ => {}
    }
}

fn closer_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

fn starts_with_at(chars: &[char], i: usize, token: &str) -> bool {
    token.chars().enumerate().all(|(k, t)| chars.get(i + k) == Some(&t))
}

fn starts_triple(chars: &[char], i: usize, quote: char) -> bool {
    chars.get(i) == Some(&quote) && chars.get(i + 1) == Some(&quote) && chars.get(i + 2) == Some(&quote)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(text: &str, language: Language) -> Vec<ValidationMarker> {
        DelimiterValidator::new().validate(&SourceBuffer::from_text(text), language)
    }

    #[test]
    fn test_balanced_javascript_is_clean() {
        let code = "function f(a) {\n  const s = \"(\";\n  return [a, `x${a}`]; // )\n}\n";
        assert!(check(code, Language::JavaScript).is_empty());
    }

    #[test]
    fn test_unclosed_bracket() {
        let markers = check("let a = (1 + 2;", Language::JavaScript);
        assert_eq!(markers, vec![ValidationMarker::new(1, 9, "Unclosed '('")]);
    }

    #[test]
    fn test_unexpected_closer() {
        let markers = check("x = 1)\n", Language::Python);
        assert_eq!(markers, vec![ValidationMarker::new(1, 6, "Unexpected ')'")]);
    }

    #[test]
    fn test_mismatched_closer() {
        let markers = check("int a[2} ;", Language::C);
        assert_eq!(markers, vec![ValidationMarker::new(1, 8, "Expected ']' but found '}'")]);
    }

    #[test]
    fn test_unterminated_string_on_single_line() {
        let markers = check("name = 'bob\nprint(name)", Language::Python);
        assert_eq!(markers, vec![ValidationMarker::new(1, 8, "Unterminated string literal")]);
    }

    #[test]
    fn test_python_triple_quotes_span_lines() {
        let code = "def f():\n    \"\"\"Doc (with paren\n    \"\"\"\n    return 1";
        assert!(check(code, Language::Python).is_empty());
    }

    #[test]
    fn test_block_comment_hides_brackets() {
        let code = "int main() {\n  /* { [ ( */\n  return 0;\n}";
        assert!(check(code, Language::C).is_empty());

        let markers = check("/* never closed", Language::Java);
        assert_eq!(markers, vec![ValidationMarker::new(1, 1, "Unterminated comment")]);
    }

    #[test]
    fn test_rust_lifetimes_are_not_strings() {
        assert!(check("fn f<'a>(x: &'a str) -> &'a str { x }", Language::Rust).is_empty());
    }

    #[test]
    fn test_go_raw_strings_span_lines() {
        assert!(check("s := `line (one\nline two`", Language::Go).is_empty());
        assert_eq!(
            check("s := \"open (\nx := 1", Language::Go),
            vec![ValidationMarker::new(1, 6, "Unterminated string literal")]
        );
    }

    #[test]
    fn test_json_only_double_quotes_delimit_strings() {
        assert!(check("{'a': [1, 2]}", Language::Json).is_empty());
        assert!(check("{\"a\": \"(\"}", Language::Json).is_empty());
    }

    #[test]
    fn test_markup_is_never_flagged() {
        assert!(check("<p>it's (broken</p>", Language::Html).is_empty());
        assert!(check("(((", Language::PlainText).is_empty());
    }
}
