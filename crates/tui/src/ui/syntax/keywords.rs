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

//! Keyword tables

use codepad_common::Language;

const C_FAMILY: &[&str] = &[
    "break", "case", "char", "const", "continue", "default", "do", "double", "else", "enum",
    "extern", "float", "for", "goto", "if", "int", "long", "return", "short", "signed", "sizeof",
    "static", "struct", "switch", "typedef", "union", "unsigned", "void", "volatile", "while",
];

const CPP_EXTRA: &[&str] = &[
    "auto", "bool", "catch", "class", "delete", "false", "namespace", "new", "nullptr",
    "private", "protected", "public", "template", "this", "throw", "true", "try", "using",
    "virtual",
];

/// Keywords highlighted for `language`; empty for markup and prose.
pub(super) fn keywords_for(language: Language) -> Vec<&'static str> {
    let words: &[&[&str]] = match language {
        Language::JavaScript | Language::TypeScript => &[&[
            "async", "await", "break", "case", "catch", "class", "const", "continue", "default",
            "delete", "do", "else", "export", "extends", "false", "finally", "for", "from",
            "function", "if", "import", "in", "instanceof", "interface", "let", "new", "null",
            "of", "return", "static", "super", "switch", "this", "throw", "true", "try", "type",
            "typeof", "undefined", "var", "void", "while", "yield",
        ]],
        Language::Python => &[&[
            "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
            "elif", "else", "except", "False", "finally", "for", "from", "global", "if", "import",
            "in", "is", "lambda", "None", "nonlocal", "not", "or", "pass", "raise", "return",
            "True", "try", "while", "with", "yield",
        ]],
        Language::Rust => &[&[
            "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
            "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
            "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
            "true", "type", "unsafe", "use", "where", "while",
        ]],
        Language::Go => &[&[
            "break", "case", "chan", "const", "continue", "default", "defer", "else", "false",
            "for", "func", "go", "goto", "if", "import", "interface", "map", "nil", "package",
            "range", "return", "select", "struct", "switch", "true", "type", "var",
        ]],
        Language::Java | Language::Kotlin | Language::CSharp => &[&[
            "abstract", "boolean", "break", "case", "catch", "class", "continue", "default", "do",
            "else", "extends", "false", "final", "finally", "for", "fun", "if", "implements",
            "import", "int", "interface", "namespace", "new", "null", "override", "package",
            "private", "protected", "public", "return", "static", "string", "switch", "this",
            "throw", "true", "try", "using", "val", "var", "void", "when", "while",
        ]],
        Language::C => &[C_FAMILY],
        Language::Cpp => &[C_FAMILY, CPP_EXTRA],
        Language::Swift => &[&[
            "break", "case", "class", "continue", "default", "defer", "else", "enum", "extension",
            "false", "for", "func", "guard", "if", "import", "in", "init", "let", "nil",
            "protocol", "return", "self", "struct", "switch", "true", "var", "while",
        ]],
        Language::Ruby => &[&[
            "begin", "class", "def", "do", "else", "elsif", "end", "ensure", "false", "for", "if",
            "in", "module", "next", "nil", "puts", "rescue", "return", "self", "then", "true",
            "unless", "until", "when", "while", "yield",
        ]],
        Language::Php => &[&[
            "array", "as", "break", "case", "class", "echo", "else", "elseif", "false", "for",
            "foreach", "function", "if", "new", "null", "private", "public", "return", "static",
            "switch", "true", "use", "while",
        ]],
        Language::Sql => &[&[
            "SELECT", "FROM", "WHERE", "INSERT", "INTO", "VALUES", "UPDATE", "SET", "DELETE",
            "CREATE", "TABLE", "DROP", "JOIN", "LEFT", "INNER", "ON", "AND", "OR", "NOT", "NULL",
            "ORDER", "BY", "GROUP", "LIMIT", "AS", "select", "from", "where", "insert", "into",
            "values", "update", "set", "delete", "create", "table", "join", "on", "and", "or",
            "not", "null", "order", "by", "group", "limit", "as",
        ]],
        Language::Shell => &[&[
            "case", "do", "done", "echo", "elif", "else", "esac", "exit", "export", "fi", "for",
            "function", "if", "in", "local", "return", "then", "while",
        ]],
        Language::Json | Language::Yaml => &[&["true", "false", "null"]],
        Language::Html
        | Language::Css
        | Language::Xml
        | Language::Markdown
        | Language::PlainText => &[],
    };
    words.iter().flat_map(|w| w.iter().copied()).collect()
}
