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

//! Fenced code block extraction.
//!
//! AI replies often wrap code in a fence (three backticks, optionally
//! followed by a language tag). These helpers pull the interior out of the
//! first fence. They are pure and idempotent: text without a fence passes
//! through unchanged, and an extracted interior never contains a fence.

use regex::Regex;
use std::sync::OnceLock;

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"```(?:\w+)?\s*([\s\S]*?)```").expect("fence pattern is valid")
    })
}

/// Interior of the first fenced block in `text`, or `text` itself when
/// there is none.
pub fn extract_code_block(text: &str) -> &str {
    fence_regex()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or(text, |m| m.as_str())
}

/// Whether `text` contains a complete fenced block.
pub fn contains_code_block(text: &str) -> bool {
    fence_regex().is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_tagged_block() {
        let reply = "Here you go:\n```python\nprint('hi')\n```\nEnjoy!";
        assert_eq!(extract_code_block(reply), "print('hi')\n");
    }

    #[test]
    fn test_extracts_untagged_block() {
        assert_eq!(extract_code_block("```\nlet x = 1;```"), "let x = 1;");
    }

    #[test]
    fn test_only_first_block_is_used() {
        let reply = "```js\nfirst()```\ntext\n```js\nsecond()```";
        assert_eq!(extract_code_block(reply), "first()");
    }

    #[test]
    fn test_passthrough_without_fence() {
        let plain = "x = 1\ny = 2";
        assert_eq!(extract_code_block(plain), plain);
        assert!(!contains_code_block(plain));

        // A lone opening fence is not a block
        let unterminated = "```js\nlet a = 1;";
        assert_eq!(extract_code_block(unterminated), unterminated);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let samples = [
            "```rust\nfn main() {}\n```",
            "no fences here",
            "before ```c\nint x;``` after ```y```",
            "``````",
            "`inline` and ``double``",
            "",
        ];
        for s in samples {
            let once = extract_code_block(s);
            assert_eq!(extract_code_block(once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_contains_code_block() {
        assert!(contains_code_block("text ```js\ncode``` text"));
        assert!(!contains_code_block("just ``two`` ticks"));
    }
}
