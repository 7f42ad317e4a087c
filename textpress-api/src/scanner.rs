use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StringDelimiter {
    None,
    Double,
    Single,
    Backtick,
}

impl StringDelimiter {
    fn from_char(ch: char) -> Option<Self> {
        match ch {
            '"' => Some(StringDelimiter::Double),
            '\'' => Some(StringDelimiter::Single),
            '`' => Some(StringDelimiter::Backtick),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharContext {
    // Live code outside strings and comments
    Code,
    // Inside a string literal, delimiters included
    Text,
    LineComment,
    BlockComment,
}

impl CharContext {
    pub fn is_comment(&self) -> bool {
        matches!(self, CharContext::LineComment | CharContext::BlockComment)
    }
}

// At most one of in_string / in_line_comment / in_block_comment is true
// at any position. A comment never starts inside a string and a string
// never starts inside a comment.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScanState {
    pub in_string: bool,
    pub delimiter: StringDelimiter,
    pub in_line_comment: bool,
    pub in_block_comment: bool,
    escaped: bool,
}

impl ScanState {
    fn initial() -> Self {
        Self {
            in_string: false,
            delimiter: StringDelimiter::None,
            in_line_comment: false,
            in_block_comment: false,
            escaped: false,
        }
    }

    // A trailing line comment terminates naturally at end of input;
    // an open string or block comment does not.
    pub fn is_settled(&self) -> bool {
        !self.in_string && !self.in_block_comment
    }
}

pub struct Step {
    pub context: CharContext,
    pub consumed_lookahead: bool,
}

#[derive(Debug, Clone)]
pub struct Scanner {
    state: ScanState,
}

impl Scanner {
    pub fn new() -> Self {
        Self {
            state: ScanState::initial(),
        }
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn in_string(&self) -> bool {
        self.state.in_string
    }

    pub fn in_comment(&self) -> bool {
        self.state.in_line_comment || self.state.in_block_comment
    }

    // Advance over one character with one character of lookahead. When a
    // two-character marker is recognized (`//`, `/*`, `*/`) both characters
    // are consumed atomically and `consumed_lookahead` is set.
    pub fn step(&mut self, ch: char, lookahead: Option<char>) -> Step {
        if self.state.in_line_comment {
            if ch == '\n' || ch == '\r' {
                self.state.in_line_comment = false;
                return Step {
                    context: CharContext::Code,
                    consumed_lookahead: false,
                };
            }
            return Step {
                context: CharContext::LineComment,
                consumed_lookahead: false,
            };
        }

        if self.state.in_block_comment {
            if ch == '*' && lookahead == Some('/') {
                self.state.in_block_comment = false;
                return Step {
                    context: CharContext::BlockComment,
                    consumed_lookahead: true,
                };
            }
            return Step {
                context: CharContext::BlockComment,
                consumed_lookahead: false,
            };
        }

        if self.state.in_string {
            if self.state.escaped {
                self.state.escaped = false;
            } else if ch == '\\' {
                self.state.escaped = true;
            } else if StringDelimiter::from_char(ch) == Some(self.state.delimiter) {
                self.state.in_string = false;
                self.state.delimiter = StringDelimiter::None;
            }
            return Step {
                context: CharContext::Text,
                consumed_lookahead: false,
            };
        }

        if let Some(delimiter) = StringDelimiter::from_char(ch) {
            self.state.in_string = true;
            self.state.delimiter = delimiter;
            return Step {
                context: CharContext::Text,
                consumed_lookahead: false,
            };
        }

        if ch == '/' {
            match lookahead {
                Some('/') => {
                    self.state.in_line_comment = true;
                    return Step {
                        context: CharContext::LineComment,
                        consumed_lookahead: true,
                    };
                }
                Some('*') => {
                    self.state.in_block_comment = true;
                    return Step {
                        context: CharContext::BlockComment,
                        consumed_lookahead: true,
                    };
                }
                _ => {}
            }
        }

        Step {
            context: CharContext::Code,
            consumed_lookahead: false,
        }
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Scanned {
    pub ch: char,
    pub context: CharContext,
}

pub struct Scan {
    pub chars: Vec<Scanned>,
    pub final_state: ScanState,
}

pub fn scan(text: &str) -> Scan {
    let chars: Vec<char> = text.chars().collect();
    let mut scanner = Scanner::new();
    let mut scanned = Vec::with_capacity(chars.len());

    let mut i = 0;
    while i < chars.len() {
        let step = scanner.step(chars[i], chars.get(i + 1).copied());
        scanned.push(Scanned {
            ch: chars[i],
            context: step.context,
        });
        if step.consumed_lookahead {
            scanned.push(Scanned {
                ch: chars[i + 1],
                context: step.context,
            });
            i += 2;
        } else {
            i += 1;
        }
    }

    Scan {
        chars: scanned,
        final_state: *scanner.state(),
    }
}

// Drop every character classified as comment, keeping code and string
// contents untouched.
pub fn strip_comments(text: &str) -> String {
    let scanned = scan(text);
    let mut out = String::with_capacity(text.len());
    for entry in &scanned.chars {
        if !entry.context.is_comment() {
            out.push(entry.ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contexts(text: &str) -> Vec<CharContext> {
        scan(text).chars.iter().map(|s| s.context).collect()
    }

    #[test]
    fn line_comment_marker_inside_string_is_text() {
        let scanned = scan(r#""http://example.com""#);
        assert!(scanned.chars.iter().all(|s| s.context == CharContext::Text));
        assert!(scanned.final_state.is_settled());
    }

    #[test]
    fn quote_inside_comment_does_not_open_string() {
        let scanned = scan("// it's a comment\nx");
        assert_eq!(scanned.chars.last().map(|s| s.context), Some(CharContext::Code));
        assert!(scanned.final_state.is_settled());
    }

    #[test]
    fn block_comment_close_consumes_both_characters() {
        let ctx = contexts("/**/x");
        assert_eq!(
            ctx,
            vec![
                CharContext::BlockComment,
                CharContext::BlockComment,
                CharContext::BlockComment,
                CharContext::BlockComment,
                CharContext::Code,
            ]
        );
    }

    #[test]
    fn escaped_quote_does_not_close_string() {
        let scanned = scan(r#""a\"b""#);
        assert!(scanned.final_state.is_settled());
        assert!(scanned.chars.iter().all(|s| s.context == CharContext::Text));
    }

    #[test]
    fn double_backslash_before_quote_closes_string() {
        let scanned = scan(r#""a\\""#);
        assert!(scanned.final_state.is_settled());
    }

    #[test]
    fn no_block_comment_nesting() {
        let scanned = scan("/* outer /* inner */ x");
        let tail: String = scanned
            .chars
            .iter()
            .filter(|s| s.context == CharContext::Code)
            .map(|s| s.ch)
            .collect();
        assert_eq!(tail.trim(), "x");
    }

    #[test]
    fn block_comment_opener_in_line_comment_is_inert() {
        let scanned = scan("// /* still a line comment\nx");
        assert!(scanned.final_state.is_settled());
        assert_eq!(scanned.chars.last().map(|s| s.context), Some(CharContext::Code));
    }

    #[test]
    fn unterminated_string_is_not_settled() {
        assert!(!scan(r#""abc"#).final_state.is_settled());
        assert!(!scan("/* abc").final_state.is_settled());
        assert!(scan("// abc").final_state.is_settled());
    }

    #[test]
    fn strip_comments_keeps_strings() {
        let out = strip_comments("var a = \"//not a comment\"; // real\n/* gone */b");
        assert_eq!(out, "var a = \"//not a comment\"; \nb");
    }

    #[test]
    fn mixed_delimiters_only_close_on_match() {
        let scanned = scan(r#"'say "hi"' done"#);
        let live: String = scanned
            .chars
            .iter()
            .filter(|s| s.context == CharContext::Code)
            .map(|s| s.ch)
            .collect();
        assert_eq!(live, " done");
    }
}
