use crate::error::TransformError;
use crate::scanner::{CharContext, scan, strip_comments};

pub const VALIDATION_PASSED: &str = "JavaScript syntax validation passed";

const PUNCTUATION: &[char] = &[
    '{', '}', '(', ')', ';', ',', '=', '+', '-', '*', '/', '&', '|', '!', '<', '>', '?', ':',
];

fn is_punctuation(ch: char) -> bool {
    PUNCTUATION.contains(&ch)
}

// Comment stripping runs first so comment bodies never survive into the
// whitespace pass. String contents are copied verbatim throughout.
pub fn compress(code: &str) -> String {
    let stripped = strip_comments(code);
    collapse_whitespace(&stripped)
}

// Collapse live whitespace runs to a single space, dropping the space
// entirely next to punctuation, and trim the ends.
fn collapse_whitespace(code: &str) -> String {
    let scanned = scan(code);
    let mut out = String::with_capacity(code.len());
    let mut pending_space = false;

    for entry in &scanned.chars {
        if entry.context.is_comment() {
            continue;
        }
        if entry.context == CharContext::Code && entry.ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            pending_space = false;
            let after_punctuation = out
                .chars()
                .next_back()
                .map_or(true, is_punctuation);
            let before_punctuation =
                entry.context == CharContext::Code && is_punctuation(entry.ch);
            if !after_punctuation && !before_punctuation {
                out.push(' ');
            }
        }
        out.push(entry.ch);
    }

    out
}

// Aggressive variant of compress: line terminators outside strings are
// removed outright.
pub fn minify(code: &str) -> String {
    let compressed = compress(code);
    let scanned = scan(&compressed);
    let mut out = String::with_capacity(compressed.len());

    for entry in &scanned.chars {
        if matches!(entry.ch, '\n' | '\r') && entry.context != CharContext::Text {
            continue;
        }
        out.push(entry.ch);
    }

    out
}

// Brace-depth re-indenter. Strings and comments flow into the current
// line untouched; `{`, `}` and `;` outside them drive line breaks.
pub fn format(code: &str) -> String {
    let scanned = scan(code);
    let chars = &scanned.chars;
    let mut lines: Vec<String> = Vec::new();
    let mut buffer = String::new();
    let mut depth: usize = 0;

    for (i, entry) in chars.iter().enumerate() {
        if entry.context != CharContext::Code {
            buffer.push(entry.ch);
            continue;
        }

        match entry.ch {
            '{' => {
                buffer.push('{');
                flush_line(&mut lines, &mut buffer, depth);
                depth += 1;
            }
            '}' => {
                if !buffer.trim().is_empty() {
                    flush_line(&mut lines, &mut buffer, depth);
                }
                buffer.clear();
                depth = depth.saturating_sub(1);
                lines.push(indent_line("}", depth));
            }
            ';' => {
                buffer.push(';');
                let next = chars.get(i + 1).map(|n| n.ch);
                if next.is_some_and(|n| !n.is_whitespace()) {
                    flush_line(&mut lines, &mut buffer, depth);
                }
            }
            '\n' | '\r' => {
                if buffer.trim().is_empty() {
                    buffer.clear();
                } else {
                    flush_line(&mut lines, &mut buffer, depth);
                }
            }
            other => buffer.push(other),
        }
    }

    if !buffer.trim().is_empty() {
        flush_line(&mut lines, &mut buffer, depth);
    }

    lines.join("\n")
}

fn indent_line(content: &str, depth: usize) -> String {
    format!("{}{}", "  ".repeat(depth), content)
}

fn flush_line(lines: &mut Vec<String>, buffer: &mut String, depth: usize) {
    lines.push(indent_line(buffer.trim(), depth));
    buffer.clear();
}

fn expected_closer(opener: char) -> char {
    match opener {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

// Bracket-balance check over live code only. All mismatches are
// collected; the scan never aborts early.
pub fn validate(code: &str) -> Result<String, TransformError> {
    let scanned = scan(code);
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut records: Vec<String> = Vec::new();

    for (i, entry) in scanned.chars.iter().enumerate() {
        if entry.context != CharContext::Code {
            continue;
        }
        match entry.ch {
            '(' | '[' | '{' => stack.push((entry.ch, i)),
            ')' | ']' | '}' => match stack.pop() {
                Some((opener, _)) if expected_closer(opener) == entry.ch => {}
                Some((opener, position)) => records.push(format!(
                    "mismatched bracket '{}' at position {} (opened with '{}' at position {})",
                    entry.ch,
                    i + 1,
                    opener,
                    position + 1
                )),
                None => records.push(format!(
                    "unmatched bracket '{}' at position {}",
                    entry.ch,
                    i + 1
                )),
            },
            _ => {}
        }
    }

    for (opener, position) in stack {
        records.push(format!(
            "unclosed bracket '{}' at position {}",
            opener,
            position + 1
        ));
    }

    if scanned.final_state.in_string {
        records.push("unterminated string literal at end of input".to_string());
    }
    if scanned.final_state.in_block_comment {
        records.push("unterminated block comment at end of input".to_string());
    }

    if records.is_empty() {
        Ok(VALIDATION_PASSED.to_string())
    } else {
        Err(TransformError::BracketMismatch { records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_strips_comments_and_tightens_punctuation() {
        let out = compress("function f(){ // hi\n  return 1;\n}");
        assert_eq!(out, "function f(){return 1;}");
    }

    #[test]
    fn compress_preserves_string_contents() {
        let out = compress("var s = \"a  // b\";");
        assert_eq!(out, "var s=\"a  // b\";");
    }

    #[test]
    fn compress_collapses_runs_between_words() {
        let out = compress("var   a\n\n=  1;\nvar b = 2;");
        assert_eq!(out, "var a=1;var b=2;");
    }

    #[test]
    fn minify_keeps_newlines_inside_strings() {
        let out = minify("var s = `line1\nline2`;\nvar t = 1;");
        assert_eq!(out, "var s=`line1\nline2`;var t=1;");
    }

    #[test]
    fn format_indents_by_brace_depth() {
        let out = format("function f(){if(x){return 1;}}");
        assert_eq!(
            out,
            "function f(){\n  if(x){\n    return 1;\n  }\n}"
        );
    }

    #[test]
    fn format_keeps_line_comments_on_their_own_line() {
        let out = format("function f(){ // hi\nreturn 1;\n}");
        assert_eq!(out, "function f(){\n  // hi\n  return 1;\n}");
    }

    #[test]
    fn format_never_drives_depth_below_zero() {
        let out = format("}}x;");
        assert_eq!(out, "}\n}\nx;");
    }

    #[test]
    fn validate_accepts_balanced_code() {
        assert_eq!(
            validate("function f(a, b) { return [a, (b)]; }").unwrap(),
            VALIDATION_PASSED
        );
    }

    #[test]
    fn validate_reports_mismatch_position() {
        let err = validate("(1,2]").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("']'"));
        assert!(message.contains("position 5"));
    }

    #[test]
    fn validate_collects_every_record() {
        let err = validate("([)]").unwrap_err();
        match err {
            TransformError::BracketMismatch { records } => {
                assert_eq!(records.len(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn validate_reports_unclosed_openers() {
        let err = validate("function f( {").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("unclosed bracket '('"));
        assert!(message.contains("unclosed bracket '{'"));
    }

    #[test]
    fn validate_ignores_brackets_in_strings_and_comments() {
        assert!(validate("var s = \"([{\"; // )]}\n/* ) */").is_ok());
    }

    #[test]
    fn validate_rejects_unterminated_string() {
        let err = validate("var s = \"abc").unwrap_err();
        assert!(err.to_string().contains("unterminated string"));
    }
}
