use crate::error::TransformError;
use crate::scanner::{CharContext, Scanner, scan, strip_comments};
use crate::token;

// Rewrites JS-object-literal-like text into strict JSON. Each pass walks
// the text with a fresh scan so rewrites never touch the inside of an
// already valid string literal.
pub fn repair(text: &str) -> Result<String, TransformError> {
    let cleaned = strip_comments(text.trim());
    let cleaned = remove_trailing_commas(cleaned.trim());
    let cleaned = quote_bare_keys(&cleaned);
    let cleaned = convert_single_quoted(&cleaned, QuotePosition::Key);
    let cleaned = convert_single_quoted(&cleaned, QuotePosition::Value);

    let offenders = collect_bare_values(&cleaned);
    if !offenders.is_empty() {
        return Err(TransformError::MalformedInput { tokens: offenders });
    }

    Ok(cleaned)
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

// Drop a comma whose next significant live character closes an object or
// array.
fn remove_trailing_commas(text: &str) -> String {
    let scanned = scan(text);
    let chars = &scanned.chars;
    let mut out = String::with_capacity(text.len());

    for (i, entry) in chars.iter().enumerate() {
        if entry.context == CharContext::Code && entry.ch == ',' {
            let mut j = i + 1;
            while j < chars.len()
                && chars[j].context == CharContext::Code
                && chars[j].ch.is_whitespace()
            {
                j += 1;
            }
            if j < chars.len()
                && chars[j].context == CharContext::Code
                && matches!(chars[j].ch, '}' | ']')
            {
                continue;
            }
        }
        out.push(entry.ch);
    }

    out
}

// Wrap an identifier-shaped token in double quotes when it sits in key
// position: preceded by `{` or `,`, followed by `:`. Leading digits are
// allowed, matching loose object-literal keys.
fn quote_bare_keys(text: &str) -> String {
    let scanned = scan(text);
    let chars = &scanned.chars;
    let mut out = String::with_capacity(text.len() + 16);
    let mut prev_significant: Option<char> = None;

    let mut i = 0;
    while i < chars.len() {
        let entry = chars[i];

        if entry.context == CharContext::Code
            && is_ident_char(entry.ch)
            && matches!(prev_significant, Some('{') | Some(','))
        {
            let mut j = i;
            let mut ident = String::new();
            while j < chars.len()
                && chars[j].context == CharContext::Code
                && is_ident_char(chars[j].ch)
            {
                ident.push(chars[j].ch);
                j += 1;
            }

            let mut k = j;
            while k < chars.len()
                && chars[k].context == CharContext::Code
                && chars[k].ch.is_whitespace()
            {
                k += 1;
            }
            let is_key = k < chars.len()
                && chars[k].context == CharContext::Code
                && chars[k].ch == ':';

            if is_key {
                out.push('"');
                out.push_str(&ident);
                out.push('"');
            } else {
                out.push_str(&ident);
            }

            prev_significant = ident.chars().next_back();
            i = j;
            continue;
        }

        if !entry.ch.is_whitespace() {
            prev_significant = Some(entry.ch);
        }
        out.push(entry.ch);
        i += 1;
    }

    out
}

#[derive(Clone, Copy, PartialEq)]
enum QuotePosition {
    // Followed by `:`
    Key,
    // After `:`, `[` or `,`
    Value,
}

// Replace the delimiters of a single-quoted string with double quotes,
// keeping the contents verbatim, escape sequences included.
fn convert_single_quoted(text: &str, position: QuotePosition) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut scanner = Scanner::new();
    let mut out = String::with_capacity(text.len());
    let mut prev_significant: Option<char> = None;

    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        let lookahead = chars.get(i + 1).copied();

        if !scanner.in_string() && !scanner.in_comment() && ch == '\'' {
            let mut inner = scanner.clone();
            inner.step(ch, lookahead);

            let mut j = i + 1;
            let mut content = String::new();
            let mut closed = false;
            while j < chars.len() {
                inner.step(chars[j], chars.get(j + 1).copied());
                if !inner.in_string() {
                    closed = true;
                    break;
                }
                content.push(chars[j]);
                j += 1;
            }

            if closed {
                let mut k = j + 1;
                while k < chars.len() && chars[k].is_whitespace() {
                    k += 1;
                }
                let followed_by_colon = chars.get(k).copied() == Some(':');
                let in_value_position =
                    matches!(prev_significant, Some(':') | Some('[') | Some(','));

                let convert = match position {
                    QuotePosition::Key => followed_by_colon,
                    QuotePosition::Value => in_value_position && !followed_by_colon,
                };

                let delimiter = if convert { '"' } else { '\'' };
                out.push(delimiter);
                out.push_str(&content);
                out.push(delimiter);

                prev_significant = Some(delimiter);
                scanner = inner;
                i = j + 1;
                continue;
            }
        }

        let step = scanner.step(ch, lookahead);
        out.push(ch);
        if step.consumed_lookahead {
            if let Some(next) = lookahead {
                out.push(next);
            }
            i += 2;
            continue;
        }

        if !ch.is_whitespace() {
            prev_significant = Some(ch);
        }
        i += 1;
    }

    out
}

// Every identifier-shaped token still sitting after a `:` must be one of
// the scalar spellings JSON accepts; anything else is collected so the
// caller can report all offenders at once.
fn collect_bare_values(text: &str) -> Vec<String> {
    let scanned = scan(text);
    let chars = &scanned.chars;
    let mut offenders = Vec::new();

    let mut i = 0;
    while i < chars.len() {
        if chars[i].context == CharContext::Code && chars[i].ch == ':' {
            let mut j = i + 1;
            while j < chars.len()
                && chars[j].context == CharContext::Code
                && chars[j].ch.is_whitespace()
            {
                j += 1;
            }

            if j < chars.len()
                && chars[j].context == CharContext::Code
                && is_ident_char(chars[j].ch)
            {
                let mut ident = String::new();
                while j < chars.len()
                    && chars[j].context == CharContext::Code
                    && is_ident_char(chars[j].ch)
                {
                    ident.push(chars[j].ch);
                    j += 1;
                }
                if !token::is_scalar(&ident) {
                    offenders.push(ident);
                }
            }

            i = j.max(i + 1);
            continue;
        }
        i += 1;
    }

    offenders
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repairs_object_literal_to_strict_json() {
        let repaired = repair("{ name: 'a', age: 30, }").unwrap();
        let value: serde_json::Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(value, serde_json::json!({"name": "a", "age": 30}));
    }

    #[test]
    fn strips_comments_before_rewriting() {
        let repaired = repair("{\n  // comment\n  a: 1, /* block */ b: 2\n}").unwrap();
        let value: serde_json::Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(value, serde_json::json!({"a": 1, "b": 2}));
    }

    #[test]
    fn removes_trailing_commas_in_arrays_and_objects() {
        let repaired = repair("{\"a\": [1, 2, 3,], \"b\": {\"c\": 4,},}").unwrap();
        assert_eq!(repaired, "{\"a\": [1, 2, 3], \"b\": {\"c\": 4}}");
    }

    #[test]
    fn keeps_comma_followed_by_string() {
        let repaired = repair("[\"a\", \"b\"]").unwrap();
        assert_eq!(repaired, "[\"a\", \"b\"]");
    }

    #[test]
    fn quotes_bare_keys_with_leading_digits() {
        let repaired = repair("{2fast: 1, $dollar: 2, _under: 3}").unwrap();
        let value: serde_json::Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"2fast": 1, "$dollar": 2, "_under": 3})
        );
    }

    #[test]
    fn leaves_bare_tokens_outside_key_position_alone() {
        let repaired = repair("{\"a\": [1, 2]}").unwrap();
        assert_eq!(repaired, "{\"a\": [1, 2]}");
    }

    #[test]
    fn converts_single_quoted_keys_and_values() {
        let repaired = repair("{'name': 'value', list: ['x', 'y']}").unwrap();
        let value: serde_json::Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"name": "value", "list": ["x", "y"]})
        );
    }

    #[test]
    fn single_quotes_inside_double_quoted_strings_survive() {
        let repaired = repair(r#"{"a": "it's fine"}"#).unwrap();
        assert_eq!(repaired, r#"{"a": "it's fine"}"#);
    }

    #[test]
    fn bare_value_fails_with_token_in_message() {
        let err = repair("{a: unknownVar}").unwrap_err();
        match &err {
            TransformError::MalformedInput { tokens } => {
                assert_eq!(tokens, &vec!["unknownVar".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("unknownVar"));
    }

    #[test]
    fn all_bare_values_are_collected() {
        let err = repair("{a: foo, b: bar, c: 1}").unwrap_err();
        match err {
            TransformError::MalformedInput { tokens } => {
                assert_eq!(tokens, vec!["foo".to_string(), "bar".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn scalar_values_pass_the_bare_token_check() {
        let repaired = repair("{a: true, b: false, c: null, d: 1e3}").unwrap();
        let value: serde_json::Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"a": true, "b": false, "c": null, "d": 1000.0})
        );
    }

    #[test]
    fn colon_inside_string_is_not_value_position() {
        let repaired = repair(r#"{"url": "http://x", "a": 1}"#).unwrap();
        assert_eq!(repaired, r#"{"url": "http://x", "a": 1}"#);
    }
}
