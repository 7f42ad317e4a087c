use logos::Logos;

// Classifier for bare tokens found in value position while repairing
// loosely formatted JSON.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum ValueToken {
    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("null")]
    Null,

    #[regex(r"-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    Number,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Identifier,
}

pub fn classify(token: &str) -> Option<ValueToken> {
    let mut lexer = ValueToken::lexer(token);
    match lexer.next() {
        Some(Ok(value)) if lexer.remainder().is_empty() => Some(value),
        _ => None,
    }
}

// True for the scalar spellings JSON accepts unquoted.
pub fn is_scalar(token: &str) -> bool {
    matches!(
        classify(token),
        Some(ValueToken::True | ValueToken::False | ValueToken::Null | ValueToken::Number)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_classify_as_scalars() {
        assert!(is_scalar("true"));
        assert!(is_scalar("false"));
        assert!(is_scalar("null"));
    }

    #[test]
    fn numbers_classify_as_scalars() {
        assert!(is_scalar("0"));
        assert!(is_scalar("42"));
        assert!(is_scalar("3.25"));
        assert!(is_scalar("1e5"));
        assert!(is_scalar("2E-3"));
    }

    #[test]
    fn identifiers_are_not_scalars() {
        assert_eq!(classify("unknownVar"), Some(ValueToken::Identifier));
        assert!(!is_scalar("unknownVar"));
        assert!(!is_scalar("truex"));
        assert!(!is_scalar("nully"));
    }

    #[test]
    fn mixed_tokens_are_rejected() {
        assert_eq!(classify("123abc"), None);
        assert!(!is_scalar("123abc"));
    }
}
