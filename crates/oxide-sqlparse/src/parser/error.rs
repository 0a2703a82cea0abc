//! Syntax error events raised by the grammar.
//!
//! Messages follow the conventions of generated SQL grammars so that tooling
//! built around those messages keeps working:
//!
//! - `mismatched input 'x' expecting {<EOF>, ';'}`
//! - `missing ')' at ';'`
//! - `no viable alternative at input 'x'`
//! - `token recognition error at: 'x'`
//!
//! Input nested past the parser's depth limit fails with
//! `maximum nesting depth of N exceeded at 'x'`.

use core::fmt;

use crate::lexer::{Span, Token};

/// A syntax error raised while parsing one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// The grammar-level message.
    pub message: String,
    /// Location of the offending token.
    pub span: Span,
    /// Source text of the offending token, `<EOF>` at the end of input.
    pub text: String,
}

impl SyntaxError {
    /// Creates a syntax error at the given token.
    #[must_use]
    pub fn new(message: impl Into<String>, token: &Token, source: &str) -> Self {
        Self {
            message: message.into(),
            span: token.span,
            text: String::from(token.display_text(source)),
        }
    }

    /// `mismatched input '<found>' expecting <expected>`.
    ///
    /// A single expected item prints bare; several print as `{a, b}`.
    #[must_use]
    pub fn mismatched(token: &Token, source: &str, expected: &[&str]) -> Self {
        let text = token.display_text(source);
        let expected = match expected {
            [single] => String::from(*single),
            many => format!("{{{}}}", many.join(", ")),
        };
        Self::new(
            format!("mismatched input '{text}' expecting {expected}"),
            token,
            source,
        )
    }

    /// `missing '<expected>' at '<found>'`.
    #[must_use]
    pub fn missing(token: &Token, source: &str, expected: &str) -> Self {
        let text = token.display_text(source);
        Self::new(format!("missing {expected} at '{text}'"), token, source)
    }

    /// `no viable alternative at input '<found>'`.
    #[must_use]
    pub fn no_viable_alternative(token: &Token, source: &str) -> Self {
        let text = token.display_text(source);
        Self::new(
            format!("no viable alternative at input '{text}'"),
            token,
            source,
        )
    }

    /// `token recognition error at: '<found>'`.
    #[must_use]
    pub fn token_recognition(token: &Token, source: &str) -> Self {
        let text = token.display_text(source);
        Self::new(
            format!("token recognition error at: '{text}'"),
            token,
            source,
        )
    }

    /// `maximum nesting depth of <limit> exceeded at '<found>'`.
    #[must_use]
    pub fn too_deep(token: &Token, source: &str, limit: usize) -> Self {
        let text = token.display_text(source);
        Self::new(
            format!("maximum nesting depth of {limit} exceeded at '{text}'"),
            token,
            source,
        )
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at position {}..{}",
            self.message, self.span.start, self.span.end
        )
    }
}

impl std::error::Error for SyntaxError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Keyword, TokenKind};

    fn token(kind: TokenKind, start: usize, end: usize) -> Token {
        Token::new(kind, Span::new(start, end))
    }

    #[test]
    fn test_mismatched_with_set() {
        let source = "SELECT A ?";
        let err = SyntaxError::mismatched(
            &token(TokenKind::Question, 9, 10),
            source,
            &["<EOF>", "';'"],
        );
        assert_eq!(err.message, "mismatched input '?' expecting {<EOF>, ';'}");
        assert_eq!(err.text, "?");
        assert_eq!(err.span, Span::new(9, 10));
    }

    #[test]
    fn test_mismatched_single() {
        let source = "DELETE tbl";
        let err = SyntaxError::mismatched(
            &token(TokenKind::Identifier(String::from("tbl")), 7, 10),
            source,
            &["'FROM'"],
        );
        assert_eq!(err.message, "mismatched input 'tbl' expecting 'FROM'");
    }

    #[test]
    fn test_missing_at_eof() {
        let source = "SELECT (1";
        let err = SyntaxError::missing(&token(TokenKind::Eof, 9, 9), source, "')'");
        assert_eq!(err.message, "missing ')' at '<EOF>'");
        assert_eq!(err.text, "<EOF>");
    }

    #[test]
    fn test_no_viable_alternative() {
        let source = "ALTER";
        let err = SyntaxError::no_viable_alternative(
            &token(TokenKind::Keyword(Keyword::Alter), 0, 5),
            source,
        );
        assert_eq!(err.message, "no viable alternative at input 'ALTER'");
    }

    #[test]
    fn test_token_recognition() {
        let source = "SELECT #";
        let err = SyntaxError::token_recognition(
            &token(TokenKind::Error(String::from("Unexpected character: #")), 7, 8),
            source,
        );
        assert_eq!(err.message, "token recognition error at: '#'");
        assert_eq!(err.to_string(), "token recognition error at: '#' at position 7..8");
    }

    #[test]
    fn test_too_deep() {
        let source = "SELECT ((1))";
        let err = SyntaxError::too_deep(&token(TokenKind::LeftParen, 8, 9), source, 64);
        assert_eq!(err.message, "maximum nesting depth of 64 exceeded at '('");
        assert_eq!(err.span, Span::new(8, 9));
    }
}
