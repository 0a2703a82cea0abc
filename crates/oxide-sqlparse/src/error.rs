//! Error types for batch parsing.

use core::fmt;

use crate::diagnostic;
use crate::lexer::Span;
use crate::parser::SyntaxError;
use crate::position::LineIndex;

/// A syntax failure of one statement, located within the whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError<'a> {
    /// The grammar message, verbatim.
    pub msg: String,
    /// The statement text from its first token up to and including the
    /// offending token.
    pub query: &'a str,
    /// Line of the offending token, starting at 1.
    pub line: usize,
    /// Character column of the offending token, starting at 1.
    pub column: usize,
    /// Byte range of the offending token in the batch.
    pub span: Span,
    /// Source text of the offending token, `<EOF>` at the end of input.
    pub offending_text: String,
    /// The whole batch the statement came from.
    pub original_query: &'a str,
    /// Byte offset of the failed statement's first token.
    pub statement_start: usize,
}

impl<'a> ParseError<'a> {
    /// Locates `error` in the batch behind `index`. `statement_start` is the
    /// byte offset of the failed statement's first token.
    #[must_use]
    pub fn new(error: &SyntaxError, statement_start: usize, index: &LineIndex<'a>) -> Self {
        let source = index.source();
        let position = index.line_col(error.span.start);
        let consumed = source
            .get(statement_start..error.span.end)
            .unwrap_or_default();
        // An empty offending token is the end of input; the whitespace before
        // it is not part of the query.
        let query = if error.span.is_empty() {
            consumed.trim_end()
        } else {
            consumed
        };

        Self {
            msg: error.message.clone(),
            query,
            line: position.line,
            column: position.column,
            span: error.span,
            offending_text: error.text.clone(),
            original_query: source,
            statement_start,
        }
    }

    /// Returns the compact form `[line L:C message]`.
    ///
    /// `C` counts the characters before the offending token on its line.
    #[must_use]
    pub fn error_message(&self) -> String {
        diagnostic::error_message(self)
    }

    /// Returns the whole batch with a caret line under the offending token.
    #[must_use]
    pub fn original_query_with_error_marked(&self) -> String {
        diagnostic::mark_error(self)
    }
}

impl fmt::Display for ParseError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error_message())
    }
}

impl std::error::Error for ParseError<'_> {}

/// Errors that abort a batch parse.
#[derive(Debug, thiserror::Error)]
pub enum Error<'a> {
    /// A statement failed to parse while raising on errors.
    #[error("{0}")]
    Syntax(ParseError<'a>),

    /// The dialect broke its parsing contract.
    #[error("dialect '{dialect}' broke the parse contract at token {position}: {reason}")]
    Grammar {
        /// Name of the dialect.
        dialect: &'static str,
        /// Token index at which the violation was detected.
        position: usize,
        /// What went wrong.
        reason: String,
    },
}

impl<'a> From<ParseError<'a>> for Error<'a> {
    fn from(error: ParseError<'a>) -> Self {
        Self::Syntax(error)
    }
}

/// Result type for batch parsing.
pub type Result<'a, T> = std::result::Result<T, Error<'a>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Token, TokenKind};

    fn error_at(source: &str, start: usize, end: usize, kind: TokenKind) -> SyntaxError {
        SyntaxError::no_viable_alternative(&Token::new(kind, Span::new(start, end)), source)
    }

    #[test]
    fn test_consumed_query_ends_with_offending_token() {
        let source = "SELECT 1;\n  SELECT x y z";
        let index = LineIndex::new(source);
        let syntax = error_at(source, 23, 24, TokenKind::Identifier(String::from("z")));
        let error = ParseError::new(&syntax, 12, &index);

        assert_eq!(error.query, "SELECT x y z");
        assert_eq!((error.line, error.column), (2, 14));
        assert_eq!(error.statement_start, 12);
        assert_eq!(error.offending_text, "z");
        assert_eq!(error.original_query, source);
        assert_eq!(
            error.error_message(),
            "[line 2:13 no viable alternative at input 'z']"
        );
        assert_eq!(error.to_string(), error.error_message());
    }

    #[test]
    fn test_end_of_input_drops_trailing_whitespace() {
        let source = "SELECT 1\n limit ";
        let index = LineIndex::new(source);
        let syntax = error_at(source, source.len(), source.len(), TokenKind::Eof);
        let error = ParseError::new(&syntax, 0, &index);

        assert_eq!(error.query, "SELECT 1\n limit");
        assert_eq!(error.offending_text, "<EOF>");
    }

    #[test]
    fn test_grammar_error_display() {
        let error = Error::Grammar {
            dialect: "cratedb",
            position: 3,
            reason: String::from("token stream does not end with EOF"),
        };
        assert_eq!(
            error.to_string(),
            "dialect 'cratedb' broke the parse contract at token 3: token stream does not end with EOF"
        );
    }
}
