//! Rendering of statement errors.
//!
//! Two forms exist: the compact `[line L:C message]` string, and the whole
//! batch reproduced verbatim with a caret line under the offending token.
//!
//! ```text
//! SELECT 1;
//! SELEC 2;
//! ^^^^^
//! SELECT 3;
//! ```

use crate::error::ParseError;
use crate::position::LineIndex;

/// Formats `[line L:C message]`, where `C` is the number of characters
/// before the offending token on its line.
#[must_use]
pub fn error_message(error: &ParseError<'_>) -> String {
    format!(
        "[line {}:{} {}]",
        error.line,
        error.column.saturating_sub(1),
        error.msg
    )
}

/// Reproduces the batch with a caret line inserted after the line holding
/// the offending token.
///
/// The carets start under the token and are as long as the part of the token
/// on that line, with at least one caret for the end of input. The inserted
/// line reuses the terminator of the marked line, or `\n` when it is the
/// last line. Other lines are left untouched.
#[must_use]
pub fn mark_error(error: &ParseError<'_>) -> String {
    let source = error.original_query;
    let index = LineIndex::new(source);
    let Some(line) = index.line(error.line) else {
        return String::from(source);
    };

    let padding = error.column.saturating_sub(1);
    let remaining = line.text.chars().count().saturating_sub(padding);
    let width = error
        .span
        .slice(source)
        .chars()
        .count()
        .min(remaining)
        .max(1);
    let separator = if line.terminator.is_empty() {
        "\n"
    } else {
        line.terminator
    };

    let split = line.span.end;
    let mut marked = String::with_capacity(source.len() + separator.len() + padding + width);
    marked.push_str(&source[..split]);
    marked.push_str(separator);
    marked.push_str(&" ".repeat(padding));
    marked.push_str(&"^".repeat(width));
    marked.push_str(&source[split..]);
    marked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Span, Token, TokenKind};
    use crate::parser::SyntaxError;

    fn located<'a>(index: &LineIndex<'a>, start: usize, end: usize, kind: TokenKind) -> ParseError<'a> {
        let token = Token::new(kind, Span::new(start, end));
        let syntax = SyntaxError::no_viable_alternative(&token, index.source());
        ParseError::new(&syntax, 0, index)
    }

    #[test]
    fn test_error_message_counts_preceding_characters() {
        let index = LineIndex::new("\n        SELEC 1;");
        let error = located(&index, 9, 14, TokenKind::Identifier(String::from("SELEC")));
        assert_eq!(
            error_message(&error),
            "[line 2:8 no viable alternative at input 'SELEC']"
        );
    }

    #[test]
    fn test_mark_middle_line() {
        let source = "SELECT 1;\nSELEC 2;\nSELECT 3;";
        let index = LineIndex::new(source);
        let error = located(&index, 10, 15, TokenKind::Identifier(String::from("SELEC")));
        assert_eq!(
            mark_error(&error),
            "SELECT 1;\nSELEC 2;\n^^^^^\nSELECT 3;"
        );
    }

    #[test]
    fn test_mark_last_line_appends_newline() {
        let source = "SELECT 1 +";
        let index = LineIndex::new(source);
        let error = located(&index, 10, 10, TokenKind::Eof);
        assert_eq!(mark_error(&error), "SELECT 1 +\n          ^");
    }

    #[test]
    fn test_mark_keeps_crlf() {
        let source = "SELECT a b c\r\nSELECT 2";
        let index = LineIndex::new(source);
        let error = located(&index, 11, 12, TokenKind::Identifier(String::from("c")));
        assert_eq!(
            mark_error(&error),
            "SELECT a b c\r\n           ^\r\nSELECT 2"
        );
    }

    #[test]
    fn test_mark_counts_characters_not_bytes() {
        let source = "SELECT 'é' ü";
        let index = LineIndex::new(source);
        let start = source.find('ü').unwrap();
        let error = located(&index, start, start + 'ü'.len_utf8(), TokenKind::Error(String::new()));
        assert_eq!(mark_error(&error), "SELECT 'é' ü\n           ^");
    }

    #[test]
    fn test_mark_is_idempotent() {
        let source = "SELECT\tx y";
        let index = LineIndex::new(source);
        let error = located(&index, 9, 10, TokenKind::Identifier(String::from("y")));
        assert_eq!(mark_error(&error), mark_error(&error));
        assert_eq!(mark_error(&error), "SELECT\tx y\n         ^");
    }
}
