//! Per-statement parse results.

use crate::ast;
use crate::error::ParseError;
use crate::lexer::Span;
use crate::metadata::Metadata;

/// One statement of a batch, parsed or failed.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement<'a> {
    /// The statement text without surrounding whitespace.
    pub query: &'a str,
    /// The whole batch.
    pub original_query: &'a str,
    /// Byte range attributed to this statement. Terminators are excluded.
    pub span: Span,
    /// The syntax tree, when the statement parsed.
    pub tree: Option<ast::Statement>,
    /// The error, when it did not.
    pub exception: Option<ParseError<'a>>,
}

impl<'a> Statement<'a> {
    /// A statement that parsed cleanly.
    #[must_use]
    pub fn parsed(original_query: &'a str, span: Span, tree: ast::Statement) -> Self {
        Self::build(original_query, span, Some(tree), None)
    }

    /// A statement that failed with `exception`.
    #[must_use]
    pub fn failed(original_query: &'a str, span: Span, exception: ParseError<'a>) -> Self {
        Self::build(original_query, span, None, Some(exception))
    }

    fn build(
        original_query: &'a str,
        span: Span,
        tree: Option<ast::Statement>,
        exception: Option<ParseError<'a>>,
    ) -> Self {
        Self {
            query: span.slice(original_query).trim(),
            original_query,
            span,
            tree,
            exception,
        }
    }

    /// Returns the exact text between the statement boundaries.
    #[must_use]
    pub fn raw_text(&self) -> &'a str {
        self.span.slice(self.original_query)
    }

    /// Returns true if the statement parsed without error.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.exception.is_none()
    }

    /// Returns the leading keyword in upper case, such as `SELECT`.
    ///
    /// Failed statements have one too, as long as they start with a word.
    #[must_use]
    pub fn statement_type(&self) -> Option<String> {
        let word = self
            .query
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .next()
            .filter(|word| !word.is_empty())?;
        Some(word.to_uppercase())
    }

    /// Returns the tables and properties named by the statement. Failed
    /// statements have none.
    #[must_use]
    pub fn metadata(&self) -> Metadata {
        self.tree
            .as_ref()
            .map(Metadata::from_tree)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_trimmed_raw_text() {
        let source = "SELECT 1;\n  ANALYZE \n";
        let stmt = Statement::parsed(source, Span::new(12, source.len()), ast::Statement::Analyze);
        assert_eq!(stmt.raw_text(), "ANALYZE \n");
        assert_eq!(stmt.query, "ANALYZE");
        assert!(stmt.is_ok());
    }

    #[test]
    fn test_statement_type() {
        let source = "select(1); 123; ";
        let stmt = Statement::parsed(source, Span::new(0, 9), ast::Statement::Analyze);
        assert_eq!(stmt.statement_type().as_deref(), Some("SELECT"));
        let stmt = Statement::parsed(source, Span::new(14, 16), ast::Statement::Analyze);
        assert_eq!(stmt.statement_type(), None);
    }
}
