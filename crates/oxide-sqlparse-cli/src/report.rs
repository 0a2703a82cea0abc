//! Per-file reports.

use std::fmt::Write as _;

use serde::Serialize;

use oxide_sqlparse::lexer::Span;
use oxide_sqlparse::{Error, ParseError, Result, Statement};

/// Everything found in one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Input path, or `<stdin>`.
    pub path: String,
    /// Statements in source order.
    pub statements: Vec<StatementReport>,
}

/// One statement of an input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementReport {
    /// Statement text without surrounding whitespace.
    pub query: String,
    /// Leading keyword in upper case.
    pub statement_type: Option<String>,
    /// Byte offset where the statement starts.
    pub start: usize,
    /// Byte offset where the statement ends.
    pub end: usize,
    /// The syntax error, if the statement failed.
    pub error: Option<ErrorReport>,
}

/// A located syntax error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// The grammar message.
    pub message: String,
    /// Compact `[line L:C message]` form.
    pub error_message: String,
    pub line: usize,
    pub column: usize,
    /// Statement text up to the offending token.
    pub query: String,
    /// The whole input with a caret line under the offending token.
    pub marked: String,
}

impl FileReport {
    /// Builds a report from a batch parse.
    ///
    /// A raised syntax error becomes the only statement of the report: the
    /// statements before it are not returned in raise mode.
    ///
    /// # Errors
    ///
    /// Returns an error for a dialect contract violation.
    pub fn from_parse(path: &str, parsed: Result<'_, Vec<Statement<'_>>>) -> anyhow::Result<Self> {
        let statements = match parsed {
            Ok(statements) => statements.iter().map(StatementReport::from).collect(),
            Err(Error::Syntax(error)) => {
                let span = Span::new(
                    error.statement_start,
                    error.statement_start + error.query.len(),
                );
                let statement = Statement::failed(error.original_query, span, error);
                vec![StatementReport::from(&statement)]
            }
            Err(err @ Error::Grammar { .. }) => anyhow::bail!("{path}: {err}"),
        };

        Ok(Self {
            path: String::from(path),
            statements,
        })
    }

    /// Number of failed statements.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.statements.iter().filter(|s| s.error.is_some()).count()
    }

    /// Returns true if no statement failed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.failed() == 0
    }

    /// Renders the failures and a summary line.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for (number, statement) in self.statements.iter().enumerate() {
            let Some(error) = &statement.error else {
                continue;
            };
            let _ = writeln!(
                text,
                "{}: statement {} {}",
                self.path,
                number + 1,
                error.error_message
            );
            for line in error.query.lines() {
                let _ = writeln!(text, "    {line}");
            }
        }
        let _ = writeln!(
            text,
            "{}: {} statements, {} failed",
            self.path,
            self.statements.len(),
            self.failed()
        );
        text
    }
}

impl From<&Statement<'_>> for StatementReport {
    fn from(statement: &Statement<'_>) -> Self {
        Self {
            query: String::from(statement.query),
            statement_type: statement.statement_type(),
            start: statement.span.start,
            end: statement.span.end,
            error: statement.exception.as_ref().map(ErrorReport::from),
        }
    }
}

impl From<&ParseError<'_>> for ErrorReport {
    fn from(error: &ParseError<'_>) -> Self {
        Self {
            message: error.msg.clone(),
            error_message: error.error_message(),
            line: error.line,
            column: error.column,
            query: String::from(error.query),
            marked: error.original_query_with_error_marked(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxide_sqlparse::{SqlParser, sqlparse};

    #[test]
    fn test_report_collects_every_statement() {
        let source = "SELECT 1; SELEC 2; SELECT 3";
        let report = FileReport::from_parse("batch.sql", sqlparse(source, false)).unwrap();

        assert_eq!(report.statements.len(), 3);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_ok());

        let broken = &report.statements[1];
        assert_eq!(broken.query, "SELEC 2");
        assert_eq!(broken.statement_type.as_deref(), Some("SELEC"));
        let error = broken.error.as_ref().unwrap();
        assert_eq!(error.query, "SELEC");
        assert_eq!(error.line, 1);
        assert!(error.message.starts_with("mismatched input 'SELEC' expecting {"));
    }

    #[test]
    fn test_raised_error_becomes_only_statement() {
        let source = "SELECT A ?";
        let parser = SqlParser::new().raise_on_error(true);
        let report = FileReport::from_parse("one.sql", parser.parse(source)).unwrap();

        assert_eq!(report.statements.len(), 1);
        let statement = &report.statements[0];
        assert_eq!(statement.start, 0);
        assert_eq!(statement.statement_type.as_deref(), Some("SELECT"));
        assert!(statement.error.is_some());
    }

    #[test]
    fn test_raised_error_drops_earlier_clean_statements() {
        let source = "SELECT 1; SELECT 2;\nSELEC 3";
        let parser = SqlParser::new().raise_on_error(true);
        let report = FileReport::from_parse("three.sql", parser.parse(source)).unwrap();

        assert_eq!(report.statements.len(), 1);
        assert_eq!(report.failed(), 1);
        let statement = &report.statements[0];
        assert_eq!(statement.start, 20);
        assert_eq!(statement.query, "SELEC");
    }

    #[test]
    fn test_text_lists_failures_and_summary() {
        let source = "SELECT 1;\nSELECT A ?";
        let report = FileReport::from_parse("two.sql", sqlparse(source, false)).unwrap();
        let text = report.to_text();

        assert!(text.contains("two.sql: statement 2 [line 2:9 mismatched input '?'"));
        assert!(text.contains("    SELECT A ?\n"));
        assert!(text.ends_with("two.sql: 2 statements, 1 failed\n"));
    }

    #[test]
    fn test_clean_input_has_only_summary() {
        let report = FileReport::from_parse("ok.sql", sqlparse("SELECT 1", false)).unwrap();
        assert!(report.is_ok());
        assert_eq!(report.to_text(), "ok.sql: 1 statements, 0 failed\n");
    }
}
