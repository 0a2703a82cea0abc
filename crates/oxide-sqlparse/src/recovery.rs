//! Statement recovery engine.
//!
//! Splits a batch into statements by running the dialect's parser once per
//! statement over a single token stream. A failed statement is bounded by the
//! next terminator or statement keyword after the offending token, and parsing
//! resumes from there:
//!
//! ```text
//! Parsing --clean--> emit, Parsing after the terminator
//! Parsing --error--> Recovering --bounded--> emit, Parsing at the boundary
//! Parsing --EOF----> Done
//! ```

use tracing::{debug, trace, warn};

use crate::dialect::Dialect;
use crate::error::{Error, ParseError, Result};
use crate::lexer::{Span, Token};
use crate::parser::SyntaxError;
use crate::position::LineIndex;
use crate::statement::Statement;

/// Engine state, carrying the token index it applies to.
#[derive(Debug)]
enum State {
    /// Parse a statement starting at this token.
    Parsing(usize),
    /// The statement starting at `start` raised `error`.
    Recovering { start: usize, error: SyntaxError },
    Done,
}

/// Where a failed statement ends and what comes after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Boundary {
    /// Byte offset at which the statement text ends.
    end: usize,
    /// Next state: the token to resume at, or `None` for end of input.
    resume: Option<usize>,
}

/// Recovery engine over one batch.
pub struct Recovery<'d, 'a> {
    dialect: &'d dyn Dialect,
    index: LineIndex<'a>,
    tokens: Vec<Token>,
    raise_on_error: bool,
}

impl<'d, 'a> Recovery<'d, 'a> {
    /// Tokenizes `source` and checks that the stream ends with exactly one
    /// EOF token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Grammar`] if the dialect's token stream is malformed.
    pub fn new(dialect: &'d dyn Dialect, source: &'a str, raise_on_error: bool) -> Result<'a, Self> {
        let tokens = dialect.tokenize(source);
        let recovery = Self {
            dialect,
            index: LineIndex::new(source),
            tokens,
            raise_on_error,
        };

        match recovery.tokens.iter().position(Token::is_eof) {
            Some(eof) if eof + 1 == recovery.tokens.len() => Ok(recovery),
            Some(eof) => Err(recovery.contract_violation(eof, "EOF token before the end of the stream")),
            None => Err(recovery.contract_violation(
                recovery.tokens.len(),
                "token stream does not end with EOF",
            )),
        }
    }

    /// Runs the engine to completion and returns the statements in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] for the first failed statement when raising
    /// on errors, and [`Error::Grammar`] if the dialect breaks its contract.
    pub fn run(self) -> Result<'a, Vec<Statement<'a>>> {
        let mut statements = Vec::new();
        let mut state = State::Parsing(0);
        loop {
            state = match state {
                State::Parsing(position) => self.parse(position, &mut statements)?,
                State::Recovering { start, error } => self.recover(start, &error, &mut statements)?,
                State::Done => break,
            };
        }
        debug!(
            dialect = self.dialect.name(),
            statements = statements.len(),
            failed = statements.iter().filter(|s| !s.is_ok()).count(),
            "Batch parsed"
        );
        Ok(statements)
    }

    fn source(&self) -> &'a str {
        self.index.source()
    }

    fn token(&self, position: usize) -> Result<'a, &Token> {
        self.tokens
            .get(position)
            .ok_or_else(|| self.contract_violation(position, "token index out of range"))
    }

    /// One parse attempt from `position`.
    fn parse(&self, position: usize, statements: &mut Vec<Statement<'a>>) -> Result<'a, State> {
        let first = self.token(position)?;
        if first.is_eof() {
            return Ok(State::Done);
        }
        if self.dialect.is_terminator(first) {
            trace!(position, "Skipping empty statement");
            return Ok(State::Parsing(position + 1));
        }

        trace!(position, offset = first.span.start, "Parsing statement");
        let attempt = self
            .dialect
            .parse_from(self.source(), &self.tokens, position);

        if let Some(error) = attempt.errors.into_iter().min_by_key(|e| e.span.start) {
            if error.span.start < first.span.start || error.span.end > self.source().len() {
                return Err(self.contract_violation(
                    position,
                    format!(
                        "error at {}..{} lies outside the statement",
                        error.span.start, error.span.end
                    ),
                ));
            }
            return Ok(State::Recovering {
                start: position,
                error,
            });
        }

        let Some(tree) = attempt.tree else {
            return Err(self.contract_violation(position, "clean parse without a tree"));
        };
        let end = self.token(attempt.end)?;
        if attempt.end <= position || !(end.is_eof() || self.dialect.is_terminator(end)) {
            return Err(self.contract_violation(
                attempt.end,
                "clean parse did not stop on a terminator",
            ));
        }

        let span = Span::new(first.span.start, end.span.start);
        debug!(start = span.start, end = span.end, "Statement parsed");
        statements.push(Statement::parsed(self.source(), span, tree));

        Ok(if end.is_eof() {
            State::Done
        } else {
            State::Parsing(attempt.end + 1)
        })
    }

    /// Records the failed statement starting at `start` and finds where to
    /// resume.
    fn recover(
        &self,
        start: usize,
        error: &SyntaxError,
        statements: &mut Vec<Statement<'a>>,
    ) -> Result<'a, State> {
        let statement_start = self.token(start)?.span.start;
        let exception = ParseError::new(error, statement_start, &self.index);
        if self.raise_on_error {
            debug!(message = %exception.msg, "Raising on first failed statement");
            return Err(Error::Syntax(exception));
        }

        // First token at or after the error offset. The EOF token always
        // qualifies, since error offsets never pass the end of input.
        let offending = self.tokens[start..]
            .iter()
            .position(|token| token.span.start >= error.span.start)
            .map(|i| start + i)
            .ok_or_else(|| self.contract_violation(start, "error offset past the end of input"))?;

        let boundary = self.boundary(offending);
        debug!(
            offending,
            message = %exception.msg,
            end = boundary.end,
            resume = ?boundary.resume,
            "Statement failed, resynchronized"
        );
        statements.push(Statement::failed(
            self.source(),
            Span::new(statement_start, boundary.end),
            exception,
        ));

        Ok(boundary.resume.map_or(State::Done, State::Parsing))
    }

    /// Bounds a failed statement given its offending token.
    ///
    /// An offending terminator ends the statement on the spot. Otherwise the
    /// scan starts after the offending token and stops at the first
    /// terminator (consumed), statement keyword (kept for the next statement)
    /// or EOF, whichever comes first.
    fn boundary(&self, offending: usize) -> Boundary {
        let end_of_input = Boundary {
            end: self.source().len(),
            resume: None,
        };

        let token = &self.tokens[offending];
        if token.is_eof() {
            return end_of_input;
        }
        if self.dialect.is_terminator(token) {
            return Boundary {
                end: token.span.start,
                resume: Some(offending + 1),
            };
        }

        for (i, token) in self.tokens.iter().enumerate().skip(offending + 1) {
            if token.is_eof() {
                break;
            }
            if self.dialect.is_terminator(token) {
                return Boundary {
                    end: token.span.start,
                    resume: Some(i + 1),
                };
            }
            if self.dialect.is_statement_start(token) {
                return Boundary {
                    end: token.span.start,
                    resume: Some(i),
                };
            }
        }
        end_of_input
    }

    fn contract_violation(&self, position: usize, reason: impl Into<String>) -> Error<'a> {
        let reason = reason.into();
        warn!(dialect = self.dialect.name(), position, %reason, "Dialect broke the parse contract");
        Error::Grammar {
            dialect: self.dialect.name(),
            position,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast;
    use crate::dialect::{CrateDialect, ParseAttempt};
    use crate::lexer::{Keyword, TokenKind};

    fn run(source: &str) -> Vec<Statement<'_>> {
        Recovery::new(&CrateDialect::new(), source, false)
            .unwrap()
            .run()
            .unwrap()
    }

    fn boundary(source: &str, offending: usize) -> Boundary {
        Recovery::new(&CrateDialect::new(), source, false)
            .unwrap()
            .boundary(offending)
    }

    #[test]
    fn test_empty_and_stray_terminators() {
        assert!(run("").is_empty());
        assert!(run("  \n\t ").is_empty());
        assert!(run(";;").is_empty());
        let statements = run(";SELECT 1;;SELECT 2;;");
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[1].query, "SELECT 2");
    }

    #[test]
    fn test_boundary_at_terminator() {
        // SELECT 1 + ; SELECT 2
        let b = boundary("SELECT 1 + ; SELECT 2", 3);
        assert_eq!(b, Boundary { end: 11, resume: Some(4) });
    }

    #[test]
    fn test_boundary_scans_past_offending_keyword() {
        // select 2 select 3; -> offending is the second select
        let b = boundary("select 2 select 3; x", 2);
        assert_eq!(b, Boundary { end: 17, resume: Some(5) });
    }

    #[test]
    fn test_boundary_stops_before_statement_keyword() {
        let b = boundary("select a b c\nselect 3", 3);
        assert_eq!(b, Boundary { end: 13, resume: Some(4) });
    }

    #[test]
    fn test_terminator_before_keyword_wins() {
        let b = boundary("select a b;select 3", 2);
        assert_eq!(b, Boundary { end: 10, resume: Some(4) });
    }

    #[test]
    fn test_boundary_runs_to_end_of_input() {
        let source = "select a b c d";
        assert_eq!(boundary(source, 2), Boundary { end: source.len(), resume: None });
        assert_eq!(boundary(source, 5), Boundary { end: source.len(), resume: None });
    }

    #[test]
    fn test_raise_on_error_stops_at_first_failure() {
        let result = Recovery::new(&CrateDialect::new(), "SELECT 1; SELEC 2; SELEC 3", true)
            .unwrap()
            .run();
        let Err(Error::Syntax(error)) = result else {
            panic!("expected a syntax error");
        };
        assert_eq!(error.query, "SELEC");
        assert_eq!(error.column, 11);
    }

    /// A dialect whose clean parses never reach a terminator.
    struct Broken;

    impl Dialect for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn tokenize(&self, source: &str) -> Vec<Token> {
            CrateDialect::new().tokenize(source)
        }

        fn parse_from(&self, _source: &str, _tokens: &[Token], start: usize) -> ParseAttempt {
            ParseAttempt::parsed(ast::Statement::Analyze, start)
        }

        fn statement_keywords(&self) -> &[Keyword] {
            &[Keyword::Analyze]
        }
    }

    /// A dialect that forgets the EOF token.
    struct Endless;

    impl Dialect for Endless {
        fn name(&self) -> &'static str {
            "endless"
        }

        fn tokenize(&self, source: &str) -> Vec<Token> {
            let mut tokens = CrateDialect::new().tokenize(source);
            tokens.retain(|token| token.kind != TokenKind::Eof);
            tokens
        }

        fn parse_from(&self, source: &str, tokens: &[Token], start: usize) -> ParseAttempt {
            CrateDialect::new().parse_from(source, tokens, start)
        }

        fn statement_keywords(&self) -> &[Keyword] {
            &[]
        }
    }

    #[test]
    fn test_contract_violations_abort() {
        let result = Recovery::new(&Broken, "ANALYZE", false).unwrap().run();
        assert!(matches!(result, Err(Error::Grammar { dialect: "broken", position: 0, .. })));

        let result = Recovery::new(&Endless, "ANALYZE", false);
        assert!(matches!(result, Err(Error::Grammar { dialect: "endless", position: 1, .. })));
    }
}
