//! SQL Dialect support.
//!
//! A dialect is the grammar behind the recovery engine: it tokenizes a batch,
//! parses one statement from any token position, and names the tokens that
//! end or start a statement. The engine never looks at keywords itself.

mod cratedb;

pub use cratedb::CrateDialect;

use crate::ast::Statement;
use crate::lexer::{Keyword, Token, TokenKind};
use crate::parser::SyntaxError;

/// Outcome of parsing one statement from a token position.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseAttempt {
    /// The syntax tree, present when no error was raised.
    pub tree: Option<Statement>,
    /// Errors raised during the attempt, in the order they were met.
    pub errors: Vec<SyntaxError>,
    /// Index of the token the parser stopped on. For a clean parse this is
    /// the terminator or EOF token that closed the statement.
    pub end: usize,
}

impl ParseAttempt {
    /// A clean parse that stopped on token `end`.
    #[must_use]
    pub const fn parsed(tree: Statement, end: usize) -> Self {
        Self {
            tree: Some(tree),
            errors: Vec::new(),
            end,
        }
    }

    /// A failed parse.
    #[must_use]
    pub fn failed(error: SyntaxError, end: usize) -> Self {
        Self {
            tree: None,
            errors: vec![error],
            end,
        }
    }

    /// Returns true if no error was raised.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Trait for SQL dialect-specific behavior.
pub trait Dialect: Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Splits `source` into tokens. The stream ends with exactly one EOF
    /// token.
    fn tokenize(&self, source: &str) -> Vec<Token>;

    /// Parses a single statement starting at token index `start`.
    fn parse_from(&self, source: &str, tokens: &[Token], start: usize) -> ParseAttempt;

    /// Keywords that can start a statement.
    fn statement_keywords(&self) -> &[Keyword];

    /// Returns whether `token` ends a statement.
    fn is_terminator(&self, token: &Token) -> bool {
        matches!(token.kind, TokenKind::Semicolon)
    }

    /// Returns whether `token` can start a statement.
    fn is_statement_start(&self, token: &Token) -> bool {
        token
            .as_keyword()
            .is_some_and(|kw| self.statement_keywords().contains(&kw))
    }
}
