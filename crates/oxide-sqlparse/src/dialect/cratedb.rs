//! CrateDB-flavoured SQL dialect.

use super::{Dialect, ParseAttempt};
use crate::lexer::{Keyword, Lexer, Token};
use crate::parser::{Parser, STATEMENT_KEYWORDS};

/// The built-in grammar: the hand-written recursive descent parser over the
/// CrateDB statement set.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrateDialect;

impl CrateDialect {
    /// Creates a new CrateDB dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for CrateDialect {
    fn name(&self) -> &'static str {
        "cratedb"
    }

    fn tokenize(&self, source: &str) -> Vec<Token> {
        Lexer::new(source).tokenize()
    }

    fn parse_from(&self, source: &str, tokens: &[Token], start: usize) -> ParseAttempt {
        let mut parser = Parser::new(source, tokens, start);
        match parser.parse_terminated_statement() {
            Ok(tree) => ParseAttempt::parsed(tree, parser.position()),
            Err(error) => ParseAttempt::failed(error, parser.position()),
        }
    }

    fn statement_keywords(&self) -> &[Keyword] {
        &STATEMENT_KEYWORDS
    }
}
