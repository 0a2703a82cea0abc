//! # oxide-sqlparse
//!
//! Multi-statement SQL parsing with per-statement error recovery.
//!
//! This crate provides:
//! - A hand-written recursive descent parser with Pratt expression parsing
//!   for a CrateDB-flavoured SQL dialect
//! - A recovery engine that keeps parsing after a broken statement, so every
//!   statement of a batch gets its own result
//! - Located error reports with a caret rendering of the offending token
//!
//! ## Parsing a batch
//!
//! ```rust
//! use oxide_sqlparse::sqlparse;
//!
//! let statements = sqlparse("SELECT 1; SELEC 2; SELECT 3", false).unwrap();
//! assert_eq!(statements.len(), 3);
//! assert!(statements[0].exception.is_none());
//!
//! let error = statements[1].exception.as_ref().unwrap();
//! assert_eq!(error.query, "SELEC");
//! assert!(error.error_message().starts_with("[line 1:10 mismatched input 'SELEC'"));
//! ```
//!
//! ## Raising on the first error
//!
//! ```rust
//! use oxide_sqlparse::{Error, SqlParser};
//!
//! let parser = SqlParser::new().raise_on_error(true);
//! assert!(parser.parse("SELECT COUNT(*) FROM doc.tbl f WHERE f.id = 1").is_ok());
//! assert!(matches!(parser.parse("some non sql string"), Err(Error::Syntax(_))));
//! ```

pub mod ast;
pub mod diagnostic;
pub mod dialect;
pub mod error;
pub mod lexer;
pub mod metadata;
pub mod parser;
pub mod position;
pub mod recovery;
pub mod statement;

use std::sync::Arc;

pub use dialect::{CrateDialect, Dialect, ParseAttempt};
pub use error::{Error, ParseError, Result};
pub use lexer::{Lexer, Token, TokenKind};
pub use metadata::{Metadata, Table};
pub use parser::{MAX_DEPTH, Parser, SyntaxError};
pub use position::{LineCol, LineIndex};
pub use statement::Statement;

use recovery::Recovery;

/// Batch parser configuration.
#[derive(Clone)]
pub struct SqlParser {
    dialect: Arc<dyn Dialect>,
    raise_on_error: bool,
}

impl SqlParser {
    /// Creates a parser for the CrateDB dialect that collects errors.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dialect: Arc::new(CrateDialect::new()),
            raise_on_error: false,
        }
    }

    /// Uses `dialect` as the grammar.
    #[must_use]
    pub fn with_dialect(mut self, dialect: impl Dialect + 'static) -> Self {
        self.dialect = Arc::new(dialect);
        self
    }

    /// Fails on the first statement that does not parse instead of
    /// collecting errors.
    #[must_use]
    pub const fn raise_on_error(mut self, raise: bool) -> Self {
        self.raise_on_error = raise;
        self
    }

    /// Returns the dialect in use.
    #[must_use]
    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// Parses every statement of `query`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] for the first failed statement when raising
    /// on errors. Returns [`Error::Grammar`] if the dialect breaks its parse
    /// contract, which the built-in dialect never does.
    pub fn parse<'a>(&self, query: &'a str) -> Result<'a, Vec<Statement<'a>>> {
        Recovery::new(self.dialect.as_ref(), query, self.raise_on_error)?.run()
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for SqlParser {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SqlParser")
            .field("dialect", &self.dialect.name())
            .field("raise_on_error", &self.raise_on_error)
            .finish()
    }
}

/// Parses a batch with the CrateDB dialect.
///
/// With `raise_exception` set, the first statement that fails to parse is
/// returned as [`Error::Syntax`].
///
/// # Errors
///
/// See [`SqlParser::parse`].
pub fn sqlparse(query: &str, raise_exception: bool) -> Result<'_, Vec<Statement<'_>>> {
    SqlParser::new().raise_on_error(raise_exception).parse(query)
}
