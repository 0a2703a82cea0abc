//! SQL Parser
//!
//! A hand-written recursive descent parser with Pratt expression parsing.
//! It parses one statement at a time from any position of a token stream and
//! reports the first syntax error it meets.

mod error;
mod parser;
mod pratt;

pub use error::SyntaxError;
pub use parser::{MAX_DEPTH, Parser, STATEMENT_KEYWORDS};
