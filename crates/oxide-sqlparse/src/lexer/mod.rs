//! SQL Lexer/Tokenizer
//!
//! A hand-written lexer that turns SQL text into a stream of spanned tokens.
//! Spans are byte offsets into the original text; see [`crate::position`]
//! for the mapping to lines and columns.

mod span;
mod token;
mod tokenizer;

pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::Lexer;
