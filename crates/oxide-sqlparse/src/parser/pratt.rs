//! Operator precedence for the Pratt expression parser.
//!
//! Each operator belongs to a [`Precedence`] level. A level's binding powers
//! are derived from its rank, so every binary level is left-associative and
//! adding a level never means renumbering a table.

use crate::ast::{BinaryOp, UnaryOp};
use crate::lexer::{Keyword, TokenKind};

/// Precedence levels, loosest first.
///
/// `OR` ranks zero, so a minimum binding power of zero accepts any expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Or,
    And,
    /// Prefix `NOT`.
    Not,
    /// Comparisons and the `IS`, `IN`, `BETWEEN` and `LIKE` predicates.
    Comparison,
    BitOr,
    BitAnd,
    Shift,
    /// `+`, `-` and `||`.
    Additive,
    Multiplicative,
    /// Prefix `-` and `~`.
    Unary,
    /// Subscripts and `::` casts.
    Postfix,
}

impl Precedence {
    /// Binding power an operator of this level needs to take a left operand.
    #[must_use]
    pub const fn left(self) -> u8 {
        self as u8 * 2
    }

    /// Minimum binding power of the right operand.
    #[must_use]
    pub const fn right(self) -> u8 {
        self.left() + 1
    }
}

/// How an infix token combines its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Infix {
    /// A plain binary operator.
    Binary(BinaryOp),
    /// `IS [NOT] NULL`.
    Is,
    /// `IN (list)` or `IN (subquery)`.
    In,
    /// `BETWEEN low AND high`.
    Between,
}

/// Returns the operator a token starts when it follows an operand.
#[must_use]
pub const fn infix(kind: &TokenKind) -> Option<(Infix, Precedence)> {
    match kind {
        TokenKind::Keyword(Keyword::Is) => Some((Infix::Is, Precedence::Comparison)),
        TokenKind::Keyword(Keyword::In) => Some((Infix::In, Precedence::Comparison)),
        TokenKind::Keyword(Keyword::Between) => Some((Infix::Between, Precedence::Comparison)),
        TokenKind::Keyword(Keyword::Or) => binary(BinaryOp::Or),
        TokenKind::Keyword(Keyword::And) => binary(BinaryOp::And),
        TokenKind::Keyword(Keyword::Like) => binary(BinaryOp::Like),
        TokenKind::Eq => binary(BinaryOp::Eq),
        TokenKind::NotEq => binary(BinaryOp::NotEq),
        TokenKind::Lt => binary(BinaryOp::Lt),
        TokenKind::LtEq => binary(BinaryOp::LtEq),
        TokenKind::Gt => binary(BinaryOp::Gt),
        TokenKind::GtEq => binary(BinaryOp::GtEq),
        TokenKind::BitOr => binary(BinaryOp::BitOr),
        TokenKind::BitAnd => binary(BinaryOp::BitAnd),
        TokenKind::LeftShift => binary(BinaryOp::LeftShift),
        TokenKind::RightShift => binary(BinaryOp::RightShift),
        TokenKind::Plus => binary(BinaryOp::Add),
        TokenKind::Minus => binary(BinaryOp::Sub),
        TokenKind::Concat => binary(BinaryOp::Concat),
        TokenKind::Star => binary(BinaryOp::Mul),
        TokenKind::Slash => binary(BinaryOp::Div),
        TokenKind::Percent => binary(BinaryOp::Mod),
        _ => None,
    }
}

const fn binary(op: BinaryOp) -> Option<(Infix, Precedence)> {
    Some((Infix::Binary(op), binary_precedence(op)))
}

/// Level of a binary operator.
#[must_use]
pub const fn binary_precedence(op: BinaryOp) -> Precedence {
    match op {
        BinaryOp::Or => Precedence::Or,
        BinaryOp::And => Precedence::And,
        BinaryOp::Eq
        | BinaryOp::NotEq
        | BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq
        | BinaryOp::Like => Precedence::Comparison,
        BinaryOp::BitOr => Precedence::BitOr,
        BinaryOp::BitAnd => Precedence::BitAnd,
        BinaryOp::LeftShift | BinaryOp::RightShift => Precedence::Shift,
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Concat => Precedence::Additive,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => Precedence::Multiplicative,
    }
}

/// Returns the unary operator a token starts in operand position.
#[must_use]
pub const fn prefix(kind: &TokenKind) -> Option<(UnaryOp, Precedence)> {
    match kind {
        TokenKind::Minus => Some((UnaryOp::Neg, Precedence::Unary)),
        TokenKind::BitNot => Some((UnaryOp::BitNot, Precedence::Unary)),
        TokenKind::Keyword(Keyword::Not) => Some((UnaryOp::Not, Precedence::Not)),
        _ => None,
    }
}

/// Returns the level of a postfix operator: `expr[index]` or `expr::type`.
#[must_use]
pub const fn postfix(kind: &TokenKind) -> Option<Precedence> {
    match kind {
        TokenKind::LeftBracket | TokenKind::DoubleColon => Some(Precedence::Postfix),
        _ => None,
    }
}
