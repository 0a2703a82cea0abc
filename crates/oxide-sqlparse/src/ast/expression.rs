//! Expression nodes.

use core::fmt;

use super::{DataType, SelectStatement};
use crate::lexer::Span;

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    /// Integer digits too large for `i64`.
    Numeric(String),
    /// Unquoted string contents.
    String(String),
    /// Decoded bytes of `X'..'`.
    Blob(Vec<u8>),
    Boolean(bool),
    Null,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Numeric(digits) => f.write_str(digits),
            Self::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::Blob(bytes) => {
                f.write_str("X'")?;
                for byte in bytes {
                    write!(f, "{byte:02X}")?;
                }
                f.write_str("'")
            }
            Self::Boolean(true) => f.write_str("TRUE"),
            Self::Boolean(false) => f.write_str("FALSE"),
            Self::Null => f.write_str("NULL"),
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    /// `||`
    Concat,
    Like,
    BitAnd,
    BitOr,
    LeftShift,
    RightShift,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Concat => "||",
            Self::Like => "LIKE",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
        })
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-`
    Neg,
    Not,
    /// `~`
    BitNot,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Neg => "-",
            Self::Not => "NOT",
            Self::BitNot => "~",
        })
    }
}

/// `name(args)` or `name(DISTINCT args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// The function name as written.
    pub name: String,
    pub args: Vec<Expr>,
    pub distinct: bool,
}

/// A query parameter placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    /// `?`, numbered by its position in the statement (1-based).
    Anonymous(usize),
    /// `$n`.
    Positional(u32),
    /// `:name`.
    Named(String),
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous(_) => f.write_str("?"),
            Self::Positional(n) => write!(f, "${n}"),
            Self::Named(name) => write!(f, ":{name}"),
        }
    }
}

/// An SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// `name` or `table.name`.
    Column {
        table: Option<String>,
        name: String,
        span: Span,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Function(FunctionCall),
    /// A scalar subquery.
    Subquery(Box<SelectStatement>),
    /// `EXISTS (subquery)`.
    Exists(Box<SelectStatement>),
    /// `expr IS [NOT] NULL`.
    IsNull {
        expr: Box<Expr>,
        negated: bool,
    },
    /// `expr [NOT] IN (list)`. A subquery is a single-element list.
    In {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },
    /// `expr [NOT] BETWEEN low AND high`.
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },
    /// `CASE [operand] WHEN .. THEN .. [ELSE ..] END`.
    Case {
        operand: Option<Box<Expr>>,
        when_clauses: Vec<(Expr, Expr)>,
        else_clause: Option<Box<Expr>>,
    },
    /// `CAST(expr AS type)` and `expr::type`.
    Cast {
        expr: Box<Expr>,
        data_type: DataType,
    },
    /// `[1, 2]` or `ARRAY[1, 2]`.
    Array(Vec<Expr>),
    /// Element or object-key access: `tags[1]`, `obj['key']`.
    Subscript {
        expr: Box<Expr>,
        index: Box<Expr>,
    },
    Paren(Box<Expr>),
    Parameter(Parameter),
    /// `*` or `table.*`.
    Wildcard {
        table: Option<String>,
    },
}

impl Expr {
    /// An unqualified column reference without a source location.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column {
            table: None,
            name: name.into(),
            span: Span::default(),
        }
    }

    /// Returns the value of a literal, parameter or bare word as plain text.
    ///
    /// Strings come back unquoted, booleans in lower case and parameters
    /// as written.
    #[must_use]
    pub fn literal_text(&self) -> Option<String> {
        match self {
            Self::Literal(Literal::String(s)) => Some(s.clone()),
            Self::Literal(Literal::Boolean(b)) => Some(b.to_string()),
            Self::Literal(Literal::Blob(_)) => None,
            Self::Literal(literal) => Some(literal.to_string()),
            Self::Parameter(parameter) => Some(parameter.to_string()),
            Self::Column {
                table: None, name, ..
            } => Some(name.clone()),
            Self::Unary {
                op: UnaryOp::Neg,
                operand,
            } => operand.literal_text().map(|text| format!("-{text}")),
            _ => None,
        }
    }
}
