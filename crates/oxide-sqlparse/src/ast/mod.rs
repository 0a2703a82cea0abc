//! Abstract Syntax Tree (AST) types for SQL statements.

mod expression;
mod statement;
mod types;

pub use expression::{BinaryOp, Expr, FunctionCall, Literal, Parameter, UnaryOp};
pub use statement::{
    CreateTableStatement, DeleteStatement, DiscardTarget, InsertSource, InsertStatement,
    JoinClause, JoinType, KillTarget, NullOrdering, OrderBy, OrderDirection, SelectColumn,
    SelectStatement, SetOperation, SetOperator, SetScope, SetStatement, SetValue, ShowStatement,
    Statement, TableName, TableProperty, TableRef, UpdateAssignment, UpdateStatement,
};
pub use types::{ColumnDef, DataType, ObjectPolicy};
