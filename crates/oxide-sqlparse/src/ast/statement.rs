//! Statement nodes.

use core::fmt;

use super::expression::Expr;
use super::types::ColumnDef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

/// `NULLS FIRST` or `NULLS LAST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullOrdering {
    First,
    Last,
}

/// One `ORDER BY` item.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub expr: Expr,
    pub direction: OrderDirection,
    pub nulls: Option<NullOrdering>,
}

/// Join kinds. `LEFT`, `RIGHT` and `FULL` are outer joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

/// The joined side of a join and its condition.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub table: TableRef,
    /// `ON` condition; absent for cross joins and `USING`.
    pub on: Option<Expr>,
    /// `USING (columns)`.
    pub using: Vec<String>,
}

/// An item of a `FROM` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRef {
    Table {
        schema: Option<String>,
        name: String,
        alias: Option<String>,
    },
    /// `(SELECT ...) alias`.
    Subquery {
        query: Box<SelectStatement>,
        alias: String,
    },
    /// Joins nest to the left: `a JOIN b JOIN c` is `(a JOIN b) JOIN c`.
    Join {
        left: Box<TableRef>,
        join: Box<JoinClause>,
    },
}

/// A table name, optionally schema-qualified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName {
    pub schema: Option<String>,
    pub name: String,
}

impl TableName {
    /// An unqualified name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    /// A `schema.name` pair.
    #[must_use]
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }
}

/// Renders the quoted form, `"schema"."name"` or `"name"`.
impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "\"{schema}\".")?;
        }
        write!(f, "\"{}\"", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Union,
    Intersect,
    Except,
}

/// The right-hand side of `UNION`, `INTERSECT` or `EXCEPT`.
#[derive(Debug, Clone, PartialEq)]
pub struct SetOperation {
    pub op: SetOperator,
    /// `UNION ALL` and friends.
    pub all: bool,
    /// The query on the right. Its ORDER BY and LIMIT apply to the whole
    /// compound query.
    pub right: SelectStatement,
}

/// A query. Every clause but the column list is optional.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub distinct: bool,
    pub columns: Vec<SelectColumn>,
    pub from: Option<TableRef>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    /// Compound query continuation.
    pub set_operation: Option<Box<SetOperation>>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
}

/// An item of the select list.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectColumn {
    pub expr: Expr,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub table: TableName,
    /// Explicit column list; empty when omitted.
    pub columns: Vec<String>,
    pub values: InsertSource,
}

/// Rows fed to an INSERT.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// `VALUES (...), (...)`
    Values(Vec<Vec<Expr>>),
    Query(Box<SelectStatement>),
    DefaultValues,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub table: TableName,
    pub alias: Option<String>,
    pub assignments: Vec<UpdateAssignment>,
    /// `FROM` clause joining other tables into the update.
    pub from: Option<TableRef>,
    pub where_clause: Option<Expr>,
}

/// `column = value` in `UPDATE ... SET`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateAssignment {
    pub column: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub table: TableName,
    pub alias: Option<String>,
    pub where_clause: Option<Expr>,
}

/// A `name = value` entry of a `WITH (...)` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct TableProperty {
    /// Property name; dotted names are kept joined (`blocks.read_only`).
    pub name: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
    pub if_not_exists: bool,
    pub table: TableName,
    pub columns: Vec<ColumnDef>,
    /// Table-level `PRIMARY KEY (columns)`.
    pub primary_key: Vec<String>,
    /// `WITH (...)` properties in source order.
    pub properties: Vec<TableProperty>,
}

/// What a SHOW statement asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowStatement {
    /// `SHOW TABLES [FROM schema]`.
    Tables { schema: Option<String> },
    Schemas,
    /// `SHOW CREATE TABLE name`.
    CreateTable(TableName),
    /// `SHOW ALL`.
    All,
    /// `SHOW name`.
    Setting(String),
}

/// `SET SESSION` (the default) or `SET LOCAL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetScope {
    #[default]
    Session,
    Local,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetValue {
    Default,
    /// One or more comma-separated values.
    Values(Vec<Expr>),
}

/// `SET [SESSION | LOCAL] name { = | TO } value`.
#[derive(Debug, Clone, PartialEq)]
pub struct SetStatement {
    pub scope: SetScope,
    pub name: String,
    pub value: SetValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum KillTarget {
    All,
    /// A job id expression, usually a string or parameter.
    Job(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardTarget {
    All,
    Plans,
    Sequences,
    /// `TEMP` or `TEMPORARY`.
    Temporary,
}

/// A parsed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    CreateTable(CreateTableStatement),
    DropTable {
        if_exists: bool,
        table: TableName,
    },
    /// `EXPLAIN [ANALYZE] statement`.
    Explain {
        analyze: bool,
        statement: Box<Statement>,
    },
    /// `REFRESH TABLE a, b`.
    Refresh(Vec<TableName>),
    /// `OPTIMIZE TABLE a, b [WITH (...)]`.
    Optimize {
        tables: Vec<TableName>,
        properties: Vec<TableProperty>,
    },
    Show(ShowStatement),
    Set(SetStatement),
    /// `None` is `RESET ALL`.
    Reset(Option<String>),
    /// `BEGIN` or `START TRANSACTION`.
    Begin,
    /// `COMMIT` or `END`.
    Commit,
    Kill(KillTarget),
    Analyze,
    Discard(DiscardTarget),
    /// `None` is `DEALLOCATE ALL`.
    Deallocate(Option<String>),
    /// `None` is `CLOSE ALL`.
    Close(Option<String>),
}
