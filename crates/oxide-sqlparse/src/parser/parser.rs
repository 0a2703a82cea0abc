//! Recursive-descent statement parser.
//!
//! Clauses are built from three small combinators (`clause`,
//! `comma_separated` and `parenthesized`). Expressions go through a Pratt
//! loop driven by the operator table in `pratt`.

use super::error::SyntaxError;
use super::pratt::{self, Infix};
use crate::ast::{
    ColumnDef, CreateTableStatement, DataType, DeleteStatement, DiscardTarget, Expr, FunctionCall,
    InsertSource, InsertStatement, JoinClause, JoinType, KillTarget, Literal, NullOrdering,
    ObjectPolicy, OrderBy, OrderDirection, Parameter, SelectColumn, SelectStatement,
    SetOperation, SetOperator, SetScope, SetStatement, SetValue, ShowStatement, Statement,
    TableName, TableProperty, TableRef, UnaryOp, UpdateAssignment, UpdateStatement,
};
use crate::lexer::{Keyword, Span, Token, TokenKind};

type ParseResult<T> = Result<T, SyntaxError>;

/// Keywords that can start a statement, in the order the grammar lists them
/// when it cannot start one.
pub const STATEMENT_KEYWORDS: [Keyword; 31] = [
    Keyword::Select,
    Keyword::Deallocate,
    Keyword::Fetch,
    Keyword::End,
    Keyword::With,
    Keyword::Create,
    Keyword::Alter,
    Keyword::Kill,
    Keyword::Close,
    Keyword::Begin,
    Keyword::Start,
    Keyword::Commit,
    Keyword::Analyze,
    Keyword::Discard,
    Keyword::Explain,
    Keyword::Show,
    Keyword::Optimize,
    Keyword::Refresh,
    Keyword::Restore,
    Keyword::Drop,
    Keyword::Insert,
    Keyword::Values,
    Keyword::Delete,
    Keyword::Update,
    Keyword::Set,
    Keyword::Reset,
    Keyword::Copy,
    Keyword::Grant,
    Keyword::Deny,
    Keyword::Revoke,
    Keyword::Declare,
];

/// How deep expressions, subqueries, FROM items, types and EXPLAIN may nest.
pub const MAX_DEPTH: usize = 64;

/// Stands in for the current token once a stream without EOF runs out.
static END_OF_INPUT: Token = Token::new(TokenKind::Eof, Span::new(0, 0));

/// Statement parser over a token slice produced by [`crate::lexer::Lexer`].
///
/// It starts at an arbitrary token index, so one token stream can serve
/// several statements.
pub struct Parser<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
    /// Number of `?` placeholders seen so far.
    param_counter: usize,
    /// Nested constructs currently open, bounded by [`MAX_DEPTH`].
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser positioned at token index `start`.
    #[must_use]
    pub const fn new(source: &'a str, tokens: &'a [Token], start: usize) -> Self {
        Self {
            source,
            tokens,
            pos: start,
            param_counter: 0,
            depth: 0,
        }
    }

    /// Returns the index of the current token.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Parses one statement and checks that a terminator or the end of input
    /// follows it.
    ///
    /// On success the parser stands on that terminator or EOF token.
    ///
    /// # Errors
    ///
    /// Returns the first syntax error met.
    pub fn parse_terminated_statement(&mut self) -> ParseResult<Statement> {
        let statement = self.parse_statement()?;
        match self.current().kind {
            TokenKind::Semicolon | TokenKind::Eof => Ok(statement),
            _ => Err(self.mismatched(&["<EOF>", "';'"])),
        }
    }

    /// Parses a single statement, dispatching on its first keyword.
    ///
    /// # Errors
    ///
    /// Returns a `SyntaxError` if the input is not a valid statement.
    pub fn parse_statement(&mut self) -> ParseResult<Statement> {
        let Some(keyword) = self.current().as_keyword() else {
            return Err(self.expected_statement());
        };
        let statement = match keyword {
            Keyword::Select => Statement::Select(self.parse_select_statement()?),
            Keyword::Insert => Statement::Insert(self.parse_insert_statement()?),
            Keyword::Update => Statement::Update(self.parse_update_statement()?),
            Keyword::Delete => Statement::Delete(self.parse_delete_statement()?),
            Keyword::Create => Statement::CreateTable(self.parse_create_table_statement()?),
            Keyword::Drop => self.parse_drop_statement()?,
            Keyword::Explain => self.parse_explain_statement()?,
            Keyword::Show => Statement::Show(self.parse_show_statement()?),
            Keyword::Set => Statement::Set(self.parse_set_statement()?),
            Keyword::Discard => self.parse_discard_statement()?,
            Keyword::Refresh
            | Keyword::Optimize
            | Keyword::Reset
            | Keyword::Begin
            | Keyword::Start
            | Keyword::Commit
            | Keyword::End
            | Keyword::Kill
            | Keyword::Analyze
            | Keyword::Deallocate
            | Keyword::Close => {
                self.advance();
                self.parse_utility_statement(keyword)?
            }
            _ => return Err(self.expected_statement()),
        };
        Ok(statement)
    }

    /// Parses the rest of a short statement whose first keyword has been
    /// consumed.
    fn parse_utility_statement(&mut self, keyword: Keyword) -> ParseResult<Statement> {
        Ok(match keyword {
            Keyword::Refresh => {
                self.expect_keyword(Keyword::Table)?;
                Statement::Refresh(self.comma_separated(Self::parse_table_name)?)
            }
            Keyword::Optimize => {
                self.expect_keyword(Keyword::Table)?;
                let tables = self.comma_separated(Self::parse_table_name)?;
                let properties = self.parse_optional_properties()?;
                Statement::Optimize { tables, properties }
            }
            Keyword::Reset => {
                if self.eat_keyword(Keyword::All) {
                    Statement::Reset(None)
                } else {
                    Statement::Reset(Some(self.parse_dotted_name()?))
                }
            }
            Keyword::Begin => {
                self.skip_transaction_noise();
                Statement::Begin
            }
            Keyword::Start => {
                self.expect_keyword(Keyword::Transaction)?;
                Statement::Begin
            }
            Keyword::Commit | Keyword::End => {
                self.skip_transaction_noise();
                Statement::Commit
            }
            Keyword::Kill => {
                if self.eat_keyword(Keyword::All) {
                    Statement::Kill(KillTarget::All)
                } else {
                    Statement::Kill(KillTarget::Job(self.parse_expression(0)?))
                }
            }
            Keyword::Analyze => Statement::Analyze,
            Keyword::Deallocate => {
                self.eat_keyword(Keyword::Prepare);
                Statement::Deallocate(self.parse_all_or_name()?)
            }
            Keyword::Close => Statement::Close(self.parse_all_or_name()?),
            _ => return Err(self.no_viable_alternative()),
        })
    }

    /// The error for a token that cannot start a statement here.
    fn expected_statement(&self) -> SyntaxError {
        match self.current().as_keyword() {
            // Statement starts this grammar recognizes but has no rule for.
            Some(keyword) if STATEMENT_KEYWORDS.contains(&keyword) => self.no_viable_alternative(),
            _ => {
                let expected = STATEMENT_KEYWORDS
                    .iter()
                    .map(|kw| format!("'{}'", kw.as_str()))
                    .collect::<Vec<_>>();
                let expected = expected.iter().map(String::as_str).collect::<Vec<_>>();
                self.mismatched(&expected)
            }
        }
    }

    fn parse_select_statement(&mut self) -> ParseResult<SelectStatement> {
        self.nested(Self::parse_select)
    }

    fn parse_select(&mut self) -> ParseResult<SelectStatement> {
        self.expect_keyword(Keyword::Select)?;
        let distinct = self.eat_keyword(Keyword::Distinct);
        if !distinct {
            self.eat_keyword(Keyword::All);
        }

        let mut select = SelectStatement {
            distinct,
            columns: self.comma_separated(Self::parse_select_column)?,
            from: self.clause(Keyword::From, Self::parse_table_ref)?,
            where_clause: self.clause(Keyword::Where, |p| p.parse_expression(0))?,
            group_by: self
                .clause(Keyword::Group, |p| {
                    p.expect_keyword(Keyword::By)?;
                    p.parse_expression_list()
                })?
                .unwrap_or_default(),
            having: self.clause(Keyword::Having, |p| p.parse_expression(0))?,
            set_operation: None,
            order_by: vec![],
            limit: None,
            offset: None,
        };

        // The right-hand query owns the trailing ORDER BY and LIMIT.
        if let Some(op) = self.set_operator() {
            self.advance();
            let all = self.eat_keyword(Keyword::All);
            if !all {
                self.eat_keyword(Keyword::Distinct);
            }
            let right = self.parse_select_statement()?;
            select.set_operation = Some(Box::new(SetOperation { op, all, right }));
            return Ok(select);
        }

        select.order_by = self
            .clause(Keyword::Order, |p| {
                p.expect_keyword(Keyword::By)?;
                p.comma_separated(Self::parse_order_by)
            })?
            .unwrap_or_default();
        select.limit = self.clause(Keyword::Limit, |p| p.parse_expression(0))?;
        select.offset = self.clause(Keyword::Offset, |p| p.parse_expression(0))?;
        Ok(select)
    }

    fn set_operator(&self) -> Option<SetOperator> {
        Some(match self.current().as_keyword()? {
            Keyword::Union => SetOperator::Union,
            Keyword::Intersect => SetOperator::Intersect,
            Keyword::Except => SetOperator::Except,
            _ => return None,
        })
    }

    fn parse_select_column(&mut self) -> ParseResult<SelectColumn> {
        let expr = self.parse_expression(0)?;
        let alias = self.parse_optional_alias()?;
        Ok(SelectColumn { expr, alias })
    }

    /// Parses a FROM item with its joins. A comma is a cross join.
    fn parse_table_ref(&mut self) -> ParseResult<TableRef> {
        let mut table_ref = self.parse_table_primary()?;
        loop {
            let join = if self.eat(&TokenKind::Comma) {
                JoinClause {
                    join_type: JoinType::Cross,
                    table: self.parse_simple_table_ref()?,
                    on: None,
                    using: vec![],
                }
            } else if let Some(join_type) = self.parse_join_type()? {
                self.parse_join(join_type)?
            } else {
                break;
            };
            table_ref = TableRef::Join {
                left: Box::new(table_ref),
                join: Box::new(join),
            };
        }
        Ok(table_ref)
    }

    /// Parses a table, a `(subquery) alias` or a parenthesized FROM item.
    fn parse_table_primary(&mut self) -> ParseResult<TableRef> {
        if !self.eat(&TokenKind::LeftParen) {
            return self.parse_simple_table_ref();
        }
        if !self.check_keyword(Keyword::Select) {
            let inner = self.nested(Self::parse_table_ref)?;
            self.expect(&TokenKind::RightParen)?;
            return Ok(inner);
        }
        let query = Box::new(self.parse_select_statement()?);
        self.expect(&TokenKind::RightParen)?;
        let alias = self
            .parse_optional_alias()?
            .unwrap_or_else(|| String::from("subquery"));
        Ok(TableRef::Subquery { query, alias })
    }

    fn parse_simple_table_ref(&mut self) -> ParseResult<TableRef> {
        let TableName { schema, name } = self.parse_table_name()?;
        Ok(TableRef::Table {
            schema,
            name,
            alias: self.parse_optional_alias()?,
        })
    }

    /// Parses `name` or `schema.name`.
    fn parse_table_name(&mut self) -> ParseResult<TableName> {
        let first = self.expect_identifier()?;
        if self.eat(&TokenKind::Dot) {
            Ok(TableName::qualified(first, self.expect_identifier()?))
        } else {
            Ok(TableName::new(first))
        }
    }

    /// Consumes the keywords of a join, or returns `None` when no join
    /// follows.
    fn parse_join_type(&mut self) -> ParseResult<Option<JoinType>> {
        let join_type = match self.current().as_keyword() {
            Some(Keyword::Join) => {
                self.advance();
                return Ok(Some(JoinType::Inner));
            }
            Some(Keyword::Inner) => JoinType::Inner,
            Some(Keyword::Cross) => JoinType::Cross,
            Some(Keyword::Left) => JoinType::Left,
            Some(Keyword::Right) => JoinType::Right,
            Some(Keyword::Full) => JoinType::Full,
            _ => return Ok(None),
        };
        self.advance();
        if matches!(join_type, JoinType::Left | JoinType::Right | JoinType::Full) {
            self.eat_keyword(Keyword::Outer);
        }
        self.expect_keyword(Keyword::Join)?;
        Ok(Some(join_type))
    }

    /// Parses the joined table and its `ON` or `USING` condition.
    fn parse_join(&mut self, join_type: JoinType) -> ParseResult<JoinClause> {
        let mut join = JoinClause {
            join_type,
            table: self.parse_simple_table_ref()?,
            on: None,
            using: vec![],
        };
        if join_type == JoinType::Cross {
            return Ok(join);
        }
        if self.eat_keyword(Keyword::On) {
            join.on = Some(self.parse_expression(0)?);
        } else if self.eat_keyword(Keyword::Using) {
            join.using = self.parenthesized(Self::parse_identifier_list)?;
        } else {
            return Err(self.mismatched(&["'ON'", "'USING'"]));
        }
        Ok(join)
    }

    /// Parses `AS alias` or a bare identifier alias.
    fn parse_optional_alias(&mut self) -> ParseResult<Option<String>> {
        let bare = matches!(self.current().kind, TokenKind::Identifier(_));
        if self.eat_keyword(Keyword::As) || bare {
            self.expect_identifier().map(Some)
        } else {
            Ok(None)
        }
    }

    fn parse_insert_statement(&mut self) -> ParseResult<InsertStatement> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let table = self.parse_table_name()?;
        let columns = if self.check(&TokenKind::LeftParen) {
            self.parenthesized(Self::parse_identifier_list)?
        } else {
            vec![]
        };

        let values = match self.current().as_keyword() {
            Some(Keyword::Values) => {
                self.advance();
                let rows =
                    self.comma_separated(|p| p.parenthesized(Self::parse_expression_list))?;
                InsertSource::Values(rows)
            }
            Some(Keyword::Select) => InsertSource::Query(Box::new(self.parse_select_statement()?)),
            Some(Keyword::Default) => {
                self.advance();
                self.expect_keyword(Keyword::Values)?;
                InsertSource::DefaultValues
            }
            _ => return Err(self.mismatched(&["'SELECT'", "'VALUES'", "'DEFAULT'"])),
        };

        Ok(InsertStatement {
            table,
            columns,
            values,
        })
    }

    fn parse_update_statement(&mut self) -> ParseResult<UpdateStatement> {
        self.expect_keyword(Keyword::Update)?;
        let table = self.parse_table_name()?;
        let alias = self.parse_optional_alias()?;
        self.expect_keyword(Keyword::Set)?;
        let assignments = self.comma_separated(|p| {
            let column = p.expect_identifier()?;
            p.expect(&TokenKind::Eq)?;
            let value = p.parse_expression(0)?;
            Ok(UpdateAssignment { column, value })
        })?;

        Ok(UpdateStatement {
            table,
            alias,
            assignments,
            from: self.clause(Keyword::From, Self::parse_table_ref)?,
            where_clause: self.clause(Keyword::Where, |p| p.parse_expression(0))?,
        })
    }

    fn parse_delete_statement(&mut self) -> ParseResult<DeleteStatement> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        Ok(DeleteStatement {
            table: self.parse_table_name()?,
            alias: self.parse_optional_alias()?,
            where_clause: self.clause(Keyword::Where, |p| p.parse_expression(0))?,
        })
    }

    fn parse_create_table_statement(&mut self) -> ParseResult<CreateTableStatement> {
        self.expect_keyword(Keyword::Create)?;
        self.expect_keyword(Keyword::Table)?;
        let if_not_exists = self.eat_keyword(Keyword::If);
        if if_not_exists {
            self.expect_keyword(Keyword::Not)?;
            self.expect_keyword(Keyword::Exists)?;
        }
        let table = self.parse_table_name()?;

        // Column definitions and table constraints share one list.
        let mut columns = vec![];
        let mut primary_key = vec![];
        self.expect(&TokenKind::LeftParen)?;
        loop {
            if self.eat_keyword(Keyword::Primary) {
                self.expect_keyword(Keyword::Key)?;
                primary_key = self.parenthesized(Self::parse_identifier_list)?;
            } else {
                columns.push(self.parse_column_def()?);
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RightParen)?;

        Ok(CreateTableStatement {
            if_not_exists,
            table,
            columns,
            primary_key,
            properties: self.parse_optional_properties()?,
        })
    }

    /// Parses a column name, its type and any constraints after it.
    fn parse_column_def(&mut self) -> ParseResult<ColumnDef> {
        let name = self.expect_identifier()?;
        let mut column = ColumnDef::new(name, self.parse_data_type()?);

        while let Some(keyword) = self.current().as_keyword() {
            match keyword {
                Keyword::Not => {
                    self.advance();
                    self.expect_keyword(Keyword::Null)?;
                    column.nullable = false;
                }
                Keyword::Null => self.advance(),
                Keyword::Primary => {
                    self.advance();
                    self.expect_keyword(Keyword::Key)?;
                    column = column.primary_key();
                }
                Keyword::Default => {
                    self.advance();
                    column.default = Some(self.parse_expression(0)?);
                }
                Keyword::Generated | Keyword::As => {
                    self.advance();
                    if keyword == Keyword::Generated {
                        self.expect_keyword(Keyword::Always)?;
                        self.expect_keyword(Keyword::As)?;
                    }
                    column.generated = Some(self.parse_expression(0)?);
                }
                _ => break,
            }
        }

        Ok(column)
    }

    /// Parses an optional `WITH (name = value, ...)` clause.
    fn parse_optional_properties(&mut self) -> ParseResult<Vec<TableProperty>> {
        let properties = self.clause(Keyword::With, |p| {
            p.parenthesized(|p| p.comma_separated(Self::parse_property))
        })?;
        Ok(properties.unwrap_or_default())
    }

    fn parse_property(&mut self) -> ParseResult<TableProperty> {
        let name = self.parse_dotted_name()?;
        self.expect(&TokenKind::Eq)?;
        let value = self.parse_expression(0)?;
        Ok(TableProperty { name, value })
    }

    fn parse_drop_statement(&mut self) -> ParseResult<Statement> {
        self.expect_keyword(Keyword::Drop)?;
        self.expect_keyword(Keyword::Table)?;
        let if_exists = self.eat_keyword(Keyword::If);
        if if_exists {
            self.expect_keyword(Keyword::Exists)?;
        }
        let table = self.parse_table_name()?;
        Ok(Statement::DropTable { if_exists, table })
    }

    fn parse_explain_statement(&mut self) -> ParseResult<Statement> {
        self.expect_keyword(Keyword::Explain)?;

        // EXPLAIN ANALYZE <statement>, as opposed to EXPLAIN of an ANALYZE.
        let analyze = self.check_keyword(Keyword::Analyze)
            && self
                .peek()
                .as_keyword()
                .is_some_and(|kw| STATEMENT_KEYWORDS.contains(&kw));
        if analyze {
            self.advance();
        }

        Ok(Statement::Explain {
            analyze,
            statement: Box::new(self.nested(Self::parse_statement)?),
        })
    }

    fn parse_show_statement(&mut self) -> ParseResult<ShowStatement> {
        self.expect_keyword(Keyword::Show)?;
        let show = match self.current().as_keyword() {
            Some(Keyword::Tables) => {
                self.advance();
                let schema = if self.eat_keyword(Keyword::From) || self.eat_keyword(Keyword::In) {
                    Some(self.expect_identifier()?)
                } else {
                    None
                };
                ShowStatement::Tables { schema }
            }
            Some(Keyword::Schemas) => {
                self.advance();
                ShowStatement::Schemas
            }
            Some(Keyword::Create) => {
                self.advance();
                self.expect_keyword(Keyword::Table)?;
                ShowStatement::CreateTable(self.parse_table_name()?)
            }
            Some(Keyword::All) => {
                self.advance();
                ShowStatement::All
            }
            _ => ShowStatement::Setting(self.parse_dotted_name()?),
        };
        Ok(show)
    }

    /// Parses `SET [SESSION | LOCAL] name { = | TO } { DEFAULT | values }`.
    fn parse_set_statement(&mut self) -> ParseResult<SetStatement> {
        self.expect_keyword(Keyword::Set)?;
        let scope = if self.eat_keyword(Keyword::Local) {
            SetScope::Local
        } else {
            self.eat_keyword(Keyword::Session);
            SetScope::Session
        };
        let name = self.parse_dotted_name()?;
        if !(self.eat(&TokenKind::Eq) || self.eat_keyword(Keyword::To)) {
            return Err(self.mismatched(&["'='", "'TO'"]));
        }
        let value = if self.eat_keyword(Keyword::Default) {
            SetValue::Default
        } else {
            SetValue::Values(self.parse_expression_list()?)
        };
        Ok(SetStatement { scope, name, value })
    }

    fn parse_discard_statement(&mut self) -> ParseResult<Statement> {
        self.expect_keyword(Keyword::Discard)?;
        let target = match self.current().as_keyword() {
            Some(Keyword::All) => DiscardTarget::All,
            Some(Keyword::Plans) => DiscardTarget::Plans,
            Some(Keyword::Sequences) => DiscardTarget::Sequences,
            Some(Keyword::Temp | Keyword::Temporary) => DiscardTarget::Temporary,
            _ => {
                return Err(self.mismatched(&[
                    "'ALL'",
                    "'PLANS'",
                    "'SEQUENCES'",
                    "'TEMPORARY'",
                    "'TEMP'",
                ]));
            }
        };
        self.advance();
        Ok(Statement::Discard(target))
    }

    /// Parses `ALL` (returned as `None`) or a name given as identifier or
    /// string.
    fn parse_all_or_name(&mut self) -> ParseResult<Option<String>> {
        if self.eat_keyword(Keyword::All) {
            return Ok(None);
        }
        if let TokenKind::String(name) = &self.current().kind {
            self.advance();
            return Ok(Some(name.clone()));
        }
        self.expect_identifier().map(Some)
    }

    /// Skips the optional `WORK` or `TRANSACTION` after BEGIN, COMMIT and END.
    fn skip_transaction_noise(&mut self) {
        if !self.eat_keyword(Keyword::Work) {
            self.eat_keyword(Keyword::Transaction);
        }
    }

    /// Parses `expr [ASC | DESC] [NULLS {FIRST | LAST}]`.
    fn parse_order_by(&mut self) -> ParseResult<OrderBy> {
        let expr = self.parse_expression(0)?;
        let direction = if self.eat_keyword(Keyword::Desc) {
            OrderDirection::Desc
        } else {
            self.eat_keyword(Keyword::Asc);
            OrderDirection::Asc
        };
        let nulls = self.clause(Keyword::Nulls, |p| {
            if p.eat_keyword(Keyword::First) {
                Ok(NullOrdering::First)
            } else if p.eat_keyword(Keyword::Last) {
                Ok(NullOrdering::Last)
            } else {
                Err(p.mismatched(&["'FIRST'", "'LAST'"]))
            }
        })?;
        Ok(OrderBy {
            expr,
            direction,
            nulls,
        })
    }

    /// Parses an expression whose operators bind at least as tightly as
    /// `min_bp`. Zero accepts any expression.
    fn parse_expression(&mut self, min_bp: u8) -> ParseResult<Expr> {
        self.nested(|p| p.parse_operators(min_bp))
    }

    fn parse_operators(&mut self, min_bp: u8) -> ParseResult<Expr> {
        let mut lhs = match pratt::prefix(&self.current().kind) {
            Some((op, level)) => {
                self.advance();
                let operand = self.parse_expression(level.right())?;
                Expr::Unary {
                    op,
                    operand: Box::new(operand),
                }
            }
            None => self.parse_primary()?,
        };

        loop {
            if let Some(level) = pratt::postfix(&self.current().kind) {
                if level.left() < min_bp {
                    break;
                }
                lhs = self.parse_postfix(lhs)?;
                continue;
            }

            // NOT IN, NOT BETWEEN, NOT LIKE
            let negated = self.check_keyword(Keyword::Not)
                && matches!(
                    self.peek().as_keyword(),
                    Some(Keyword::In | Keyword::Between | Keyword::Like)
                );
            let operator = if negated { self.peek() } else { self.current() };
            let Some((infix, level)) = pratt::infix(&operator.kind) else {
                break;
            };
            if level.left() < min_bp {
                break;
            }
            if negated {
                self.advance();
            }
            self.advance();

            let expr = Box::new(lhs);
            lhs = match infix {
                Infix::Is => {
                    let negated = self.eat_keyword(Keyword::Not);
                    self.expect_keyword(Keyword::Null)?;
                    Expr::IsNull { expr, negated }
                }
                Infix::In => {
                    let list = self.parenthesized(|p| {
                        if p.check_keyword(Keyword::Select) {
                            Ok(vec![Expr::Subquery(Box::new(p.parse_select_statement()?))])
                        } else {
                            p.parse_expression_list()
                        }
                    })?;
                    Expr::In {
                        expr,
                        list,
                        negated,
                    }
                }
                Infix::Between => {
                    let low = Box::new(self.parse_expression(level.right())?);
                    self.expect_keyword(Keyword::And)?;
                    let high = Box::new(self.parse_expression(level.right())?);
                    Expr::Between {
                        expr,
                        low,
                        high,
                        negated,
                    }
                }
                Infix::Binary(op) => {
                    let right = Box::new(self.parse_expression(level.right())?);
                    let binary = Expr::Binary {
                        left: expr,
                        op,
                        right,
                    };
                    if negated {
                        Expr::Unary {
                            op: UnaryOp::Not,
                            operand: Box::new(binary),
                        }
                    } else {
                        binary
                    }
                }
            };
        }

        Ok(lhs)
    }

    /// Parses `[index]` or `::type` after `operand`.
    fn parse_postfix(&mut self, operand: Expr) -> ParseResult<Expr> {
        let expr = Box::new(operand);
        if self.eat(&TokenKind::LeftBracket) {
            let index = Box::new(self.parse_expression(0)?);
            self.expect(&TokenKind::RightBracket)?;
            return Ok(Expr::Subscript { expr, index });
        }
        self.advance();
        let data_type = self.parse_data_type()?;
        Ok(Expr::Cast { expr, data_type })
    }

    /// Parses an operand: a literal, parameter, name, call or bracketed form.
    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let token = self.current();
        if let Some(literal) = literal(&token.kind) {
            self.advance();
            return Ok(Expr::Literal(literal));
        }

        match &token.kind {
            TokenKind::Question => {
                self.advance();
                self.param_counter += 1;
                Ok(Expr::Parameter(Parameter::Anonymous(self.param_counter)))
            }
            TokenKind::Parameter(n) => {
                self.advance();
                Ok(Expr::Parameter(Parameter::Positional(*n)))
            }
            TokenKind::Colon => {
                self.advance();
                Ok(Expr::Parameter(Parameter::Named(self.expect_identifier()?)))
            }
            TokenKind::Star => {
                self.advance();
                Ok(Expr::Wildcard { table: None })
            }
            TokenKind::LeftParen => self.parenthesized(|p| {
                if p.check_keyword(Keyword::Select) {
                    Ok(Expr::Subquery(Box::new(p.parse_select_statement()?)))
                } else {
                    Ok(Expr::Paren(Box::new(p.parse_expression(0)?)))
                }
            }),
            TokenKind::LeftBracket => self.parse_array_literal(),
            TokenKind::Keyword(Keyword::Array) if self.peek().kind == TokenKind::LeftBracket => {
                self.advance();
                self.parse_array_literal()
            }
            TokenKind::Keyword(Keyword::Cast) => {
                self.advance();
                self.parenthesized(|p| {
                    let expr = Box::new(p.parse_expression(0)?);
                    p.expect_keyword(Keyword::As)?;
                    let data_type = p.parse_data_type()?;
                    Ok(Expr::Cast { expr, data_type })
                })
            }
            TokenKind::Keyword(Keyword::Case) => self.parse_case_expression(),
            TokenKind::Keyword(Keyword::Exists) => {
                self.advance();
                let query = self.parenthesized(Self::parse_select_statement)?;
                Ok(Expr::Exists(Box::new(query)))
            }
            TokenKind::Identifier(name) => self.parse_name_expression(name.clone(), token.span),
            TokenKind::Keyword(kw) if !kw.is_reserved() => {
                let name = String::from(token.span.slice(self.source));
                self.parse_name_expression(name, token.span)
            }
            _ => Err(self.no_viable_alternative()),
        }
    }

    /// Parses what follows a name in an expression: a function call, a
    /// qualified column or wildcard, or a plain column.
    fn parse_name_expression(&mut self, name: String, span: Span) -> ParseResult<Expr> {
        self.advance();
        if self.check(&TokenKind::LeftParen) {
            return self.parse_function_call(name);
        }
        if !self.eat(&TokenKind::Dot) {
            return Ok(Expr::Column {
                table: None,
                name,
                span,
            });
        }
        if self.eat(&TokenKind::Star) {
            return Ok(Expr::Wildcard { table: Some(name) });
        }
        let column_span = self.current().span;
        Ok(Expr::Column {
            table: Some(name),
            name: self.expect_identifier()?,
            span: span.to(column_span),
        })
    }

    /// Parses the bracketed part of an array literal.
    fn parse_array_literal(&mut self) -> ParseResult<Expr> {
        self.expect(&TokenKind::LeftBracket)?;
        let elements = if self.check(&TokenKind::RightBracket) {
            vec![]
        } else {
            self.parse_expression_list()?
        };
        self.expect(&TokenKind::RightBracket)?;
        Ok(Expr::Array(elements))
    }

    fn parse_function_call(&mut self, name: String) -> ParseResult<Expr> {
        let (distinct, args) = self.parenthesized(|p| {
            let distinct = p.eat_keyword(Keyword::Distinct);
            let args = if p.check(&TokenKind::RightParen) {
                vec![]
            } else if p.eat(&TokenKind::Star) {
                vec![Expr::Wildcard { table: None }]
            } else {
                p.parse_expression_list()?
            };
            Ok((distinct, args))
        })?;
        Ok(Expr::Function(FunctionCall {
            name,
            args,
            distinct,
        }))
    }

    /// Parses `CASE [operand] WHEN .. THEN .. [ELSE ..] END`.
    fn parse_case_expression(&mut self) -> ParseResult<Expr> {
        self.expect_keyword(Keyword::Case)?;
        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expression(0)?))
        };

        let mut when_clauses = vec![];
        while self.eat_keyword(Keyword::When) {
            let condition = self.parse_expression(0)?;
            self.expect_keyword(Keyword::Then)?;
            when_clauses.push((condition, self.parse_expression(0)?));
        }
        if when_clauses.is_empty() {
            return Err(self.mismatched(&["'WHEN'"]));
        }

        let else_clause = self
            .clause(Keyword::Else, |p| p.parse_expression(0))?
            .map(Box::new);
        self.expect_keyword(Keyword::End)?;

        Ok(Expr::Case {
            operand,
            when_clauses,
            else_clause,
        })
    }

    /// Parses a column or cast type.
    fn parse_data_type(&mut self) -> ParseResult<DataType> {
        let token = self.current();
        if let TokenKind::Identifier(name) = &token.kind {
            self.advance();
            return Ok(DataType::Custom(name.clone()));
        }
        let Some(keyword) = token.as_keyword() else {
            return Err(self.no_viable_alternative());
        };
        if let Some(data_type) = scalar_type(keyword) {
            self.advance();
            if keyword == Keyword::Double {
                self.eat_keyword(Keyword::Precision);
            }
            return Ok(data_type);
        }

        let data_type = match keyword {
            Keyword::Decimal | Keyword::Numeric => {
                self.advance();
                let (precision, scale) = self.parse_optional_precision_scale()?;
                if keyword == Keyword::Decimal {
                    DataType::Decimal { precision, scale }
                } else {
                    DataType::Numeric { precision, scale }
                }
            }
            Keyword::Char | Keyword::Varchar => {
                self.advance();
                let length = if self.check(&TokenKind::LeftParen) {
                    Some(self.parenthesized(Self::expect_integer::<u32>)?)
                } else {
                    None
                };
                if keyword == Keyword::Char {
                    DataType::Char(length)
                } else {
                    DataType::Varchar(length)
                }
            }
            Keyword::Object => {
                self.advance();
                self.nested(Self::parse_object_type)?
            }
            Keyword::Array => {
                self.advance();
                let element = self.nested(|p| p.parenthesized(Self::parse_data_type))?;
                DataType::Array(Box::new(element))
            }
            _ => return Err(self.no_viable_alternative()),
        };
        Ok(data_type)
    }

    /// Parses the rest of `OBJECT [(policy)] [AS (columns)]`.
    fn parse_object_type(&mut self) -> ParseResult<DataType> {
        let policy = if self.check(&TokenKind::LeftParen) {
            Some(self.parenthesized(|p| {
                let policy = match p.current().as_keyword() {
                    Some(Keyword::Dynamic) => ObjectPolicy::Dynamic,
                    Some(Keyword::Strict) => ObjectPolicy::Strict,
                    Some(Keyword::Ignored) => ObjectPolicy::Ignored,
                    _ => return Err(p.mismatched(&["'DYNAMIC'", "'STRICT'", "'IGNORED'"])),
                };
                p.advance();
                Ok(policy)
            })?)
        } else {
            None
        };

        let columns = if self.check_keyword(Keyword::As) && self.peek().kind == TokenKind::LeftParen
        {
            self.advance();
            self.parenthesized(|p| p.comma_separated(Self::parse_column_def))?
        } else {
            vec![]
        };

        Ok(DataType::Object { policy, columns })
    }

    /// Parses an optional `(precision [, scale])` after DECIMAL or NUMERIC.
    fn parse_optional_precision_scale(&mut self) -> ParseResult<(Option<u16>, Option<u16>)> {
        if !self.check(&TokenKind::LeftParen) {
            return Ok((None, None));
        }
        self.parenthesized(|p| {
            let precision = p.expect_integer()?;
            let scale = if p.eat(&TokenKind::Comma) {
                Some(p.expect_integer()?)
            } else {
                None
            };
            Ok((Some(precision), scale))
        })
    }

    /// Expects a non-negative integer literal that fits `T`.
    fn expect_integer<T: TryFrom<i64>>(&mut self) -> ParseResult<T> {
        if let TokenKind::Integer(n) = self.current().kind {
            if let Ok(value) = T::try_from(n) {
                self.advance();
                return Ok(value);
            }
        }
        Err(self.mismatched(&["INTEGER_VALUE"]))
    }

    fn parse_expression_list(&mut self) -> ParseResult<Vec<Expr>> {
        self.comma_separated(|p| p.parse_expression(0))
    }

    fn parse_identifier_list(&mut self) -> ParseResult<Vec<String>> {
        self.comma_separated(Self::expect_identifier)
    }

    /// Parses `a.b.c`, joined with dots.
    fn parse_dotted_name(&mut self) -> ParseResult<String> {
        let mut name = self.expect_identifier()?;
        while self.eat(&TokenKind::Dot) {
            name.push('.');
            name.push_str(&self.expect_identifier()?);
        }
        Ok(name)
    }

    // --- Combinators ---

    /// Runs `body` after `keyword` if the keyword comes next.
    fn clause<T>(
        &mut self,
        keyword: Keyword,
        body: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<Option<T>> {
        if self.eat_keyword(keyword) {
            body(self).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Parses one or more `item`s separated by commas.
    fn comma_separated<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<Vec<T>> {
        let mut items = vec![item(self)?];
        while self.eat(&TokenKind::Comma) {
            items.push(item(self)?);
        }
        Ok(items)
    }

    /// Parses `( inner )`.
    fn parenthesized<T>(
        &mut self,
        inner: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        self.expect(&TokenKind::LeftParen)?;
        let value = inner(self)?;
        self.expect(&TokenKind::RightParen)?;
        Ok(value)
    }

    /// Runs `inner` one nesting level deeper, failing at the current token
    /// once [`MAX_DEPTH`] levels are open.
    fn nested<T>(&mut self, inner: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error_here(|token, source| {
                SyntaxError::too_deep(token, source, MAX_DEPTH)
            }));
        }
        self.depth += 1;
        let result = inner(self);
        self.depth -= 1;
        result
    }

    // --- Token access ---

    fn current(&self) -> &'a Token {
        self.tokens.get(self.pos).unwrap_or(&END_OF_INPUT)
    }

    fn peek(&self) -> &'a Token {
        self.tokens.get(self.pos + 1).unwrap_or(&END_OF_INPUT)
    }

    /// Moves to the next token. The parser never moves past EOF.
    fn advance(&mut self) {
        if !self.current().is_eof() {
            self.pos += 1;
        }
    }

    /// Compares token kinds, ignoring payloads.
    fn check(&self, kind: &TokenKind) -> bool {
        core::mem::discriminant(&self.current().kind) == core::mem::discriminant(kind)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current().as_keyword() == Some(keyword)
    }

    /// Consumes the current token if it is of `kind`.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        let found = self.check(kind);
        if found {
            self.advance();
        }
        found
    }

    /// Consumes the current token if it is `keyword`.
    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        let found = self.check_keyword(keyword);
        if found {
            self.advance();
        }
        found
    }

    fn expect(&mut self, kind: &TokenKind) -> ParseResult<()> {
        if self.eat(kind) {
            return Ok(());
        }
        let expected = describe(kind);
        let closing = matches!(kind, TokenKind::RightParen | TokenKind::RightBracket);
        if closing && matches!(self.current().kind, TokenKind::Semicolon | TokenKind::Eof) {
            Err(self.error_here(|token, source| SyntaxError::missing(token, source, expected)))
        } else {
            Err(self.mismatched(&[expected]))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> ParseResult<()> {
        if self.eat_keyword(keyword) {
            return Ok(());
        }
        let expected = format!("'{}'", keyword.as_str());
        Err(self.mismatched(&[expected.as_str()]))
    }

    /// Expects an identifier. Non-reserved keywords are accepted and returned
    /// as written.
    fn expect_identifier(&mut self) -> ParseResult<String> {
        let token = self.current();
        let name = match &token.kind {
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::Keyword(kw) if !kw.is_reserved() => {
                String::from(token.span.slice(self.source))
            }
            _ => return Err(self.mismatched(&["IDENTIFIER"])),
        };
        self.advance();
        Ok(name)
    }

    // --- Errors ---

    /// Builds an error at the current token. Tokens the lexer could not
    /// recognize always report as such.
    fn error_here(&self, build: impl FnOnce(&Token, &str) -> SyntaxError) -> SyntaxError {
        let token = self.current();
        if matches!(token.kind, TokenKind::Error(_)) {
            SyntaxError::token_recognition(token, self.source)
        } else {
            build(token, self.source)
        }
    }

    fn mismatched(&self, expected: &[&str]) -> SyntaxError {
        self.error_here(|token, source| SyntaxError::mismatched(token, source, expected))
    }

    fn no_viable_alternative(&self) -> SyntaxError {
        self.error_here(SyntaxError::no_viable_alternative)
    }
}

/// Returns how an expected punctuation token is printed in messages.
const fn describe(kind: &TokenKind) -> &'static str {
    match kind {
        TokenKind::LeftParen => "'('",
        TokenKind::RightParen => "')'",
        TokenKind::LeftBracket => "'['",
        TokenKind::RightBracket => "']'",
        TokenKind::Comma => "','",
        TokenKind::Semicolon => "';'",
        TokenKind::Dot => "'.'",
        TokenKind::Eq => "'='",
        TokenKind::Eof => "<EOF>",
        _ => "<token>",
    }
}

/// The literal a token spells, if any.
fn literal(kind: &TokenKind) -> Option<Literal> {
    Some(match kind {
        TokenKind::Integer(n) => Literal::Integer(*n),
        TokenKind::Float(x) => Literal::Float(*x),
        TokenKind::Numeric(digits) => Literal::Numeric(digits.clone()),
        TokenKind::String(s) => Literal::String(s.clone()),
        TokenKind::Blob(bytes) => Literal::Blob(bytes.clone()),
        TokenKind::Keyword(Keyword::True) => Literal::Boolean(true),
        TokenKind::Keyword(Keyword::False) => Literal::Boolean(false),
        TokenKind::Keyword(Keyword::Null) => Literal::Null,
        _ => return None,
    })
}

/// Types named by a single keyword.
fn scalar_type(keyword: Keyword) -> Option<DataType> {
    Some(match keyword {
        Keyword::Smallint => DataType::Smallint,
        Keyword::Int | Keyword::Integer => DataType::Integer,
        Keyword::Bigint => DataType::Bigint,
        Keyword::Real => DataType::Real,
        Keyword::Double | Keyword::Float => DataType::Double,
        Keyword::Text => DataType::Text,
        Keyword::Boolean => DataType::Boolean,
        Keyword::Date => DataType::Date,
        Keyword::Time => DataType::Time,
        Keyword::Timestamp => DataType::Timestamp,
        _ => return None,
    })
}
