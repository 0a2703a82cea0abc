//! Syntactic facts read from a parsed statement.
//!
//! Nothing here is resolved against a catalog: a table is whatever name the
//! statement spells out.

use std::collections::BTreeMap;

use crate::ast::{
    Expr, InsertSource, SelectStatement, Statement, TableName, TableProperty, TableRef,
};

/// A table referenced by a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Table {
    /// Schema, when the reference is qualified.
    pub schema: Option<String>,
    /// Table name.
    pub name: String,
    /// Quoted name: `"schema"."name"` or `"name"`.
    pub fqn: String,
}

impl Table {
    /// Creates a table entry from its parts.
    #[must_use]
    pub fn new(schema: Option<&str>, name: &str) -> Self {
        let table = TableName {
            schema: schema.map(String::from),
            name: String::from(name),
        };
        Self::from(&table)
    }
}

impl From<&TableName> for Table {
    fn from(table: &TableName) -> Self {
        Self {
            schema: table.schema.clone(),
            name: table.name.clone(),
            fqn: table.to_string(),
        }
    }
}

/// Facts about one statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Every table reference, in source order.
    pub tables: Vec<Table>,
    /// `CREATE TABLE ... WITH (...)` properties with literal or parameter
    /// values, by name.
    pub with_properties: BTreeMap<String, String>,
    /// The properties whose value is a parameter placeholder.
    pub parameterized_properties: BTreeMap<String, String>,
}

impl Metadata {
    /// Collects the metadata of a parsed statement.
    #[must_use]
    pub fn from_tree(tree: &Statement) -> Self {
        let mut metadata = Self::default();
        metadata.visit_statement(tree);
        metadata
    }

    fn visit_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Select(select) => self.visit_select(select),
            Statement::Insert(insert) => {
                self.push(&insert.table);
                match &insert.values {
                    InsertSource::Values(rows) => rows.iter().flatten().for_each(|e| self.visit_expr(e)),
                    InsertSource::Query(query) => self.visit_select(query),
                    InsertSource::DefaultValues => {}
                }
            }
            Statement::Update(update) => {
                self.push(&update.table);
                for assignment in &update.assignments {
                    self.visit_expr(&assignment.value);
                }
                if let Some(from) = &update.from {
                    self.visit_table_ref(from);
                }
                if let Some(expr) = &update.where_clause {
                    self.visit_expr(expr);
                }
            }
            Statement::Delete(delete) => {
                self.push(&delete.table);
                if let Some(expr) = &delete.where_clause {
                    self.visit_expr(expr);
                }
            }
            Statement::CreateTable(create) => {
                self.push(&create.table);
                self.collect_properties(&create.properties);
            }
            Statement::DropTable { table, .. } => self.push(table),
            Statement::Explain { statement, .. } => self.visit_statement(statement),
            Statement::Refresh(tables) | Statement::Optimize { tables, .. } => {
                tables.iter().for_each(|t| self.push(t));
            }
            Statement::Show(crate::ast::ShowStatement::CreateTable(table)) => self.push(table),
            _ => {}
        }
    }

    fn visit_select(&mut self, select: &SelectStatement) {
        for column in &select.columns {
            self.visit_expr(&column.expr);
        }
        if let Some(from) = &select.from {
            self.visit_table_ref(from);
        }
        for expr in select
            .where_clause
            .iter()
            .chain(&select.group_by)
            .chain(&select.having)
        {
            self.visit_expr(expr);
        }
        if let Some(set_operation) = &select.set_operation {
            self.visit_select(&set_operation.right);
        }
    }

    fn visit_table_ref(&mut self, table_ref: &TableRef) {
        match table_ref {
            TableRef::Table { schema, name, .. } => {
                self.tables.push(Table::new(schema.as_deref(), name));
            }
            TableRef::Subquery { query, .. } => self.visit_select(query),
            TableRef::Join { left, join } => {
                self.visit_table_ref(left);
                self.visit_table_ref(&join.table);
                if let Some(on) = &join.on {
                    self.visit_expr(on);
                }
            }
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Subquery(query) | Expr::Exists(query) => self.visit_select(query),
            Expr::Binary { left, right, .. } => {
                self.visit_expr(left);
                self.visit_expr(right);
            }
            Expr::Unary { operand: expr, .. }
            | Expr::IsNull { expr, .. }
            | Expr::Cast { expr, .. }
            | Expr::Paren(expr) => self.visit_expr(expr),
            Expr::In { expr, list, .. } => {
                self.visit_expr(expr);
                list.iter().for_each(|e| self.visit_expr(e));
            }
            Expr::Between {
                expr, low, high, ..
            } => {
                self.visit_expr(expr);
                self.visit_expr(low);
                self.visit_expr(high);
            }
            Expr::Function(call) => call.args.iter().for_each(|e| self.visit_expr(e)),
            Expr::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                if let Some(operand) = operand {
                    self.visit_expr(operand);
                }
                for (when, then) in when_clauses {
                    self.visit_expr(when);
                    self.visit_expr(then);
                }
                if let Some(else_clause) = else_clause {
                    self.visit_expr(else_clause);
                }
            }
            Expr::Array(items) => items.iter().for_each(|e| self.visit_expr(e)),
            Expr::Subscript { expr, index } => {
                self.visit_expr(expr);
                self.visit_expr(index);
            }
            Expr::Literal(_) | Expr::Column { .. } | Expr::Parameter(_) | Expr::Wildcard { .. } => {}
        }
    }

    fn push(&mut self, table: &TableName) {
        self.tables.push(Table::from(table));
    }

    fn collect_properties(&mut self, properties: &[TableProperty]) {
        for property in properties {
            let Some(value) = property.value.literal_text() else {
                continue;
            };
            if matches!(property.value, Expr::Parameter(_)) {
                self.parameterized_properties
                    .insert(property.name.clone(), value.clone());
            }
            self.with_properties.insert(property.name.clone(), value);
        }
    }
}
