#![allow(dead_code)]

use oxide_sqlparse::ast::{
    CreateTableStatement, DeleteStatement, InsertStatement, SelectStatement, Statement,
    UpdateStatement,
};
use oxide_sqlparse::{ParseError, Statement as Parsed, sqlparse};

/// Parses a batch, collecting errors.
pub fn batch(sql: &str) -> Vec<Parsed<'_>> {
    sqlparse(sql, false).unwrap_or_else(|e| panic!("Batch aborted: {sql}\nError: {e:?}"))
}

/// Parses a batch holding exactly one statement that must succeed.
pub fn parse(sql: &str) -> Statement {
    let mut statements = batch(sql);
    assert_eq!(statements.len(), 1, "Expected one statement in: {sql}");
    let statement = statements.remove(0);
    if let Some(e) = &statement.exception {
        panic!("Failed to parse: {sql}\nError: {}", e.error_message());
    }
    statement
        .tree
        .unwrap_or_else(|| panic!("No tree for: {sql}"))
}

/// Returns the error of the first statement of `sql`.
pub fn parse_err(sql: &str) -> ParseError<'_> {
    batch(sql)
        .into_iter()
        .next()
        .and_then(|s| s.exception)
        .unwrap_or_else(|| panic!("Expected parse error for: {sql}"))
}

pub fn parse_select(sql: &str) -> SelectStatement {
    match parse(sql) {
        Statement::Select(s) => s,
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

pub fn parse_insert(sql: &str) -> InsertStatement {
    match parse(sql) {
        Statement::Insert(i) => i,
        other => panic!("Expected INSERT, got {other:?}"),
    }
}

pub fn parse_update(sql: &str) -> UpdateStatement {
    match parse(sql) {
        Statement::Update(u) => u,
        other => panic!("Expected UPDATE, got {other:?}"),
    }
}

pub fn parse_delete(sql: &str) -> DeleteStatement {
    match parse(sql) {
        Statement::Delete(d) => d,
        other => panic!("Expected DELETE, got {other:?}"),
    }
}

pub fn parse_create(sql: &str) -> CreateTableStatement {
    match parse(sql) {
        Statement::CreateTable(c) => c,
        other => panic!("Expected CREATE TABLE, got {other:?}"),
    }
}

/// Asserts which statements of a batch failed.
pub fn assert_failures(statements: &[Parsed<'_>], failed: &[bool]) {
    let actual: Vec<bool> = statements.iter().map(|s| s.exception.is_some()).collect();
    assert_eq!(actual, failed, "Statements: {statements:#?}");
}
