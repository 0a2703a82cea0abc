//! Property tests for batch parsing.

use oxide_sqlparse::{Error, LineIndex, sqlparse};
use proptest::prelude::*;

// ===================
// Strategies
// ===================

const FRAGMENTS: &[&str] = &[
    "SELECT", "select", "1", "2.5", "a", "b.c", "FROM", "t", "WHERE", "=", "+", ";", ";", "(", ")",
    ",", "'x'", "?", "INSERT", "INTO", "VALUES", "[", "]", "CREATE", "TABLE", "INT", "AS",
    "LIMIT", "!", "é", "\"q\"", "SELEC",
];

const OPENERS: &[&str] = &["(", "- ", "NOT ", "(SELECT ", "ARRAY["];

const SEPARATORS: [&str; 4] = ["\n", "\r", "\t", " "];

/// Token-like words, joined later by a chosen separator.
fn words_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..24)
}

/// A statement nesting one construct up to a few hundred levels deep, left
/// unclosed, followed by a clean statement.
fn nesting_strategy() -> impl Strategy<Value = String> {
    (prop::sample::select(OPENERS), 0usize..400)
        .prop_map(|(opener, depth)| format!("SELECT {}1; SELECT 2", opener.repeat(depth)))
}

/// Arbitrary text mixing SQL words with raw characters.
fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        words_strategy().prop_map(|words| words.join(" ")),
        ".{0,64}",
    ]
}

// ===================
// Property Test Functions
// ===================

/// Default mode never fails, and every statement has exactly one of tree or
/// exception.
fn check_collects_without_failing(text: &str) -> Result<(), TestCaseError> {
    let statements = sqlparse(text, false);
    prop_assert!(statements.is_ok(), "Batch failed: {statements:?}");
    let statements = statements.unwrap_or_default();

    let mut previous_end = 0;
    for statement in &statements {
        prop_assert_eq!(statement.tree.is_some(), statement.exception.is_none());
        prop_assert!(statement.span.start >= previous_end);
        prop_assert!(statement.span.end <= text.len());
        prop_assert!(!statement.query.is_empty());
        previous_end = statement.span.end;
    }
    Ok(())
}

/// Raise mode fails exactly when some statement fails, and reports the first.
fn check_raise_mode(text: &str) -> Result<(), TestCaseError> {
    let collected = sqlparse(text, false).unwrap_or_default();
    let first_failure = collected.iter().find_map(|s| s.exception.clone());
    match (sqlparse(text, true), first_failure) {
        (Ok(statements), None) => prop_assert_eq!(statements, collected),
        (Err(Error::Syntax(raised)), Some(expected)) => prop_assert_eq!(raised, expected),
        (raised, expected) => {
            prop_assert!(false, "raise mode gave {raised:?}, expected {expected:?}");
        }
    }
    Ok(())
}

/// Compact messages locate the error through the line index, and marking is
/// stable.
fn check_error_rendering(text: &str) -> Result<(), TestCaseError> {
    let index = LineIndex::new(text);
    for statement in sqlparse(text, false).unwrap_or_default() {
        let Some(error) = statement.exception else {
            continue;
        };
        let position = index.line_col(error.span.start);
        prop_assert_eq!(
            error.error_message(),
            format!("[line {}:{} {}]", position.line, position.column - 1, error.msg)
        );
        let marked = error.original_query_with_error_marked();
        prop_assert_eq!(&marked, &error.original_query_with_error_marked());
        prop_assert!(marked.len() > text.len());
        prop_assert!(marked.contains('^'));
    }
    Ok(())
}

/// The whitespace between words does not change which statements fail.
fn check_whitespace_invariance(words: &[&str]) -> Result<(), TestCaseError> {
    let failures = |separator: &str| -> Vec<bool> {
        let text = words.join(separator);
        sqlparse(&text, false)
            .unwrap_or_default()
            .iter()
            .map(|s| s.exception.is_some())
            .collect()
    };
    let expected = failures(SEPARATORS[0]);
    for separator in &SEPARATORS[1..] {
        prop_assert_eq!(&failures(separator), &expected, "separator {:?}", separator);
    }
    Ok(())
}

/// Nesting at any depth fails only its own statement.
fn check_nesting_is_contained(text: &str) -> Result<(), TestCaseError> {
    let statements = sqlparse(text, false);
    prop_assert!(statements.is_ok(), "Batch failed: {statements:?}");
    let statements = statements.unwrap_or_default();
    let last = statements.last();
    prop_assert_eq!(last.map(|s| s.query), Some("SELECT 2"));
    prop_assert!(last.is_some_and(|s| s.tree.is_some()));
    Ok(())
}

// ===================
// Proptest Wrappers
// ===================

proptest! {
    #[test]
    fn collects_without_failing(text in text_strategy()) {
        check_collects_without_failing(&text)?;
    }

    #[test]
    fn raise_mode_matches_first_failure(text in text_strategy()) {
        check_raise_mode(&text)?;
    }

    #[test]
    fn error_rendering_is_stable(text in text_strategy()) {
        check_error_rendering(&text)?;
    }

    #[test]
    fn nesting_is_contained(text in nesting_strategy()) {
        check_nesting_is_contained(&text)?;
    }

    #[test]
    fn whitespace_does_not_change_failures(words in words_strategy()) {
        check_whitespace_invariance(&words)?;
    }
}
