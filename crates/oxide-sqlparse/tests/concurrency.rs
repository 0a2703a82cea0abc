//! Tests for parsing from several threads.

use std::thread;

use oxide_sqlparse::SqlParser;

#[test]
fn shared_parser_across_threads() {
    let parser = SqlParser::new();
    let batches: Vec<String> = (0..8)
        .map(|i| format!("SELECT {i} FROM t{i}; SELEC {i}; DELETE FROM t{i} WHERE id = {i}"))
        .collect();

    thread::scope(|scope| {
        let handles: Vec<_> = batches
            .iter()
            .map(|batch| {
                let parser = &parser;
                scope.spawn(move || {
                    let statements = parser.parse(batch).unwrap();
                    statements
                        .iter()
                        .map(|s| s.exception.is_some())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), [false, true, false]);
        }
    });
}

#[test]
fn parser_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SqlParser>();
    assert_send_sync::<oxide_sqlparse::Statement<'static>>();
}
