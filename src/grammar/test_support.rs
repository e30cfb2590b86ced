//! Assertion helpers for grammar tests

use crate::clause::{serialize, Clause};
use crate::config::FilterKind;
use crate::grammar::{check_unambiguous, parse};

/// Assert that `source` parses to `expected` and serializes back to `source`
#[track_caller]
pub(crate) fn assert_parses(kind: FilterKind, source: &str, expected: Clause) {
    assert_parses_as(kind, source, expected, source);
}

/// Assert that `source` parses to `expected` and serializes to `canonical`,
/// which must itself parse to the same tree
#[track_caller]
pub(crate) fn assert_parses_as(kind: FilterKind, source: &str, expected: Clause, canonical: &str) {
    let parsed = match parse(kind, source) {
        Ok(clause) => clause,
        Err(err) => panic!("{} filter '{}' did not parse: {}", kind, source, err),
    };
    assert_eq!(parsed, expected, "{} filter '{}' parsed to the wrong tree", kind, source);

    let unparsed = serialize(&parsed);
    assert_eq!(unparsed, canonical, "{} filter '{}' serialized incorrectly", kind, source);

    if let Err(err) = check_unambiguous(kind, source) {
        panic!("{} filter '{}': {}", kind, source, err);
    }
}

/// Assert that `source` is rejected with a syntax error at `position`
#[track_caller]
pub(crate) fn assert_rejects(kind: FilterKind, source: &str, position: usize) {
    match parse(kind, source) {
        Ok(clause) => panic!("{} filter '{}' unexpectedly parsed to {:?}", kind, source, clause),
        Err(err) => {
            assert!(err.is_syntax(), "'{}': expected a syntax error, got {}", source, err);
            assert_eq!(err.position, position, "'{}': {}", source, err);
        }
    }
}
