//! String filter grammar
//!
//! ```text
//! leaf := QUOTED | "null" | "empty" | bare+
//! ```
//!
//! Adjacent bare tokens (words, numbers, non-structural keywords) join with a
//! single space into one value. In a bare value an unescaped `%` or `_` is a
//! wildcard: `foo%` starts with, `%foo` ends with, `%foo%` contains, anything
//! else with a wildcard is a LIKE pattern. Quoted values always match exactly.

use smallvec::SmallVec;

use crate::clause::{Clause, StringLeaf, StringTest};
use crate::error::Result;
use crate::grammar::{Cursor, LeafGrammar};
use crate::tokenizer::{Keyword, Token, TokenKind};

pub struct StringGrammar;

/// One character of a bare value; `wild` marks an unescaped `%` or `_`
#[derive(Debug, Clone, Copy)]
struct Piece {
    ch: char,
    wild: bool,
}

type Pieces = SmallVec<[Piece; 32]>;

impl LeafGrammar for StringGrammar {
    fn leaf(&self, cursor: &mut Cursor<'_>) -> Result<Clause> {
        let test = match cursor.peek_kind() {
            Some(TokenKind::Quoted { .. }) => {
                let token = cursor.advance().map(|t| t.value.clone()).unwrap_or_default();
                StringTest::Match(token)
            }
            Some(TokenKind::Keyword(Keyword::Null)) => {
                cursor.advance();
                StringTest::Null
            }
            Some(TokenKind::Keyword(Keyword::Empty)) => {
                cursor.advance();
                StringTest::Empty
            }
            _ => {
                let mut pieces = Pieces::new();
                while let Some(token) = cursor.peek().filter(|t| is_bare(t)) {
                    if !pieces.is_empty() {
                        pieces.push(Piece { ch: ' ', wild: false });
                    }
                    scan_pieces(&token.text, &mut pieces);
                    cursor.advance();
                }
                if pieces.is_empty() {
                    return Err(cursor.expected("a string value"));
                }
                classify(&pieces)
            }
        };
        Ok(StringLeaf::new(test).into())
    }
}

/// Tokens that can be part of an unquoted value
fn is_bare(token: &Token) -> bool {
    match token.kind {
        TokenKind::Word | TokenKind::Number => true,
        TokenKind::Keyword(keyword) => !matches!(
            keyword,
            Keyword::And | Keyword::Or | Keyword::Not | Keyword::Null | Keyword::Empty
        ),
        _ => false,
    }
}

/// Resolve backslash escapes in raw word text, remembering which `%` / `_` are wildcards
fn scan_pieces(raw: &str, pieces: &mut Pieces) {
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let ch = chars.next().unwrap_or('\\');
                pieces.push(Piece { ch, wild: false });
            }
            '%' | '_' => pieces.push(Piece { ch: c, wild: true }),
            _ => pieces.push(Piece { ch: c, wild: false }),
        }
    }
}

fn has_wild(pieces: &[Piece]) -> bool {
    pieces.iter().any(|p| p.wild)
}

fn literal(pieces: &[Piece]) -> String {
    pieces.iter().map(|p| p.ch).collect()
}

/// LIKE pattern text: wildcards bare, literal `%`, `_` and `\` escaped
fn pattern(pieces: &[Piece]) -> String {
    let mut out = String::with_capacity(pieces.len());
    for piece in pieces {
        if !piece.wild && matches!(piece.ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(piece.ch);
    }
    out
}

fn classify(pieces: &[Piece]) -> StringTest {
    if !has_wild(pieces) {
        return StringTest::Match(literal(pieces));
    }

    let is_percent = |p: &Piece| p.wild && p.ch == '%';
    let len = pieces.len();
    let starts = len > 1 && is_percent(&pieces[0]);
    let ends = len > 1 && is_percent(&pieces[len - 1]);

    match (starts, ends) {
        (true, true) if len > 2 && !has_wild(&pieces[1..len - 1]) => {
            StringTest::Contains(literal(&pieces[1..len - 1]))
        }
        (false, true) if !has_wild(&pieces[..len - 1]) => {
            StringTest::StartsWith(literal(&pieces[..len - 1]))
        }
        (true, false) if !has_wild(&pieces[1..]) => StringTest::EndsWith(literal(&pieces[1..])),
        _ => StringTest::Like(pattern(pieces)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterKind;
    use crate::grammar::parse;
    use crate::grammar::test_support::{assert_parses, assert_parses_as, assert_rejects};

    fn leaf(test: StringTest) -> Clause {
        StringLeaf::new(test).into()
    }

    fn not(test: StringTest) -> Clause {
        StringLeaf {
            test,
            negated: true,
        }
        .into()
    }

    fn matches(value: &str) -> StringTest {
        StringTest::Match(value.to_string())
    }

    #[test]
    fn test_bare_value_is_match() {
        assert_parses(FilterKind::String, "A", leaf(matches("A")));
        assert_parses_as(FilterKind::String, " A ", leaf(matches("A")), "A");
        assert_parses(FilterKind::String, "42", leaf(matches("42")));
    }

    #[test]
    fn test_comma_is_or() {
        assert_parses_as(
            FilterKind::String,
            "A,B",
            Clause::Or(vec![leaf(matches("A")), leaf(matches("B"))]),
            "A, B",
        );
        assert_parses_as(
            FilterKind::String,
            "A or B",
            Clause::Or(vec![leaf(matches("A")), leaf(matches("B"))]),
            "A, B",
        );
    }

    #[test]
    fn test_negation() {
        assert_parses(FilterKind::String, "-A", not(matches("A")));
        assert_parses_as(FilterKind::String, "- A", not(matches("A")), "-A");
        assert_parses_as(FilterKind::String, "not A", not(matches("A")), "-A");
        assert_parses_as(FilterKind::String, "not -A", leaf(matches("A")), "A");
        assert_parses_as(FilterKind::String, "-(A)", not(matches("A")), "-A");
    }

    #[test]
    fn test_quoted_is_exact_match() {
        assert_parses(FilterKind::String, "\"a, b\"", leaf(matches("a, b")));
        assert_parses(FilterKind::String, "\"50%\"", leaf(matches("50%")));
        assert_parses(FilterKind::String, "\"null\"", leaf(matches("null")));
        assert_parses(FilterKind::String, "\"\"", leaf(matches("")));
        assert_parses(FilterKind::String, r#""say \"hi\"""#, leaf(matches("say \"hi\"")));
    }

    #[test]
    fn test_multi_word_value() {
        assert_parses_as(
            FilterKind::String,
            "hello   world",
            leaf(matches("hello world")),
            "\"hello world\"",
        );
        assert_parses_as(FilterKind::String, "a to b", leaf(matches("a to b")), "\"a to b\"");
    }

    #[test]
    fn test_keywords_as_values() {
        assert_parses(FilterKind::String, "today", leaf(matches("today")));
        assert_parses_as(FilterKind::String, r"\null", leaf(matches("null")), "\"null\"");
    }

    #[test]
    fn test_null_and_empty() {
        assert_parses(FilterKind::String, "null", leaf(StringTest::Null));
        assert_parses(FilterKind::String, "-null", not(StringTest::Null));
        assert_parses_as(FilterKind::String, "EMPTY", leaf(StringTest::Empty), "empty");
        assert_parses(FilterKind::String, "-empty", not(StringTest::Empty));
    }

    #[test]
    fn test_wildcards() {
        assert_parses(FilterKind::String, "foo%", leaf(StringTest::StartsWith("foo".into())));
        assert_parses(FilterKind::String, "%foo", leaf(StringTest::EndsWith("foo".into())));
        assert_parses(FilterKind::String, "%foo%", leaf(StringTest::Contains("foo".into())));
        assert_parses(FilterKind::String, "-foo%", not(StringTest::StartsWith("foo".into())));
        assert_parses(FilterKind::String, "%", leaf(StringTest::Like("%".into())));
        assert_parses(FilterKind::String, "_", leaf(StringTest::Like("_".into())));
        assert_parses(FilterKind::String, "a%z", leaf(StringTest::Like("a%z".into())));
        assert_parses(FilterKind::String, "%%", leaf(StringTest::Like("%%".into())));
        assert_parses(FilterKind::String, "%a_b%", leaf(StringTest::Like("%a_b%".into())));
    }

    #[test]
    fn test_escaped_wildcards() {
        assert_parses(FilterKind::String, r"\%%", leaf(StringTest::StartsWith("%".into())));
        assert_parses(FilterKind::String, r"%\\", leaf(StringTest::EndsWith("\\".into())));
        assert_parses(FilterKind::String, r"%\_", leaf(StringTest::EndsWith("_".into())));
        assert_parses(
            FilterKind::String,
            r"%\_X\_%",
            leaf(StringTest::Contains("_X_".into())),
        );
        assert_parses_as(FilterKind::String, r"50\%", leaf(matches("50%")), "\"50%\"");
        assert_parses(FilterKind::String, r"a\%%b", leaf(StringTest::Like(r"a\%%b".into())));
    }

    #[test]
    fn test_wildcard_across_words() {
        assert_parses_as(
            FilterKind::String,
            "foo bar%",
            leaf(StringTest::StartsWith("foo bar".into())),
            r"foo\ bar%",
        );
    }

    #[test]
    fn test_and_precedence() {
        let a = leaf(StringTest::StartsWith("a".into()));
        let b = not(StringTest::EndsWith("z".into()));
        let c = leaf(matches("c"));
        assert_parses(
            FilterKind::String,
            "a% and -%z, c",
            Clause::Or(vec![Clause::And(vec![a.clone(), b.clone()]), c.clone()]),
        );
        assert_parses(
            FilterKind::String,
            "a% and (-%z, c)",
            Clause::And(vec![a.clone(), Clause::Or(vec![b.clone(), c.clone()])]),
        );
        assert_parses(
            FilterKind::String,
            "not (a%, c)",
            Clause::Not(Box::new(Clause::Or(vec![a, c]))),
        );
    }

    #[test]
    fn test_symbolic_and_or() {
        assert_parses_as(
            FilterKind::String,
            "a; b",
            Clause::And(vec![leaf(matches("a")), leaf(matches("b"))]),
            "a and b",
        );
        assert_parses_as(
            FilterKind::String,
            "a|b",
            Clause::Or(vec![leaf(matches("a")), leaf(matches("b"))]),
            "a, b",
        );
        assert_parses_as(
            FilterKind::String,
            "a% ; -%z | c",
            Clause::Or(vec![
                Clause::And(vec![
                    leaf(StringTest::StartsWith("a".into())),
                    not(StringTest::EndsWith("z".into())),
                ]),
                leaf(matches("c")),
            ]),
            "a% and -%z, c",
        );
    }

    #[test]
    fn test_escaped_symbols_stay_in_value() {
        assert_parses_as(FilterKind::String, r"a\;b", leaf(matches("a;b")), "\"a;b\"");
        assert_parses_as(FilterKind::String, r"a\|b", leaf(matches("a|b")), "\"a|b\"");
        assert_parses(FilterKind::String, "\"x[1]\"", leaf(matches("x[1]")));
        assert_parses(FilterKind::String, r"\;%", leaf(StringTest::StartsWith(";".into())));
        assert_parses(FilterKind::String, r"%\|\[%", leaf(StringTest::Contains("|[".into())));
    }

    #[test]
    fn test_grouping_leaves_no_trace() {
        assert_eq!(
            parse(FilterKind::String, "(A)").unwrap(),
            parse(FilterKind::String, "A").unwrap()
        );
        assert_eq!(
            parse(FilterKind::String, "(A, B), C").unwrap(),
            parse(FilterKind::String, "A, B, C").unwrap()
        );
    }

    #[test]
    fn test_rejects() {
        assert_rejects(FilterKind::String, "\"abc", 4);
        assert_rejects(FilterKind::String, "a, , b", 3);
        assert_rejects(FilterKind::String, "> a", 0);
        assert_rejects(FilterKind::String, "a null", 2);
        assert_rejects(FilterKind::String, "a \"b\"", 2);
        assert_rejects(FilterKind::String, "(a", 2);
        assert_rejects(FilterKind::String, "a; ; b", 3);
        assert_rejects(FilterKind::String, "a | ", 4);
        assert_rejects(FilterKind::String, "x[1]", 1);
        assert_rejects(FilterKind::String, "not", 3);
    }
}
