//! Date / time filter grammar
//!
//! ```text
//! leaf   := "null"
//!         | "before" moment | "after" moment
//!         | ("last" | "next") INT unit
//!         | INT unit                              (not followed by "ago" / "from")
//!         | moment ["to" moment | "for" INT unit]
//! moment := literal
//!         | "now" | "today" | "yesterday" | "tomorrow"
//!         | ("this" | "last" | "next") unit
//!         | ["last" | "next"] weekday
//!         | INT unit ("ago" | "from" "now")
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::clause::{
    Clause, DateLeaf, DateLiteral, DateTest, Moment, RelativeMoment, Span, TemporalUnit, Which,
};
use crate::error::{ParseError, Result};
use crate::grammar::{Cursor, LeafGrammar};
use crate::tokenizer::{Keyword, Token, TokenKind};

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}$").unwrap());
static QUARTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}-[Qq][1-4]$").unwrap());
static MONTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}$").unwrap());
static WEEK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}-[Ww][Kk]$").unwrap());
static DAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());
static TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}[Tt ]([0-9]{2}(?::[0-9]{2}(?::[0-9]{2}(?:\.[0-9]+)?)?)?)$").unwrap()
});
static TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}(?::[0-9]{2}(?::[0-9]{2}(?:\.[0-9]+)?)?)?$").unwrap());

pub struct DateGrammar;

impl LeafGrammar for DateGrammar {
    fn leaf(&self, cursor: &mut Cursor<'_>) -> Result<Clause> {
        let test = match cursor.peek_keyword() {
            Some(Keyword::Null) => {
                cursor.advance();
                DateTest::Null
            }
            Some(Keyword::Before) => {
                cursor.advance();
                DateTest::Before(moment(cursor)?)
            }
            Some(Keyword::After) => {
                cursor.advance();
                DateTest::After(moment(cursor)?)
            }
            Some(which @ (Keyword::Last | Keyword::Next)) if next_is_number(cursor, 1) => {
                cursor.advance();
                let span = span(cursor)?;
                if which == Keyword::Last {
                    DateTest::Last(span)
                } else {
                    DateTest::Next(span)
                }
            }
            _ if is_bare_span(cursor) => DateTest::InLast(span(cursor)?),
            _ => {
                let from = moment(cursor)?;
                if cursor.eat_keyword(Keyword::To) {
                    DateTest::Range(from, moment(cursor)?)
                } else if cursor.eat_keyword(Keyword::For) {
                    DateTest::For(from, span(cursor)?)
                } else {
                    match from {
                        Moment::Absolute(literal) => DateTest::Absolute(literal),
                        Moment::Relative(relative) => DateTest::Relative(relative),
                    }
                }
            }
        };
        Ok(DateLeaf::new(test).into())
    }
}

fn next_is_number(cursor: &Cursor<'_>, n: usize) -> bool {
    cursor.peek_nth(n).is_some_and(|t| t.kind == TokenKind::Number)
}

fn unit_at(cursor: &Cursor<'_>, n: usize) -> Option<TemporalUnit> {
    match cursor.peek_nth(n).and_then(Token::keyword) {
        Some(Keyword::Unit(unit)) => Some(unit),
        _ => None,
    }
}

/// `INT unit` that is not the start of an `ago` / `from now` moment
fn is_bare_span(cursor: &Cursor<'_>) -> bool {
    next_is_number(cursor, 0)
        && unit_at(cursor, 1).is_some()
        && !matches!(
            cursor.peek_nth(2).and_then(Token::keyword),
            Some(Keyword::Ago | Keyword::From)
        )
}

fn span(cursor: &mut Cursor<'_>) -> Result<Span> {
    let count = match cursor.peek() {
        Some(token) if token.kind == TokenKind::Number => token,
        _ => return Err(cursor.expected("a count")),
    };
    let n = count
        .text
        .parse::<u32>()
        .map_err(|_| ParseError::syntax(count.position, format!("expected a whole number, found {}", count)))?;
    cursor.advance();

    match unit_at(cursor, 0) {
        Some(unit) => {
            cursor.advance();
            Ok(Span { n, unit })
        }
        None => Err(cursor.expected("a unit of time")),
    }
}

fn moment(cursor: &mut Cursor<'_>) -> Result<Moment> {
    let relative = match cursor.peek_keyword() {
        Some(Keyword::Now) => RelativeMoment::Now,
        Some(Keyword::Today) => RelativeMoment::Today,
        Some(Keyword::Yesterday) => RelativeMoment::Yesterday,
        Some(Keyword::Tomorrow) => RelativeMoment::Tomorrow,
        Some(Keyword::Weekday(day)) => RelativeMoment::Weekday(day, Which::Last),
        Some(keyword @ (Keyword::This | Keyword::Last | Keyword::Next)) => {
            cursor.advance();
            return match (cursor.peek_keyword(), keyword) {
                (Some(Keyword::Unit(unit)), Keyword::This) => {
                    cursor.advance();
                    Ok(Moment::Relative(RelativeMoment::This(unit)))
                }
                (Some(Keyword::Unit(unit)), Keyword::Last) => {
                    cursor.advance();
                    Ok(Moment::Relative(RelativeMoment::Last(unit)))
                }
                (Some(Keyword::Unit(unit)), _) => {
                    cursor.advance();
                    Ok(Moment::Relative(RelativeMoment::Next(unit)))
                }
                (Some(Keyword::Weekday(day)), Keyword::Last) => {
                    cursor.advance();
                    Ok(Moment::Relative(RelativeMoment::Weekday(day, Which::Last)))
                }
                (Some(Keyword::Weekday(day)), Keyword::Next) => {
                    cursor.advance();
                    Ok(Moment::Relative(RelativeMoment::Weekday(day, Which::Next)))
                }
                (_, Keyword::This) => Err(cursor.expected("a unit of time")),
                _ => Err(cursor.expected("a unit of time or weekday")),
            };
        }
        _ if next_is_number(cursor, 0) && unit_at(cursor, 1).is_some() => {
            let span = span(cursor)?;
            return if cursor.eat_keyword(Keyword::Ago) {
                Ok(Moment::Relative(RelativeMoment::Ago(span)))
            } else if cursor.eat_keyword(Keyword::From) {
                if cursor.eat_keyword(Keyword::Now) {
                    Ok(Moment::Relative(RelativeMoment::FromNow(span)))
                } else {
                    Err(cursor.expected("'now'"))
                }
            } else {
                Err(cursor.expected("'ago' or 'from now'"))
            };
        }
        _ => return date_literal(cursor).map(Moment::Absolute),
    };
    cursor.advance();
    Ok(Moment::Relative(relative))
}

/// Granularity of a complete literal, `None` if `text` is not a date
fn literal_unit(text: &str) -> Option<Option<TemporalUnit>> {
    if YEAR.is_match(text) {
        Some(Some(TemporalUnit::Year))
    } else if QUARTER.is_match(text) {
        Some(Some(TemporalUnit::Quarter))
    } else if MONTH.is_match(text) {
        Some(Some(TemporalUnit::Month))
    } else if WEEK.is_match(text) {
        Some(Some(TemporalUnit::Week))
    } else if DAY.is_match(text) {
        Some(Some(TemporalUnit::Day))
    } else {
        let time = TIMESTAMP.captures(text)?.get(1)?.as_str();
        Some(match time.len() {
            2 => Some(TemporalUnit::Hour),
            5 => Some(TemporalUnit::Minute),
            8 => Some(TemporalUnit::Second),
            _ => None,
        })
    }
}

fn date_literal(cursor: &mut Cursor<'_>) -> Result<DateLiteral> {
    let token = match cursor.peek() {
        Some(token) if matches!(token.kind, TokenKind::Word | TokenKind::Number) => token,
        _ => return Err(cursor.expected("a date or time")),
    };
    let Some(unit) = literal_unit(&token.text) else {
        return Err(ParseError::syntax(
            token.position,
            format!("expected a date or time, found {}", token),
        ));
    };
    cursor.advance();

    // A day followed by a time token is one timestamp: `2001-02-03 04:05`
    if DAY.is_match(&token.text) {
        if let Some(time) = cursor
            .peek()
            .filter(|t| matches!(t.kind, TokenKind::Word | TokenKind::Number) && TIME.is_match(&t.text))
        {
            let text = format!("{} {}", token.text, time.text);
            if let Some(unit) = literal_unit(&text) {
                cursor.advance();
                return Ok(DateLiteral { text, unit });
            }
        }
    }

    Ok(DateLiteral {
        text: token.text.clone(),
        unit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterKind;
    use crate::grammar::test_support::{assert_parses, assert_parses_as, assert_rejects};

    fn leaf(test: DateTest) -> Clause {
        DateLeaf::new(test).into()
    }

    fn not(test: DateTest) -> Clause {
        DateLeaf {
            test,
            negated: true,
        }
        .into()
    }

    fn literal(text: &str, unit: Option<TemporalUnit>) -> DateLiteral {
        DateLiteral {
            text: text.to_string(),
            unit,
        }
    }

    fn rel(moment: RelativeMoment) -> Moment {
        Moment::Relative(moment)
    }

    fn span(n: u32, unit: TemporalUnit) -> Span {
        Span { n, unit }
    }

    #[test]
    fn test_literal_granularity() {
        let cases = [
            ("2001", Some(TemporalUnit::Year)),
            ("2001-Q1", Some(TemporalUnit::Quarter)),
            ("2001-02", Some(TemporalUnit::Month)),
            ("2001-02-03-WK", Some(TemporalUnit::Week)),
            ("2001-02-03", Some(TemporalUnit::Day)),
            ("2001-02-03 04", Some(TemporalUnit::Hour)),
            ("2001-02-03T04", Some(TemporalUnit::Hour)),
            ("2001-02-03 04:05", Some(TemporalUnit::Minute)),
            ("2001-02-03 04:05:06", Some(TemporalUnit::Second)),
            ("2001-02-03 04:05:06.7", None),
            ("2001-02-03T04:05:06.7", None),
        ];
        for (source, unit) in cases {
            assert_parses(FilterKind::Date, source, leaf(DateTest::Absolute(literal(source, unit))));
        }
    }

    #[test]
    fn test_negated_literal() {
        assert_parses_as(
            FilterKind::Date,
            "not 2001-02-03 04:05:06.7",
            not(DateTest::Absolute(literal("2001-02-03 04:05:06.7", None))),
            "-2001-02-03 04:05:06.7",
        );
    }

    #[test]
    fn test_named_moments() {
        assert_parses(FilterKind::Date, "now", leaf(DateTest::Relative(RelativeMoment::Now)));
        assert_parses(FilterKind::Date, "today", leaf(DateTest::Relative(RelativeMoment::Today)));
        assert_parses(FilterKind::Date, "-today", not(DateTest::Relative(RelativeMoment::Today)));
        assert_parses_as(
            FilterKind::Date,
            "not Yesterday",
            not(DateTest::Relative(RelativeMoment::Yesterday)),
            "-yesterday",
        );
        assert_parses(
            FilterKind::Date,
            "tomorrow",
            leaf(DateTest::Relative(RelativeMoment::Tomorrow)),
        );
    }

    #[test]
    fn test_unit_moments() {
        assert_parses(
            FilterKind::Date,
            "this hour",
            leaf(DateTest::Relative(RelativeMoment::This(TemporalUnit::Hour))),
        );
        assert_parses(
            FilterKind::Date,
            "last week",
            leaf(DateTest::Relative(RelativeMoment::Last(TemporalUnit::Week))),
        );
        assert_parses_as(
            FilterKind::Date,
            "next quarters",
            leaf(DateTest::Relative(RelativeMoment::Next(TemporalUnit::Quarter))),
            "next quarter",
        );
    }

    #[test]
    fn test_weekdays() {
        use crate::clause::Weekday;

        assert_parses(
            FilterKind::Date,
            "monday",
            leaf(DateTest::Relative(RelativeMoment::Weekday(Weekday::Monday, Which::Last))),
        );
        assert_parses_as(
            FilterKind::Date,
            "last tuesday",
            leaf(DateTest::Relative(RelativeMoment::Weekday(Weekday::Tuesday, Which::Last))),
            "tuesday",
        );
        assert_parses(
            FilterKind::Date,
            "next wednesday",
            leaf(DateTest::Relative(RelativeMoment::Weekday(Weekday::Wednesday, Which::Next))),
        );
    }

    #[test]
    fn test_offsets() {
        assert_parses(
            FilterKind::Date,
            "5 years ago",
            leaf(DateTest::Relative(RelativeMoment::Ago(span(5, TemporalUnit::Year)))),
        );
        assert_parses(
            FilterKind::Date,
            "1 week from now",
            leaf(DateTest::Relative(RelativeMoment::FromNow(span(1, TemporalUnit::Week)))),
        );
    }

    #[test]
    fn test_spans() {
        assert_parses(FilterKind::Date, "1 hour", leaf(DateTest::InLast(span(1, TemporalUnit::Hour))));
        assert_parses_as(
            FilterKind::Date,
            "not 7 day",
            not(DateTest::InLast(span(7, TemporalUnit::Day))),
            "-7 days",
        );
        assert_parses(FilterKind::Date, "last 2 days", leaf(DateTest::Last(span(2, TemporalUnit::Day))));
        assert_parses(FilterKind::Date, "-next 3 weeks", not(DateTest::Next(span(3, TemporalUnit::Week))));
        assert_parses(
            FilterKind::Date,
            "2001 days",
            leaf(DateTest::InLast(span(2001, TemporalUnit::Day))),
        );
    }

    #[test]
    fn test_before_after() {
        assert_parses(
            FilterKind::Date,
            "before today",
            leaf(DateTest::Before(rel(RelativeMoment::Today))),
        );
        assert_parses(
            FilterKind::Date,
            "-after tomorrow",
            not(DateTest::After(rel(RelativeMoment::Tomorrow))),
        );
        assert_parses(
            FilterKind::Date,
            "after 2001-02-03",
            leaf(DateTest::After(Moment::Absolute(literal(
                "2001-02-03",
                Some(TemporalUnit::Day),
            )))),
        );
    }

    #[test]
    fn test_ranges() {
        assert_parses(
            FilterKind::Date,
            "yesterday to tomorrow",
            leaf(DateTest::Range(
                rel(RelativeMoment::Yesterday),
                rel(RelativeMoment::Tomorrow),
            )),
        );
        assert_parses(
            FilterKind::Date,
            "2001-01-01 to 2001-12-31 23:59",
            leaf(DateTest::Range(
                Moment::Absolute(literal("2001-01-01", Some(TemporalUnit::Day))),
                Moment::Absolute(literal("2001-12-31 23:59", Some(TemporalUnit::Minute))),
            )),
        );
        assert_parses(
            FilterKind::Date,
            "-today to now",
            not(DateTest::Range(rel(RelativeMoment::Today), rel(RelativeMoment::Now))),
        );
        assert_parses(
            FilterKind::Date,
            "now for 42 minutes",
            leaf(DateTest::For(rel(RelativeMoment::Now), span(42, TemporalUnit::Minute))),
        );
        assert_parses(
            FilterKind::Date,
            "3 days ago for 1 day",
            leaf(DateTest::For(
                rel(RelativeMoment::Ago(span(3, TemporalUnit::Day))),
                span(1, TemporalUnit::Day),
            )),
        );
    }

    #[test]
    fn test_joined() {
        assert_parses_as(
            FilterKind::Date,
            "today or tomorrow",
            Clause::Or(vec![
                leaf(DateTest::Relative(RelativeMoment::Today)),
                leaf(DateTest::Relative(RelativeMoment::Tomorrow)),
            ]),
            "today, tomorrow",
        );
        assert_parses(
            FilterKind::Date,
            "-before tomorrow and after yesterday",
            Clause::And(vec![
                not(DateTest::Before(rel(RelativeMoment::Tomorrow))),
                leaf(DateTest::After(rel(RelativeMoment::Yesterday))),
            ]),
        );
        assert_parses(FilterKind::Date, "null", leaf(DateTest::Null));
        assert_parses_as(FilterKind::Date, "(null)", leaf(DateTest::Null), "null");
    }

    #[test]
    fn test_rejects() {
        assert_rejects(FilterKind::Date, "not nulll, now", 4);
        assert_rejects(FilterKind::Date, "2001-1", 0);
        assert_rejects(FilterKind::Date, "before", 6);
        assert_rejects(FilterKind::Date, "this monday", 5);
        assert_rejects(FilterKind::Date, "5 days from", 11);
        assert_rejects(FilterKind::Date, "last 1.5 days", 5);
        assert_rejects(FilterKind::Date, "before today to now", 13);
        assert_rejects(FilterKind::Date, "today for tomorrow", 10);
    }

    #[test]
    fn test_rejects_non_ascii_digits() {
        assert_rejects(FilterKind::Date, "\u{662}\u{660}\u{660}\u{661}", 0);
        assert_rejects(FilterKind::Date, "2001-\u{660}\u{662}", 0);
        assert_rejects(FilterKind::Date, "2001-02-03 \u{FF10}4:05", 11);
        assert!(!YEAR.is_match("\u{FF12}001"));
        assert!(!TIME.is_match("0\u{664}:05"));
    }

    #[test]
    fn test_fraction_uses_a_dot() {
        assert!(TIMESTAMP.is_match("2001-02-03T04:05:06.789"));
        assert!(!TIMESTAMP.is_match("2001-02-03T04:05:06,7"));
        assert!(!TIME.is_match("04:05:06,7"));
        // the comma separates alternatives instead
        assert_rejects(FilterKind::Date, "2001-02-03 04:05:06,7", 20);
        assert_rejects(FilterKind::Date, "2001-02-03T04:05:06,7", 20);
    }
}
