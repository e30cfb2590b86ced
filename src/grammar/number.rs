//! Number filter grammar
//!
//! ```text
//! leaf    := "null" | comparator literal | literal ["to" literal]
//!          | "[" literal "to" literal ("]" | ")")
//!          | "(" literal "to" literal "]"
//! literal := ["-"] NUMBER      (sign only when written directly against the digits)
//! ```
//!
//! A `(` only opens an interval when the matching `]` follows the upper
//! bound; `(1 to 2)` is a group around an inclusive range.

use crate::clause::{Clause, NumberLeaf, NumberLiteral, NumberTest, OpenEnd};
use crate::error::{ParseError, Result};
use crate::grammar::{Cursor, LeafGrammar};
use crate::tokenizer::{Comparator, Keyword, Punct, TokenKind};

pub struct NumberGrammar;

impl LeafGrammar for NumberGrammar {
    fn leaf(&self, cursor: &mut Cursor<'_>) -> Result<Clause> {
        let test = match cursor.peek_kind() {
            Some(TokenKind::Keyword(Keyword::Null)) => {
                cursor.advance();
                NumberTest::Null
            }
            Some(TokenKind::Operator(comparator)) => {
                cursor.advance();
                let value = literal(cursor)?;
                match comparator {
                    Comparator::Eq => NumberTest::Eq(value),
                    Comparator::Ne => NumberTest::Ne(value),
                    Comparator::Lt => NumberTest::Lt(value),
                    Comparator::Lte => NumberTest::Lte(value),
                    Comparator::Gt => NumberTest::Gt(value),
                    Comparator::Gte => NumberTest::Gte(value),
                }
            }
            Some(TokenKind::Punct(Punct::LeftBracket)) => {
                cursor.advance();
                let (low, high) = bounds(cursor)?;
                if cursor.eat_punct(Punct::RightBracket) {
                    NumberTest::Range(low, high)
                } else if cursor.eat_punct(Punct::RightParen) {
                    NumberTest::HalfOpen(low, high, OpenEnd::High)
                } else {
                    return Err(cursor.expected("']' or ')'"));
                }
            }
            Some(TokenKind::Punct(Punct::LeftParen)) => {
                cursor.advance();
                let (low, high) = bounds(cursor)?;
                if !cursor.eat_punct(Punct::RightBracket) {
                    return Err(cursor.expected("']'"));
                }
                NumberTest::HalfOpen(low, high, OpenEnd::Low)
            }
            _ => {
                let low = literal(cursor)?;
                if cursor.eat_keyword(Keyword::To) {
                    let high = literal(cursor)?;
                    NumberTest::Range(low, high)
                } else {
                    NumberTest::Eq(low)
                }
            }
        };
        Ok(NumberLeaf::new(test).into())
    }

    fn claims_minus(&self, cursor: &Cursor<'_>) -> bool {
        is_signed_literal(cursor, 0)
    }

    fn claims_paren(&self, cursor: &Cursor<'_>) -> bool {
        is_low_open_interval(cursor)
    }
}

/// `-` written directly against a number token, `n` tokens ahead
fn is_signed_literal(cursor: &Cursor<'_>, n: usize) -> bool {
    match (cursor.peek_nth(n), cursor.peek_nth(n + 1)) {
        (Some(minus), Some(number)) => {
            minus.is_punct(Punct::Minus)
                && number.kind == TokenKind::Number
                && number.position == minus.end
        }
        _ => false,
    }
}

/// Number of tokens in the literal `n` tokens ahead, if there is one
fn literal_len(cursor: &Cursor<'_>, n: usize) -> Option<usize> {
    if is_signed_literal(cursor, n) {
        Some(2)
    } else if cursor.peek_nth(n).is_some_and(|t| t.kind == TokenKind::Number) {
        Some(1)
    } else {
        None
    }
}

/// `( literal to literal ]`
fn is_low_open_interval(cursor: &Cursor<'_>) -> bool {
    let Some(low) = literal_len(cursor, 1) else {
        return false;
    };
    let to = 1 + low;
    if !cursor.peek_nth(to).is_some_and(|t| t.is_keyword(Keyword::To)) {
        return false;
    }
    let Some(high) = literal_len(cursor, to + 1) else {
        return false;
    };
    cursor
        .peek_nth(to + 1 + high)
        .is_some_and(|t| t.is_punct(Punct::RightBracket))
}

fn bounds(cursor: &mut Cursor<'_>) -> Result<(NumberLiteral, NumberLiteral)> {
    let low = literal(cursor)?;
    if !cursor.eat_keyword(Keyword::To) {
        return Err(cursor.expected("'to'"));
    }
    Ok((low, literal(cursor)?))
}

fn literal(cursor: &mut Cursor<'_>) -> Result<NumberLiteral> {
    let negative = is_signed_literal(cursor, 0);
    if negative {
        cursor.advance();
    }

    match cursor.peek() {
        Some(token) if token.kind == TokenKind::Number => {
            cursor.advance();
            let text = if negative {
                format!("-{}", token.text)
            } else {
                token.text.clone()
            };
            NumberLiteral::new(text)
                .ok_or_else(|| ParseError::syntax(token.position, format!("invalid number {}", token)))
        }
        _ => Err(cursor.expected("a number")),
    }
}
