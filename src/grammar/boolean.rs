//! Boolean filter grammar
//!
//! `leaf := ["="] ("true" | "false") | "null"`
//!
//! Plain `false` also matches null. The `=` forms treat null as unknown.

use crate::clause::{BooleanLeaf, BooleanValue, Clause};
use crate::error::Result;
use crate::grammar::{Cursor, LeafGrammar};
use crate::tokenizer::{Comparator, Keyword, TokenKind};

pub struct BooleanGrammar;

impl LeafGrammar for BooleanGrammar {
    fn leaf(&self, cursor: &mut Cursor<'_>) -> Result<Clause> {
        if cursor.peek_kind() == Some(TokenKind::Operator(Comparator::Eq)) {
            cursor.advance();
            let value = match cursor.peek_keyword() {
                Some(Keyword::True) => BooleanValue::StrictTrue,
                Some(Keyword::False) => BooleanValue::StrictFalse,
                _ => return Err(cursor.expected("true or false")),
            };
            cursor.advance();
            return Ok(BooleanLeaf::new(value).into());
        }

        let value = match cursor.peek_keyword() {
            Some(Keyword::True) => BooleanValue::True,
            Some(Keyword::False) => BooleanValue::False,
            Some(Keyword::Null) => BooleanValue::Null,
            _ => return Err(cursor.expected("true, false or null")),
        };
        cursor.advance();
        Ok(BooleanLeaf::new(value).into())
    }
}
