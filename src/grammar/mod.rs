//! Filter grammars
//!
//! All four kinds share one recursive-descent skeleton:
//!
//! ```text
//! clause := term (("," | "|" | "or") term)*
//! term   := unary ((";" | "and") unary)*
//! unary  := ("-" | "not")* ("(" clause ")" | leaf)
//! ```
//!
//! Each kind supplies only its `leaf` rule. Every rule commits on a single
//! token of lookahead, so a valid input has exactly one derivation.

mod boolean;
mod cursor;
mod date;
mod number;
mod string;

#[cfg(test)]
pub(crate) mod test_support;

pub use boolean::BooleanGrammar;
pub use date::DateGrammar;
pub use number::NumberGrammar;
pub use string::StringGrammar;

pub use cursor::Cursor;

use crate::clause::{serialize, Clause};
use crate::config::{FilterKind, ParseOptions};
use crate::error::{ParseError, Result};
use crate::tokenizer::{tokenize, Keyword, Punct, TokenKind};

/// Leaf vocabulary of one filter kind
pub trait LeafGrammar {
    /// Parse a single leaf at the cursor
    fn leaf(&self, cursor: &mut Cursor<'_>) -> Result<Clause>;

    /// Whether a `-` at the cursor belongs to the leaf rather than negating it
    fn claims_minus(&self, _cursor: &Cursor<'_>) -> bool {
        false
    }

    /// Whether a `(` at the cursor opens a leaf rather than a group
    fn claims_paren(&self, _cursor: &Cursor<'_>) -> bool {
        false
    }
}

/// Parse `source` with the grammar for `kind`
pub fn parse(kind: FilterKind, source: &str) -> Result<Clause> {
    parse_with_options(kind, source, &ParseOptions::default())
}

pub fn parse_with_options(kind: FilterKind, source: &str, options: &ParseOptions) -> Result<Clause> {
    let result = match kind {
        FilterKind::String => parse_grammar(&StringGrammar, source, options),
        FilterKind::Number => parse_grammar(&NumberGrammar, source, options),
        FilterKind::Boolean => parse_grammar(&BooleanGrammar, source, options),
        FilterKind::Date => parse_grammar(&DateGrammar, source, options),
    };

    match &result {
        Ok(clause) => tracing::trace!(%kind, ?clause, "parsed filter expression"),
        Err(err) => tracing::debug!(%kind, source, error = %err, "rejected filter expression"),
    }
    result
}

/// Parse with an explicit leaf grammar
pub fn parse_grammar<G: LeafGrammar>(
    grammar: &G,
    source: &str,
    options: &ParseOptions,
) -> Result<Clause> {
    let tokens = tokenize(source);
    tracing::trace!(tokens = tokens.len(), "tokenized filter expression");

    if tokens.iter().any(|t| t.is_unterminated()) {
        return Err(ParseError::syntax(source.len(), "unterminated quoted string"));
    }
    if tokens.is_empty() {
        return Err(ParseError::syntax(source.len(), "empty filter expression"));
    }

    let mut parser = Parser {
        grammar,
        cursor: Cursor::new(&tokens, source.len()),
        depth: 0,
        max_depth: options.max_depth,
    };
    let clause = parser.clause()?;
    if !parser.cursor.is_at_end() {
        return Err(parser.cursor.expected("',', 'or', 'and' or end of input"));
    }
    Ok(clause)
}

/// Grammar self-check: parse `source`, serialize the result and parse that
/// canonical text again. Two different trees for the same meaning means the
/// grammar admits more than one derivation and is reported as
/// [`crate::ParseErrorKind::Ambiguous`].
pub fn check_unambiguous(kind: FilterKind, source: &str) -> Result<Clause> {
    let first = parse(kind, source)?;
    let canonical = serialize(&first);
    let second = parse(kind, &canonical).map_err(|err| {
        ParseError::ambiguous(
            err.position,
            format!("canonical form '{}' does not parse: {}", canonical, err.message),
        )
    })?;
    if first != second {
        return Err(ParseError::ambiguous(
            0,
            format!(
                "'{}' and its canonical form '{}' parse to different trees",
                source, canonical
            ),
        ));
    }
    Ok(first)
}

struct Parser<'g, 'a, G> {
    grammar: &'g G,
    cursor: Cursor<'a>,
    depth: usize,
    max_depth: usize,
}

impl<G: LeafGrammar> Parser<'_, '_, G> {
    fn clause(&mut self) -> Result<Clause> {
        let mut members = vec![self.term()?];
        while self.cursor.eat_punct(Punct::Comma)
            || self.cursor.eat_punct(Punct::Pipe)
            || self.cursor.eat_keyword(Keyword::Or)
        {
            members.push(self.term()?);
        }
        Ok(Clause::or(members))
    }

    fn term(&mut self) -> Result<Clause> {
        let mut members = vec![self.unary()?];
        while self.cursor.eat_punct(Punct::Semicolon) || self.cursor.eat_keyword(Keyword::And) {
            members.push(self.unary()?);
        }
        Ok(Clause::and(members))
    }

    /// Prefix negations fold in a loop, so only groups count towards `max_depth`
    fn unary(&mut self) -> Result<Clause> {
        let mut negations = 0usize;
        loop {
            match self.cursor.peek_kind() {
                Some(TokenKind::Punct(Punct::Minus)) if !self.grammar.claims_minus(&self.cursor) => {}
                Some(TokenKind::Keyword(Keyword::Not)) => {}
                _ => break,
            }
            self.cursor.advance();
            negations += 1;
        }

        let operand = self.operand()?;
        Ok(if negations % 2 == 1 {
            operand.negate()
        } else {
            operand
        })
    }

    fn operand(&mut self) -> Result<Clause> {
        match self.cursor.peek_kind() {
            Some(TokenKind::Punct(Punct::LeftParen)) if !self.grammar.claims_paren(&self.cursor) => {
                self.cursor.advance();
                let inner = self.nested(Self::clause)?;
                if !self.cursor.eat_punct(Punct::RightParen) {
                    return Err(self.cursor.expected("')'"));
                }
                Ok(inner)
            }
            None => Err(self.cursor.expected("a filter value")),
            Some(_) => self.grammar.leaf(&mut self.cursor),
        }
    }

    fn nested(&mut self, rule: fn(&mut Self) -> Result<Clause>) -> Result<Clause> {
        if self.depth >= self.max_depth {
            return Err(ParseError::syntax(
                self.cursor.position(),
                format!("expression nested deeper than {}", self.max_depth),
            ));
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }
}
