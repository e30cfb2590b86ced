//! Token cursor shared by the grammars

use crate::error::ParseError;
use crate::tokenizer::{Keyword, Punct, Token, TokenKind};

/// Read position over a token slice
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    source_len: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token], source_len: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            source_len,
        }
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    pub fn peek_nth(&self, n: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + n)
    }

    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    pub fn peek_keyword(&self) -> Option<Keyword> {
        self.peek().and_then(Token::keyword)
    }

    pub fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    pub fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.peek().is_some_and(|t| t.is_keyword(keyword)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn eat_punct(&mut self, punct: Punct) -> bool {
        if self.peek().is_some_and(|t| t.is_punct(punct)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Byte offset of the next token, or the end of input
    pub fn position(&self) -> usize {
        self.peek().map(|t| t.position).unwrap_or(self.source_len)
    }

    /// Syntax error naming what was expected and what was found instead
    pub fn expected(&self, what: &str) -> ParseError {
        match self.peek() {
            Some(token) => {
                ParseError::syntax(token.position, format!("expected {}, found {}", what, token))
            }
            None => ParseError::syntax(
                self.source_len,
                format!("expected {}, found end of input", what),
            ),
        }
    }
}
