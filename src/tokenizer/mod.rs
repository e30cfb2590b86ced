//! Filter expression tokenizer
//!
//! Splits raw source text into words, quoted strings, numbers, operators,
//! keywords and punctuation. Tokenizing never fails: an unterminated quote is
//! returned as a flagged token and reported by the grammar that consumes it.

mod token;


pub use token::*;

use once_cell::sync::Lazy;
use regex::Regex;
use std::iter::Peekable;
use std::str::CharIndices;

/// Unsigned decimal literal in ASCII digits; a sign is a separate `-` token
static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$").unwrap());

type Chars<'a> = Peekable<CharIndices<'a>>;

/// Tokenize a filter expression
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            ',' => {
                chars.next();
                tokens.push(punct(source, start, Punct::Comma));
            }
            ';' => {
                chars.next();
                tokens.push(punct(source, start, Punct::Semicolon));
            }
            '|' => {
                chars.next();
                tokens.push(punct(source, start, Punct::Pipe));
            }
            '(' => {
                chars.next();
                tokens.push(punct(source, start, Punct::LeftParen));
            }
            '[' => {
                chars.next();
                tokens.push(punct(source, start, Punct::LeftBracket));
            }
            ']' => {
                chars.next();
                tokens.push(punct(source, start, Punct::RightBracket));
            }
            ')' => {
                chars.next();
                tokens.push(punct(source, start, Punct::RightParen));
            }
            '-' => {
                chars.next();
                tokens.push(punct(source, start, Punct::Minus));
            }
            '"' => tokens.push(read_quoted(source, &mut chars)),
            '<' | '>' | '=' | '!' => match read_operator(source, start) {
                Some(token) => {
                    for _ in 0..token.text.len() {
                        chars.next();
                    }
                    tokens.push(token);
                }
                None => tokens.push(read_word(source, &mut chars)),
            },
            _ => tokens.push(read_word(source, &mut chars)),
        }
    }

    tokens
}

fn punct(source: &str, start: usize, punct: Punct) -> Token {
    let text = source[start..start + 1].to_string();
    Token {
        kind: TokenKind::Punct(punct),
        value: text.clone(),
        text,
        position: start,
        end: start + 1,
    }
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | ';' | '|' | '(' | ')' | '[' | ']' | '"')
}

fn read_operator(source: &str, start: usize) -> Option<Token> {
    let rest = &source[start..];
    // Two-character operators first
    let operators = [
        ("<=", Comparator::Lte),
        (">=", Comparator::Gte),
        ("!=", Comparator::Ne),
        ("<", Comparator::Lt),
        (">", Comparator::Gt),
        ("=", Comparator::Eq),
    ];

    operators
        .iter()
        .find(|(symbol, _)| rest.starts_with(symbol))
        .map(|(symbol, comparator)| Token {
            kind: TokenKind::Operator(*comparator),
            text: symbol.to_string(),
            value: symbol.to_string(),
            position: start,
            end: start + symbol.len(),
        })
}

fn read_quoted(source: &str, chars: &mut Chars<'_>) -> Token {
    let mut value = String::new();
    let mut end = source.len();
    let mut terminated = false;
    let start = match chars.next() {
        Some((i, _)) => i,
        None => source.len(),
    };

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, escaped @ ('"' | '\\'))) => value.push(escaped),
                Some((_, other)) => {
                    value.push('\\');
                    value.push(other);
                }
                None => value.push('\\'),
            },
            '"' => {
                end = i + 1;
                terminated = true;
                break;
            }
            _ => value.push(c),
        }
    }

    Token {
        kind: TokenKind::Quoted { terminated },
        text: source[start..end].to_string(),
        value,
        position: start,
        end,
    }
}

fn read_word(source: &str, chars: &mut Chars<'_>) -> Token {
    let mut value = String::new();
    let mut escaped = false;
    let start = chars.peek().map(|&(i, _)| i).unwrap_or(source.len());
    let mut end = start;

    while let Some(&(i, c)) = chars.peek() {
        if c == '\\' {
            chars.next();
            escaped = true;
            end = i + 1;
            match chars.next() {
                Some((j, next)) => {
                    value.push(next);
                    end = j + next.len_utf8();
                }
                None => value.push('\\'),
            }
        } else if is_delimiter(c) && end > start {
            break;
        } else {
            chars.next();
            value.push(c);
            end = i + c.len_utf8();
        }
    }

    let text = source[start..end].to_string();
    let kind = if escaped {
        TokenKind::Word
    } else if let Some(keyword) = Keyword::lookup(&text) {
        TokenKind::Keyword(keyword)
    } else if NUMBER.is_match(&text) {
        TokenKind::Number
    } else {
        TokenKind::Word
    };

    Token {
        kind,
        text,
        value,
        position: start,
        end,
    }
}
