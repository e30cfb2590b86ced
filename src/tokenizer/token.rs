//! Token types and the keyword table

use ahash::AHashMap;
use once_cell::sync::Lazy;
use std::fmt;

use crate::clause::{TemporalUnit, Weekday};

/// Comparison operators (`=`, `!=`, `<`, `<=`, `>`, `>=`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Comparator {
    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Ne => "!=",
            Comparator::Lt => "<",
            Comparator::Lte => "<=",
            Comparator::Gt => ">",
            Comparator::Gte => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    Comma,
    /// `;`, alternative spelling of `and`
    Semicolon,
    /// `|`, alternative spelling of `or`
    Pipe,
    LeftParen,
    RightParen,
    /// Interval brackets, only meaningful in number filters
    LeftBracket,
    RightBracket,
    /// Leading `-`: negation shorthand, or the sign of an adjacent number
    Minus,
}

/// Case-insensitive reserved words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    And,
    Or,
    Not,
    Null,
    Empty,
    To,
    True,
    False,
    Before,
    After,
    Now,
    Today,
    Yesterday,
    Tomorrow,
    This,
    Last,
    Next,
    Ago,
    From,
    For,
    Unit(TemporalUnit),
    Weekday(Weekday),
}

static KEYWORDS: Lazy<AHashMap<String, Keyword>> = Lazy::new(|| {
    let mut map = AHashMap::with_capacity(64);
    let fixed = [
        ("and", Keyword::And),
        ("or", Keyword::Or),
        ("not", Keyword::Not),
        ("null", Keyword::Null),
        ("empty", Keyword::Empty),
        ("to", Keyword::To),
        ("true", Keyword::True),
        ("false", Keyword::False),
        ("before", Keyword::Before),
        ("after", Keyword::After),
        ("now", Keyword::Now),
        ("today", Keyword::Today),
        ("yesterday", Keyword::Yesterday),
        ("tomorrow", Keyword::Tomorrow),
        ("this", Keyword::This),
        ("last", Keyword::Last),
        ("next", Keyword::Next),
        ("ago", Keyword::Ago),
        ("from", Keyword::From),
        ("for", Keyword::For),
    ];
    for (word, keyword) in fixed {
        map.insert(word.to_string(), keyword);
    }
    for unit in TemporalUnit::ALL {
        map.insert(unit.name().to_string(), Keyword::Unit(unit));
        map.insert(format!("{}s", unit.name()), Keyword::Unit(unit));
    }
    for day in Weekday::ALL {
        map.insert(day.name().to_string(), Keyword::Weekday(day));
    }
    map
});

impl Keyword {
    /// Look up a word, ignoring case
    pub fn lookup(word: &str) -> Option<Keyword> {
        KEYWORDS.get(word.to_ascii_lowercase().as_str()).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare text that is neither a keyword nor a number
    Word,
    /// Double-quoted string; `terminated` is false when input ended inside it
    Quoted { terminated: bool },
    /// Unsigned decimal literal
    Number,
    Operator(Comparator),
    Keyword(Keyword),
    Punct(Punct),
}

/// One lexical unit of a filter expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text exactly as written, including quotes and backslashes
    pub text: String,
    /// Text with quotes removed and escapes resolved
    pub value: String,
    /// Byte offset of the first character
    pub position: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

impl Token {
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    pub fn is_punct(&self, punct: Punct) -> bool {
        self.kind == TokenKind::Punct(punct)
    }

    pub fn keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword(keyword) => Some(keyword),
            _ => None,
        }
    }

    pub fn is_unterminated(&self) -> bool {
        self.kind == TokenKind::Quoted { terminated: false }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.text)
    }
}
