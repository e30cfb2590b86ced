//! Canonical text rendering of clause trees
//!
//! The output re-parses to a structurally equal tree. Whitespace, quoting
//! style and the choice between `,` and `or` are not preserved: OR always
//! renders as `, `, AND as ` and `, negated leaves with a leading `-`.
//! Numbers put a space after it (`- 5`), since `-5` is a literal.

use std::fmt::{self, Write};

use crate::clause::ast::{
    BooleanLeaf, BooleanValue, Clause, DateLeaf, DateLiteral, DateTest, Moment, NumberLeaf,
    NumberTest, OpenEnd, RelativeMoment, Span, StringLeaf, StringTest, Which,
};

/// Words the string grammar treats as structure or as value-less leaves
const RESERVED: [&str; 5] = ["and", "or", "not", "null", "empty"];

/// Render a clause as canonical filter text
pub fn serialize(clause: &Clause) -> String {
    clause.to_string()
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Or(members) => write_members(f, members, ", ", |c| matches!(c, Clause::Or(_))),
            Clause::And(members) => write_members(f, members, " and ", |c| {
                matches!(c, Clause::Or(_) | Clause::And(_))
            }),
            Clause::Not(inner) => write!(f, "not ({})", inner),
            Clause::String(leaf) => write!(f, "{}", leaf),
            Clause::Number(leaf) => write!(f, "{}", leaf),
            Clause::Boolean(leaf) => write!(f, "{}", leaf),
            Clause::Date(leaf) => write!(f, "{}", leaf),
        }
    }
}

fn write_members(
    f: &mut fmt::Formatter<'_>,
    members: &[Clause],
    separator: &str,
    needs_parens: fn(&Clause) -> bool,
) -> fmt::Result {
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        if needs_parens(member) {
            write!(f, "({})", member)?;
        } else {
            write!(f, "{}", member)?;
        }
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// String
// ═══════════════════════════════════════════════════════════════════════════

impl fmt::Display for StringLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_char('-')?;
        }
        match &self.test {
            StringTest::Match(value) if needs_quotes(value) => write_quoted(f, value),
            StringTest::Match(value) => f.write_str(value),
            StringTest::StartsWith(value) => {
                write_escaped(f, value, true)?;
                f.write_char('%')
            }
            StringTest::EndsWith(value) => {
                f.write_char('%')?;
                write_escaped(f, value, false)
            }
            StringTest::Contains(value) => {
                f.write_char('%')?;
                write_escaped(f, value, false)?;
                f.write_char('%')
            }
            StringTest::Like(pattern) => write_pattern(f, pattern),
            StringTest::Null => f.write_str("null"),
            StringTest::Empty => f.write_str("empty"),
        }
    }
}

/// Characters that end or alter an unquoted word
fn is_special(c: char) -> bool {
    c.is_whitespace()
        || matches!(c, ',' | ';' | '|' | '(' | ')' | '[' | ']' | '"' | '\\' | '%' | '_')
}

/// Characters that start a `-` or an operator token at the front of a word
fn is_special_first(c: char) -> bool {
    matches!(c, '-' | '<' | '>' | '=' | '!')
}

fn needs_quotes(value: &str) -> bool {
    let Some(first) = value.chars().next() else {
        return true;
    };
    is_special_first(first)
        || value.chars().any(is_special)
        || RESERVED.iter().any(|r| value.eq_ignore_ascii_case(r))
}

fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
    }
    f.write_char('"')
}

fn write_escaped_char(f: &mut fmt::Formatter<'_>, c: char, first: bool) -> fmt::Result {
    if is_special(c) || (first && is_special_first(c)) {
        f.write_char('\\')?;
    }
    f.write_char(c)
}

fn write_escaped(f: &mut fmt::Formatter<'_>, value: &str, at_start: bool) -> fmt::Result {
    for (i, c) in value.chars().enumerate() {
        write_escaped_char(f, c, at_start && i == 0)?;
    }
    Ok(())
}

/// Re-emit a LIKE pattern as a word: wildcards stay bare, everything else is
/// escaped the same way as a plain value
fn write_pattern(f: &mut fmt::Formatter<'_>, pattern: &str) -> fmt::Result {
    let mut chars = pattern.chars();
    let mut first = true;
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let literal = chars.next().unwrap_or('\\');
                write_escaped_char(f, literal, first)?;
            }
            '%' | '_' => f.write_char(c)?,
            _ => write_escaped_char(f, c, first)?,
        }
        first = false;
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// Number
// ═══════════════════════════════════════════════════════════════════════════

impl fmt::Display for NumberLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("- ")?;
        }
        match &self.test {
            NumberTest::Eq(n) => write!(f, "{}", n),
            NumberTest::Ne(n) => write!(f, "!= {}", n),
            NumberTest::Lt(n) => write!(f, "< {}", n),
            NumberTest::Lte(n) => write!(f, "<= {}", n),
            NumberTest::Gt(n) => write!(f, "> {}", n),
            NumberTest::Gte(n) => write!(f, ">= {}", n),
            NumberTest::Range(low, high) => write!(f, "{} to {}", low, high),
            NumberTest::HalfOpen(low, high, OpenEnd::High) => write!(f, "[{} to {})", low, high),
            NumberTest::HalfOpen(low, high, OpenEnd::Low) => write!(f, "({} to {}]", low, high),
            NumberTest::Null => f.write_str("null"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Boolean
// ═══════════════════════════════════════════════════════════════════════════

impl fmt::Display for BooleanLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_char('-')?;
        }
        f.write_str(match self.value {
            BooleanValue::True => "true",
            BooleanValue::False => "false",
            BooleanValue::Null => "null",
            BooleanValue::StrictTrue => "=true",
            BooleanValue::StrictFalse => "=false",
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Date / time
// ═══════════════════════════════════════════════════════════════════════════

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.n == 1 { "" } else { "s" };
        write!(f, "{} {}{}", self.n, self.unit.name(), plural)
    }
}

impl fmt::Display for DateLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Display for RelativeMoment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelativeMoment::Now => f.write_str("now"),
            RelativeMoment::Today => f.write_str("today"),
            RelativeMoment::Yesterday => f.write_str("yesterday"),
            RelativeMoment::Tomorrow => f.write_str("tomorrow"),
            RelativeMoment::This(unit) => write!(f, "this {}", unit.name()),
            RelativeMoment::Last(unit) => write!(f, "last {}", unit.name()),
            RelativeMoment::Next(unit) => write!(f, "next {}", unit.name()),
            RelativeMoment::Weekday(day, Which::Last) => f.write_str(day.name()),
            RelativeMoment::Weekday(day, Which::Next) => write!(f, "next {}", day.name()),
            RelativeMoment::Ago(span) => write!(f, "{} ago", span),
            RelativeMoment::FromNow(span) => write!(f, "{} from now", span),
        }
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Moment::Absolute(literal) => write!(f, "{}", literal),
            Moment::Relative(moment) => write!(f, "{}", moment),
        }
    }
}

impl fmt::Display for DateLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_char('-')?;
        }
        match &self.test {
            DateTest::Absolute(literal) => write!(f, "{}", literal),
            DateTest::Relative(moment) => write!(f, "{}", moment),
            DateTest::Range(from, to) => write!(f, "{} to {}", from, to),
            DateTest::For(from, span) => write!(f, "{} for {}", from, span),
            DateTest::Before(moment) => write!(f, "before {}", moment),
            DateTest::After(moment) => write!(f, "after {}", moment),
            DateTest::InLast(span) => write!(f, "{}", span),
            DateTest::Last(span) => write!(f, "last {}", span),
            DateTest::Next(span) => write!(f, "next {}", span),
            DateTest::Null => f.write_str("null"),
        }
    }
}
