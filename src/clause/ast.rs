//! Clause tree produced by the filter grammars

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::FilterKind;

/// Signed decimal literal, optionally with an exponent (`-4.2E+3`)
static NUMBER_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$").unwrap());

/// A node of a parsed filter
///
/// Combinators are n-ary and never directly nest a combinator of the same
/// kind when built through [`Clause::or`] / [`Clause::and`]. Negation of a
/// leaf is a flag on the leaf; `Not` only wraps combinators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    And(Vec<Clause>),
    Or(Vec<Clause>),
    Not(Box<Clause>),
    String(StringLeaf),
    Number(NumberLeaf),
    Boolean(BooleanLeaf),
    Date(DateLeaf),
}

impl Clause {
    /// Build an OR over `members`, splicing nested ORs and collapsing a single member
    pub fn or(members: Vec<Clause>) -> Clause {
        Self::combine(members, true)
    }

    /// Build an AND over `members`, splicing nested ANDs and collapsing a single member
    pub fn and(members: Vec<Clause>) -> Clause {
        Self::combine(members, false)
    }

    fn combine(members: Vec<Clause>, is_or: bool) -> Clause {
        let mut flat = Vec::with_capacity(members.len());
        for member in members {
            match member {
                Clause::Or(inner) if is_or => flat.extend(inner),
                Clause::And(inner) if !is_or => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            if let Some(only) = flat.pop() {
                return only;
            }
        }
        if is_or {
            Clause::Or(flat)
        } else {
            Clause::And(flat)
        }
    }

    /// Invert the clause. Leaves flip their flag, `Not(x)` unwraps to `x`,
    /// and any other combinator gets wrapped in `Not`.
    pub fn negate(self) -> Clause {
        match self {
            Clause::Not(inner) => *inner,
            Clause::String(mut leaf) => {
                leaf.negated = !leaf.negated;
                Clause::String(leaf)
            }
            Clause::Number(mut leaf) => {
                leaf.negated = !leaf.negated;
                Clause::Number(leaf)
            }
            Clause::Boolean(mut leaf) => {
                leaf.negated = !leaf.negated;
                Clause::Boolean(leaf)
            }
            Clause::Date(mut leaf) => {
                leaf.negated = !leaf.negated;
                Clause::Date(leaf)
            }
            combinator => Clause::Not(Box::new(combinator)),
        }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self, Clause::And(_) | Clause::Or(_) | Clause::Not(_))
    }

    /// Whether this is a leaf with its negation flag set
    pub fn is_negated(&self) -> bool {
        match self {
            Clause::String(leaf) => leaf.negated,
            Clause::Number(leaf) => leaf.negated,
            Clause::Boolean(leaf) => leaf.negated,
            Clause::Date(leaf) => leaf.negated,
            _ => false,
        }
    }

    /// Filter kind of a leaf; combinators report the kind of their first leaf
    pub fn kind(&self) -> Option<FilterKind> {
        match self {
            Clause::String(_) => Some(FilterKind::String),
            Clause::Number(_) => Some(FilterKind::Number),
            Clause::Boolean(_) => Some(FilterKind::Boolean),
            Clause::Date(_) => Some(FilterKind::Date),
            Clause::Not(inner) => inner.kind(),
            Clause::And(members) | Clause::Or(members) => {
                members.iter().find_map(Clause::kind)
            }
        }
    }

    /// Direct children of a combinator, empty for leaves
    pub fn children(&self) -> &[Clause] {
        match self {
            Clause::And(members) | Clause::Or(members) => members,
            Clause::Not(inner) => std::slice::from_ref(inner.as_ref()),
            _ => &[],
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// String
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringLeaf {
    pub test: StringTest,
    #[serde(default)]
    pub negated: bool,
}

/// String leaf operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringTest {
    /// Case-insensitive match of the whole value (the default for a bare value)
    Match(String),
    StartsWith(String),
    EndsWith(String),
    Contains(String),
    /// Wildcard pattern; `%` and `_` are wildcards, `\%`, `\_`, `\\` are literal
    Like(String),
    Null,
    Empty,
}

/// Operation names of a string leaf, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringOp {
    Match,
    StartsWith,
    EndsWith,
    Contains,
    Like,
    Null,
    Empty,
}

impl StringLeaf {
    pub fn new(test: StringTest) -> Self {
        Self {
            test,
            negated: false,
        }
    }

    pub fn op(&self) -> StringOp {
        match self.test {
            StringTest::Match(_) => StringOp::Match,
            StringTest::StartsWith(_) => StringOp::StartsWith,
            StringTest::EndsWith(_) => StringOp::EndsWith,
            StringTest::Contains(_) => StringOp::Contains,
            StringTest::Like(_) => StringOp::Like,
            StringTest::Null => StringOp::Null,
            StringTest::Empty => StringOp::Empty,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match &self.test {
            StringTest::Match(v)
            | StringTest::StartsWith(v)
            | StringTest::EndsWith(v)
            | StringTest::Contains(v)
            | StringTest::Like(v) => Some(v),
            StringTest::Null | StringTest::Empty => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Number
// ═══════════════════════════════════════════════════════════════════════════

/// A numeric literal kept in its source spelling (`42`, `-4.2E+3`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NumberLiteral(String);

impl NumberLiteral {
    /// Validate and wrap a literal; `None` if `text` is not a number
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if NUMBER_LITERAL.is_match(&text) {
            Some(Self(text))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_f64(&self) -> f64 {
        // The regex only admits strings Rust's float parser accepts.
        self.0.parse().unwrap_or(f64::NAN)
    }
}

impl TryFrom<String> for NumberLiteral {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        NumberLiteral::new(value.clone()).ok_or_else(|| format!("Invalid number: {}", value))
    }
}

impl From<NumberLiteral> for String {
    fn from(literal: NumberLiteral) -> String {
        literal.0
    }
}

impl fmt::Display for NumberLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberLeaf {
    pub test: NumberTest,
    #[serde(default)]
    pub negated: bool,
}

/// Number leaf operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberTest {
    Eq(NumberLiteral),
    Ne(NumberLiteral),
    Lt(NumberLiteral),
    Lte(NumberLiteral),
    Gt(NumberLiteral),
    Gte(NumberLiteral),
    /// Inclusive at both ends
    Range(NumberLiteral, NumberLiteral),
    /// Inclusive at one end only, written `[low to high)` or `(low to high]`
    HalfOpen(NumberLiteral, NumberLiteral, OpenEnd),
    Null,
}

/// The excluded end of a half-open interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenEnd {
    Low,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Range,
    HalfOpen,
    Null,
}

impl NumberLeaf {
    pub fn new(test: NumberTest) -> Self {
        Self {
            test,
            negated: false,
        }
    }

    pub fn op(&self) -> NumberOp {
        match self.test {
            NumberTest::Eq(_) => NumberOp::Eq,
            NumberTest::Ne(_) => NumberOp::Ne,
            NumberTest::Lt(_) => NumberOp::Lt,
            NumberTest::Lte(_) => NumberOp::Lte,
            NumberTest::Gt(_) => NumberOp::Gt,
            NumberTest::Gte(_) => NumberOp::Gte,
            NumberTest::Range(_, _) => NumberOp::Range,
            NumberTest::HalfOpen(_, _, _) => NumberOp::HalfOpen,
            NumberTest::Null => NumberOp::Null,
        }
    }

    /// Literal operands in source order (zero, one or two)
    pub fn values(&self) -> Vec<&NumberLiteral> {
        match &self.test {
            NumberTest::Eq(n)
            | NumberTest::Ne(n)
            | NumberTest::Lt(n)
            | NumberTest::Lte(n)
            | NumberTest::Gt(n)
            | NumberTest::Gte(n) => vec![n],
            NumberTest::Range(low, high) | NumberTest::HalfOpen(low, high, _) => vec![low, high],
            NumberTest::Null => Vec::new(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Boolean
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanValue {
    True,
    /// False or null
    False,
    Null,
    /// `=true`: null is unknown rather than a mismatch, negated or not
    StrictTrue,
    /// `=false`: only false, with null unknown
    StrictFalse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanLeaf {
    pub value: BooleanValue,
    #[serde(default)]
    pub negated: bool,
}

impl BooleanLeaf {
    pub fn new(value: BooleanValue) -> Self {
        Self {
            value,
            negated: false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Date / time
// ═══════════════════════════════════════════════════════════════════════════

/// Calendar granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl TemporalUnit {
    pub const ALL: [TemporalUnit; 8] = [
        TemporalUnit::Second,
        TemporalUnit::Minute,
        TemporalUnit::Hour,
        TemporalUnit::Day,
        TemporalUnit::Week,
        TemporalUnit::Month,
        TemporalUnit::Quarter,
        TemporalUnit::Year,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TemporalUnit::Second => "second",
            TemporalUnit::Minute => "minute",
            TemporalUnit::Hour => "hour",
            TemporalUnit::Day => "day",
            TemporalUnit::Week => "week",
            TemporalUnit::Month => "month",
            TemporalUnit::Quarter => "quarter",
            TemporalUnit::Year => "year",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }
}

/// Direction of a relative reference (`last monday`, `next week`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Which {
    Last,
    Next,
}

/// A count of units (`3 days`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub n: u32,
    pub unit: TemporalUnit,
}

/// ISO-style date or timestamp literal, kept as typed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateLiteral {
    pub text: String,
    /// Granularity implied by the literal; `None` for sub-second timestamps
    pub unit: Option<TemporalUnit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelativeMoment {
    Now,
    Today,
    Yesterday,
    Tomorrow,
    This(TemporalUnit),
    Last(TemporalUnit),
    Next(TemporalUnit),
    Weekday(Weekday, Which),
    Ago(Span),
    FromNow(Span),
}

impl RelativeMoment {
    pub fn unit(&self) -> Option<TemporalUnit> {
        match self {
            RelativeMoment::Now => None,
            RelativeMoment::Today | RelativeMoment::Yesterday | RelativeMoment::Tomorrow => {
                Some(TemporalUnit::Day)
            }
            RelativeMoment::Weekday(_, _) => Some(TemporalUnit::Day),
            RelativeMoment::This(unit) | RelativeMoment::Last(unit) | RelativeMoment::Next(unit) => {
                Some(*unit)
            }
            RelativeMoment::Ago(span) | RelativeMoment::FromNow(span) => Some(span.unit),
        }
    }
}

/// A point or period in time used as an operand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Moment {
    Absolute(DateLiteral),
    Relative(RelativeMoment),
}

impl Moment {
    pub fn unit(&self) -> Option<TemporalUnit> {
        match self {
            Moment::Absolute(literal) => literal.unit,
            Moment::Relative(moment) => moment.unit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateLeaf {
    pub test: DateTest,
    #[serde(default)]
    pub negated: bool,
}

/// Date leaf operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateTest {
    /// Inside the period named by a literal (`2001-02-03`)
    Absolute(DateLiteral),
    /// Inside a relative period (`today`, `last week`)
    Relative(RelativeMoment),
    /// From the start of the first moment up to the start of the second
    Range(Moment, Moment),
    /// Starting at a moment and lasting a span (`now for 2 hours`)
    For(Moment, Span),
    Before(Moment),
    After(Moment),
    /// The last `n` units including the current one (`7 days`)
    InLast(Span),
    /// The `n` complete units before the current one (`last 2 weeks`)
    Last(Span),
    /// The `n` complete units after the current one (`next 3 days`)
    Next(Span),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOp {
    Absolute,
    Relative,
    Range,
    For,
    Before,
    After,
    InLast,
    Last,
    Next,
    Null,
}

impl DateLeaf {
    pub fn new(test: DateTest) -> Self {
        Self {
            test,
            negated: false,
        }
    }

    pub fn op(&self) -> DateOp {
        match self.test {
            DateTest::Absolute(_) => DateOp::Absolute,
            DateTest::Relative(_) => DateOp::Relative,
            DateTest::Range(_, _) => DateOp::Range,
            DateTest::For(_, _) => DateOp::For,
            DateTest::Before(_) => DateOp::Before,
            DateTest::After(_) => DateOp::After,
            DateTest::InLast(_) => DateOp::InLast,
            DateTest::Last(_) => DateOp::Last,
            DateTest::Next(_) => DateOp::Next,
            DateTest::Null => DateOp::Null,
        }
    }

    /// Granularity of the leaf, taken from its (first) operand
    pub fn unit(&self) -> Option<TemporalUnit> {
        match &self.test {
            DateTest::Absolute(literal) => literal.unit,
            DateTest::Relative(moment) => moment.unit(),
            DateTest::Range(from, _) | DateTest::For(from, _) => from.unit(),
            DateTest::Before(moment) | DateTest::After(moment) => moment.unit(),
            DateTest::InLast(span) | DateTest::Last(span) | DateTest::Next(span) => Some(span.unit),
            DateTest::Null => None,
        }
    }
}

impl From<StringLeaf> for Clause {
    fn from(leaf: StringLeaf) -> Clause {
        Clause::String(leaf)
    }
}

impl From<NumberLeaf> for Clause {
    fn from(leaf: NumberLeaf) -> Clause {
        Clause::Number(leaf)
    }
}

impl From<BooleanLeaf> for Clause {
    fn from(leaf: BooleanLeaf) -> Clause {
        Clause::Boolean(leaf)
    }
}

impl From<DateLeaf> for Clause {
    fn from(leaf: DateLeaf) -> Clause {
        Clause::Date(leaf)
    }
}
