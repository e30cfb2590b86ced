//! Filter kind selection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which grammar and leaf vocabulary a filter expression uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    String,
    Number,
    Boolean,
    #[serde(alias = "timestamp", alias = "temporal")]
    Date,
}

impl FilterKind {
    pub const ALL: [FilterKind; 4] = [
        FilterKind::String,
        FilterKind::Number,
        FilterKind::Boolean,
        FilterKind::Date,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterKind::String => "string",
            FilterKind::Number => "number",
            FilterKind::Boolean => "boolean",
            FilterKind::Date => "date",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(FilterKind::String),
            "number" => Ok(FilterKind::Number),
            "boolean" => Ok(FilterKind::Boolean),
            "date" | "timestamp" | "temporal" => Ok(FilterKind::Date),
            other => Err(format!("Unknown filter kind: {}", other)),
        }
    }
}
