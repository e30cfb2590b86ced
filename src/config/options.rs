//! Parse options

use serde::Deserialize;

fn default_max_depth() -> usize {
    64
}

/// Limits applied while parsing
#[derive(Debug, Clone, Deserialize)]
pub struct ParseOptions {
    /// Maximum nesting of groups and negations
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}
