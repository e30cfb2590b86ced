//! Parser configuration
//!
//! Selects which grammar applies to a source string and bounds how deeply
//! an expression may nest.

mod kind;
mod options;

pub use kind::*;
pub use options::*;
