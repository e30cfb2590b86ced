//! Filter Clause Core - typed filter expression parser
//!
//! Parses short human-written filter expressions (`A, B`, `1 to 10`,
//! `-today`, `> 5 and < 9`) into a structured [`Clause`] tree for one of
//! four filter kinds, and renders trees back to canonical text.
//!
//! ```
//! use filter_clause_core::{parse, serialize, FilterKind};
//!
//! let clause = parse(FilterKind::Number, "1 TO 10, > 100").unwrap();
//! assert_eq!(serialize(&clause), "1 to 10, > 100");
//! ```
//!
//! Python bindings are available behind the `python` feature.

pub mod clause;
pub mod config;
pub mod error;
pub mod grammar;
pub mod option;
pub mod tokenizer;

#[cfg(feature = "python")]
mod python;

pub use clause::{serialize, Clause};
pub use config::{FilterKind, ParseOptions};
pub use error::{ParseError, ParseErrorKind, Result};
pub use grammar::{check_unambiguous, parse, parse_with_options};
pub use option::{negate_option, OptionToken};
