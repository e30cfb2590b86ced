//! Clause tree and its canonical serializer
//!
//! Every grammar produces a [`Clause`]; [`serialize`] renders one back to
//! filter text that parses to the same tree.

mod ast;
mod serializer;


pub use ast::*;
pub use serializer::*;
